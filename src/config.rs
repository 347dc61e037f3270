//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute lifetime of a cached result set, in seconds
    pub cache_ttl: u64,
    /// Number of results requested from upstream on every miss
    pub max_fetch: usize,
    /// Country code used when a request does not name one
    pub default_country: String,
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the upstream search endpoint
    pub upstream_url: Option<String>,
    /// Upper bound in seconds on how long a request may wait for upstream
    pub upstream_timeout: u64,
    /// Shared secret expected in the `x-api-key` header
    pub api_key: Option<String>,
    /// Whether `/api/*` routes require the API key
    pub require_api_key: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_SECS` - Entry TTL in seconds (default: 1800)
    /// - `MAX_FETCH` - Results fetched per upstream call (default: 250)
    /// - `DEFAULT_COUNTRY` - Fallback country code (default: "us")
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `UPSTREAM_URL` - Upstream search endpoint (no default)
    /// - `UPSTREAM_TIMEOUT_SECS` - Upstream wait limit in seconds (default: 30)
    /// - `API_KEY` - Shared secret for the API key guard (no default)
    /// - `REQUIRE_API_KEY` - Enable the API key guard (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_ttl: parse_var("CACHE_TTL_SECS").unwrap_or(defaults.cache_ttl),
            max_fetch: parse_var("MAX_FETCH").unwrap_or(defaults.max_fetch),
            default_country: non_empty_var("DEFAULT_COUNTRY")
                .map(|c| c.to_lowercase())
                .unwrap_or(defaults.default_country),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            upstream_url: non_empty_var("UPSTREAM_URL"),
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or(defaults.upstream_timeout),
            api_key: non_empty_var("API_KEY"),
            require_api_key: parse_var("REQUIRE_API_KEY").unwrap_or(defaults.require_api_key),
        }
    }

    /// Entry TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Upstream wait limit as a [`Duration`].
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl: 30 * 60,
            max_fetch: 250,
            default_country: "us".to_string(),
            server_port: 3000,
            upstream_url: None,
            upstream_timeout: 30,
            api_key: None,
            require_api_key: false,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
