//! API Handlers
//!
//! HTTP request handlers for each search cache endpoint.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{rejection::QueryRejection, Query, Request, State},
    middleware::Next,
    response::Response,
    Json,
};
use subtle::ConstantTimeEq;
use tracing::{error, info};

use crate::cache::ResultCache;
use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::models::{
    HealthResponse, InvalidateQuery, InvalidateResponse, SearchQuery, SearchResponse,
    StatsResponse,
};
use crate::upstream::{HttpUpstream, UpstreamClient};

/// Header carrying the client's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Application state shared across all handlers.
///
/// Holds a handle to the one result cache owned by the process and the
/// configuration it was built from.
#[derive(Clone)]
pub struct AppState {
    /// Shared result cache
    pub cache: ResultCache,
    /// Host configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: ResultCache, config: Config) -> Self {
        Self {
            cache,
            config: Arc::new(config),
        }
    }

    /// Creates a new AppState querying `upstream` with parameters from the Config.
    pub fn with_upstream(config: Config, upstream: Arc<dyn UpstreamClient>) -> Self {
        let cache = ResultCache::from_config(&config, upstream);
        Self::new(cache, config)
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds an [`HttpUpstream`] for `UPSTREAM_URL`, which must be set.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let url = config
            .upstream_url
            .clone()
            .context("UPSTREAM_URL must point at the upstream search endpoint")?;
        let upstream = HttpUpstream::new(url, config.upstream_timeout())?;
        info!(upstream = upstream.base_url(), "upstream configured");
        Ok(Self::with_upstream(config.clone(), Arc::new(upstream)))
    }
}

/// Middleware guarding `/api/*` with the `x-api-key` header.
///
/// Passes everything through unless `require_api_key` is set.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if state.config.require_api_key {
        let Some(expected) = state.config.api_key.as_deref() else {
            error!("API key guard is enabled but API_KEY is not set");
            return Err(SearchError::NotConfigured(
                "server API key is not configured".to_string(),
            ));
        };

        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if !bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
            return Err(SearchError::Unauthorized(
                "missing or invalid API key".to_string(),
            ));
        }
    }

    Ok(next.run(request).await)
}

/// Handler for GET /api/search
///
/// Serves one page for `(term, country)`, fetching upstream on a miss. The
/// wait is bounded by the configured upstream timeout; a timeout leaves the
/// cache untouched.
pub async fn search_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponse>> {
    let Query(query) = query?;
    let term = query.term()?;
    let timeout = state.config.upstream_timeout();

    let lookup = state
        .cache
        .get(term, query.country.as_deref(), query.page(), query.page_size());

    let page = tokio::time::timeout(timeout, lookup)
        .await
        .map_err(|_| {
            SearchError::UpstreamFailure(format!(
                "upstream did not answer within {}s",
                timeout.as_secs()
            ))
        })??;

    Ok(Json(page.into()))
}

/// Handler for DELETE /api/search
///
/// Drops the cached result set for `(term, country)`.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<InvalidateQuery>, QueryRejection>,
) -> Result<Json<InvalidateResponse>> {
    let Query(query) = query?;
    let term = query.term()?;
    let country = query.country.as_deref();

    let key = state.cache.key_for(term, country)?;
    let removed = state.cache.invalidate(term, country).await?;

    Ok(Json(InvalidateResponse::new(key.to_string(), removed)))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
