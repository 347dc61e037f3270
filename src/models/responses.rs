//! Response DTOs for the search cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, PageResult, Source};
use crate::upstream::Item;

/// Response body for `GET /api/search`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Items on this page
    pub data: Vec<Item>,
    /// Page the items belong to (always 1 on a fresh fetch)
    pub current_page: u32,
    /// Whether a further page exists
    pub has_more: bool,
    /// "cache" or "fresh"
    pub source: Source,
}

impl From<PageResult> for SearchResponse {
    fn from(page: PageResult) -> Self {
        Self {
            data: page.items,
            current_page: page.page,
            has_more: page.has_more,
            source: page.source,
        }
    }
}

/// Response body for `DELETE /api/search`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Human readable outcome
    pub message: String,
    /// Normalized key that was targeted
    pub key: String,
    /// Whether a live entry was removed
    pub removed: bool,
}

impl InvalidateResponse {
    /// Creates a new InvalidateResponse
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        let key = key.into();
        let message = if removed {
            format!("Cache entry '{}' invalidated", key)
        } else {
            format!("No cache entry for '{}'", key)
        };
        Self {
            message,
            key,
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub upstream_fetches: u64,
    pub upstream_failures: u64,
    pub expirations: u64,
    pub invalidations: u64,
    /// Current number of cached result sets
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            upstream_fetches: stats.upstream_fetches,
            upstream_failures: stats.upstream_failures,
            expirations: stats.expirations,
            invalidations: stats.invalidations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
