//! Upstream Module
//!
//! The slow, rate-limited search provider the cache sits in front of.
//! The cache only ever sees it through [`UpstreamClient`].

mod http;

use async_trait::async_trait;

pub use http::HttpUpstream;

/// A single search result. Opaque to the cache: counted and sliced, never inspected.
pub type Item = serde_json::Value;

/// An expensive, fallible search backend.
///
/// Implementations may be arbitrarily slow and may fail for any reason; the
/// cache makes no assumption about ordering stability across calls.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Returns up to `max_results` items for `term` in `country`.
    async fn search(
        &self,
        term: &str,
        country: &str,
        max_results: usize,
    ) -> anyhow::Result<Vec<Item>>;
}
