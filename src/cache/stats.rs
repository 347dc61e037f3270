//! Cache Statistics Module
//!
//! Tracks cache performance metrics: hits, misses, upstream traffic and removals.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Requests answered from a live entry
    pub hits: u64,
    /// Requests that found no live entry for their key
    pub misses: u64,
    /// Upstream calls issued
    pub upstream_fetches: u64,
    /// Upstream calls that failed
    pub upstream_failures: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
    /// Entries removed by explicit invalidation
    pub invalidations: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Fetch ==
    /// Counts an upstream call and whether it succeeded.
    pub fn record_fetch(&mut self, succeeded: bool) {
        self.upstream_fetches += 1;
        if !succeeded {
            self.upstream_failures += 1;
        }
    }

    // == Record Insert / Removal ==
    pub fn record_insert(&mut self) {
        self.total_entries += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
        self.total_entries = self.total_entries.saturating_sub(1);
    }

    pub fn record_invalidation(&mut self) {
        self.invalidations += 1;
        self.total_entries = self.total_entries.saturating_sub(1);
    }
}
