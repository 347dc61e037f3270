//! Cache Entry Module
//!
//! Defines the immutable result set stored under a key, with its TTL window.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::upstream::Item;

// == Cache Entry ==
/// One upstream result set, fixed at creation.
///
/// `id` is unique per population so a scheduled removal can tell whether the
/// entry it was armed for is still the one stored under the key.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Population identity
    pub id: u64,
    /// Ordered upstream results
    pub results: Arc<[Item]>,
    /// When the entry was populated
    pub created_at: Instant,
    /// `created_at + ttl`
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry populated now that lives for `ttl`.
    pub fn new(id: u64, results: Vec<Item>, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            id,
            results: results.into(),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches `expires_at`.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Number of cached items.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if upstream returned no items.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
