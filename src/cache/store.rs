//! Result Cache Module
//!
//! Main cache engine: per-key locked check-and-populate in front of the
//! upstream client, absolute TTL expiry and page slicing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheKey, CacheStats, PageResult, Source};
use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::tasks::schedule_removal;
use crate::upstream::UpstreamClient;

/// Per-key state. The slot's `tokio::sync::Mutex` is held across the
/// existence check and the upstream call, so one key has at most one populator.
#[derive(Debug, Default)]
pub(crate) struct SlotState {
    entry: Option<Arc<CacheEntry>>,
    removal: Option<AbortHandle>,
    /// Most recent failed fetch, numbered by `Slot::failures`
    failure: Option<(u64, SearchError)>,
}

impl SlotState {
    /// Drops the entry and cancels its pending removal.
    fn clear(&mut self) -> Option<Arc<CacheEntry>> {
        if let Some(handle) = self.removal.take() {
            handle.abort();
        }
        self.entry.take()
    }
}

/// One key's lock plus a failure counter readable without it.
///
/// A caller snapshots `failures` before queueing on `state`; a failure
/// recorded after that snapshot came from the fetch it was waiting on.
#[derive(Debug, Default)]
pub(crate) struct Slot {
    state: tokio::sync::Mutex<SlotState>,
    failures: AtomicU64,
}

// == Slot Lease ==
/// A caller's hold on one key's slot.
///
/// Dropping the lease forgets the slot when it is empty and no other caller
/// holds it. This runs on every exit path, including a caller cancelled while
/// queued or mid-fetch. The state guard must be released first, so it is
/// always declared after the lease.
struct SlotLease<'a> {
    store: &'a StoreInner,
    key: CacheKey,
    slot: Arc<Slot>,
}

impl Drop for SlotLease<'_> {
    fn drop(&mut self) {
        let mut slots = self.store.lock_slots();
        // One reference in the map, one held by this lease
        if Arc::strong_count(&self.slot) != 2
            || !slots.get(&self.key).is_some_and(|s| Arc::ptr_eq(s, &self.slot))
        {
            return;
        }
        // Nobody else can reach the slot while the map is locked
        let empty = match self.slot.state.try_lock() {
            Ok(state) => state.entry.is_none(),
            Err(_) => false,
        };
        if empty {
            slots.remove(&self.key);
        }
    }
}

// == Store Internals ==
/// Shared state behind a [`ResultCache`] handle. Removal tasks hold it weakly.
pub(crate) struct StoreInner {
    /// Key to slot map. Locked only briefly, never across an `.await`.
    slots: Mutex<HashMap<CacheKey, Arc<Slot>>>,
    upstream: Arc<dyn UpstreamClient>,
    stats: Mutex<CacheStats>,
    next_id: AtomicU64,
    ttl: Duration,
    max_fetch: usize,
    default_country: String,
}

impl StoreInner {
    fn lock_slots(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<Slot>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_stats(&self) -> MutexGuard<'_, CacheStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Leases the slot for `key`, creating it if absent.
    fn lease(&self, key: &CacheKey) -> SlotLease<'_> {
        let slot = self.lock_slots().entry(key.clone()).or_default().clone();
        SlotLease {
            store: self,
            key: key.clone(),
            slot,
        }
    }

    /// Leases the slot for `key` only if one exists.
    fn existing_lease(&self, key: &CacheKey) -> Option<SlotLease<'_>> {
        let slot = self.lock_slots().get(key).cloned()?;
        Some(SlotLease {
            store: self,
            key: key.clone(),
            slot,
        })
    }

    // == Expire ==
    /// Removes the entry under `key` if it is still population `entry_id`.
    ///
    /// Returns false when the entry was already invalidated or replaced.
    pub(crate) async fn expire(&self, key: &CacheKey, entry_id: u64) -> bool {
        let Some(lease) = self.existing_lease(key) else {
            return false;
        };
        let mut state = lease.slot.state.lock().await;

        let Some(entry) = state.entry.as_ref().filter(|e| e.id == entry_id) else {
            debug!(key = %key, entry_id, "scheduled removal superseded");
            return false;
        };

        debug!(
            key = %key,
            entry_id,
            age_secs = entry.created_at.elapsed().as_secs(),
            "removing expired entry"
        );
        state.entry = None;
        state.removal = None;
        self.lock_stats().record_expiration();
        true
    }
}

// == Result Cache ==
/// Paginating cache over an [`UpstreamClient`].
///
/// Cheap to clone; all clones share one store. Each key's result set is
/// fetched at most once per TTL window and every page is sliced from it.
#[derive(Clone)]
pub struct ResultCache {
    inner: Arc<StoreInner>,
}

impl ResultCache {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `upstream` - The search backend queried on misses
    /// * `ttl` - Absolute lifetime of every entry
    /// * `max_fetch` - Number of results requested per upstream call
    /// * `default_country` - Country used when a request names none
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        ttl: Duration,
        max_fetch: usize,
        default_country: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                slots: Mutex::new(HashMap::new()),
                upstream,
                stats: Mutex::new(CacheStats::new()),
                next_id: AtomicU64::new(1),
                ttl,
                max_fetch,
                default_country: default_country.into().trim().to_lowercase(),
            }),
        }
    }

    /// Creates a cache using the TTL, fetch size and default country from `config`.
    pub fn from_config(config: &Config, upstream: Arc<dyn UpstreamClient>) -> Self {
        Self::new(
            upstream,
            config.ttl(),
            config.max_fetch,
            config.default_country.clone(),
        )
    }

    /// Normalizes `(term, country)` into the key this cache stores it under.
    pub fn key_for(&self, term: &str, country: Option<&str>) -> Result<CacheKey> {
        CacheKey::new(term, country, &self.inner.default_country)
    }

    // == Get ==
    /// Returns page `page` of `page_size` results for `(term, country)`.
    ///
    /// A live entry is sliced as requested. Otherwise upstream is queried once,
    /// the result set is stored for the TTL, and the *first* page is returned
    /// with `source = Fresh` whatever page was asked for. Concurrent callers
    /// for the same key wait for that fetch and are then served from it.
    ///
    /// # Errors
    /// - `InvalidRequest` for an empty term or a zero page / page size
    /// - `UpstreamFailure` when the fetch fails; nothing is cached
    pub async fn get(
        &self,
        term: &str,
        country: Option<&str>,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult> {
        if page == 0 {
            return Err(SearchError::InvalidRequest(
                "page must be at least 1".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(SearchError::InvalidRequest(
                "page size must be at least 1".to_string(),
            ));
        }
        let key = self.key_for(term, country)?;

        let lease = self.inner.lease(&key);
        let failures_seen = lease.slot.failures.load(Ordering::SeqCst);
        let mut state = lease.slot.state.lock().await;

        if let Some(entry) = state.entry.clone() {
            if !entry.is_expired() {
                self.inner.lock_stats().record_hit();
                debug!(
                    key = %key,
                    page,
                    page_size,
                    ttl_remaining_secs = entry.ttl_remaining().as_secs(),
                    "cache hit"
                );
                return Ok(PageResult::slice(
                    &entry.results,
                    page,
                    page_size,
                    Source::Cache,
                ));
            }

            // Lazy eviction: the scheduled removal has not run yet
            state.clear();
            self.inner.lock_stats().record_expiration();
            debug!(key = %key, "evicted expired entry on access");
        }

        self.inner.lock_stats().record_miss();

        // The fetch this caller queued behind failed: share its outcome
        if let Some((failure, err)) = &state.failure {
            if *failure > failures_seen {
                debug!(key = %key, "sharing failed fetch with queued caller");
                return Err(err.clone());
            }
        }

        info!(key = %key, "cache miss, querying upstream");

        let fetched = self
            .inner
            .upstream
            .search(key.term(), key.country(), self.inner.max_fetch)
            .await;

        let results = match fetched {
            Ok(results) => results,
            Err(err) => {
                let message = format!("{:#}", err);
                self.inner.lock_stats().record_fetch(false);
                warn!(key = %key, error = %message, "upstream search failed");

                let failure = SearchError::UpstreamFailure(message);
                let number = lease.slot.failures.fetch_add(1, Ordering::SeqCst) + 1;
                state.failure = Some((number, failure.clone()));
                return Err(failure);
            }
        };

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = Arc::new(CacheEntry::new(id, results, self.inner.ttl));
        {
            let mut stats = self.inner.lock_stats();
            stats.record_fetch(true);
            stats.record_insert();
        }
        info!(
            key = %key,
            items = entry.len(),
            ttl_secs = self.inner.ttl.as_secs(),
            "cached upstream results"
        );

        let page = PageResult::slice(&entry.results, 1, page_size, Source::Fresh);
        state.removal = Some(schedule_removal(
            Arc::downgrade(&self.inner),
            key,
            entry.id,
            entry.expires_at,
        ));
        state.entry = Some(entry);
        state.failure = None;

        Ok(page)
    }

    // == Invalidate ==
    /// Removes the entry for `(term, country)` and cancels its scheduled removal.
    ///
    /// Idempotent. Returns whether a live entry was removed. Waits for an
    /// in-flight population of the same key, then removes its result.
    pub async fn invalidate(&self, term: &str, country: Option<&str>) -> Result<bool> {
        let key = self.key_for(term, country)?;
        let Some(lease) = self.inner.existing_lease(&key) else {
            return Ok(false);
        };
        let mut state = lease.slot.state.lock().await;

        let removed = match state.clear() {
            Some(entry) if !entry.is_expired() => {
                self.inner.lock_stats().record_invalidation();
                info!(key = %key, "invalidated cache entry");
                true
            }
            Some(_) => {
                self.inner.lock_stats().record_expiration();
                false
            }
            None => false,
        };

        Ok(removed)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock_stats().clone()
    }

    // == Length ==
    /// Returns the number of entries currently stored.
    pub fn len(&self) -> usize {
        self.inner.lock_stats().total_entries
    }

    // == Is Empty ==
    /// Returns true if no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of keys with a slot in the map, populated or not.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.inner.lock_slots().len()
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &Arc<StoreInner> {
        &self.inner
    }
}
