//! TTL Expiry Task
//!
//! Removes a single cache entry once its absolute TTL has elapsed.

use std::sync::Weak;

use tokio::task::AbortHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::cache::{CacheKey, StoreInner};

/// Spawns a task that removes entry `entry_id` under `key` at `expires_at`.
///
/// The task holds the store weakly, so a dropped cache does not linger until
/// its last timer fires. It takes no lock while sleeping; on waking it removes
/// the entry only if the key still holds population `entry_id`.
///
/// # Returns
/// An [`AbortHandle`] the store keeps beside the entry, so invalidation or
/// replacement can cancel the pending removal.
pub(crate) fn schedule_removal(
    store: Weak<StoreInner>,
    key: CacheKey,
    entry_id: u64,
    expires_at: Instant,
) -> AbortHandle {
    tokio::spawn(async move {
        sleep_until(expires_at).await;

        let Some(store) = store.upgrade() else {
            debug!(key = %key, "cache dropped before entry expired");
            return;
        };

        if store.expire(&key, entry_id).await {
            info!(key = %key, entry_id, "TTL expiry: removed cache entry");
        }
    })
    .abort_handle()
}
