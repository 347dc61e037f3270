//! Cache Module
//!
//! Paginating result cache with absolute TTL expiry and per-key fetch
//! deduplication.

mod entry;
mod key;
mod page;
mod stats;
mod store;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use page::{PageResult, Source};
pub use stats::CacheStats;
pub use store::ResultCache;

pub(crate) use store::StoreInner;
