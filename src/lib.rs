//! Search Cache - A paginating cache in front of a slow search provider
//!
//! Fetches each `(term, country)` result set from upstream at most once per
//! TTL window and serves every page by slicing that one cached set.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
mod tasks;
pub mod upstream;

pub use api::AppState;
pub use cache::{PageResult, ResultCache, Source};
pub use config::Config;
pub use error::SearchError;
pub use upstream::{HttpUpstream, Item, UpstreamClient};
