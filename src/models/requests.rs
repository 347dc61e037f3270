//! Request DTOs for the search cache API
//!
//! Defines the query strings accepted by the search endpoints.

use serde::Deserialize;

use crate::error::{Result, SearchError};

/// Default page size when `limit` is omitted
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Query string for `GET /api/search`
///
/// # Fields
/// - `term`: Search term (required)
/// - `country`: Country code, falls back to the configured default
/// - `page`: 1-based page number (default 1)
/// - `limit`: Page size (default 10)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl SearchQuery {
    /// Returns the term, rejecting a missing or blank one.
    pub fn term(&self) -> Result<&str> {
        self.term
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                SearchError::InvalidRequest("query parameter 'term' is required".to_string())
            })
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Query string for `DELETE /api/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateQuery {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl InvalidateQuery {
    /// Returns the term, rejecting a missing or blank one.
    pub fn term(&self) -> Result<&str> {
        self.term
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                SearchError::InvalidRequest("query parameter 'term' is required".to_string())
            })
    }
}
