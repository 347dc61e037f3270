//! Cache Key Module
//!
//! Derives the store key from a `(term, country)` pair.

use std::fmt;

use crate::error::{Result, SearchError};

// == Cache Key ==
/// Normalized `(term, country)` pair identifying one cached result set.
///
/// The term is trimmed and lowercased; the country is trimmed and lowercased,
/// falling back to the configured default when absent or blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    term: String,
    country: String,
}

impl CacheKey {
    /// Normalizes the request parameters into a key.
    ///
    /// Fails with `InvalidRequest` when the term is empty after trimming.
    pub fn new(term: &str, country: Option<&str>, default_country: &str) -> Result<Self> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Err(SearchError::InvalidRequest(
                "search term cannot be empty".to_string(),
            ));
        }

        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(default_country)
            .trim()
            .to_lowercase();

        Ok(Self { term, country })
    }

    /// Normalized search term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Normalized country code.
    pub fn country(&self) -> &str {
        &self.country
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.term, self.country)
    }
}
