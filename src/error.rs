//! Error types for the search cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Search Error Enum ==
/// Unified error type for the search cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Malformed request: empty term, zero page or page size
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream call failed or timed out; nothing was cached
    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    /// Host is missing a required setting
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// Missing or wrong API key
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = match &self {
            SearchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SearchError::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
            SearchError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SearchError::Unauthorized(_) => StatusCode::FORBIDDEN,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Extractor Rejections ==
impl From<QueryRejection> for SearchError {
    fn from(rejection: QueryRejection) -> Self {
        SearchError::InvalidRequest(rejection.body_text())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the search cache.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (SearchError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (SearchError::UpstreamFailure("x".into()), StatusCode::BAD_GATEWAY),
            (
                SearchError::NotConfigured("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (SearchError::Unauthorized("x".into()), StatusCode::FORBIDDEN),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_display_includes_message() {
        let err = SearchError::UpstreamFailure("connection reset".into());
        assert_eq!(err.to_string(), "Upstream failure: connection reset");
    }
}
