//! Request and Response models for the search cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP query strings and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{InvalidateQuery, SearchQuery};
pub use responses::{HealthResponse, InvalidateResponse, SearchResponse, StatsResponse};
