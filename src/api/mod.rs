//! API Module
//!
//! HTTP handlers and routing for the search cache REST API.
//!
//! # Endpoints
//! - `GET /api/search` - One page of results for a term
//! - `DELETE /api/search` - Invalidate the cached results for a term
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
