//! API Module
//!
//! Admin HTTP surface exposing read-only cache health and statistics.
//! Cache data itself is only reachable through the text protocol.
//!
//! # Endpoints
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
