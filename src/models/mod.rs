//! Response models for the admin HTTP surface
//!
//! Defines the DTOs serialized into admin endpoint response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{HealthResponse, StatsResponse};
