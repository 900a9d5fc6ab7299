//! Request and Response models for the HTTP surface
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! query strings and JSON response bodies. Peer envelopes live in `peer`.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::ApiQuery;
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
