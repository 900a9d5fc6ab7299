//! Response DTOs for the HTTP surface
//!
//! Defines the structure of outgoing JSON response bodies.

use serde::Serialize;

use crate::cache::NamespaceStats;

/// Response body for the stats endpoint (GET /stats/:namespace)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub namespace: String,
    /// Byte budget, 0 = unlimited
    pub capacity_bytes: usize,
    /// Bytes currently held
    pub used_bytes: usize,
    /// Current number of entries
    pub total_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    pub peer_loads: u64,
    pub peer_failures: u64,
    pub source_loads: u64,
    pub source_failures: u64,
    /// Peer most recently selected for a remote fetch
    pub remote_addr: Option<String>,
}

impl StatsResponse {
    /// Flattens a namespace stats snapshot
    pub fn new(stats: NamespaceStats, remote_addr: Option<String>) -> Self {
        Self {
            hit_rate: stats.cache.hit_rate(),
            namespace: stats.namespace,
            capacity_bytes: stats.capacity_bytes,
            used_bytes: stats.cache.used_bytes,
            total_entries: stats.cache.total_entries,
            hits: stats.cache.hits,
            misses: stats.cache.misses,
            evictions: stats.cache.evictions,
            peer_loads: stats.loads.peer_loads,
            peer_failures: stats.loads.peer_failures,
            source_loads: stats.loads.source_loads,
            source_failures: stats.loads.source_failures,
            remote_addr,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Namespaces served by this node
    pub namespaces: Vec<String>,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(namespaces: Vec<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            namespaces,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
