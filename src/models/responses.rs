//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Response body for GET /entries/:key
#[derive(Debug, Clone, Serialize)]
pub struct ReadResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
}

impl ReadResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /entries/:key
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    /// Success message
    pub message: String,
    /// The key that was written
    pub key: String,
}

impl WriteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' written successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /entries/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// The key that was deleted
    pub key: String,
    /// Whether the backend held the key
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, deleted: bool) -> Self {
        Self {
            key: key.into(),
            deleted,
        }
    }
}

/// Response body for GET /entries/:key/exists
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
}

/// Response body for increment and decrement
#[derive(Debug, Clone, Serialize)]
pub struct CounterResponse {
    /// The counter key
    pub key: String,
    /// The value after the update
    pub value: i64,
}

/// Response body for DELETE /entries
#[derive(Debug, Clone, Serialize)]
pub struct DeleteMatchedResponse {
    /// The pattern applied, None when the namespace was cleared
    pub pattern: Option<String>,
    /// Number of backend keys removed, None when the namespace was cleared
    pub deleted: Option<usize>,
}

/// Response body for POST /cleanup
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    /// Number of stale short-life entries removed
    pub removed: usize,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of short-life cache hits
    pub hits: u64,
    /// Number of short-life cache misses
    pub misses: u64,
    /// Number of size-bound evictions
    pub evictions: u64,
    /// Number of stale entries dropped
    pub expirations: u64,
    /// Number of backend reads
    pub backend_reads: u64,
    /// Number of backend writes
    pub backend_writes: u64,
    /// Current number of short-life cache entries
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            backend_reads: stats.backend_reads,
            backend_writes: stats.backend_writes,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Backend serving the store
    pub backend: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(backend: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            backend: backend.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
