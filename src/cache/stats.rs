//! Cache Statistics Module
//!
//! Tracks short-life cache performance metrics and backend traffic.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads served by the short-life cache
    pub hits: u64,
    /// Reads that fell through to the backend
    pub misses: u64,
    /// Entries evicted by the size bound
    pub evictions: u64,
    /// Entries dropped because they went stale
    pub expirations: u64,
    /// Number of backend reads issued
    pub backend_reads: u64,
    /// Number of backend writes and mutations issued
    pub backend_writes: u64,
    /// Current number of entries in the short-life cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the short-life cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Adds `count` stale entries to the expiration counter.
    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_backend_read(&mut self) {
        self.backend_reads += 1;
    }

    pub fn record_backend_write(&mut self) {
        self.backend_writes += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
