//! In-Memory Backend Module
//!
//! A process-local backend with per-key TTL, glob scans and atomic counters.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::backend::Backend;
use crate::cache::glob_match;
use crate::error::{CacheError, Result};

// == Backend Record ==
/// A stored value with its optional expiry.
#[derive(Debug, Clone)]
struct Record {
    value: Vec<u8>,
    /// Expiration instant, None = no expiration
    expires_at: Option<Instant>,
}

impl Record {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    /// Expired once the current time is at or past the expiration instant.
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Instant::now() >= expires,
            None => false,
        }
    }

    fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

// == Memory Backend ==
/// Backend holding records in a map behind an async read-write lock.
///
/// Expired records are invisible to every operation and are dropped by
/// [`purge_expired`](MemoryBackend::purge_expired).
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: RwLock<HashMap<String, Record>>,
}

impl MemoryBackend {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Purge Expired ==
    /// Removes all expired records.
    ///
    /// Returns the number of records removed.
    pub async fn purge_expired(&self) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired());
        before - records.len()
    }

    /// Returns the number of live records.
    pub async fn len(&self) -> usize {
        let records = self.records.read().await;
        records.values().filter(|record| !record.is_expired()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let records = self.records.read().await;
        Ok(records
            .get(key)
            .filter(|record| !record.is_expired())
            .map(|record| record.value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(key.to_string(), Record::new(value, ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut records = self.records.write().await;
        Ok(records
            .remove(key)
            .is_some_and(|record| !record.is_expired()))
    }

    async fn scan(&self, pattern: &str) -> Result<Vec<String>> {
        let records = self.records.read().await;
        let mut keys: Vec<String> = records
            .iter()
            .filter(|(key, record)| !record.is_expired() && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>> {
        let records = self.records.read().await;
        Ok(records
            .get(key)
            .filter(|record| !record.is_expired())
            .and_then(Record::ttl_remaining))
    }

    async fn incr(&self, key: &str, delta: i64) -> Result<i64> {
        // Single write lock for the whole read-modify-write
        let mut records = self.records.write().await;

        let (current, expires_at) = match records.get(key) {
            Some(record) if !record.is_expired() => {
                let current = std::str::from_utf8(&record.value)
                    .ok()
                    .and_then(|text| text.parse::<i64>().ok())
                    .ok_or_else(|| {
                        CacheError::InvalidNumericState(format!(
                            "Value at '{}' is not an integer",
                            key
                        ))
                    })?;
                (current, record.expires_at)
            }
            _ => (0, None),
        };

        let updated = current.checked_add(delta).ok_or_else(|| {
            CacheError::InvalidNumericState(format!("Counter at '{}' would overflow", key))
        })?;

        records.insert(
            key.to_string(),
            Record {
                value: updated.to_string().into_bytes(),
                expires_at,
            },
        );
        debug!(key, delta, updated, "incremented counter");
        Ok(updated)
    }

    async fn flush_namespace(&self, prefix: &str) -> Result<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|key, _| !key.starts_with(prefix));
        debug!(prefix, removed = before - records.len(), "flushed namespace");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
