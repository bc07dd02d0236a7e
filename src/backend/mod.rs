//! Backend Module
//!
//! The key-value store the cache tiers sit on top of. The store treats it as
//! the source of truth: absence and expiry there are both a miss.

mod memory;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CacheError, Result};

pub use memory::MemoryBackend;

// == Backend Trait ==
/// Operations the cache store needs from a backing key-value store.
///
/// Keys passed in are already namespaced. Implementations must be safe to
/// call concurrently; the store does not serialize backend calls.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the bytes stored under `key`, None if absent or expired
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store bytes under `key`, replacing any previous value and TTL
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Delete `key`. Returns true if it existed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// List live keys matching a glob pattern (`*` wildcard)
    async fn scan(&self, pattern: &str) -> Result<Vec<String>>;

    /// Remaining TTL of `key`, None if absent or stored without a TTL
    async fn ttl(&self, key: &str) -> Result<Option<Duration>>;

    /// Atomically add `delta` to the integer stored under `key`
    ///
    /// Absent keys start at 0. A stored value that is not a decimal integer
    /// fails with `InvalidNumericState`. Must be a single atomic operation.
    async fn incr(&self, key: &str, delta: i64) -> Result<i64>;

    /// Atomically subtract `delta` from the integer stored under `key`
    async fn decr(&self, key: &str, delta: i64) -> Result<i64> {
        let negated = delta.checked_neg().ok_or_else(|| {
            CacheError::InvalidNumericState(format!(
                "Cannot negate decrement of {}",
                delta
            ))
        })?;
        self.incr(key, negated).await
    }

    /// Delete every key starting with `prefix`; an empty prefix flushes everything
    async fn flush_namespace(&self, prefix: &str) -> Result<()>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}
