//! Cache Store Module
//!
//! The public cache surface: coordinates the namespace, the short-life cache
//! and the backend for every operation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::cache::{CacheStats, Namespace, ShortLifeCache};
use crate::config::StoreConfig;
use crate::error::Result;

// == Write Options ==
/// Per-call options for operations that store a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Backend TTL of the stored value, None = no expiry
    pub expires_in: Option<Duration>,
}

impl WriteOptions {
    /// Options storing the value with the given TTL.
    pub fn expires_in(ttl: Duration) -> Self {
        Self {
            expires_in: Some(ttl),
        }
    }
}

// == Cache Store ==
/// Two-tier cache: a short-life cache in front of a namespaced backend.
///
/// Values are JSON encoded. The backend is the source of truth; the
/// short-life cache may serve a value up to its maximum age after another
/// process changed it or its backend TTL ran out, but never after this store
/// wrote, deleted, cleared or mutated it. A write or read-through racing with
/// a newer change of the same key leaves that key out of the short-life
/// cache. The short-life cache lock is never held across a backend call.
pub struct CacheStore<B: Backend> {
    backend: Arc<B>,
    namespace: Namespace,
    slc: Mutex<ShortLifeCache>,
}

impl<B: Backend> CacheStore<B> {
    // == Constructor ==
    /// Creates a store over `backend` with the given configuration.
    ///
    /// Fails if the namespace is invalid.
    pub fn new(backend: Arc<B>, config: &StoreConfig) -> Result<Self> {
        let namespace = Namespace::new(config.namespace.clone())?;
        debug!(
            namespace = namespace.name(),
            backend = backend.backend_name(),
            max_size = config.max_short_life_cache_size,
            max_age_ms = config.max_short_life_cache_age.as_millis() as u64,
            "created cache store"
        );

        Ok(Self {
            backend,
            namespace,
            slc: Mutex::new(ShortLifeCache::new(
                config.max_short_life_cache_size,
                config.max_short_life_cache_age,
            )),
        })
    }

    // == Write ==
    /// Stores a value in the backend and writes it through to the short-life cache.
    pub async fn write<T>(&self, key: &str, value: &T, options: &WriteOptions) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(value)?;
        let expires_at = options.expires_in.map(|ttl| Instant::now() + ttl);
        let since = self.slc.lock().reserve(key);

        self.backend
            .set(&self.namespace.key(key), bytes.clone(), options.expires_in)
            .await
            .inspect_err(|err| warn!(key, error = %err, "backend write failed"))?;

        let mut slc = self.slc.lock();
        slc.record_backend_write();
        if !slc.put_if_unchanged(key, bytes, expires_at, since) {
            // A concurrent change owns the key; do not leave an older value behind
            slc.invalidate(key);
        }
        debug!(key, "wrote entry");
        Ok(())
    }

    // == Read ==
    /// Reads a value, serving it from the short-life cache when fresh.
    ///
    /// On a short-life miss the backend is read and a hit populates the
    /// short-life cache. A backend miss returns None and is not cached.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    // == Exists ==
    /// Returns true if `read` would return a value.
    pub async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.read_bytes(key).await?.is_some())
    }

    // == Delete ==
    /// Deletes a key from both tiers. Returns true if the backend held it.
    ///
    /// Deleting a missing key is not an error.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let result = self.backend.delete(&self.namespace.key(key)).await;

        let mut slc = self.slc.lock();
        slc.invalidate(key);
        slc.record_backend_write();
        drop(slc);

        let existed = result.inspect_err(|err| warn!(key, error = %err, "backend delete failed"))?;
        debug!(key, existed, "deleted entry");
        Ok(existed)
    }

    // == Delete Matched ==
    /// Deletes every key matching a glob pattern (`*` wildcard) from both tiers.
    ///
    /// Returns the number of backend keys deleted.
    pub async fn delete_matched(&self, pattern: &str) -> Result<usize> {
        let backend_keys = self
            .backend
            .scan(&self.namespace.pattern(pattern))
            .await
            .inspect_err(|err| warn!(pattern, error = %err, "backend scan failed"))?;

        let mut deleted = 0;
        let mut failure = None;
        for backend_key in &backend_keys {
            match self.backend.delete(backend_key).await {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        let invalidated = self.slc.lock().invalidate_matching(pattern);

        if let Some(err) = failure {
            warn!(pattern, error = %err, "backend delete failed during pattern delete");
            return Err(err);
        }
        debug!(pattern, deleted, invalidated, "deleted matching entries");
        Ok(deleted)
    }

    // == Clear ==
    /// Flushes the whole namespace from the backend and empties the short-life cache.
    pub async fn clear(&self) -> Result<()> {
        let result = self.backend.flush_namespace(self.namespace.prefix()).await;
        self.slc.lock().clear();

        result.inspect_err(|err| warn!(error = %err, "backend flush failed"))?;
        debug!(namespace = self.namespace.name(), "cleared cache");
        Ok(())
    }

    // == Cleanup ==
    /// Drops stale short-life cache entries. Backend expiry is left to the backend.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&self) -> usize {
        self.slc.lock().purge_expired()
    }

    // == Increment ==
    /// Atomically adds `amount` to the integer stored under `key`.
    ///
    /// A missing key counts as 0. The short-life cache entry is invalidated so
    /// the next read fetches the new value from the backend.
    pub async fn increment(&self, key: &str, amount: i64) -> Result<i64> {
        let result = self.backend.incr(&self.namespace.key(key), amount).await;
        self.invalidate_after_mutation(key);

        let value = result.inspect_err(|err| warn!(key, error = %err, "increment failed"))?;
        debug!(key, amount, value, "incremented entry");
        Ok(value)
    }

    // == Decrement ==
    /// Atomically subtracts `amount` from the integer stored under `key`.
    pub async fn decrement(&self, key: &str, amount: i64) -> Result<i64> {
        let result = self.backend.decr(&self.namespace.key(key), amount).await;
        self.invalidate_after_mutation(key);

        let value = result.inspect_err(|err| warn!(key, error = %err, "decrement failed"))?;
        debug!(key, amount, value, "decremented entry");
        Ok(value)
    }

    // == Fetch ==
    /// Same as [`read`](Self::read).
    pub async fn fetch<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.read(key).await
    }

    /// Reads a value, producing and storing it on a miss.
    ///
    /// The producer runs at most once, only when neither tier holds the key.
    pub async fn fetch_with<T, F, Fut>(
        &self,
        key: &str,
        options: &WriteOptions,
        producer: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if let Some(value) = self.read(key).await? {
            return Ok(value);
        }

        debug!(key, "producing value on miss");
        let value = producer().await;
        self.write(key, &value, options).await?;
        Ok(value)
    }

    // == Fetch Multi ==
    /// Reads several keys, returning them in request order.
    ///
    /// Missing keys map to None; each key is resolved independently.
    pub async fn fetch_multi<T, I, K>(&self, keys: I) -> Result<Vec<(String, Option<T>)>>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut results = Vec::new();
        for key in keys {
            let key = key.as_ref();
            results.push((key.to_string(), self.read(key).await?));
        }
        Ok(results)
    }

    /// Reads several keys, producing and storing each missing one.
    ///
    /// The producer receives the missing key. Results keep request order.
    pub async fn fetch_multi_with<T, I, K, F, Fut>(
        &self,
        keys: I,
        options: &WriteOptions,
        mut producer: F,
    ) -> Result<Vec<(String, T)>>
    where
        T: Serialize + DeserializeOwned,
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
        F: FnMut(&str) -> Fut,
        Fut: Future<Output = T>,
    {
        let mut results = Vec::new();
        for key in keys {
            let key = key.as_ref();
            let value = self
                .fetch_with(key, options, || producer(key))
                .await?;
            results.push((key.to_string(), value));
        }
        Ok(results)
    }

    // == Introspection ==
    /// Returns current short-life cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.slc.lock().stats()
    }

    /// Returns the number of entries physically held by the short-life cache.
    pub fn short_life_len(&self) -> usize {
        self.slc.lock().len()
    }

    /// Returns the logical keys held by the short-life cache, oldest first.
    pub fn short_life_keys(&self) -> Vec<String> {
        self.slc.lock().keys()
    }

    /// Returns how long ago `key` entered the short-life cache, if it is held.
    pub fn short_life_age(&self, key: &str) -> Option<Duration> {
        self.slc.lock().age_of(key)
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Short-life cache lookup with backend read-through.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let since = {
            let mut slc = self.slc.lock();
            if let Some(bytes) = slc.get(key) {
                debug!(key, "short-life cache hit");
                return Ok(Some(bytes));
            }
            slc.record_backend_read();
            slc.version()
        };

        let fetched = self
            .backend
            .get(&self.namespace.key(key))
            .await
            .inspect_err(|err| warn!(key, error = %err, "backend read failed"))?;

        match fetched {
            Some(bytes) => {
                // Expiry of read-through entries is bounded by the max age only
                self.slc
                    .lock()
                    .put_if_unchanged(key, bytes.clone(), None, since);
                debug!(key, "backend hit");
                Ok(Some(bytes))
            }
            None => {
                debug!(key, "backend miss");
                Ok(None)
            }
        }
    }

    fn invalidate_after_mutation(&self, key: &str) {
        let mut slc = self.slc.lock();
        slc.invalidate(key);
        slc.record_backend_write();
    }
}

impl<B: Backend> std::fmt::Debug for CacheStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("namespace", &self.namespace.name())
            .field("backend", &self.backend.backend_name())
            .field("short_life_entries", &self.short_life_len())
            .finish()
    }
}
