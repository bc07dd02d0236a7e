//! Configuration Module
//!
//! Handles loading and managing store and server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default namespace applied to every backend key
pub const DEFAULT_NAMESPACE: &str = "tiercache";

/// Default maximum number of short-life cache entries
pub const DEFAULT_SLC_MAX_SIZE: usize = 1000;

/// Default maximum short-life cache entry age in seconds
pub const DEFAULT_SLC_MAX_AGE: u64 = 5;

// == Store Config ==
/// Construction-time configuration of a [`CacheStore`](crate::cache::CacheStore).
///
/// The short-life cache bounds are fixed for the lifetime of the store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Prefix applied to every backend key
    pub namespace: String,
    /// Maximum number of entries held by the short-life cache
    pub max_short_life_cache_size: usize,
    /// Maximum age of a short-life cache entry before it is considered stale
    pub max_short_life_cache_age: Duration,
}

impl StoreConfig {
    /// Creates a store config for `namespace` with default short-life cache bounds.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Sets the maximum number of short-life cache entries.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_short_life_cache_size = max_size;
        self
    }

    /// Sets the maximum short-life cache entry age.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_short_life_cache_age = max_age;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            max_short_life_cache_size: DEFAULT_SLC_MAX_SIZE,
            max_short_life_cache_age: Duration::from_secs(DEFAULT_SLC_MAX_AGE),
        }
    }
}

// == Server Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace applied to backend keys
    pub namespace: String,
    /// Maximum number of short-life cache entries
    pub slc_max_size: usize,
    /// Maximum short-life cache entry age in seconds
    pub slc_max_age: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAMESPACE` - Backend key namespace (default: tiercache)
    /// - `SLC_MAX_SIZE` - Maximum short-life cache entries (default: 1000)
    /// - `SLC_MAX_AGE` - Maximum short-life cache age in seconds (default: 5)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        Self {
            namespace: env::var("CACHE_NAMESPACE")
                .unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string()),
            slc_max_size: env::var("SLC_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SLC_MAX_SIZE),
            slc_max_age: env::var("SLC_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SLC_MAX_AGE),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
        }
    }

    /// Builds the store configuration described by this server config.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            namespace: self.namespace.clone(),
            max_short_life_cache_size: self.slc_max_size,
            max_short_life_cache_age: Duration::from_secs(self.slc_max_age),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            slc_max_size: DEFAULT_SLC_MAX_SIZE,
            slc_max_age: DEFAULT_SLC_MAX_AGE,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}
