//! Cleanup Task
//!
//! Background task that periodically drops stale short-life cache entries and
//! expired records from the in-memory backend.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::backend::MemoryBackend;
use crate::cache::CacheStore;

/// Spawns a background task that periodically runs `cleanup` on the store and
/// purges expired backend records.
///
/// # Arguments
/// * `store` - Shared cache store
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let backend = Arc::new(MemoryBackend::new());
/// let store = Arc::new(CacheStore::new(backend, &StoreConfig::default())?);
/// let cleanup_handle = spawn_cleanup_task(store.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    store: Arc<CacheStore<MemoryBackend>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let stale = store.cleanup();
            let expired = store.backend().purge_expired().await;

            if stale > 0 || expired > 0 {
                info!(
                    "Cleanup: removed {} stale short-life entries and {} expired backend records",
                    stale, expired
                );
            } else {
                debug!("Cleanup: nothing to remove");
            }
        }
    })
}
