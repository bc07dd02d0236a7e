//! tiercache - A two-tier cache store
//!
//! Implements a standard cache interface on top of a key-value backend, with a
//! bounded, time-limited in-process short-life cache absorbing hot reads.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use backend::{Backend, MemoryBackend};
pub use cache::{CacheStore, WriteOptions};
pub use config::{Config, StoreConfig};
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
