//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cleanup: Drops stale short-life cache entries and expired backend records

mod cleanup;

pub use cleanup::spawn_cleanup_task;
