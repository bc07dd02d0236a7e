//! Cache Module
//!
//! Two-tier caching: a bounded, time-limited short-life cache in front of a
//! namespaced backend.

mod entry;
mod fifo;
mod namespace;
mod pattern;
mod short_life;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::SlcEntry;
pub use fifo::FifoIndex;
pub use namespace::{Namespace, SEPARATOR};
pub use pattern::{glob_match, WILDCARD};
pub use short_life::ShortLifeCache;
pub use stats::CacheStats;
pub use store::{CacheStore, WriteOptions};
