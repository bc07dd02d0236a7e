//! Short-Life Cache Entry Module
//!
//! Defines the entries held by the short-life cache.

use std::time::Duration;

use tokio::time::Instant;

// == Short-Life Cache Entry ==
/// An encoded value held in the short-life cache with its freshness metadata.
///
/// `inserted_at` is fixed at creation. Refreshing a key replaces the entry.
#[derive(Debug, Clone)]
pub struct SlcEntry {
    /// The encoded value
    pub value: Vec<u8>,
    /// Insertion instant
    pub inserted_at: Instant,
    /// Backend expiry of the write that produced this entry, None = no TTL
    pub expires_at: Option<Instant>,
}

impl SlcEntry {
    // == Constructor ==
    /// Creates a new entry inserted now.
    pub fn new(value: Vec<u8>, expires_at: Option<Instant>) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            expires_at,
        }
    }

    // == Age ==
    /// Returns how long ago the entry was inserted.
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.inserted_at)
    }

    // == Is Stale ==
    /// Checks if the entry is older than `max_age` and may no longer be served.
    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.age() > max_age
    }

    // == Is Expired ==
    /// Checks if a cleanup pass should drop the entry.
    ///
    /// True once the entry is stale, or once the current time is at or past
    /// the backend expiry of the write that produced it.
    pub fn is_expired(&self, max_age: Duration) -> bool {
        if self.is_stale(max_age) {
            return true;
        }
        match self.expires_at {
            Some(expires) => Instant::now() >= expires,
            None => false,
        }
    }
}
