//! FIFO Index Module
//!
//! Tracks insertion order for short-life cache eviction.

use std::collections::{BTreeMap, HashMap};

// == FIFO Index ==
/// Tracks insertion order for first-in-first-out eviction.
///
/// Every key gets a monotonically increasing sequence number when inserted.
/// `order` maps sequence numbers to keys (lowest = oldest) and `positions`
/// maps keys back to their sequence number, so both oldest lookup and
/// removal by key avoid scanning. Reads never reorder keys.
#[derive(Debug, Default)]
pub struct FifoIndex {
    /// Keys by insertion sequence number
    order: BTreeMap<u64, String>,
    /// Sequence number of each key
    positions: HashMap<String, u64>,
    /// Next sequence number to hand out
    next_seq: u64,
}

impl FifoIndex {
    // == Constructor ==
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Records `key` as the newest insertion.
    ///
    /// Re-inserting an existing key moves it to the newest position, since a
    /// refreshed value is a new entry.
    pub fn insert(&mut self, key: &str) {
        self.remove(key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, key.to_string());
        self.positions.insert(key.to_string(), seq);
    }

    // == Remove ==
    /// Removes a key from the index. Returns true if it was tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.positions.remove(key) {
            Some(seq) => {
                self.order.remove(&seq);
                true
            }
            None => false,
        }
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest inserted key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.positions.remove(&key);
        Some(key)
    }

    /// Iterates keys from oldest to newest.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.values().map(String::as_str)
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.order.clear();
        self.positions.clear();
    }
}
