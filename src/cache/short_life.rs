//! Short-Life Cache Module
//!
//! Bounded, time-limited, process-local cache tier sitting in front of the backend.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::pattern::glob_match;
use crate::cache::{CacheStats, FifoIndex, SlcEntry};

/// Per-key change records kept before they are folded into the epoch
const TOUCHED_LIMIT: usize = 4096;

// == Short-Life Cache ==
/// Insertion-ordered cache of encoded values keyed by logical key.
///
/// Holds at most `max_size` entries, evicting the oldest insertion first, and
/// never serves an entry older than `max_age`. Not synchronized on its own:
/// the store keeps it behind a single mutex so the value map and the order
/// index are always updated together.
///
/// A logical clock records when each key last changed. Callers take a
/// version before a backend call and populate with
/// [`put_if_unchanged`](Self::put_if_unchanged), which refuses the value if
/// the key was written, invalidated or cleared in the meantime.
#[derive(Debug)]
pub struct ShortLifeCache {
    /// Entries by logical key
    entries: HashMap<String, SlcEntry>,
    /// Insertion order of `entries`
    order: FifoIndex,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Maximum age of a servable entry
    max_age: Duration,
    /// Logical clock, advanced by every change
    clock: u64,
    /// Clock value of the last change to each key
    touched: HashMap<String, u64>,
    /// Clock value of the last change covering every key
    epoch: u64,
}

impl ShortLifeCache {
    // == Constructor ==
    /// Creates a new short-life cache.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries; 0 disables the tier
    /// * `max_age` - Maximum age of an entry before it is treated as absent
    pub fn new(max_size: usize, max_age: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: FifoIndex::new(),
            stats: CacheStats::new(),
            max_size,
            max_age,
            clock: 0,
            touched: HashMap::new(),
            epoch: 0,
        }
    }

    // == Get ==
    /// Returns the cached value if present and fresh.
    ///
    /// A present but stale entry counts as a miss and is purged.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        let stale = match self.entries.get(key) {
            Some(entry) if !entry.is_stale(self.max_age) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if stale {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            debug!(key, "short-life cache entry went stale");
        }
        self.stats.record_miss();
        None
    }

    // == Put ==
    /// Inserts or replaces an entry with a fresh insertion time.
    ///
    /// If the insertion pushes the cache over `max_size`, the oldest inserted
    /// entry is evicted.
    pub fn put(&mut self, key: &str, value: Vec<u8>, expires_at: Option<Instant>) {
        self.entries
            .insert(key.to_string(), SlcEntry::new(value, expires_at));
        self.order.insert(key);

        while self.entries.len() > self.max_size {
            match self.order.pop_oldest() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                    debug!(key = %evicted, "evicted oldest short-life cache entry");
                }
                None => break,
            }
        }

        self.stats.set_total_entries(self.entries.len());
    }

    // == Reserve ==
    /// Marks `key` as changing and returns the version a write of it owns.
    ///
    /// Read-through populations of `key` that started before the reservation
    /// are refused afterwards.
    pub fn reserve(&mut self, key: &str) -> u64 {
        self.touch(key)
    }

    // == Put If Unchanged ==
    /// Inserts an entry only if `key` did not change after version `since`.
    ///
    /// Returns true if the entry was inserted. An inserted value counts as a
    /// change, so a slower population holding an older version cannot
    /// replace it.
    pub fn put_if_unchanged(
        &mut self,
        key: &str,
        value: Vec<u8>,
        expires_at: Option<Instant>,
        since: u64,
    ) -> bool {
        if self.changed_since(key, since) {
            debug!(key, since, "skipped short-life cache population after a newer change");
            return false;
        }
        self.put(key, value, expires_at);
        self.touch(key);
        true
    }

    // == Invalidate ==
    /// Removes an entry. Returns true if it was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.touch(key);
        let removed = self.remove_entry(key);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Invalidate Matching ==
    /// Removes every entry whose logical key matches the glob `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_matching(&mut self, pattern: &str) -> usize {
        self.advance_epoch();
        let matched: Vec<String> = self
            .order
            .keys()
            .filter(|key| glob_match(pattern, key))
            .map(str::to_string)
            .collect();

        for key in &matched {
            self.remove_entry(key);
        }

        self.stats.set_total_entries(self.entries.len());
        matched.len()
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.advance_epoch();
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Purge Expired ==
    /// Removes entries past the maximum age or past their backend expiry.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let stale_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.max_age))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(stale_keys.len());
        self.stats.set_total_entries(self.entries.len());
        stale_keys.len()
    }

    /// Returns the age of an entry, fresh or not, if it is still held.
    pub fn age_of(&self, key: &str) -> Option<Duration> {
        self.entries.get(key).map(SlcEntry::age)
    }

    /// Returns true if an entry is physically held, fresh or not.
    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the held keys from oldest to newest insertion.
    pub fn keys(&self) -> Vec<String> {
        self.order.keys().map(str::to_string).collect()
    }

    /// Returns the current version, to be passed to `put_if_unchanged`.
    pub fn version(&self) -> u64 {
        self.clock
    }

    pub fn record_backend_read(&mut self) {
        self.stats.record_backend_read();
    }

    pub fn record_backend_write(&mut self) {
        self.stats.record_backend_write();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn changed_since(&self, key: &str, since: u64) -> bool {
        self.epoch > since || self.touched.get(key).is_some_and(|&at| at > since)
    }

    fn touch(&mut self, key: &str) -> u64 {
        self.clock += 1;
        if self.touched.len() >= TOUCHED_LIMIT {
            // Folding every record into the epoch only refuses more populations
            self.epoch = self.clock;
            self.touched.clear();
        }
        self.touched.insert(key.to_string(), self.clock);
        self.clock
    }

    fn advance_epoch(&mut self) {
        self.clock += 1;
        self.epoch = self.clock;
        self.touched.clear();
    }

    /// Removes a key from both the value map and the order index.
    fn remove_entry(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.order.remove(key);
        removed
    }
}
