//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.
//!
//! `CacheStore` is deliberately not thread-safe: it is the single composite
//! that the [`Cache`](crate::cache::Cache) engine puts behind one lock, so
//! the map and the recency list can only ever change together.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use tracing::debug;

use crate::cache::entry::expiry_from_ttl;
use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::IntegrityError;

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be > 0");
        Self {
            entries: HashMap::with_capacity(capacity),
            lru: LruTracker::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        }
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// If the key already exists, the value and TTL are replaced in place and
    /// the key becomes most recently used; no slot is consumed.
    /// If the key is new and the cache is full, the least recently used entry
    /// is evicted first.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL in seconds, None = never expires
    ///
    /// # Returns
    /// The key that was evicted to make room, if any.
    pub fn set(&mut self, key: String, value: String, ttl: Option<u64>) -> Option<String> {
        // Overwrite case
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            entry.expires_at = expiry_from_ttl(ttl);
            self.lru.touch(entry.node);
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_lru()
        } else {
            None
        };

        let node = self.lru.insert_front(key.clone());
        self.entries.insert(key, CacheEntry::new(value, ttl, node));
        self.stats.set_total_entries(self.entries.len());

        evicted
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// Expired entries are reported as absent but left in place for the
    /// reaper, a later `set` or a `delete` to remove.
    pub fn get(&mut self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.lru.touch(entry.node);
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns whether an entry was physically removed. Deleting a missing key is a no-op.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.lru.remove(entry.node);
                self.stats.set_total_entries(self.entries.len());
                true
            }
            None => false,
        }
    }

    // == Exists ==
    /// Returns true if the key is present and not expired.
    ///
    /// Leaves recency order and statistics untouched.
    pub fn exists(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Every entry is judged against one clock reading taken at the start.
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        let lru = &mut self.lru;

        self.entries.retain(|_, entry| {
            if entry.is_expired_at(now) {
                lru.remove(entry.node);
                false
            } else {
                true
            }
        });

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns the number of physically present entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the keys ordered from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.lru.iter().map(|(_, key)| key.to_string()).collect()
    }

    // == Integrity ==
    /// Checks the structural invariants tying the map to the recency list.
    ///
    /// - the entry count never exceeds capacity
    /// - the map and the recency list hold the same key set
    /// - every entry's handle names a node carrying its own key
    pub fn verify_integrity(&self) -> Result<(), IntegrityError> {
        if self.entries.len() > self.capacity {
            return Err(IntegrityError::OverCapacity {
                len: self.entries.len(),
                capacity: self.capacity,
            });
        }

        let tracked: Vec<&str> = self.lru.iter().map(|(_, key)| key).collect();
        if tracked.len() != self.lru.len() || tracked.len() != self.entries.len() {
            return Err(IntegrityError::LengthMismatch {
                entries: self.entries.len(),
                tracked: tracked.len(),
            });
        }

        let mut seen = HashSet::with_capacity(tracked.len());
        for key in tracked {
            if !seen.insert(key) {
                return Err(IntegrityError::DuplicateKey(key.to_string()));
            }
            if !self.entries.contains_key(key) {
                return Err(IntegrityError::UntrackedKey(key.to_string()));
            }
        }

        for (key, entry) in &self.entries {
            if self.lru.key(entry.node) != Some(key.as_str()) {
                return Err(IntegrityError::DanglingHandle(key.clone()));
            }
        }

        Ok(())
    }

    fn evict_lru(&mut self) -> Option<String> {
        let key = self.lru.pop_back()?;
        self.entries.remove(&key);
        self.stats.record_eviction();
        debug!(key = %key, "evicted least recently used entry");
        Some(key)
    }
}
