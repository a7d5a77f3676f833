//! Cache Engine Module
//!
//! Thread-safe front of the cache: one reader-writer lock over the whole
//! [`CacheStore`] plus ownership of the expiry reaper.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::cache::{CacheStats, CacheStore};
use crate::error::IntegrityError;
use crate::tasks::ExpiryReaper;

// == Cache ==
/// Concurrent LRU cache with per-entry TTL.
///
/// Lock discipline:
/// - `exists`, `len` and `stats` take the shared lock
/// - `set`, `del` and `get` take the exclusive lock (`get` reorders recency)
/// - the reaper takes the exclusive lock once per sweep
///
/// Share it between tasks or threads with an `Arc<Cache>`.
#[derive(Debug)]
pub struct Cache {
    store: Arc<RwLock<CacheStore>>,
    reaper: Mutex<Option<ExpiryReaper>>,
}

impl Cache {
    // == Constructors ==
    /// Creates a cache without a background reaper.
    ///
    /// Expired entries stay invisible to reads but are only physically
    /// removed by `del`, by eviction or by [`purge_expired`](Self::purge_expired).
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(capacity))),
            reaper: Mutex::new(None),
        }
    }

    /// Creates a cache and starts its reaper on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if `capacity` is 0 or if called outside a tokio runtime.
    pub fn with_reaper(capacity: usize, interval: Duration) -> Self {
        let cache = Self::new(capacity);
        let reaper = ExpiryReaper::spawn(Arc::downgrade(&cache.store), interval);
        *cache.reaper.lock() = Some(reaper);
        cache
    }

    // == Operations ==
    /// Stores `value` under `key`, replacing any previous value and TTL.
    ///
    /// `ttl` is in whole seconds; `None` means the entry never expires.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>, ttl: Option<u64>) {
        self.store.write().set(key.into(), value.into(), ttl);
    }

    /// Returns the live value for `key` and marks it most recently used.
    pub fn get(&self, key: &str) -> Option<String> {
        self.store.write().get(key)
    }

    /// Removes `key` if present. Missing keys are ignored.
    pub fn del(&self, key: &str) {
        self.store.write().delete(key);
    }

    /// Returns true if `key` holds a live value. Does not affect recency.
    pub fn exists(&self, key: &str) -> bool {
        self.store.read().exists(key)
    }

    /// Runs one expiry sweep immediately, returning the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        self.store.write().purge_expired()
    }

    // == Introspection ==
    /// Number of physically present entries, including expired ones not yet reaped.
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.store.read().capacity()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.read().stats()
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.store.read().keys_by_recency()
    }

    /// Checks the store's structural invariants under the shared lock.
    pub fn verify_integrity(&self) -> Result<(), IntegrityError> {
        self.store.read().verify_integrity()
    }

    pub fn has_reaper(&self) -> bool {
        self.reaper.lock().as_ref().is_some_and(|r| !r.is_finished())
    }

    // == Teardown ==
    /// Stops the reaper and waits for it to exit.
    ///
    /// After this returns no background sweep will touch the cache again.
    /// Calling it more than once, or on a cache without a reaper, is a no-op.
    pub async fn shutdown(&self) {
        let reaper = self.reaper.lock().take();
        if let Some(reaper) = reaper {
            reaper.shutdown().await;
        }
    }
}

impl Drop for Cache {
    fn drop(&mut self) {
        // Drop cannot await the join; `shutdown` is the orderly path
        if let Some(reaper) = self.reaper.get_mut().take() {
            reaper.abort();
        }
    }
}
