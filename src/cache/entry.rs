//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use crate::cache::lru::NodeId;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Absolute expiry instant, None = no expiration
    pub expires_at: Option<Instant>,
    /// Position of this key in the recency tracker
    pub node: NodeId,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Optional TTL in seconds
    /// * `node` - Handle returned by the tracker when the key was inserted
    pub fn new(value: String, ttl_seconds: Option<u64>, node: NodeId) -> Self {
        Self {
            value,
            expires_at: expiry_from_ttl(ttl_seconds),
            node,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiry instant,
    /// so a zero TTL is already expired on the next read.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied clock reading.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has TTL and hasn't expired
    /// - `None` if the entry has no TTL (never expires)
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

// == Utility Functions ==
/// Converts a relative TTL in whole seconds into an absolute expiry instant.
pub fn expiry_from_ttl(ttl_seconds: Option<u64>) -> Option<Instant> {
    // A TTL too large to represent as an instant behaves as "never"
    ttl_seconds.and_then(|ttl| Instant::now().checked_add(Duration::from_secs(ttl)))
}
