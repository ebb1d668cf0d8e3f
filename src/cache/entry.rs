//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Instant at which the entry stops being live
    pub expires_at: Instant,
    /// Instant of the last successful set or get
    pub last_accessed: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stored at `now` that expires at `expires_at`.
    pub fn new(value: V, now: Instant, expires_at: Instant) -> Self {
        Self {
            value,
            expires_at,
            last_accessed: now,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so it
    /// is never returned at the exact instant its TTL runs out.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Touch ==
    /// Records an access at `now`.
    pub fn touch(&mut self, now: Instant) {
        self.last_accessed = now;
    }

    // == Time To Live ==
    /// Returns remaining lifetime at `now`, zero once expired.
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}
