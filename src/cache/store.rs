//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheKey, CacheStats, Clock, LruTracker, SystemClock};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Single-threaded cache storage with LRU eviction and TTL support.
///
/// Every key in `entries` is tracked exactly once by `lru` and vice versa.
/// Expired entries are purged lazily: all of them on `set` and `count`, and
/// individually when `get` or `remove` finds one. There is no background sweep.
///
/// Wrap in [`TtlLruCache`](crate::cache::TtlLruCache) for shared use across threads.
#[derive(Debug)]
pub struct CacheStore<K, V, C = SystemClock> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Time source for expiry
    clock: C,
}

impl<K: CacheKey, V> CacheStore<K, V> {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` entries.
    ///
    /// Fails with `InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_clock(capacity, SystemClock)
    }
}

impl<K: CacheKey, V, C: Clock> CacheStore<K, V, C> {
    /// Creates a new CacheStore reading time from `clock`.
    pub fn with_clock(capacity: usize, clock: C) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        debug!(capacity, "cache store created");

        Ok(Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity,
            clock,
        })
    }

    // == Set ==
    /// Stores a key-value pair that lives for `ttl_seconds`.
    ///
    /// If the key already exists, the value is replaced, the TTL restarts and
    /// the key becomes most recently used; no eviction happens.
    /// If the key is new and the cache is full after purging expired entries,
    /// the least recently used entry is evicted, whatever its remaining TTL.
    ///
    /// Arguments are validated before anything is mutated.
    pub fn set(&mut self, key: K, value: V, ttl_seconds: u64) -> Result<()> {
        validate_key(&key)?;
        if ttl_seconds == 0 {
            return Err(CacheError::InvalidTtl(ttl_seconds));
        }

        let now = self.clock.now();
        let expires_at = now
            .checked_add(Duration::from_secs(ttl_seconds))
            .ok_or(CacheError::InvalidTtl(ttl_seconds))?;

        // Expired entries must not cost a live entry its slot
        self.purge_expired_at(now);

        let entry = CacheEntry::new(value, now, expires_at);

        // Overwrite keeps the entry count, so it never evicts
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = entry;
            self.lru.touch(&key);
            return Ok(());
        }

        if self.entries.len() >= self.capacity {
            self.evict_lru();
        }

        self.lru.touch(&key);
        self.entries.insert(key, entry);

        Ok(())
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent or expired; an expired entry is
    /// purged on the spot. A live hit becomes most recently used.
    pub fn get(&mut self, key: &K) -> Result<Option<V>>
    where
        V: Clone,
    {
        validate_key(key)?;
        let now = self.clock.now();

        let live = match self.entries.get(key) {
            Some(entry) => !entry.is_expired(now),
            None => {
                self.stats.record_miss();
                return Ok(None);
            }
        };

        if !live {
            self.discard_expired(key);
            self.stats.record_miss();
            return Ok(None);
        }

        self.lru.touch(key);
        self.stats.record_hit();

        Ok(self.entries.get_mut(key).map(|entry| {
            entry.touch(now);
            entry.value.clone()
        }))
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was live.
    pub fn remove(&mut self, key: &K) -> Result<Option<V>> {
        validate_key(key)?;
        let now = self.clock.now();

        let entry = match self.entries.remove(key) {
            Some(entry) => entry,
            None => return Ok(None),
        };
        self.lru.remove(key);

        if entry.is_expired(now) {
            self.stats.record_expirations(1);
            return Ok(None);
        }
        Ok(Some(entry.value))
    }

    // == Count ==
    /// Purges expired entries, then returns the number of live entries.
    pub fn count(&mut self) -> usize {
        let now = self.clock.now();
        self.purge_expired_at(now);
        self.entries.len()
    }

    // == Clear ==
    /// Removes every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        debug!("cache store cleared");
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        self.purge_expired_at(now)
    }

    // == Time To Live ==
    /// Returns the remaining lifetime of a live entry.
    ///
    /// Read-only: recency is not updated and expired entries are left for the
    /// next purge.
    pub fn ttl_remaining(&self, key: &K) -> Option<Duration> {
        let now = self.clock.now();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.ttl_remaining(now))
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the raw number of entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Internals ==

    fn purge_expired_at(&mut self, now: Instant) -> usize {
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        let count = expired_keys.len();
        if count > 0 {
            self.stats.record_expirations(count);
            trace!(count, "purged expired entries");
        }
        count
    }

    fn discard_expired(&mut self, key: &K) {
        self.entries.remove(key);
        self.lru.remove(key);
        self.stats.record_expirations(1);
        trace!("purged expired entry on lookup");
    }

    fn evict_lru(&mut self) {
        if let Some(evicted) = self.lru.evict_oldest() {
            self.entries.remove(&evicted);
            self.stats.record_eviction();
            debug!(capacity = self.capacity, "evicted least recently used entry");
        }
    }

    /// Panics if the entry table and recency order have drifted apart.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.entries.len(), self.lru.len(), "table/order size mismatch");
        assert!(self.entries.len() <= self.capacity, "capacity exceeded");
        assert_eq!(self.lru.iter().count(), self.lru.len(), "broken recency links");

        let mut previous: Option<Instant> = None;
        for key in self.lru.iter() {
            let entry = self.entries.get(key).expect("tracked key missing from table");
            if let Some(previous) = previous {
                assert!(previous <= entry.last_accessed, "recency order out of order");
            }
            previous = Some(entry.last_accessed);
        }
    }

    /// Keys from least to most recently used.
    #[cfg(test)]
    pub(crate) fn recency_order(&self) -> Vec<K> {
        self.lru.iter().cloned().collect()
    }
}

fn validate_key<K: CacheKey>(key: &K) -> Result<()> {
    match key.validate() {
        Some(reason) => Err(CacheError::InvalidKey(reason)),
        None => Ok(()),
    }
}
