//! Shared Cache Module
//!
//! Thread-safe handle over a single `CacheStore`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheKey, CacheStats, CacheStore, Clock, SystemClock};
use crate::config::Config;
use crate::error::Result;

// == TTL LRU Cache ==
/// A thread-safe in-memory cache with per-entry TTL and exact LRU eviction.
///
/// One mutex guards the entry table and the recency order together, so every
/// operation observes and leaves them consistent, and concurrent calls behave
/// as if run in some total order. The lock is held only for the in-memory
/// update. Cloning yields another handle to the same cache.
///
/// # Example
/// ```
/// use ttl_lru_cache::TtlLruCache;
///
/// let cache = TtlLruCache::new(3).unwrap();
/// cache.set("A", 1, 60).unwrap();
/// cache.set("B", 2, 60).unwrap();
/// cache.set("C", 3, 60).unwrap();
///
/// // Reading A makes B the least recently used entry
/// assert_eq!(cache.get(&"A").unwrap(), Some(1));
/// cache.set("D", 4, 60).unwrap();
///
/// assert_eq!(cache.get(&"B").unwrap(), None);
/// assert_eq!(cache.count(), 3);
/// ```
pub struct TtlLruCache<K, V, C = SystemClock> {
    inner: Arc<Mutex<CacheStore<K, V, C>>>,
}

impl<K, V, C> Clone for TtlLruCache<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, C> std::fmt::Debug for TtlLruCache<K, V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlLruCache").finish_non_exhaustive()
    }
}

impl<K: CacheKey, V> TtlLruCache<K, V> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Fails with `InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        CacheStore::new(capacity).map(Self::from_store)
    }

    /// Creates a cache sized from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.capacity)
    }
}

impl<K: CacheKey, V, C: Clock> TtlLruCache<K, V, C> {
    /// Creates a cache reading time from `clock`.
    pub fn with_clock(capacity: usize, clock: C) -> Result<Self> {
        CacheStore::with_clock(capacity, clock).map(Self::from_store)
    }

    /// Wraps an existing store.
    pub fn from_store(store: CacheStore<K, V, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Stores `value` under `key` for `ttl_seconds`. See [`CacheStore::set`].
    pub fn set(&self, key: K, value: V, ttl_seconds: u64) -> Result<()> {
        self.inner.lock().set(key, value, ttl_seconds)
    }

    /// Returns a copy of the live value under `key`. See [`CacheStore::get`].
    pub fn get(&self, key: &K) -> Result<Option<V>>
    where
        V: Clone,
    {
        self.inner.lock().get(key)
    }

    /// Removes `key`, returning its value if it was live.
    pub fn remove(&self, key: &K) -> Result<Option<V>> {
        self.inner.lock().remove(key)
    }

    /// Number of live entries.
    ///
    /// Purges expired entries under the lock before counting, so this call
    /// mutates the cache even though it only reports.
    pub fn count(&self) -> usize {
        self.inner.lock().count()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Removes all expired entries now, returning how many were purged.
    pub fn purge_expired(&self) -> usize {
        self.inner.lock().purge_expired()
    }

    /// Remaining lifetime of a live entry, without touching its recency.
    pub fn ttl_remaining(&self, key: &K) -> Option<Duration> {
        self.inner.lock().ttl_remaining(key)
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }
}
