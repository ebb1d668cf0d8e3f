//! Integration Tests for the public cache API
//!
//! Drives `TtlLruCache` end to end, using a manual clock wherever time matters.

use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use ttl_lru_cache::{CacheError, Config, ManualClock, TtlLruCache};

// == Helper Functions ==

fn create_test_cache(capacity: usize) -> (TtlLruCache<String, String, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let cache = TtlLruCache::with_clock(capacity, clock.clone()).unwrap();
    (cache, clock)
}

fn set(cache: &TtlLruCache<String, String, ManualClock>, key: &str, value: &str, ttl: u64) {
    cache.set(key.to_string(), value.to_string(), ttl).unwrap();
}

fn get(cache: &TtlLruCache<String, String, ManualClock>, key: &str) -> Option<String> {
    cache.get(&key.to_string()).unwrap()
}

// == Construction ==

#[test]
fn test_construct_rejects_zero_capacity() {
    let err = TtlLruCache::<String, String>::new(0).unwrap_err();
    assert_eq!(err, CacheError::InvalidCapacity(0));
    assert!(!err.is_validation());
}

#[test]
fn test_construct_from_config() {
    let config = Config::default();
    let cache: TtlLruCache<u64, u64> = TtlLruCache::from_config(&config).unwrap();
    assert_eq!(cache.capacity(), config.capacity);
    assert_eq!(cache.count(), 0);
}

// == Capacity ==

#[test]
fn test_count_never_exceeds_capacity() {
    let (cache, _) = create_test_cache(5);

    for i in 0..50 {
        set(&cache, &format!("key{}", i), "value", 60);
        assert!(cache.count() <= 5);
    }

    assert_eq!(cache.count(), 5);
    assert_eq!(cache.stats().evictions, 45);
}

// == LRU ==

#[test]
fn test_get_refreshes_recency() {
    let (cache, _) = create_test_cache(3);

    set(&cache, "A", "a", 60);
    set(&cache, "B", "b", 60);
    set(&cache, "C", "c", 60);
    assert_eq!(get(&cache, "A").as_deref(), Some("a"));

    set(&cache, "D", "d", 60);

    assert_eq!(get(&cache, "B"), None);
    assert_eq!(get(&cache, "A").as_deref(), Some("a"));
    assert_eq!(get(&cache, "C").as_deref(), Some("c"));
    assert_eq!(get(&cache, "D").as_deref(), Some("d"));
}

#[test]
fn test_eviction_sequence() {
    let (cache, _) = create_test_cache(3);

    set(&cache, "user1", "Alice", 5);
    set(&cache, "user2", "Bob", 5);
    set(&cache, "user3", "Charlie", 5);
    set(&cache, "user4", "Diana", 5);
    assert_eq!(get(&cache, "user1"), None);

    get(&cache, "user2");
    get(&cache, "user3");
    set(&cache, "user5", "Eve", 5);

    assert_eq!(get(&cache, "user4"), None);
    assert_eq!(cache.count(), 3);
}

// == TTL ==

#[test]
fn test_expired_key_is_absent_and_not_counted() {
    let (cache, clock) = create_test_cache(10);

    set(&cache, "K", "v", 1);
    clock.advance(Duration::from_secs(2));

    assert_eq!(get(&cache, "K"), None);
    assert_eq!(cache.count(), 0);
}

#[test]
fn test_expired_entry_never_resurrected() {
    let (cache, clock) = create_test_cache(10);

    set(&cache, "K", "v", 1);
    clock.advance_secs(1);

    assert_eq!(cache.ttl_remaining(&"K".to_string()), None);
    assert_eq!(get(&cache, "K"), None);
    assert_eq!(get(&cache, "K"), None);
    assert_eq!(cache.stats().expirations, 1);
}

#[test]
fn test_expired_entries_purged_before_eviction() {
    let (cache, clock) = create_test_cache(2);

    set(&cache, "A", "a", 1);
    set(&cache, "B", "b", 100);
    clock.advance_secs(2);
    set(&cache, "C", "c", 100);

    assert_eq!(get(&cache, "B").as_deref(), Some("b"));
    assert_eq!(get(&cache, "C").as_deref(), Some("c"));
    assert_eq!(cache.stats().evictions, 0);
}

// == Overwrite ==

#[test]
fn test_overwrite_keeps_count() {
    let (cache, _) = create_test_cache(10);

    set(&cache, "K", "v1", 10);
    let before = cache.count();
    set(&cache, "K", "v2", 5);

    assert_eq!(get(&cache, "K").as_deref(), Some("v2"));
    assert_eq!(cache.count(), before);
    assert_eq!(cache.ttl_remaining(&"K".to_string()), Some(Duration::from_secs(5)));
}

// == Clear ==

#[test]
fn test_clear_resets_fully() {
    let (cache, _) = create_test_cache(10);
    let keys = ["a", "b", "c", "d"];

    for key in keys {
        set(&cache, key, "value", 60);
    }
    cache.clear();

    assert_eq!(cache.count(), 0);
    for key in keys {
        assert_eq!(get(&cache, key), None);
    }
}

// == Validation ==

#[test]
fn test_invalid_arguments_leave_cache_untouched() {
    let (cache, _) = create_test_cache(2);
    set(&cache, "A", "a", 60);
    set(&cache, "B", "b", 60);

    let err = cache.set("C".to_string(), "c".to_string(), 0).unwrap_err();
    assert_eq!(err, CacheError::InvalidTtl(0));
    assert!(err.is_validation());

    let err = cache.set(String::new(), "c".to_string(), 60).unwrap_err();
    assert!(matches!(err, CacheError::InvalidKey(_)));

    assert!(matches!(cache.get(&String::new()), Err(CacheError::InvalidKey(_))));

    // Neither failed call evicted A
    assert_eq!(get(&cache, "A").as_deref(), Some("a"));
    assert_eq!(cache.count(), 2);
}

// == Remove ==

#[test]
fn test_remove_frees_capacity() {
    let (cache, _) = create_test_cache(2);
    set(&cache, "A", "a", 60);
    set(&cache, "B", "b", 60);

    assert_eq!(cache.remove(&"A".to_string()).unwrap().as_deref(), Some("a"));
    set(&cache, "C", "c", 60);

    assert_eq!(get(&cache, "B").as_deref(), Some("b"));
    assert_eq!(cache.stats().evictions, 0);
}

// == Concurrency ==

#[test]
fn test_concurrent_mixed_operations() {
    let cache: TtlLruCache<u32, u32> = TtlLruCache::new(32).unwrap();

    thread::scope(|scope| {
        for worker in 0..8u32 {
            let cache = cache.clone();
            scope.spawn(move || {
                for i in 0..500u32 {
                    let key = (worker * 7 + i) % 64;
                    match i % 10 {
                        0 => {
                            let _ = cache.count();
                        }
                        1 => {
                            let _ = cache.remove(&key).unwrap();
                        }
                        2..=5 => cache.set(key, worker, 60).unwrap(),
                        _ => {
                            if let Some(value) = cache.get(&key).unwrap() {
                                assert!(value < 8);
                            }
                        }
                    }
                }
            });
        }
    });

    assert!(cache.count() <= 32);
    let live: HashSet<u32> = (0..64).filter(|k| cache.get(k).unwrap().is_some()).collect();
    assert_eq!(live.len(), cache.count());
}
