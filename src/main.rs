//! TTL LRU Cache demo
//!
//! Walks through eviction, recency refresh and expiry on small caches, then
//! shares one cache across threads and prints the final statistics.

use std::thread;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_lru_cache::{Config, ManualClock, TtlLruCache};

/// Main entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Run the string cache walkthrough (capacity 3)
/// 4. Run the numeric cache walkthrough (capacity 2)
/// 5. Hammer a configured cache from several threads
fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_lru_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, default_ttl={}s",
        config.capacity, config.default_ttl
    );

    string_walkthrough(config.default_ttl)?;
    numeric_walkthrough()?;
    concurrent_walkthrough(&config)?;

    Ok(())
}

/// Capacity-3 cache: LRU eviction, recency refresh by `get`, simulated expiry.
fn string_walkthrough(ttl: u64) -> Result<()> {
    let clock = ManualClock::new();
    let cache = TtlLruCache::with_clock(3, clock.clone()).context("creating string cache")?;

    info!("Adding 3 items (capacity = 3, TTL = {}s)", ttl);
    for (key, value) in [("user1", "Alice"), ("user2", "Bob"), ("user3", "Charlie")] {
        cache.set(key, value, ttl)?;
    }
    info!("Cache size: {}", cache.count());

    cache.set("user4", "Diana", ttl)?;
    info!(
        "Set user4 = Diana, user1 evicted as LRU: user1 = {:?}",
        cache.get(&"user1")?
    );

    info!("Get user2: {:?}", cache.get(&"user2")?);
    info!("Get user3: {:?}", cache.get(&"user3")?);

    cache.set("user5", "Eve", ttl)?;
    info!(
        "Set user5 = Eve, user4 evicted as LRU: user4 = {:?}",
        cache.get(&"user4")?
    );
    info!("Cache size: {}", cache.count());

    clock.advance_secs(ttl);
    info!("Advanced clock by {}s", ttl);
    info!("Get expired user2: {:?}", cache.get(&"user2")?);
    info!("Cache size after expiry: {}", cache.count());

    Ok(())
}

/// Capacity-2 cache keyed by integers.
fn numeric_walkthrough() -> Result<()> {
    let cache = TtlLruCache::new(2).context("creating numeric cache")?;

    cache.set(1, 100, 10)?;
    cache.set(2, 200, 10)?;
    info!("Key 1: {:?}", cache.get(&1)?);
    info!("Key 2: {:?}", cache.get(&2)?);

    cache.set(3, 300, 10)?;
    info!("Added key 3, key 1 (was evicted): {:?}", cache.get(&1)?);
    info!("Cache size: {}", cache.count());

    Ok(())
}

/// Several threads share one cache built from configuration.
fn concurrent_walkthrough(config: &Config) -> Result<()> {
    let cache: TtlLruCache<String, usize> =
        TtlLruCache::from_config(config).context("creating shared cache")?;
    let workers = 4;
    let per_worker = config.capacity;

    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let cache = cache.clone();
                let ttl = config.default_ttl;
                scope.spawn(move || -> ttl_lru_cache::Result<()> {
                    for i in 0..per_worker {
                        let key = format!("worker{}:{}", worker, i);
                        cache.set(key.clone(), i, ttl)?;
                        cache.get(&key)?;
                    }
                    Ok(())
                })
            })
            .collect();

        handles.into_iter().try_for_each(|handle| {
            handle
                .join()
                .map_err(|_| anyhow::anyhow!("worker thread panicked"))?
                .context("worker cache operation failed")
        })
    })?;

    info!(
        "{} workers inserted {} keys each, {} live entries remain",
        workers,
        per_worker,
        cache.count()
    );

    let stats = cache.stats();
    println!("{}", serde_json::to_string_pretty(&stats)?);
    info!("Hit rate: {:.1}%", stats.hit_rate() * 100.0);

    Ok(())
}
