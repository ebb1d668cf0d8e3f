//! TTL LRU Cache - A thread-safe in-memory cache
//!
//! Combines per-entry time-to-live expiration with exact least-recently-used
//! capacity eviction.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStats, CacheStore, Clock, ManualClock, SystemClock, TtlLruCache};
pub use config::Config;
pub use error::{CacheError, Result};
