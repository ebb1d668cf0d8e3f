//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// A cache miss is never an error: lookups report it as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity passed at construction was zero
    #[error("Invalid capacity: {0} (capacity must be greater than 0)")]
    InvalidCapacity(usize),

    /// Key rejected by its validation rule
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// TTL was zero or too large to compute an expiry from
    #[error("Invalid TTL: {0} seconds")]
    InvalidTtl(u64),
}

impl CacheError {
    /// Returns true for per-call argument errors.
    ///
    /// These leave the cache untouched, so the caller may retry with corrected
    /// input. `InvalidCapacity` is a construction error and returns false.
    pub fn is_validation(&self) -> bool {
        matches!(self, CacheError::InvalidKey(_) | CacheError::InvalidTtl(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
