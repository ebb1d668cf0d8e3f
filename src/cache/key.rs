//! Cache Key Module
//!
//! Defines which types can key the cache and how keys are validated.

use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

use crate::cache::MAX_KEY_LENGTH;

// == Cache Key ==
/// A type usable as a cache key.
///
/// Keys need equality and hashing for the entry table and `Clone` so the
/// recency order can hold its own copy. Types with an invalid sentinel value
/// override [`CacheKey::validate`]; the default accepts every value.
///
/// ```
/// use ttl_lru_cache::cache::CacheKey;
///
/// #[derive(Clone, PartialEq, Eq, Hash)]
/// struct UserId(u32);
///
/// impl CacheKey for UserId {}
/// ```
pub trait CacheKey: Hash + Eq + Clone {
    /// Returns an error message if the key must be rejected, None if valid.
    fn validate(&self) -> Option<String> {
        None
    }
}

/// Rejects empty strings and strings longer than `MAX_KEY_LENGTH` bytes.
fn validate_str(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

macro_rules! impl_unchecked_key {
    ($($ty:ty),* $(,)?) => {
        $(impl CacheKey for $ty {})*
    };
}

impl_unchecked_key!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool);

impl CacheKey for String {
    fn validate(&self) -> Option<String> {
        validate_str(self)
    }
}

impl CacheKey for &str {
    fn validate(&self) -> Option<String> {
        validate_str(self)
    }
}

impl CacheKey for Box<str> {
    fn validate(&self) -> Option<String> {
        validate_str(self)
    }
}

impl CacheKey for Arc<str> {
    fn validate(&self) -> Option<String> {
        validate_str(self)
    }
}

impl CacheKey for Rc<str> {
    fn validate(&self) -> Option<String> {
        validate_str(self)
    }
}

impl<A: CacheKey, B: CacheKey> CacheKey for (A, B) {
    fn validate(&self) -> Option<String> {
        self.0.validate().or_else(|| self.1.validate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_keys_always_valid() {
        assert!(0u64.validate().is_none());
        assert!((-1i32).validate().is_none());
        assert!('x'.validate().is_none());
    }

    #[test]
    fn test_empty_string_rejected() {
        assert_eq!(String::new().validate().as_deref(), Some("Key cannot be empty"));
        assert!("".validate().is_some());
        assert!(Arc::<str>::from("").validate().is_some());
    }

    #[test]
    fn test_long_string_rejected() {
        let at_limit = "k".repeat(MAX_KEY_LENGTH);
        let over_limit = "k".repeat(MAX_KEY_LENGTH + 1);

        assert!(at_limit.validate().is_none());
        assert!(over_limit.validate().is_some());
        assert!(over_limit.into_boxed_str().validate().is_some());
    }

    #[test]
    fn test_tuple_key_checks_both_parts() {
        assert!(("user", 7u32).validate().is_none());
        assert!(("", 7u32).validate().is_some());
        assert!((7u32, String::new()).validate().is_some());
    }
}
