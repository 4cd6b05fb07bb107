//! Cache key type shared by the result and geocode caches.
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Namespace for cached discovery pages.
pub const EXPLORE_NAMESPACE: &str = "explore:v1";
/// Namespace for cached geocode resolutions.
pub const GEOCODE_NAMESPACE: &str = "geocode:v1";

/// Validated key addressing one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Construct a key after checking it is non-empty and trimmed.
    pub fn new(value: impl Into<String>) -> Result<Self, CacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(CacheKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(CacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Key of the form `<namespace>:<sha256 hex of canonical>`.
    ///
    /// ```
    /// use waypoint::domain::ports::CacheKey;
    ///
    /// let key = CacheKey::fingerprinted("explore:v1", "city=hue");
    /// assert!(key.as_str().starts_with("explore:v1:"));
    /// assert_eq!(key.as_str().len(), "explore:v1:".len() + 64);
    /// ```
    pub fn fingerprinted(namespace: &str, canonical: &str) -> Self {
        let digest = Sha256::digest(canonical.as_bytes());
        Self(format!("{namespace}:{}", hex::encode(digest)))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`CacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("cache key must not be empty")]
    Empty,
    /// Key has leading or trailing whitespace.
    #[error("cache key must not contain surrounding whitespace")]
    ContainsWhitespace,
}
