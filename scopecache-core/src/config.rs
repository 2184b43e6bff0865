use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default maximum number of entries per cache.
pub const DEFAULT_CAPACITY: usize = 50;

/// Default idle time-to-live for cache entries (one hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Errors raised when a [`CacheConfig`] cannot back a cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheConfigError {
    #[error("cache capacity must be greater than zero")]
    ZeroCapacity,

    #[error("cache ttl must be greater than zero")]
    ZeroTtl,
}

/// Capacity and TTL for a single bounded cache.
///
/// Both values are fixed once a cache is built from the configuration.
/// The TTL is stored in milliseconds so the struct can be loaded from
/// YAML or environment variables without a custom duration format.
///
/// # Examples
///
/// ```
/// use scopecache_core::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::new(10, Duration::from_secs(30));
/// assert_eq!(config.capacity, 10);
/// assert_eq!(config.ttl(), Duration::from_secs(30));
/// assert!(config.validate().is_ok());
///
/// assert!(CacheConfig::new(0, Duration::from_secs(30)).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of resident entries.
    pub capacity: usize,
    /// Idle expiry window in milliseconds.
    pub ttl_ms: u64,
}

impl CacheConfig {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl_ms: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Checks that both capacity and TTL are strictly positive.
    pub fn validate(&self) -> Result<(), CacheConfigError> {
        if self.capacity == 0 {
            return Err(CacheConfigError::ZeroCapacity);
        }
        if self.ttl_ms == 0 {
            return Err(CacheConfigError::ZeroTtl);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}
