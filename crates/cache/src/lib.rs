//! Read-through cache backends for API responses.
//!
//! Values are opaque strings (serialized JSON). Every backend implements
//! [`Cache`]; callers treat any [`CacheError`] as a miss and carry on against
//! the database.

use std::time::Duration;

use async_trait::async_trait;

pub mod keys;
pub mod memory;
pub mod redis_backend;

pub use memory::{MemoryCache, DEFAULT_MAX_ENTRIES};
pub use redis_backend::RedisCache;

/// Time-to-live applied to cached entries unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Errors raised by a cache backend.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cached value at {key} is not an integer")]
    NotAnInteger { key: String },
}

/// Key/value store with per-entry expiry and atomic counters.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch a live value, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key` for `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Atomically increment the integer at `key` (starting from 0) and
    /// return the new value. Counters never expire.
    async fn incr(&self, key: &str) -> Result<i64, CacheError>;
}

/// Backend used when caching is disabled: every read misses and every write
/// is discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

#[async_trait]
impl Cache for NoopCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn incr(&self, _key: &str) -> Result<i64, CacheError> {
        Ok(0)
    }
}
