//! Read-through / write-invalidate helpers over a [`Cache`] backend.
//!
//! Every cache failure is logged at `warn` and treated as a miss (reads) or
//! ignored (writes); the database stays the source of truth.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use stockroom_cache::Cache;

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct CacheAside {
    cache: Arc<dyn Cache>,
    ttl: Duration,
    metrics: Arc<Metrics>,
}

impl CacheAside {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration, metrics: Arc<Metrics>) -> Self {
        Self {
            cache,
            ttl,
            metrics,
        }
    }

    /// Look up and decode a cached value. Counts a hit or miss for `resource`.
    pub async fn get<T: DeserializeOwned>(&self, resource: &str, key: &str) -> Option<T> {
        let raw = match self.cache.get(key).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, key, "Cache read failed");
                None
            }
        };

        let value = raw.and_then(|raw| match serde_json::from_str::<T>(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, key, "Discarding undecodable cache entry");
                None
            }
        });

        if value.is_some() {
            self.metrics.cache_hit(resource);
        } else {
            self.metrics.cache_miss(resource);
        }
        value
    }

    /// Encode and store a value for the configured TTL.
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, key, "Failed to encode cache entry");
                return;
            }
        };
        if let Err(e) = self.cache.set(key, &raw, self.ttl).await {
            tracing::warn!(error = %e, key, "Cache write failed");
        }
    }

    /// Drop the given keys.
    pub async fn invalidate<I>(&self, keys: I)
    where
        I: IntoIterator<Item = String>,
    {
        for key in keys {
            if let Err(e) = self.cache.delete(&key).await {
                tracing::warn!(error = %e, key, "Cache delete failed");
            }
        }
    }

    /// Current value of a listing generation counter.
    ///
    /// Returns `None` when the counter cannot be read, in which case the
    /// caller bypasses the listing cache entirely.
    pub async fn generation(&self, counter: &str) -> Option<i64> {
        match self.cache.get(counter).await {
            Ok(None) => Some(0),
            Ok(Some(raw)) => match raw.parse() {
                Ok(generation) => Some(generation),
                Err(e) => {
                    tracing::warn!(error = %e, key = counter, "Corrupt generation counter");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, key = counter, "Cache read failed");
                None
            }
        }
    }

    /// Advance a listing generation, orphaning every page cached under the
    /// previous one.
    pub async fn bump_generation(&self, counter: &str) {
        if let Err(e) = self.cache.incr(counter).await {
            tracing::warn!(error = %e, key = counter, "Failed to bump cache generation");
        }
    }
}
