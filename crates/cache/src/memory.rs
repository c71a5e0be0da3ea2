//! In-process cache backend.
//!
//! Used when no Redis URL is configured and by the API test suite. Values
//! live in a bounded [`moka`] cache where each entry expires after the TTL it
//! was stored with; expired and least-used entries are reclaimed whether or
//! not they are read again. Generation counters are kept apart from the
//! values so they never expire or get evicted.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::Expiry;
use tokio::sync::Mutex;

use crate::{Cache, CacheError};

/// Upper bound on stored values unless configured otherwise.
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expires every entry after the TTL it was last written with.
struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _remaining: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

pub struct MemoryCache {
    entries: MokaCache<String, Entry>,
    counters: Mutex<HashMap<String, i64>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Cache holding at most `max_entries` values.
    pub fn with_capacity(max_entries: u64) -> Self {
        let entries = MokaCache::builder()
            .max_capacity(max_entries)
            .expire_after(EntryTtl)
            .build();
        Self {
            entries,
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored values, counters excluded. Only exact after
    /// [`run_pending_tasks`](Self::run_pending_tasks).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Apply pending evictions and expirations now instead of on the next
    /// write.
    pub async fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks().await;
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if let Some(counter) = self.counters.lock().await.get(key) {
            return Ok(Some(counter.to_string()));
        }
        Ok(self.entries.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.counters.lock().await.remove(key);
        let entry = Entry {
            value: value.to_string(),
            ttl,
        };
        self.entries.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.counters.lock().await.remove(key);
        self.entries.invalidate(key).await;
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        let mut counters = self.counters.lock().await;
        if let Some(counter) = counters.get_mut(key) {
            *counter += 1;
            return Ok(*counter);
        }

        // A plain value under the key becomes the counter's starting point.
        let current = match self.entries.get(key).await {
            Some(entry) => entry
                .value
                .parse::<i64>()
                .map_err(|_| CacheError::NotAnInteger {
                    key: key.to_string(),
                })?,
            None => 0,
        };
        self.entries.invalidate(key).await;

        let next = current + 1;
        counters.insert(key.to_string(), next);
        Ok(next)
    }
}
