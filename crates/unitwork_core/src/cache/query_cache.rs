//! Read-through cache with sliding expiration.

use crate::cache::generation::{Generation, GenerationCounter};
use crate::config::CoreConfig;
use crate::error::CoreResult;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    expires_at: Instant,
    ttl: Duration,
    generation: Generation,
}

/// A process-wide read-through cache.
///
/// Entries live under string keys with a sliding expiration (default
/// 60 minutes) that resets on every hit, and capture the generation
/// token current at insertion. [`QueryCache::invalidate_all`] advances
/// the token without touching stored entries; stale-token entries are
/// treated as absent and overwritten on the next miss.
///
/// The cache is shared across all scopes in the process. Two
/// concurrent misses on the same key may both invoke their factory;
/// the last write wins. Factories must therefore be deterministic for
/// their key, and must not recurse into the cache on the same key.
pub struct QueryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    generation: GenerationCounter,
    default_ttl: Duration,
}

impl QueryCache {
    /// Creates a cache with the default 60-minute sliding expiration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(60 * 60))
    }

    /// Creates a cache with the configured default expiration.
    #[must_use]
    pub fn with_config(config: &CoreConfig) -> Self {
        Self::with_ttl(config.cache_ttl)
    }

    /// Creates a cache with a custom default sliding expiration.
    #[must_use]
    pub fn with_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            generation: GenerationCounter::new(),
            default_ttl,
        }
    }

    /// Returns the cached value, or creates it via `factory`.
    ///
    /// A hit slides the entry's expiration forward. A factory error
    /// propagates and nothing is cached.
    pub fn get_or_create<T, F>(&self, key: &str, factory: F) -> CoreResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> CoreResult<T>,
    {
        self.get_or_create_with_ttl(key, self.default_ttl, factory)
    }

    /// Like [`QueryCache::get_or_create`], with an explicit sliding
    /// expiration for this entry.
    pub fn get_or_create_with_ttl<T, F>(
        &self,
        key: &str,
        ttl: Duration,
        factory: F,
    ) -> CoreResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> CoreResult<T>,
    {
        // The token comparison is a single atomic read; entries made
        // stale by invalidate_all are dropped here, lazily.
        let generation = self.generation.current();
        {
            let mut entries = self.entries.lock();
            if let Some(entry) = entries.get_mut(key) {
                let now = Instant::now();
                if entry.generation == generation && entry.expires_at > now {
                    if let Ok(value) = Arc::clone(&entry.value).downcast::<T>() {
                        entry.expires_at = now + entry.ttl;
                        return Ok(value);
                    }
                }
                entries.remove(key);
            }
        }

        // Factory runs outside the lock: concurrent misses may race,
        // last write wins.
        let value = Arc::new(factory()?);
        let entry = CacheEntry {
            value: Arc::clone(&value) as Arc<dyn Any + Send + Sync>,
            expires_at: Instant::now() + ttl,
            ttl,
            generation: self.generation.current(),
        };
        self.entries.lock().insert(key.to_string(), entry);
        Ok(value)
    }

    /// Evicts a single entry.
    pub fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    /// Invalidates every current entry by advancing the generation
    /// token.
    ///
    /// Stored entries are not touched; they become unreachable and are
    /// evicted or overwritten lazily.
    pub fn invalidate_all(&self) -> Generation {
        self.generation.advance()
    }

    /// Returns the current generation token.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation.current()
    }

    /// Returns the number of stored entries, including logically dead
    /// ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("len", &self.len())
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}
