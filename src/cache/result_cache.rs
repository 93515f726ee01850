use super::types::CacheStats;
use crate::error::{ShopError, ShopResult};

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

/// Default number of responses the gateway keeps.
pub const DEFAULT_CAPACITY: usize = 100;

struct Inner<V> {
    entries: LruCache<String, V>,
    hits: u64,
    misses: u64,
    invalidations: u64,
}

pub struct ResultCache<V> {
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(capacity: usize) -> ShopResult<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            ShopError::InvalidConfig("cache capacity must be greater than 0".to_string())
        })?;

        Ok(Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
                invalidations: 0,
            }),
        })
    }

    /// Looks up `key`, promoting it to most-recently-used on a hit.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock();

        match inner.entries.get(key).cloned() {
            Some(value) => {
                inner.hits += 1;
                tracing::info!("Cache HIT for key: {}", key);
                Some(value)
            }
            None => {
                inner.misses += 1;
                tracing::info!("Cache MISS for key: {}", key);
                None
            }
        }
    }

    /// Inserts or overwrites `key` as most-recently-used.
    ///
    /// A new key on a full cache evicts exactly one entry, the least-recently-used.
    /// Overwriting an existing key never evicts.
    pub fn put(&self, key: &str, value: V) {
        let mut inner = self.inner.lock();

        if !inner.entries.contains(key) && inner.entries.len() == inner.entries.cap().get() {
            if let Some((evicted, _)) = inner.entries.pop_lru() {
                tracing::info!("Cache evicted oldest key: {}", evicted);
            }
        }

        inner.entries.put(key.to_string(), value);
    }

    /// Removes `key` if cached. Only actual removals count as invalidations.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut inner = self.inner.lock();

        if inner.entries.pop(key).is_some() {
            inner.invalidations += 1;
            tracing::info!("Cache invalidated key: {}", key);
            true
        } else {
            false
        }
    }

    /// Checks presence without touching recency or counters.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().entries.contains(key)
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            invalidations: inner.invalidations,
            size: inner.entries.len(),
            capacity: inner.entries.cap().get(),
        }
    }
}
