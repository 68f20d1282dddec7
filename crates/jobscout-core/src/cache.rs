//! In-memory result cache with TTL freshness and LRU capacity bounds.
//!
//! A single mutex guards the whole recency-ordered map, so a `get`
//! (including its expiry removal and recency bump) and a `put` (including
//! capacity eviction) never interleave. Expiry is only enforced on reads:
//! an entry that is never read again lingers until capacity pressure
//! evicts it.

use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::Serialize;

use crate::config::CacheConfig;
use crate::models::{CacheKey, JobRecord};

/// The cache sitting in front of the listing source.
pub type ResultCache = CacheStore<CacheKey, Vec<JobRecord>>;

/// Counters describing cache behaviour since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    /// Lookups that found nothing usable, expired entries included.
    pub misses: u64,
    /// Entries dropped on read because they outlived the TTL.
    pub expirations: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
    pub entries: usize,
}

impl CacheStats {
    /// hits / (hits + misses), or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct CacheEntry<V> {
    stored_at: Instant,
    value: V,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            stored_at: Instant::now(),
            value,
        }
    }

    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > ttl
    }
}

struct Inner<K: Hash + Eq, V> {
    entries: LruCache<K, CacheEntry<V>>,
    stats: CacheStats,
}

/// Capacity-bounded, time-bounded key-value store.
///
/// Values are handed out as clones; callers never hold a reference into
/// the cache.
pub struct CacheStore<K: Hash + Eq, V> {
    inner: Mutex<Inner<K, V>>,
    config: CacheConfig,
}

impl<K: Hash + Eq, V: Clone> CacheStore<K, V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::unbounded(),
                stats: CacheStats::default(),
            }),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a live entry and mark it most recently used.
    ///
    /// An entry older than the TTL is removed and reported as absent.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let mut guard = self.lock();
        let inner = &mut *guard;

        let Some(expired) = inner
            .entries
            .peek(key)
            .map(|entry| entry.is_expired(self.config.ttl, now))
        else {
            inner.stats.misses += 1;
            return None;
        };

        if expired {
            inner.entries.pop(key);
            inner.stats.expirations += 1;
            inner.stats.misses += 1;
            tracing::debug!(entries = inner.entries.len(), "Cache entry expired");
            return None;
        }

        inner.stats.hits += 1;
        inner.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or overwrite an entry, stamping it with the current time,
    /// then evict least recently used entries until within capacity.
    pub fn put(&self, key: K, value: V) {
        let mut guard = self.lock();
        let inner = &mut *guard;

        inner.entries.put(key, CacheEntry::new(value));

        while inner.entries.len() > self.config.max_entries.get() {
            if inner.entries.pop_lru().is_none() {
                break;
            }
            inner.stats.evictions += 1;
            tracing::debug!(entries = inner.entries.len(), "Evicted least recently used entry");
        }
    }

    /// Number of entries held, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            entries: inner.entries.len(),
            ..inner.stats
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        // The map is never left half-updated across a panic point, so a
        // poisoned lock still guards consistent data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
