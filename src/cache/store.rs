//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with O(1) recency tracking
//! and per-entry TTL expiration.
//!
//! A `BoundedCache` is a cheaply clonable handle; every clone shares the
//! same state behind a single coarse mutex. Operations are O(1) except
//! `purge_expired`, which scans all entries.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::cache::{CacheStats, RecencyList, TimedEntry};
use crate::error::{GuardError, Result};

// == Inner State ==
/// State guarded by the cache mutex: index, recency order, and counters
/// always mutate together.
#[derive(Debug)]
struct CacheInner<K, V> {
    /// Key-value index
    entries: HashMap<K, TimedEntry<V>>,
    /// Access order, head = most recent
    recency: RecencyList<K>,
    /// Performance statistics
    stats: CacheStats,
}

// == Bounded Cache ==
/// Generic key-value cache bounded by entry count (LRU eviction) and by
/// time (fixed TTL per instance).
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    inner: Arc<Mutex<CacheInner<K, V>>>,
    /// Maximum number of resident entries
    capacity: usize,
    /// Lifetime assigned to every entry at insert/update time
    ttl: Duration,
}

impl<K, V> Clone for BoundedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            capacity: self.capacity,
            ttl: self.ttl,
        }
    }
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new cache with fixed capacity and TTL.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of resident entries, must be positive
    /// * `ttl` - Lifetime assigned to every entry, must be positive
    ///
    /// # Errors
    /// Returns a configuration error for zero capacity or zero TTL; a
    /// zero-TTL cache would silently evict everything it is handed.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(GuardError::ZeroCapacity);
        }
        if ttl.is_zero() {
            return Err(GuardError::ZeroTtl);
        }

        Ok(Self {
            inner: Arc::new(Mutex::new(CacheInner {
                entries: HashMap::new(),
                recency: RecencyList::new(),
                stats: CacheStats::new(),
            })),
            capacity,
            ttl,
        })
    }

    /// Acquires the state lock, recovering from poisoning.
    ///
    /// A panic while the lock was held can only have come from a sweep
    /// closure; the index and recency list are mutated in matched pairs,
    /// so the state is still usable.
    fn lock(&self) -> MutexGuard<'_, CacheInner<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Get ==
    /// Retrieves a value by key, promoting it to most recently used.
    ///
    /// An entry whose deadline has passed is removed on the spot and
    /// reported as a miss (lazy expiry); entries that are never touched
    /// again are reclaimed by `purge_expired` instead.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.lock();

        // Resolve the lookup before mutating: None = absent,
        // Some(None) = present but stale, Some(Some(v)) = live hit.
        let lookup = inner.entries.get(key).map(|entry| {
            if entry.is_expired() {
                None
            } else {
                Some(entry.value().clone())
            }
        });

        match lookup {
            None => {
                inner.stats.record_miss();
                None
            }
            Some(None) => {
                inner.entries.remove(key);
                inner.recency.remove(key);
                inner.stats.record_expirations(1);
                inner.stats.record_miss();
                let len = inner.entries.len();
                inner.stats.set_entries(len);
                None
            }
            Some(Some(value)) => {
                inner.recency.touch(key);
                inner.stats.record_hit();
                Some(value)
            }
        }
    }

    // == Set ==
    /// Stores a key-value pair, assigning it the cache's TTL from now.
    ///
    /// Overwriting an existing key refreshes its deadline and promotes it;
    /// the occupied count does not change. A fresh insert that pushes the
    /// count past capacity evicts exactly one entry, the current least
    /// recently used, regardless of that entry's own remaining TTL.
    pub fn set(&self, key: K, value: V) {
        let mut inner = self.lock();

        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.refresh(value, self.ttl);
            inner.recency.touch(&key);
            return;
        }

        inner
            .entries
            .insert(key.clone(), TimedEntry::new(value, self.ttl));
        inner.recency.touch(&key);

        if inner.entries.len() > self.capacity {
            if let Some(victim) = inner.recency.pop_tail() {
                inner.entries.remove(&victim);
                inner.stats.record_eviction();
            }
        }

        let len = inner.entries.len();
        inner.stats.set_entries(len);
    }

    // == Delete ==
    /// Removes an entry by key. Returns true if it was present.
    ///
    /// Used for explicit invalidation when the underlying data changes,
    /// e.g. a write to the period a cached aggregate summarizes.
    pub fn delete(&self, key: &K) -> bool {
        let mut inner = self.lock();

        if inner.entries.remove(key).is_some() {
            inner.recency.remove(key);
            let len = inner.entries.len();
            inner.stats.set_entries(len);
            true
        } else {
            false
        }
    }

    // == Size ==
    /// Returns the current number of resident entries.
    ///
    /// Diagnostics only; may include entries whose deadline has passed
    /// but which have not yet been touched or swept.
    pub fn size(&self) -> usize {
        self.lock().entries.len()
    }

    // == Purge Expired ==
    /// Removes every entry whose deadline has passed.
    ///
    /// Returns the number of entries removed. Invoked periodically by the
    /// coordinator so that set-once-never-read keys are eventually
    /// reclaimed even without access-triggered lazy expiry.
    pub fn purge_expired(&self) -> usize {
        let mut inner = self.lock();

        let expired: Vec<K> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.entries.remove(key);
            inner.recency.remove(key);
        }

        let count = expired.len();
        inner.stats.record_expirations(count as u64);
        let len = inner.entries.len();
        inner.stats.set_entries(len);
        count
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let mut stats = inner.stats.clone();
        stats.set_entries(inner.entries.len());
        stats
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Configured per-entry TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// True when the index and the recency list agree on membership count.
    ///
    /// Always holds after any public operation completes; exposed so
    /// stress tests can assert it.
    pub fn is_consistent(&self) -> bool {
        let inner = self.lock();
        inner.entries.len() == inner.recency.len() && inner.entries.len() <= self.capacity
    }
}
