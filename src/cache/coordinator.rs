//! Cache Coordinator Module
//!
//! Runs one periodic purge cycle over any number of independently-owned
//! caches, decoupling instances (which may hold different value types)
//! from a single maintenance timer.

use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::cache::BoundedCache;
use crate::error::{GuardError, Result};
use crate::tasks::Sweeper;

// == Purge Trait ==
/// Anything that can drop its expired entries on demand.
///
/// Object-safe so caches with different key/value types can share one
/// sweep. Purging cannot fail, but a panicking implementation is
/// tolerated: the coordinator isolates it from sibling caches.
pub trait PurgeExpired: Send + Sync {
    /// Removes expired entries, returning how many were dropped.
    fn purge_expired(&self) -> usize;
}

impl<K, V> PurgeExpired for BoundedCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn purge_expired(&self) -> usize {
        BoundedCache::purge_expired(self)
    }
}

// == Cache Coordinator ==
/// Tracks registered caches and periodically asks each to purge.
pub struct CacheCoordinator {
    caches: Arc<Mutex<Vec<Arc<dyn PurgeExpired>>>>,
    sweeper: Mutex<Option<Sweeper>>,
}

impl Default for CacheCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheCoordinator {
    // == Constructor ==
    /// Creates a coordinator with no registered caches.
    pub fn new() -> Self {
        Self {
            caches: Arc::new(Mutex::new(Vec::new())),
            sweeper: Mutex::new(None),
        }
    }

    // == Register ==
    /// Adds a cache to the managed set.
    ///
    /// Registration order is irrelevant, and caches registered after the
    /// periodic cycle has started are picked up on the next tick.
    pub fn register(&self, cache: Arc<dyn PurgeExpired>) {
        self.caches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(cache);
    }

    /// Number of registered caches.
    pub fn registered(&self) -> usize {
        self.caches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // == Run Periodic ==
    /// Starts the background purge cycle.
    ///
    /// Every `interval` the coordinator calls `purge_expired()` on each
    /// registered cache in turn. A panic inside one cache's purge is
    /// caught and logged so sibling caches are still purged and the
    /// cycle survives to its next tick. Calling this while a cycle is
    /// already running is a no-op.
    ///
    /// # Errors
    /// Returns a configuration error for a zero interval; the interval
    /// timer cannot run with a zero period, so the cycle would die on
    /// its first tick instead of sweeping.
    pub fn run_periodic(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(GuardError::ZeroInterval);
        }

        let mut slot = self.sweeper.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            warn!("purge cycle already running, ignoring start request");
            return Ok(());
        }

        let caches = Arc::clone(&self.caches);
        *slot = Some(Sweeper::spawn("cache purge", interval, move || {
            let snapshot: Vec<Arc<dyn PurgeExpired>> = caches
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();

            let mut total = 0usize;
            for cache in &snapshot {
                match catch_unwind(AssertUnwindSafe(|| cache.purge_expired())) {
                    Ok(removed) => total += removed,
                    Err(_) => error!("a cache panicked during purge; continuing with siblings"),
                }
            }

            if total > 0 {
                info!("purge cycle removed {} expired entries", total);
            } else {
                debug!("purge cycle found no expired entries");
            }
        }));

        Ok(())
    }

    // == Stop ==
    /// Halts the purge cycle and waits for it to exit.
    ///
    /// After this returns no further purge will run. Safe to call when
    /// no cycle is running, and safe to call twice.
    pub async fn stop(&self) {
        let sweeper = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(sweeper) = sweeper {
            sweeper.stop().await;
        }
    }
}
