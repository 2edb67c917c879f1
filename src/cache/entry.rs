//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with an absolute
//! expiration deadline.

use std::time::{Duration, Instant};

// == Timed Entry ==
/// A single cached value paired with its expiration deadline.
///
/// The payload is opaque to the cache; only the deadline is inspected.
#[derive(Debug, Clone)]
pub struct TimedEntry<V> {
    /// The stored value
    value: V,
    /// Absolute deadline after which the entry is stale
    expires_at: Instant,
}

impl<V> TimedEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is considered expired when the current
    /// time is greater than or equal to the deadline, so an entry observed
    /// at or after `expires_at` is never returned as a hit.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Borrows the stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Replaces the value and pushes the deadline to `ttl` from now.
    ///
    /// The deadline is refreshed from "now", not extended from the
    /// original deadline.
    pub fn refresh(&mut self, value: V, ttl: Duration) {
        self.value = value;
        self.expires_at = Instant::now() + ttl;
    }

    // == Time To Live ==
    /// Returns remaining lifetime, zero once expired.
    ///
    /// Useful for debugging and diagnostics.
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_fresh_not_expired() {
        let entry = TimedEntry::new("aggregate", Duration::from_secs(60));

        assert_eq!(*entry.value(), "aggregate");
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = TimedEntry::new(42u64, Duration::from_millis(50));

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(60));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_remaining() {
        let entry = TimedEntry::new((), Duration::from_secs(10));

        let remaining = entry.remaining();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_entry_remaining_zero_after_expiry() {
        let entry = TimedEntry::new((), Duration::from_millis(20));

        sleep(Duration::from_millis(30));
        assert_eq!(entry.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_refresh_resets_deadline_from_now() {
        let mut entry = TimedEntry::new(1u32, Duration::from_millis(40));

        sleep(Duration::from_millis(30));
        entry.refresh(2, Duration::from_millis(40));

        // Old deadline would hit in ~10ms; the refreshed one must not.
        sleep(Duration::from_millis(20));
        assert!(!entry.is_expired());
        assert_eq!(*entry.value(), 2);
    }
}
