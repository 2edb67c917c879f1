//! Client Activity Tracker
//!
//! Per-client request counters backing the fixed-window rate limiter.

use std::time::{Duration, Instant};

// == Client Activity ==
/// Counter state for one client identifier.
#[derive(Debug, Clone)]
pub struct ClientActivity {
    /// Requests observed since `window_start`
    count: u32,
    /// Start of the current counting window
    window_start: Instant,
    /// Time of the most recent request, drives idle eviction
    last_seen: Instant,
}

impl ClientActivity {
    // == Constructor ==
    /// State for a client's first observed request.
    pub fn first_request() -> Self {
        let now = Instant::now();
        Self {
            count: 1,
            window_start: now,
            last_seen: now,
        }
    }

    // == Observe ==
    /// Records one request and returns the count it lands on.
    ///
    /// Once strictly more than one `window` has elapsed since the window
    /// opened, the counter resets to 1 and the window restarts at now,
    /// regardless of whether the prior window was exceeded. The limiter
    /// keeps no memory of past violations beyond the current window.
    pub fn observe(&mut self, window: Duration) -> u32 {
        let now = Instant::now();
        self.last_seen = now;

        if now.duration_since(self.window_start) > window {
            self.count = 1;
            self.window_start = now;
        } else {
            self.count = self.count.saturating_add(1);
        }
        self.count
    }

    // == Idle For ==
    /// Time elapsed since this client's last request.
    pub fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }

    /// Requests observed in the current window.
    #[allow(dead_code)]
    pub fn count(&self) -> u32 {
        self.count
    }
}
