//! Rate Limiter Module
//!
//! Per-client fixed-window admission control with background idle-client
//! eviction.

mod admission;
mod tracker;

// Re-export public types
pub use admission::RateLimiter;
pub use tracker::ClientActivity;

use std::time::Duration;

// == Public Constants ==
/// Default requests admitted per client per window
pub const DEFAULT_MAX_REQUESTS: u32 = 60;

/// Default counting window length
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default inactivity threshold before a client's counter is dropped
pub const DEFAULT_IDLE_AFTER: Duration = Duration::from_secs(600);
