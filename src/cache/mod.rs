//! Cache Module
//!
//! Generic in-memory caching bounded by entry count (LRU eviction) and
//! by time (per-entry TTL), plus the coordinator that sweeps expired
//! entries out of every registered cache.

mod coordinator;
mod entry;
mod recency;
mod stats;
mod store;


// Re-export public types
pub use coordinator::{CacheCoordinator, PurgeExpired};
pub use entry::TimedEntry;
pub use recency::RecencyList;
pub use stats::CacheStats;
pub use store::BoundedCache;
