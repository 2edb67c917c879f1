//! Ledger Guard - protective concurrency layer for a personal finance app
//!
//! Provides a generic bounded TTL/LRU cache, a coordinator that sweeps
//! expired entries from every registered cache, a per-client fixed-window
//! rate limiter, and the HTTP middleware that composes them in front of
//! the application's handlers.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState, SummarySource};
pub use cache::{BoundedCache, CacheCoordinator, PurgeExpired};
pub use config::Config;
pub use error::{GuardError, Result};
pub use limiter::RateLimiter;
