//! Error types for the protection layer
//!
//! The cache and limiter have no runtime failure modes: misses and
//! rejections are ordinary return values. The only errors are
//! misconfiguration, caught at construction time using thiserror.

use thiserror::Error;

// == Guard Error Enum ==
/// Construction-time configuration errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GuardError {
    /// Cache capacity must admit at least one entry
    #[error("cache capacity must be greater than zero")]
    ZeroCapacity,

    /// Entries must outlive at least the call that created them
    #[error("cache ttl must be greater than zero")]
    ZeroTtl,

    /// A limit of zero would reject every request
    #[error("rate limit must be greater than zero")]
    ZeroLimit,

    /// The counting window must have positive length
    #[error("rate window must be greater than zero")]
    ZeroWindow,

    /// The idle threshold must have positive length
    #[error("idle threshold must be greater than zero")]
    ZeroIdleThreshold,

    /// A zero interval would panic the background task instead of
    /// sweeping; it is rejected before anything is spawned
    #[error("sweep interval must be greater than zero")]
    ZeroInterval,
}

// == Result Type Alias ==
/// Convenience Result type for the protection layer.
pub type Result<T> = std::result::Result<T, GuardError>;
