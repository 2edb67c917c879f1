//! Background Tasks Module
//!
//! Lifecycle plumbing for periodic maintenance work. The cache
//! coordinator and the rate limiter both drive their sweeps through the
//! `Sweeper` handle defined here.

mod sweeper;

pub use sweeper::Sweeper;
