//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::limiter::{DEFAULT_IDLE_AFTER, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the summary cache can hold
    pub cache_capacity: usize,
    /// TTL in seconds applied to every cached entry
    pub cache_ttl_secs: u64,
    /// Interval in seconds between expired-entry purge sweeps
    pub purge_interval_secs: u64,
    /// Maximum requests a client may make per window
    pub rate_limit: u32,
    /// Rate-limit window length in seconds
    pub rate_window_secs: u64,
    /// Seconds of inactivity after which a client's counter is dropped
    pub client_idle_secs: u64,
    /// Interval in seconds between idle-client sweeps
    pub idle_sweep_interval_secs: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cached entries (default: 1000)
    /// - `CACHE_TTL_SECS` - Entry TTL in seconds (default: 300)
    /// - `PURGE_INTERVAL_SECS` - Purge sweep frequency in seconds (default: 30)
    /// - `RATE_LIMIT` - Requests allowed per window (default: 60)
    /// - `RATE_WINDOW_SECS` - Window length in seconds (default: 60)
    /// - `CLIENT_IDLE_SECS` - Idle threshold in seconds (default: 600)
    /// - `IDLE_SWEEP_INTERVAL_SECS` - Idle sweep frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            cache_capacity: env_or("CACHE_CAPACITY", 1000),
            cache_ttl_secs: env_or("CACHE_TTL_SECS", 300),
            purge_interval_secs: env_or("PURGE_INTERVAL_SECS", 30),
            rate_limit: env_or("RATE_LIMIT", DEFAULT_MAX_REQUESTS),
            rate_window_secs: env_or("RATE_WINDOW_SECS", DEFAULT_WINDOW.as_secs()),
            client_idle_secs: env_or("CLIENT_IDLE_SECS", DEFAULT_IDLE_AFTER.as_secs()),
            idle_sweep_interval_secs: env_or("IDLE_SWEEP_INTERVAL_SECS", 60),
            server_port: env_or("SERVER_PORT", 3000),
        }
    }

    /// Entry TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Rate-limit window as a Duration.
    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_secs)
    }

    /// Client idle threshold as a Duration.
    pub fn client_idle(&self) -> Duration {
        Duration::from_secs(self.client_idle_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            cache_ttl_secs: 300,
            purge_interval_secs: 30,
            rate_limit: DEFAULT_MAX_REQUESTS,
            rate_window_secs: DEFAULT_WINDOW.as_secs(),
            client_idle_secs: DEFAULT_IDLE_AFTER.as_secs(),
            idle_sweep_interval_secs: 60,
            server_port: 3000,
        }
    }
}

/// Reads an environment variable, falling back to `default` when unset
/// or unparsable.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.rate_limit, 60);
        assert_eq!(config.rate_window_secs, 60);
        assert_eq!(config.client_idle_secs, 600);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("CACHE_TTL_SECS");
        env::remove_var("RATE_LIMIT");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.rate_limit, 60);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_limiter_defaults_match_constants() {
        let config = Config::default();
        assert_eq!(config.rate_limit, DEFAULT_MAX_REQUESTS);
        assert_eq!(config.rate_window(), DEFAULT_WINDOW);
        assert_eq!(config.client_idle(), DEFAULT_IDLE_AFTER);
    }

    #[test]
    fn test_config_duration_helpers() {
        let config = Config::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.rate_window(), Duration::from_secs(60));
        assert_eq!(config.client_idle(), Duration::from_secs(600));
    }
}
