//! Configuration Module
//!
//! Handles loading cache, fetch and server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheOptions;
use crate::fetch::FetchOptions;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Entry count that triggers batch eviction
    pub max_entries: usize,
    /// Default TTL in milliseconds for entries without explicit TTL
    pub default_ttl_ms: u64,
    /// Expiration sweep interval in milliseconds
    pub cleanup_interval_ms: u64,
    /// Absolute entry age ceiling in milliseconds
    pub max_age_ms: u64,
    /// Foreground producer attempts per load
    pub retry_count: u32,
    /// Linear backoff base in milliseconds
    pub retry_delay_ms: u64,
    /// Inspection server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL_MS` - Default TTL (default: 300000)
    /// - `CLEANUP_INTERVAL_MS` - Sweep frequency (default: 60000)
    /// - `MAX_AGE_MS` - Absolute age ceiling (default: 1800000)
    /// - `RETRY_COUNT` - Producer attempts (default: 3)
    /// - `RETRY_DELAY_MS` - Backoff base (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            default_ttl_ms: env_or("DEFAULT_TTL_MS", defaults.default_ttl_ms),
            cleanup_interval_ms: env_or("CLEANUP_INTERVAL_MS", defaults.cleanup_interval_ms),
            max_age_ms: env_or("MAX_AGE_MS", defaults.max_age_ms),
            retry_count: env_or("RETRY_COUNT", defaults.retry_count),
            retry_delay_ms: env_or("RETRY_DELAY_MS", defaults.retry_delay_ms),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            max_entries: self.max_entries,
            default_ttl: Duration::from_millis(self.default_ttl_ms),
            cleanup_interval: Duration::from_millis(self.cleanup_interval_ms),
            max_age: Duration::from_millis(self.max_age_ms),
        }
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions::default()
            .with_retry(self.retry_count, Duration::from_millis(self.retry_delay_ms))
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl_ms: 300_000,
            cleanup_interval_ms: 60_000,
            max_age_ms: 1_800_000,
            retry_count: 3,
            retry_delay_ms: 1000,
            server_port: 3000,
        }
    }
}
