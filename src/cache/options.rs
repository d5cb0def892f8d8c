//! Cache Options Module
//!
//! Immutable configuration fixed at cache store construction.

use std::time::Duration;

// == Cache Options ==
/// Capacity and staleness bounds for a [`CacheStore`](super::CacheStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Entry count at which `set` triggers batch eviction
    pub max_entries: usize,
    /// TTL applied when `set` is called without one
    pub default_ttl: Duration,
    /// Period of the background expiration sweep
    pub cleanup_interval: Duration,
    /// Absolute staleness ceiling enforced by the sweep, regardless of per-entry TTL
    pub max_age: Duration,
}

impl CacheOptions {
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: Duration::from_secs(5 * 60),
            cleanup_interval: Duration::from_secs(60),
            max_age: Duration::from_secs(30 * 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CacheOptions::default();
        assert_eq!(options.max_entries, 1000);
        assert_eq!(options.default_ttl, Duration::from_secs(300));
        assert_eq!(options.cleanup_interval, Duration::from_secs(60));
        assert_eq!(options.max_age, Duration::from_secs(1800));
    }

    #[test]
    fn test_builders() {
        let options = CacheOptions::default()
            .with_max_entries(2)
            .with_default_ttl(Duration::from_millis(50))
            .with_cleanup_interval(Duration::from_millis(10))
            .with_max_age(Duration::from_millis(500));

        assert_eq!(options.max_entries, 2);
        assert_eq!(options.default_ttl, Duration::from_millis(50));
        assert_eq!(options.cleanup_interval, Duration::from_millis(10));
        assert_eq!(options.max_age, Duration::from_millis(500));
    }
}
