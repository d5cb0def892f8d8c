//! Fetch Options Module

use std::time::Duration;

// == Fetch Options ==
/// Per-load behavior of the fetch orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// TTL for the cache write; `None` uses the store's default TTL
    pub ttl: Option<Duration>,
    /// On a cache hit, also refresh in the background
    pub stale_while_revalidate: bool,
    /// Total producer attempts on the foreground path (0 behaves like 1)
    pub retry_count: u32,
    /// Base backoff; attempt `n` failing waits `retry_delay * n`
    pub retry_delay: Duration,
}

impl FetchOptions {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_stale_while_revalidate(mut self, enabled: bool) -> Self {
        self.stale_while_revalidate = enabled;
        self
    }

    pub fn with_retry(mut self, retry_count: u32, retry_delay: Duration) -> Self {
        self.retry_count = retry_count;
        self.retry_delay = retry_delay;
        self
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            ttl: None,
            stale_while_revalidate: true,
            retry_count: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}
