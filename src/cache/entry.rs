//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and access metadata.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub data: T,
    /// Insertion instant
    pub created_at: Instant,
    /// Time-to-live measured from `created_at`
    pub ttl: Duration,
    /// Number of successful reads since insertion
    pub access_count: u64,
    /// Instant of the last successful read (or insertion)
    pub last_accessed_at: Instant,
    /// Best-effort serialized size of `data`
    pub approx_size_bytes: usize,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry stamped with the current instant.
    pub fn new(data: T, ttl: Duration, approx_size_bytes: usize) -> Self {
        let now = Instant::now();
        Self {
            data,
            created_at: now,
            ttl,
            access_count: 0,
            last_accessed_at: now,
            approx_size_bytes,
        }
    }

    // == Age ==
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Is Expired ==
    /// Checks expiration at `now`, optionally also against an absolute age ceiling.
    ///
    /// The entry is expired once the full TTL has passed, so a read exactly
    /// `ttl` after insertion is already a miss.
    pub fn is_expired_at(&self, now: Instant, max_age: Option<Duration>) -> bool {
        let age = self.age_at(now);
        age >= self.ttl || max_age.is_some_and(|max| age >= max)
    }

    // == Record Access ==
    pub fn record_access(&mut self, now: Instant) {
        self.access_count += 1;
        self.last_accessed_at = now;
    }

    // == Time To Live ==
    /// Returns the remaining TTL, saturating at zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.age_at(Instant::now()))
    }
}
