//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and size.

use serde::Serialize;

// == Cache Stats ==
/// Running statistics for one cache store. Reset only by `clear()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries removed by capacity eviction
    pub evictions: u64,
    /// Sum of every live entry's estimated size
    pub total_approx_size_bytes: usize,
    /// Current number of entries in the cache
    pub entry_count: usize,
    /// Hit percentage, rounded to two decimals
    pub hit_rate: f64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns `hits / (hits + misses)` as a percentage, or 0.0 if no reads happened.
    pub fn compute_hit_rate(hits: u64, misses: u64) -> f64 {
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            let ratio = hits as f64 / total as f64;
            (ratio * 10_000.0).round() / 100.0
        }
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
        self.refresh_hit_rate();
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.refresh_hit_rate();
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    // == Update Aggregates ==
    /// Overwrites the size/count aggregates after a mutation.
    pub fn set_aggregates(&mut self, entry_count: usize, total_approx_size_bytes: usize) {
        self.entry_count = entry_count;
        self.total_approx_size_bytes = total_approx_size_bytes;
    }

    fn refresh_hit_rate(&mut self) {
        self.hit_rate = Self::compute_hit_rate(self.hits, self.misses);
    }
}
