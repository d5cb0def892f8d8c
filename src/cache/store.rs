//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with an access index,
//! eager TTL expiration on read and 25% batch LRU eviction on write.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{
    AccessIndex, CacheEntry, CacheOptions, CacheStats, JsonSizeEstimator, SizeEstimator,
};

/// A cache store shared between foreground callers, the cleanup task and
/// background refreshes.
pub type SharedStore<T> = Arc<RwLock<CacheStore<T>>>;

// == Cache Store ==
/// Keyed storage with bounded memory and bounded staleness.
pub struct CacheStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Recency index used to pick eviction victims
    index: AccessIndex,
    /// Performance statistics
    stats: CacheStats,
    options: CacheOptions,
    estimator: Arc<dyn SizeEstimator<T>>,
    total_size: usize,
}

impl<T: Serialize> CacheStore<T> {
    // == Constructor ==
    /// Creates a store that estimates entry sizes from their JSON encoding.
    pub fn new(options: CacheOptions) -> Self {
        Self::with_estimator(options, JsonSizeEstimator)
    }
}

impl<T> CacheStore<T> {
    /// Creates a store with a caller-supplied size estimator.
    pub fn with_estimator(options: CacheOptions, estimator: impl SizeEstimator<T> + 'static) -> Self {
        Self {
            entries: HashMap::new(),
            index: AccessIndex::new(),
            stats: CacheStats::new(),
            options,
            estimator: Arc::new(estimator),
            total_size: 0,
        }
    }

    /// Wraps the store for sharing across tasks.
    pub fn into_shared(self) -> SharedStore<T> {
        Arc::new(RwLock::new(self))
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    // == Set ==
    /// Stores a value, replacing any existing entry for the key.
    ///
    /// If the store already holds `max_entries` entries, the least recently
    /// accessed quarter (rounded up) is evicted before insertion.
    pub fn set(&mut self, key: impl Into<String>, value: T, ttl: Option<Duration>) {
        let key = key.into();

        if self.entries.len() >= self.options.max_entries {
            self.evict();
        }

        let size = self.estimator.estimate(&value);
        let entry = CacheEntry::new(value, ttl.unwrap_or(self.options.default_ttl), size);
        self.index.touch(&key, entry.last_accessed_at);
        self.total_size += size;

        if let Some(previous) = self.entries.insert(key, entry) {
            self.total_size = self.total_size.saturating_sub(previous.approx_size_bytes);
        }

        self.sync_aggregates();
    }

    // == Get ==
    /// Retrieves a clone of the value for `key`.
    ///
    /// Expired entries are removed on the spot and counted as misses, even if
    /// the periodic sweep has not reached them yet.
    pub fn get(&mut self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        let now = Instant::now();

        if self.evict_if_expired(key, now) {
            debug!(key, "cache entry expired on read");
        }

        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.record_access(now);
                self.index.touch(key, now);
                self.stats.record_hit();
                Some(entry.data.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Returns entry metadata without touching stats or recency.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(Instant::now(), None))
    }

    // == Has ==
    /// Reports whether a live entry exists. Applies eager expiration but does
    /// not count as a hit or miss.
    pub fn has(&mut self, key: &str) -> bool {
        self.evict_if_expired(key, Instant::now());
        self.entries.contains_key(key)
    }

    // == Delete ==
    /// Removes an entry. Returns true iff something was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.remove_entry(key);
        if removed {
            self.sync_aggregates();
        }
        removed
    }

    // == Clear ==
    /// Removes every entry and resets all statistics to zero.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.total_size = 0;
        self.stats = CacheStats::new();
    }

    // == Keys ==
    /// Snapshot of the keys of live entries at call time.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now, None))
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Cleanup Expired ==
    /// Removes every entry past its TTL or past the store's `max_age`.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let max_age = Some(self.options.max_age);

        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now, max_age))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.sync_aggregates();
        expired_keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Eviction ==
    fn evict(&mut self) {
        let count = self.entries.len().div_ceil(4);
        let victims = self.index.evict_oldest(count);
        if victims.is_empty() {
            return;
        }

        for key in &victims {
            if let Some(entry) = self.entries.remove(key) {
                self.total_size = self.total_size.saturating_sub(entry.approx_size_bytes);
            }
        }

        self.stats.record_eviction(victims.len());
        debug!(evicted = victims.len(), "cache at capacity, evicted oldest entries");
    }

    fn evict_if_expired(&mut self, key: &str, now: Instant) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now, None));

        if expired {
            self.remove_entry(key);
            self.sync_aggregates();
        }
        expired
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.index.remove(key);
                self.total_size = self.total_size.saturating_sub(entry.approx_size_bytes);
                true
            }
            None => false,
        }
    }

    fn sync_aggregates(&mut self) {
        self.stats.set_aggregates(self.entries.len(), self.total_size);
    }
}

impl<T> fmt::Debug for CacheStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("stats", &self.stats)
            .field("options", &self.options)
            .finish()
    }
}
