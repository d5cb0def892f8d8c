//! Access Index Module
//!
//! Sortable index of `(last_accessed_at, key)` used for batch LRU eviction.

use std::collections::{BTreeMap, HashMap};

use tokio::time::Instant;

// == Access Index ==
/// Orders keys by last access instant.
///
/// Keys touched at the same instant keep their touch order, so eviction
/// stays deterministic when the clock has coarse resolution (or is paused).
#[derive(Debug, Default)]
pub struct AccessIndex {
    /// Oldest first
    order: BTreeMap<(Instant, u64), String>,
    /// Key -> its slot in `order`
    slots: HashMap<String, (Instant, u64)>,
    next_seq: u64,
}

impl AccessIndex {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Records an access of `key` at `at`, replacing any previous slot.
    pub fn touch(&mut self, key: &str, at: Instant) {
        self.remove(key);
        let slot = (at, self.next_seq);
        self.next_seq += 1;
        self.order.insert(slot, key.to_string());
        self.slots.insert(key.to_string(), slot);
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        if let Some(slot) = self.slots.remove(key) {
            self.order.remove(&slot);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns up to `count` least recently accessed keys, oldest first.
    pub fn evict_oldest(&mut self, count: usize) -> Vec<String> {
        let mut evicted = Vec::with_capacity(count.min(self.order.len()));
        while evicted.len() < count {
            let Some((_, key)) = self.order.pop_first() else {
                break;
            };
            self.slots.remove(&key);
            evicted.push(key);
        }
        evicted
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
