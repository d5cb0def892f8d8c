//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, an absolute age ceiling
//! and batch LRU eviction.

mod entry;
mod lru;
mod options;
mod size;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::AccessIndex;
pub use options::CacheOptions;
pub use size::{FixedSizeEstimator, JsonSizeEstimator, SizeEstimator};
pub use stats::CacheStats;
pub use store::{CacheStore, SharedStore};
