//! Dashcache - client-side performance core for a messaging dashboard
//!
//! A TTL/LRU cache store, a stale-while-revalidate fetch orchestrator built
//! on it, and debounce/throttle scheduling for bursty callers such as
//! realtime change handlers.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod realtime;
pub mod scheduler;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheOptions, CacheStats, CacheStore, SharedStore};
pub use config::Config;
pub use error::{CacheError, Result};
pub use fetch::{FetchOptions, FetchOrchestrator, FetchState, FetchStatus};
pub use realtime::{ChangeEvent, ChangeKind, ChangeSource, LocalChangeBus, RefreshOnChange};
pub use scheduler::{DebounceOptions, DebouncedValue, Debouncer};
pub use tasks::{spawn_cleanup_task, CleanupTask};
