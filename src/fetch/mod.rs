//! Fetch Module
//!
//! Stale-while-revalidate data loading on top of the cache store.

mod options;
mod orchestrator;
mod retry;
mod state;

#[cfg(test)]
mod property_tests;

pub use options::FetchOptions;
pub use orchestrator::{FetchOrchestrator, Producer};
pub use retry::retry_with_backoff;
pub use state::{FetchState, FetchStatus};
