//! Scheduler Module
//!
//! Debounce and throttle primitives for coalescing bursty calls before they
//! reach business logic or trigger cache writes.

mod debounce;
mod options;
mod value;

pub use debounce::Debouncer;
pub use options::DebounceOptions;
pub use value::DebouncedValue;
