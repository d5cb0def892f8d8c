//! Background Tasks Module
//!
//! # Tasks
//! - Cache cleanup: sweeps expired and over-age entries at a fixed interval

mod cleanup;

pub use cleanup::{spawn_cleanup_task, CleanupTask};
