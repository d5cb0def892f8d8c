//! Expiration Sweep Task
//!
//! Background task that periodically removes entries past their TTL or past
//! the store's absolute `max_age`.

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedStore;

// == Cleanup Task ==
/// Owned handle to a running sweep. The sweep stops on `dispose()` or when
/// the handle is dropped.
#[derive(Debug)]
pub struct CleanupTask {
    handle: Option<JoinHandle<()>>,
}

impl CleanupTask {
    /// Stops the sweep. Calling it more than once is a no-op.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("cache cleanup task disposed");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CleanupTask {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Spawns a background task that sweeps expired entries every
/// `cleanup_interval` of the store's options.
///
/// The sweep only deletes, so it needs no coordination with foreground
/// readers beyond the store's write lock.
///
/// # Example
/// ```ignore
/// let store = CacheStore::<String>::new(CacheOptions::default()).into_shared();
/// let mut cleanup = spawn_cleanup_task(store.clone());
/// // Later, during shutdown:
/// cleanup.dispose();
/// ```
pub fn spawn_cleanup_task<T>(store: SharedStore<T>) -> CleanupTask
where
    T: Send + Sync + 'static,
{
    let handle = tokio::spawn(async move {
        let interval = store.read().await.options().cleanup_interval;
        info!(interval_ms = interval.as_millis() as u64, "Starting cache cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = store.write().await;
                guard.cleanup_expired()
            };

            if removed > 0 {
                info!("Cache cleanup: removed {} expired entries", removed);
            } else {
                debug!("Cache cleanup: no expired entries found");
            }
        }
    });

    CleanupTask {
        handle: Some(handle),
    }
}
