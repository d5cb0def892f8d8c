//! Linear backoff retry for producer calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{CacheError, Result};

/// Calls `producer` up to `attempts` times (at least once).
///
/// After failed attempt `n` (1-based) it sleeps `delay * n` before trying
/// again; there is no sleep after the final failure. The last error is
/// returned as [`CacheError::FetchFailed`].
pub async fn retry_with_backoff<T, F, Fut>(
    key: &str,
    attempts: u32,
    delay: Duration,
    mut producer: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match producer().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                let backoff = delay * attempt;
                warn!(
                    key,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "fetch attempt failed, retrying: {:#}",
                    err
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(err) => return Err(CacheError::fetch_failed(key, attempt, &err)),
        }
    }
}
