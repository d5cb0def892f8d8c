//! Property-Based Tests for Fetch Module

use proptest::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheOptions, CacheStore};
use crate::error::CacheError;
use crate::fetch::{FetchOptions, FetchOrchestrator, FetchStatus};

fn flaky_producer(
    calls: Arc<AtomicU32>,
    failures: u32,
) -> impl Fn() -> futures::future::Ready<anyhow::Result<u32>> + Send + Sync + 'static {
    move || {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        futures::future::ready(if n < failures {
            Err(anyhow::anyhow!("attempt {} failed", n + 1))
        } else {
            Ok(n)
        })
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // A producer failing `failures` times is called min(failures + 1, retry_count)
    // times; it succeeds iff failures < retry_count.
    #[test]
    fn prop_retry_invocation_count(retry_count in 1u32..6, failures in 0u32..8) {
        let calls = Arc::new(AtomicU32::new(0));
        let store = CacheStore::new(CacheOptions::default()).into_shared();
        let orch = FetchOrchestrator::new(
            store,
            FetchOptions::default().with_retry(retry_count, Duration::ZERO),
        );

        let state = tokio_test::block_on(orch.load("k", flaky_producer(calls.clone(), failures)));

        let expected_calls = (failures + 1).min(retry_count);
        prop_assert_eq!(calls.load(Ordering::SeqCst), expected_calls);

        if failures < retry_count {
            prop_assert_eq!(state.status(), FetchStatus::Success);
            prop_assert_eq!(state.data, Some(failures));
        } else {
            prop_assert_eq!(state.status(), FetchStatus::Failed);
            let is_exhausted = matches!(
                state.error,
                Some(CacheError::FetchFailed { attempts, .. }) if attempts == retry_count
            );
            prop_assert!(is_exhausted);
        }
    }

    // A cached key never shows an error or loses its value, whatever the
    // background refresh does.
    #[test]
    fn prop_swr_never_regresses(cached in 0u32..1000, failures in 0u32..3) {
        let calls = Arc::new(AtomicU32::new(0));
        let store = CacheStore::new(CacheOptions::default()).into_shared();
        let orch = FetchOrchestrator::new(store, FetchOptions::default());

        tokio_test::block_on(async {
            orch.cache().write().await.set("k", cached, None);
            let state = orch.load("k", flaky_producer(calls.clone(), failures)).await;
            prop_assert_eq!(state.data, Some(cached));
            prop_assert!(state.error.is_none());

            tokio::task::yield_now().await;
            let after = orch.state("k").await;
            prop_assert!(after.data.is_some());
            prop_assert!(after.error.is_none());
            Ok(())
        })?;
    }
}
