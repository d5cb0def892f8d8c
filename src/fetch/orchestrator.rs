//! Fetch Orchestrator Module
//!
//! Turns a cache key plus an asynchronous producer into a single coherent
//! read: cache-first, stale-while-revalidate background refresh, and
//! linear-backoff retry on the foreground path.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::cache::SharedStore;
use crate::error::{CacheError, Result};
use crate::fetch::{retry_with_backoff, FetchOptions, FetchState};

/// A type-erased zero-argument producer.
pub type Producer<T> = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<T>> + Send + Sync>;

struct KeySlot<T> {
    producer: Option<Producer<T>>,
    options: FetchOptions,
    state: Arc<watch::Sender<FetchState<T>>>,
}

// == Fetch Orchestrator ==
/// Stale-while-revalidate loader over one cache store.
///
/// Cloning is cheap; clones share the store and the per-key state.
pub struct FetchOrchestrator<T> {
    store: SharedStore<T>,
    defaults: FetchOptions,
    slots: Arc<Mutex<HashMap<String, KeySlot<T>>>>,
}

impl<T> Clone for FetchOrchestrator<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            defaults: self.defaults,
            slots: self.slots.clone(),
        }
    }
}

impl<T> FetchOrchestrator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(store: SharedStore<T>, defaults: FetchOptions) -> Self {
        Self {
            store,
            defaults,
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn cache(&self) -> &SharedStore<T> {
        &self.store
    }

    // == Load ==
    /// Loads `key` with the orchestrator's default options.
    pub async fn load<F, Fut>(&self, key: &str, producer: F) -> FetchState<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        self.load_with(key, producer, self.defaults).await
    }

    /// Loads `key`, registering `producer` as the key's producer for later
    /// `refresh` calls.
    ///
    /// On a cache hit the cached value is returned without suspending on the
    /// producer; with `stale_while_revalidate` a single background refresh is
    /// spawned whose failure is logged and otherwise ignored. On a miss the
    /// producer runs with retry and the result is written to the cache.
    pub async fn load_with<F, Fut>(&self, key: &str, producer: F, options: FetchOptions) -> FetchState<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let producer: Producer<T> = Arc::new(move || producer().boxed());
        let state = self.register(key, producer.clone(), options).await;
        self.run(key, producer, options, state, false).await
    }

    // == Refresh ==
    /// Re-runs the key's registered producer, bypassing the cache.
    pub async fn refresh(&self, key: &str) -> Result<FetchState<T>> {
        let (producer, options, state) = {
            let slots = self.slots.lock().await;
            match slots.get(key) {
                Some(KeySlot {
                    producer: Some(producer),
                    options,
                    state,
                }) => (producer.clone(), *options, state.clone()),
                _ => return Err(CacheError::NotFound(key.to_string())),
            }
        };

        Ok(self.run(key, producer, options, state, true).await)
    }

    // == Invalidate ==
    /// Drops the cached entry, the registered producer and the exposed result.
    ///
    /// The key's slot is forgotten entirely unless someone still watches it,
    /// in which case watchers see the reset state. A background refresh
    /// already in flight is not cancelled and will still write its result
    /// to the cache when it completes.
    pub async fn invalidate(&self, key: &str) -> bool {
        let removed = self.store.write().await.delete(key);

        let mut slots = self.slots.lock().await;
        let watched = slots.get(key).map(|slot| slot.state.receiver_count() > 0);
        match watched {
            Some(true) => {
                if let Some(slot) = slots.get_mut(key) {
                    slot.producer = None;
                    slot.state.send_replace(FetchState::default());
                }
            }
            Some(false) => {
                slots.remove(key);
            }
            None => {}
        }

        debug!(key, removed, "invalidated cache key");
        removed
    }

    // == Observation ==
    /// Current exposed state for `key` (`Idle` if the key was never loaded).
    pub async fn state(&self, key: &str) -> FetchState<T> {
        self.slots
            .lock()
            .await
            .get(key)
            .map(|slot| slot.state.borrow().clone())
            .unwrap_or_default()
    }

    /// Subscribes to the exposed state for `key`, including silent
    /// in-place updates from background refreshes.
    pub async fn watch(&self, key: &str) -> watch::Receiver<FetchState<T>> {
        let mut slots = self.slots.lock().await;
        slots
            .entry(key.to_string())
            .or_insert_with(|| KeySlot {
                producer: None,
                options: self.defaults,
                state: Arc::new(watch::channel(FetchState::default()).0),
            })
            .state
            .subscribe()
    }

    async fn register(
        &self,
        key: &str,
        producer: Producer<T>,
        options: FetchOptions,
    ) -> Arc<watch::Sender<FetchState<T>>> {
        let mut slots = self.slots.lock().await;
        let slot = slots.entry(key.to_string()).or_insert_with(|| KeySlot {
            producer: None,
            options,
            state: Arc::new(watch::channel(FetchState::default()).0),
        });
        slot.producer = Some(producer);
        slot.options = options;
        slot.state.clone()
    }

    async fn run(
        &self,
        key: &str,
        producer: Producer<T>,
        options: FetchOptions,
        state: Arc<watch::Sender<FetchState<T>>>,
        force: bool,
    ) -> FetchState<T> {
        if !force {
            let cached = self.store.write().await.get(key);
            if let Some(data) = cached {
                let current = FetchState::success(data);
                state.send_replace(current.clone());

                if options.stale_while_revalidate {
                    self.spawn_revalidate(key, producer, options, state);
                }
                return current;
            }
        }

        state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let result =
            retry_with_backoff(key, options.retry_count, options.retry_delay, || producer()).await;

        match result {
            Ok(data) => {
                self.store.write().await.set(key, data.clone(), options.ttl);
                let current = FetchState::success(data);
                state.send_replace(current.clone());
                current
            }
            Err(err) => {
                warn!(key, "fetch failed: {}", err);
                state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(err);
                });
                let current = state.borrow().clone();
                current
            }
        }
    }

    fn spawn_revalidate(
        &self,
        key: &str,
        producer: Producer<T>,
        options: FetchOptions,
        state: Arc<watch::Sender<FetchState<T>>>,
    ) {
        let store = self.store.clone();
        let key = key.to_string();

        tokio::spawn(async move {
            match producer().await {
                Ok(data) => {
                    // Last writer wins, even over an invalidate or manual set
                    store.write().await.set(key.as_str(), data.clone(), options.ttl);
                    state.send_modify(|s| {
                        s.data = Some(data);
                        s.error = None;
                    });
                    debug!(key = %key, "background revalidation updated cache");
                }
                Err(err) => {
                    warn!(key = %key, "background revalidation failed: {:#}", err);
                }
            }
        });
    }
}
