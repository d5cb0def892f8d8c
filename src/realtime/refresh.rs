//! Refresh On Change Module
//!
//! Routes bursts of change events through a debouncer so a burst triggers a
//! single orchestrator refresh instead of one per event.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::fetch::FetchOrchestrator;
use crate::realtime::{ChangeEvent, ChangeHandler, ChangeSource, SubscriptionId};
use crate::scheduler::{DebounceOptions, Debouncer};

// == Refresh On Change ==
/// A live subscription that refreshes one cache key after each burst of
/// events on a topic. Detaches on `detach()` or drop.
pub struct RefreshOnChange {
    source: Arc<dyn ChangeSource>,
    subscription: Option<SubscriptionId>,
    debouncer: Debouncer<ChangeEvent>,
}

impl RefreshOnChange {
    /// Subscribes to `topic` on `source`. Events must be published from
    /// within a tokio runtime.
    pub fn attach<T>(
        source: Arc<dyn ChangeSource>,
        topic: &str,
        orchestrator: FetchOrchestrator<T>,
        key: impl Into<String>,
        options: DebounceOptions,
    ) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        let key = key.into();
        let debouncer = Debouncer::new(options, move |event: ChangeEvent| {
            let orchestrator = orchestrator.clone();
            let key = key.clone();
            debug!(topic = %event.topic, kind = ?event.kind, key = %key, "refreshing after change burst");

            tokio::spawn(async move {
                if let Err(err) = orchestrator.refresh(&key).await {
                    warn!(key = %key, "change-triggered refresh skipped: {}", err);
                }
            });
        });

        let handler: ChangeHandler = {
            let debouncer = debouncer.clone();
            Arc::new(move |event: &ChangeEvent| {
                debouncer.call(event.clone());
            })
        };
        let subscription = source.subscribe(topic, handler);

        Self {
            source,
            subscription: Some(subscription),
            debouncer,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Unsubscribes and discards any refresh still waiting on the debouncer.
    pub fn detach(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.source.unsubscribe(id);
        }
        self.debouncer.cancel();
    }
}

impl Drop for RefreshOnChange {
    fn drop(&mut self) {
        self.detach();
    }
}
