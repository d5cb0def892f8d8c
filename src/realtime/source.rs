//! Change Source Module
//!
//! The subscribe/unsubscribe contract of the realtime transport, plus an
//! in-process implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

// == Change Event ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// One row-level change delivered by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub topic: String,
    pub kind: ChangeKind,
    #[serde(default)]
    pub payload: Value,
}

impl ChangeEvent {
    pub fn new(topic: impl Into<String>, kind: ChangeKind, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            kind,
            payload,
        }
    }
}

pub type ChangeHandler = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// == Change Source ==
/// A publish/subscribe transport supplying change events.
pub trait ChangeSource: Send + Sync {
    fn subscribe(&self, topic: &str, handler: ChangeHandler) -> SubscriptionId;

    /// Removing an unknown or already removed subscription is a no-op.
    fn unsubscribe(&self, id: SubscriptionId);
}

// == Local Change Bus ==
/// In-process change source. Handlers run synchronously on the publisher's task.
#[derive(Default)]
pub struct LocalChangeBus {
    next_id: AtomicU64,
    handlers: Mutex<HashMap<SubscriptionId, (String, ChangeHandler)>>,
}

impl LocalChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every subscriber of its topic. Returns the number
    /// of handlers called.
    pub fn publish(&self, event: &ChangeEvent) -> usize {
        let targets: Vec<ChangeHandler> = self
            .lock()
            .values()
            .filter(|(topic, _)| *topic == event.topic)
            .map(|(_, handler)| handler.clone())
            .collect();

        trace!(topic = %event.topic, subscribers = targets.len(), "publishing change");
        for handler in &targets {
            handler(event);
        }
        targets.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SubscriptionId, (String, ChangeHandler)>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChangeSource for LocalChangeBus {
    fn subscribe(&self, topic: &str, handler: ChangeHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().insert(id, (topic.to_string(), handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().remove(&id);
    }
}
