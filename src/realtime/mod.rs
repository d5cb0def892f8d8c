//! Realtime Module
//!
//! Interface to the change-event transport and the debounced bridge that
//! turns change bursts into cache refreshes.

mod refresh;
mod source;

pub use refresh::RefreshOnChange;
pub use source::{
    ChangeEvent, ChangeHandler, ChangeKind, ChangeSource, LocalChangeBus, SubscriptionId,
};
