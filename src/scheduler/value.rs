//! Debounced Value Module
//!
//! Exposes only the latest value once updates have been quiet for `delay`.

use std::time::Duration;

use tokio::sync::watch;

use crate::scheduler::{DebounceOptions, Debouncer};

// == Debounced Value ==
/// A value whose published form lags behind updates until they settle.
///
/// Trailing edge only, with no `max_wait`: a steady stream of updates keeps
/// the published value unchanged.
#[derive(Debug)]
pub struct DebouncedValue<T> {
    debouncer: Debouncer<T>,
    published: watch::Receiver<T>,
}

impl<T> DebouncedValue<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (tx, published) = watch::channel(initial);
        let options = DebounceOptions::new(delay).without_max_wait();
        let debouncer = Debouncer::new(options, move |value: T| {
            tx.send_replace(value);
        });

        Self {
            debouncer,
            published,
        }
    }

    /// Records a new raw value.
    pub fn set(&self, value: T) {
        self.debouncer.call(value);
    }

    /// The last published value.
    pub fn get(&self) -> T {
        self.published.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.published.clone()
    }

    pub fn pending(&self) -> bool {
        self.debouncer.pending()
    }

    /// Discards the unpublished value.
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }
}
