//! Debounce Options Module

use std::time::Duration;

// == Debounce Options ==
/// Timing configuration of a [`Debouncer`](super::Debouncer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceOptions {
    /// Quiet period after the last call before the trailing invocation
    pub delay: Duration,
    /// Upper bound between the start of a burst and an invocation
    pub max_wait: Option<Duration>,
    /// Invoke on the first call of a burst
    pub leading: bool,
    /// Invoke with the latest arguments once the burst settles
    pub trailing: bool,
}

impl DebounceOptions {
    /// Trailing-edge debounce with `max_wait` of twice the delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            max_wait: Some(delay * 2),
            leading: false,
            trailing: true,
        }
    }

    /// Leading and trailing edges, at most one invocation per `interval`.
    pub fn throttle(interval: Duration) -> Self {
        Self {
            delay: interval,
            max_wait: Some(interval),
            leading: true,
            trailing: true,
        }
    }

    pub fn leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    pub fn trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }

    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    pub fn without_max_wait(mut self) -> Self {
        self.max_wait = None;
        self
    }
}
