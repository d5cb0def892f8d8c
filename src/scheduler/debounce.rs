//! Debouncer Module
//!
//! Coalesces bursts of calls into at most one leading and one trailing
//! invocation, with a ceiling on how long a burst can postpone invocation.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

use crate::scheduler::DebounceOptions;

type Callback<A, R> = Box<dyn Fn(A) -> R + Send + Sync>;

struct DebounceState<A, R> {
    last_call_at: Option<Instant>,
    last_invoke_at: Option<Instant>,
    pending_args: Option<A>,
    /// Generation and handle of the outstanding timer
    timer: Option<(u64, JoinHandle<()>)>,
    next_timer_id: u64,
    last_result: Option<R>,
}

impl<A, R> DebounceState<A, R> {
    fn clear_timer(&mut self) {
        if let Some((_, handle)) = self.timer.take() {
            handle.abort();
        }
    }
}

enum TimerOutcome {
    Reschedule(Duration),
    Done,
}

struct Inner<A, R> {
    func: Callback<A, R>,
    options: DebounceOptions,
    state: Mutex<DebounceState<A, R>>,
}

impl<A, R> Inner<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    fn lock(&self) -> MutexGuard<'_, DebounceState<A, R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn should_invoke(&self, state: &DebounceState<A, R>, now: Instant) -> bool {
        let Some(last_call) = state.last_call_at else {
            return true;
        };
        let since_call = now.saturating_duration_since(last_call);
        since_call >= self.options.delay
            || self
                .options
                .max_wait
                .is_some_and(|max_wait| self.since_invoke(state, now) >= max_wait)
    }

    fn since_invoke(&self, state: &DebounceState<A, R>, now: Instant) -> Duration {
        state
            .last_invoke_at
            .map_or(Duration::MAX, |at| now.saturating_duration_since(at))
    }

    fn remaining_wait(&self, state: &DebounceState<A, R>, now: Instant) -> Duration {
        let since_call = state
            .last_call_at
            .map_or(Duration::ZERO, |at| now.saturating_duration_since(at));
        let waiting = self.options.delay.saturating_sub(since_call);

        match self.options.max_wait {
            Some(max_wait) => waiting.min(max_wait.saturating_sub(self.since_invoke(state, now))),
            None => waiting,
        }
    }

    fn start_timer(self: &Arc<Self>, state: &mut DebounceState<A, R>, wait: Duration) {
        state.clear_timer();

        let id = state.next_timer_id;
        state.next_timer_id += 1;

        let weak: Weak<Self> = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            let mut wait = wait;
            loop {
                tokio::time::sleep(wait).await;
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                match inner.timer_expired(id) {
                    TimerOutcome::Reschedule(next) => {
                        trace!(wait_ms = next.as_millis() as u64, "debounce timer rescheduled");
                        wait = next;
                    }
                    TimerOutcome::Done => return,
                }
            }
        });

        state.timer = Some((id, handle));
    }

    fn timer_expired(&self, id: u64) -> TimerOutcome {
        let now = Instant::now();
        let mut state = self.lock();

        // Superseded or cancelled while this task was waking up
        if state.timer.as_ref().map(|(current, _)| *current) != Some(id) {
            return TimerOutcome::Done;
        }

        if !self.should_invoke(&state, now) {
            return TimerOutcome::Reschedule(self.remaining_wait(&state, now));
        }

        // Our own handle; dropping it detaches rather than aborts
        state.timer = None;
        let args = self.take_trailing_args(&mut state, now);
        drop(state);

        if let Some(args) = args {
            self.invoke(args);
        }
        TimerOutcome::Done
    }

    fn take_trailing_args(&self, state: &mut DebounceState<A, R>, now: Instant) -> Option<A> {
        let args = state.pending_args.take();
        if self.options.trailing && args.is_some() {
            state.last_invoke_at = Some(now);
            args
        } else {
            None
        }
    }

    fn invoke(&self, args: A) {
        let result = (self.func)(args);
        self.lock().last_result = Some(result);
    }
}

impl<A, R> Drop for Inner<A, R> {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.clear_timer();
    }
}

// == Debouncer ==
/// Debounced (or throttled) wrapper around a function.
///
/// Timers run on the tokio runtime, so calls must be made from within one.
/// Clones share the same pending state.
pub struct Debouncer<A, R = ()> {
    inner: Arc<Inner<A, R>>,
}

impl<A, R> Clone for Debouncer<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A, R> Debouncer<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    pub fn new<F>(options: DebounceOptions, func: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                func: Box::new(func),
                options,
                state: Mutex::new(DebounceState {
                    last_call_at: None,
                    last_invoke_at: None,
                    pending_args: None,
                    timer: None,
                    next_timer_id: 0,
                    last_result: None,
                }),
            }),
        }
    }

    /// Trailing debounce with the default `max_wait` of `2 * delay`.
    pub fn debounce<F>(delay: Duration, func: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::new(DebounceOptions::new(delay), func)
    }

    /// At most one invocation per `interval`, on both edges.
    pub fn throttle<F>(interval: Duration, func: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::new(DebounceOptions::throttle(interval), func)
    }

    pub fn options(&self) -> DebounceOptions {
        self.inner.options
    }

    // == Call ==
    /// Records a call with `args`, replacing any pending arguments.
    ///
    /// Invokes synchronously on the leading edge (if enabled) or when
    /// `max_wait` has elapsed since the last invocation; otherwise the
    /// invocation is left to the timer. Returns the most recent result.
    pub fn call(&self, args: A) -> Option<R> {
        let inner = &self.inner;
        let now = Instant::now();

        let invoke_now = {
            let mut state = inner.lock();
            let is_invoking = inner.should_invoke(&state, now);
            state.pending_args = Some(args);
            state.last_call_at = Some(now);

            let mut invoke_now = None;
            if is_invoking {
                if state.timer.is_none() {
                    // Leading edge: the burst starts counting towards max_wait here
                    state.last_invoke_at = Some(now);
                    inner.start_timer(&mut state, inner.options.delay);
                    if inner.options.leading {
                        invoke_now = state.pending_args.take();
                    }
                } else if inner.options.max_wait.is_some() {
                    inner.start_timer(&mut state, inner.options.delay);
                    state.last_invoke_at = Some(now);
                    invoke_now = state.pending_args.take();
                }
            }
            if state.timer.is_none() {
                inner.start_timer(&mut state, inner.options.delay);
            }
            invoke_now
        };

        if let Some(args) = invoke_now {
            inner.invoke(args);
        }
        self.last_result()
    }

    // == Cancel ==
    /// Drops pending arguments and timers without invoking.
    pub fn cancel(&self) {
        let mut state = self.inner.lock();
        state.clear_timer();
        state.pending_args = None;
        state.last_call_at = None;
        state.last_invoke_at = None;
    }

    // == Flush ==
    /// Runs the pending trailing invocation now, if there is one, and
    /// returns the most recent result.
    pub fn flush(&self) -> Option<R> {
        let args = {
            let mut state = self.inner.lock();
            if state.timer.is_none() {
                return state.last_result.clone();
            }
            state.clear_timer();
            self.inner.take_trailing_args(&mut state, Instant::now())
        };

        if let Some(args) = args {
            self.inner.invoke(args);
        }
        self.last_result()
    }

    // == Pending ==
    /// Whether a trailing invocation is outstanding.
    pub fn pending(&self) -> bool {
        let state = self.inner.lock();
        self.inner.options.trailing && state.timer.is_some() && state.pending_args.is_some()
    }

    pub fn last_result(&self) -> Option<R> {
        self.inner.lock().last_result.clone()
    }
}

impl<A, R> fmt::Debug for Debouncer<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}
