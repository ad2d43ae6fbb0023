#![forbid(unsafe_code)]

//! Trailing-edge debounce over the [`Scheduler`].
//!
//! A [`Debouncer`] is a last-value slot plus at most one pending timer.
//! Each [`call`](Debouncer::call) overwrites the slot and restarts the timer;
//! when the timer finally fires, the sink receives the latest value once.
//! Intermediate values are superseded, never queued.
//!
//! ```text
//! call(v1) call(v2)      call(v3)
//!    |--------|-------------|---------- window ----------| sink(v3)
//! ```
//!
//! Every pending timer carries its own [`CancellationSource`]. Restarting or
//! cancelling trips that source, so a timer that was already popped by the
//! event loop still finds its token cancelled and does nothing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;
use web_time::Duration;

use crate::cancellation::CancellationSource;
use crate::timer::{Scheduler, TimerId};

struct PendingTimer {
    id: TimerId,
    source: CancellationSource,
}

struct DebounceState<T> {
    latest: Option<T>,
    timer: Option<PendingTimer>,
    settled: u64,
}

/// Coalesces rapid calls into one trailing delivery.
pub struct Debouncer<T> {
    state: Rc<RefCell<DebounceState<T>>>,
    scheduler: Scheduler,
    window: Duration,
    sink: Rc<dyn Fn(T)>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            scheduler: self.scheduler.clone(),
            window: self.window,
            sink: Rc::clone(&self.sink),
        }
    }
}

impl<T> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Debouncer")
            .field("window", &self.window)
            .field("pending", &state.timer.is_some())
            .field("settled", &state.settled)
            .finish()
    }
}

impl<T: 'static> Debouncer<T> {
    /// Deliver to `sink` once `window` passes without a new call.
    #[must_use]
    pub fn new(scheduler: Scheduler, window: Duration, sink: impl Fn(T) + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(DebounceState {
                latest: None,
                timer: None,
                settled: 0,
            })),
            scheduler,
            window,
            sink: Rc::new(sink),
        }
    }

    /// Record `value` as the latest and restart the window.
    pub fn call(&self, value: T) {
        let previous = {
            let mut state = self.state.borrow_mut();
            state.latest = Some(value);
            state.timer.take()
        };
        if let Some(timer) = previous {
            self.discard(timer);
        }

        let source = CancellationSource::new();
        let token = source.token();
        let state = Rc::downgrade(&self.state);
        let sink = Rc::clone(&self.sink);
        let id = self
            .scheduler
            .schedule(self.window, source.token(), move || {
                if token.is_cancelled() {
                    return;
                }
                let Some(state) = state.upgrade() else {
                    return;
                };
                let value = {
                    let mut state = state.borrow_mut();
                    state.timer = None;
                    state.settled += 1;
                    state.latest.take()
                };
                if let Some(value) = value {
                    sink(value);
                }
            });
        self.state.borrow_mut().timer = Some(PendingTimer { id, source });
    }

    /// Drop the pending value and timer. Returns whether anything was pending.
    pub fn cancel(&self) -> bool {
        let timer = {
            let mut state = self.state.borrow_mut();
            state.latest = None;
            state.timer.take()
        };
        match timer {
            Some(timer) => {
                self.discard(timer);
                true
            }
            None => false,
        }
    }

    /// Deliver the pending value now instead of waiting for the window.
    pub fn flush(&self) -> bool {
        let (timer, value) = {
            let mut state = self.state.borrow_mut();
            let Some(timer) = state.timer.take() else {
                return false;
            };
            state.settled += 1;
            (timer, state.latest.take())
        };
        self.discard(timer);
        if let Some(value) = value {
            (self.sink)(value);
        }
        true
    }

    /// Whether a delivery is waiting on the timer.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.borrow().timer.is_some()
    }

    /// Deliveries made so far.
    #[must_use]
    pub fn settled_count(&self) -> u64 {
        self.state.borrow().settled
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    fn discard(&self, timer: PendingTimer) {
        timer.source.cancel();
        self.scheduler.cancel(timer.id);
        trace!("debounce timer discarded");
    }
}
