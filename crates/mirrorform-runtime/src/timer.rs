#![forbid(unsafe_code)]

//! Single-threaded timer queue.
//!
//! [`Scheduler`] holds one-shot timers keyed by deadline. Nothing runs on its
//! own: the event loop calls [`Scheduler::run_due`] whenever it wakes, and
//! every timer whose deadline has passed fires in `(deadline, id)` order.
//! Time comes from a [`Clock`]; tests drive a [`ManualClock`], the demo
//! binary uses [`SystemClock`].
//!
//! # Invariants
//!
//! 1. A timer fires at most once.
//! 2. A timer whose [`CancellationToken`] is cancelled never fires, even if it
//!    is still queued when its deadline passes.
//! 3. No internal borrow is held while a callback runs; callbacks may
//!    schedule or cancel other timers.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::trace;
use web_time::{Duration, Instant};

use crate::cancellation::CancellationToken;

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    /// Elapsed time since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time since construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for deterministic tests. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct TimerEntry {
    id: TimerId,
    deadline: Duration,
    token: CancellationToken,
    callback: Box<dyn FnOnce()>,
}

struct SchedulerInner {
    clock: Box<dyn Clock>,
    next_id: u64,
    timers: Vec<TimerEntry>,
}

/// Shared timer queue. Clones are handles to the same queue.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("now", &inner.clock.now())
            .field("pending", &inner.timers.len())
            .finish()
    }
}

impl Scheduler {
    /// Scheduler driven by `clock`.
    #[must_use]
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                clock: Box::new(clock),
                next_id: 0,
                timers: Vec::new(),
            })),
        }
    }

    /// Scheduler on a fresh [`ManualClock`], returned alongside it.
    #[must_use]
    pub fn manual() -> (Self, ManualClock) {
        let clock = ManualClock::new();
        (Self::new(clock.clone()), clock)
    }

    /// Current clock reading.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.borrow().clock.now()
    }

    /// Run `callback` once `delay` has elapsed, unless `token` is cancelled
    /// first.
    pub fn schedule(
        &self,
        delay: Duration,
        token: CancellationToken,
        callback: impl FnOnce() + 'static,
    ) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        let deadline = inner.clock.now() + delay;
        trace!(timer = id.0, deadline_us = deadline.as_micros() as u64, "timer scheduled");
        inner.timers.push(TimerEntry {
            id,
            deadline,
            token,
            callback: Box::new(callback),
        });
        id
    }

    /// Drop a queued timer. Returns `false` if it already fired or was removed.
    pub fn cancel(&self, id: TimerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.timers.len();
        inner.timers.retain(|t| t.id != id);
        let removed = inner.timers.len() != before;
        if removed {
            trace!(timer = id.0, "timer removed");
        }
        removed
    }

    /// Queued timers, including cancelled ones not yet discarded.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Earliest deadline among live timers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.inner
            .borrow()
            .timers
            .iter()
            .filter(|t| !t.token.is_cancelled())
            .map(|t| t.deadline)
            .min()
    }

    /// Fire every timer whose deadline has passed. Returns how many fired.
    pub fn run_due(&self) -> usize {
        let mut fired = 0;
        while let Some(entry) = self.pop_due() {
            if entry.token.is_cancelled() {
                trace!(timer = entry.id.0, "cancelled timer discarded");
                continue;
            }
            trace!(timer = entry.id.0, "timer fired");
            (entry.callback)();
            fired += 1;
        }
        fired
    }

    fn pop_due(&self) -> Option<TimerEntry> {
        let mut inner = self.inner.borrow_mut();
        let now = inner.clock.now();
        let index = inner
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.id))
            .map(|(i, _)| i)?;
        Some(inner.timers.remove(index))
    }
}
