#![forbid(unsafe_code)]

//! Observable cell with change notification and version tracking.
//!
//! # Design
//!
//! [`Observable<T>`] wraps a value of type `T` in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). A write that changes the value (by
//! `PartialEq`) bumps the version and notifies every live subscriber in
//! registration order. This is the mirror store: one snapshot, overwritten
//! wholesale, never merged.
//!
//! | Operation     | Complexity                 |
//! |---------------|----------------------------|
//! | `get()`       | O(1) + clone of `T`        |
//! | `set()`       | O(S) where S = subscribers |
//! | `subscribe()` | O(1) amortized             |
//!
//! # Failure Modes
//!
//! - **Subscriber leak**: callbacks live as long as their [`Subscription`]
//!   guard. Dead weak references are pruned lazily during `notify()`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, debug_span};
use web_time::Instant;

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct ObservableInner<T> {
    value: T,
    version: u64,
    label: Rc<str>,
    /// Dead entries are pruned on notify.
    subscribers: Vec<CallbackWeak<T>>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` creates a new handle to the **same** cell.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing write.
/// 2. `set(v)` where `v == current` is a no-op.
/// 3. Subscribers are notified in registration order.
/// 4. No internal borrow is held while subscribers run, so a subscriber may
///    read or write the cell.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("label", &inner.label)
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a cell holding `value` at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                label: Rc::from("observable"),
                subscribers: Vec::new(),
            })),
        }
    }

    /// Attach a debug label reported in log output (builder).
    #[must_use]
    pub fn with_label(self, label: impl Into<Rc<str>>) -> Self {
        self.inner.borrow_mut().label = label.into();
        self
    }

    /// Debug label.
    #[must_use]
    pub fn label(&self) -> Rc<str> {
        Rc::clone(&self.inner.borrow().label)
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value. Notifies subscribers only when it changed.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Subscribe to value changes.
    ///
    /// Dropping the returned [`Subscription`] unsubscribes; the callback will
    /// not run again even though its dead entry lingers until the next
    /// notification prunes it.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        // `Rc<dyn Fn(&T)>` does not coerce to `Rc<dyn Any>`, so box the Rc.
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of value-changing writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        let (callbacks, value, version, label) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let callbacks: Vec<CallbackRc<T>> = inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect();
            (
                callbacks,
                inner.value.clone(),
                inner.version,
                Rc::clone(&inner.label),
            )
        };

        if callbacks.is_empty() {
            return;
        }

        let started = Instant::now();
        let _span = debug_span!(
            "observable.notify",
            label = &*label,
            version,
            subscribers = callbacks.len() as u64
        )
        .entered();

        for cb in &callbacks {
            cb(&value);
        }

        debug!(
            label = &*label,
            duration_us = started.elapsed().as_micros() as u64,
            "propagated"
        );
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping it drops the strong `Rc`, so the `Weak` in the cell's subscriber
/// list fails to upgrade on the next notification.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
