#![forbid(unsafe_code)]

//! Read/write projection over an [`Observable`].
//!
//! A [`Bridge`] has two independent channels on one shared value:
//!
//! ```text
//!   read ──► source.get()
//!   write ──► side effect (e.g. reset the live form)
//! ```
//!
//! The write channel never touches the source cell. Whatever the side effect
//! does reaches the source through its own path (for the form, the debounced
//! watch stream), which keeps the two directions from feeding each other.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::observable::{Observable, Subscription};

/// Derived cell whose writes are routed to a side effect.
pub struct Bridge<T> {
    source: Observable<T>,
    write: Rc<dyn Fn(T)>,
}

impl<T> Clone for Bridge<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            write: Rc::clone(&self.write),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Bridge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> Bridge<T> {
    /// Project `source`, sending writes to `write`.
    #[must_use]
    pub fn new(source: Observable<T>, write: impl Fn(T) + 'static) -> Self {
        Self {
            source,
            write: Rc::new(write),
        }
    }

    /// Read channel: the source's current value.
    #[must_use]
    pub fn read(&self) -> T {
        self.source.get()
    }

    /// Write channel: run the side effect with `value`.
    ///
    /// Writing the same value twice runs the side effect twice; the effect is
    /// expected to be idempotent.
    pub fn write(&self, value: T) {
        debug!(label = &*self.source.label(), ?value, "update form");
        (self.write)(value);
    }

    /// Subscribe to changes of the read channel.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.source.subscribe(callback)
    }

    /// Underlying source cell.
    #[must_use]
    pub fn source(&self) -> &Observable<T> {
        &self.source
    }
}
