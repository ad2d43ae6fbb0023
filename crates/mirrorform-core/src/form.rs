#![forbid(unsafe_code)]

//! Live form state with field bindings and a watch stream.
//!
//! # Design
//!
//! [`FormHolder`] keeps the editable [`FormValues`] in shared
//! `Rc<RefCell<..>>` storage. Cloning a holder yields another handle to the
//! same form. Every mutation fires watch callbacks synchronously, after the
//! internal borrow has been released, so a callback may read the form
//! (`get_values`) without tripping the `RefCell`.
//!
//! | Mutation              | Watch events fired                  |
//! |-----------------------|-------------------------------------|
//! | [`FieldBinding::input`] | one, kind [`ChangeKind::Change`]  |
//! | [`FormHolder::set_value`] | one, kind [`ChangeKind::SetValue`] |
//! | [`FormHolder::reset`] | one per field, kind [`ChangeKind::Reset`] |
//!
//! A bulk reset touching every field therefore produces a burst of four
//! notifications; downstream consumers are expected to coalesce them.
//!
//! # Failure Modes
//!
//! - **Watcher leak**: watch callbacks live as long as their
//!   [`WatchSubscription`]. Dead entries are pruned lazily on the next emit.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::values::{FieldPath, FormValues};

type WatchRc = Rc<dyn Fn(&WatchEvent)>;
type WatchWeak = Weak<dyn Fn(&WatchEvent)>;

/// What caused a watch notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// User input through a registered binding.
    Change,
    /// Programmatic single-field write.
    SetValue,
    /// Programmatic whole-form reset.
    Reset,
}

/// Payload delivered to watch callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// Full form values after the mutation.
    pub values: FormValues,
    /// Mutation source.
    pub kind: ChangeKind,
    /// Field that changed.
    pub name: Option<FieldPath>,
}

struct FormInner {
    values: FormValues,
    default_values: FormValues,
    /// Per-field reset counters observed by bound inputs.
    revisions: [u64; 4],
    registered: [bool; 4],
    watchers: Vec<WatchWeak>,
}

/// The live, editable form.
#[derive(Clone)]
pub struct FormHolder {
    inner: Rc<RefCell<FormInner>>,
}

impl fmt::Debug for FormHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FormHolder")
            .field("values", &inner.values)
            .field("revisions", &inner.revisions)
            .field("watcher_count", &inner.watchers.len())
            .finish()
    }
}

impl Default for FormHolder {
    fn default() -> Self {
        Self::new(FormValues::default())
    }
}

impl FormHolder {
    /// Create a form whose live and default values are `default_values`.
    #[must_use]
    pub fn new(default_values: FormValues) -> Self {
        Self {
            inner: Rc::new(RefCell::new(FormInner {
                values: default_values.clone(),
                default_values,
                revisions: [0; 4],
                registered: [false; 4],
                watchers: Vec::new(),
            })),
        }
    }

    /// Current live values.
    #[must_use]
    pub fn get_values(&self) -> FormValues {
        self.inner.borrow().values.clone()
    }

    /// Current value of one field.
    #[must_use]
    pub fn get_value(&self, path: FieldPath) -> String {
        self.inner.borrow().values.field(path).to_owned()
    }

    /// Values the form was created with.
    #[must_use]
    pub fn default_values(&self) -> FormValues {
        self.inner.borrow().default_values.clone()
    }

    /// Bind an input to `path`.
    pub fn register(&self, path: FieldPath) -> FieldBinding {
        self.inner.borrow_mut().registered[path.index()] = true;
        trace!(field = %path, "register");
        FieldBinding {
            path,
            form: self.clone(),
        }
    }

    /// Fields that have at least one binding.
    #[must_use]
    pub fn registered_fields(&self) -> Vec<FieldPath> {
        let inner = self.inner.borrow();
        FieldPath::ALL
            .into_iter()
            .filter(|path| inner.registered[path.index()])
            .collect()
    }

    /// Replace the whole form atomically.
    ///
    /// Every bound input sees its revision bumped before any watcher runs, so
    /// watchers observe a fully consistent form.
    pub fn reset(&self, values: FormValues) {
        {
            let mut inner = self.inner.borrow_mut();
            debug!(changed = ?inner.values.changed_fields(&values), "reset");
            inner.values = values.clone();
            for revision in &mut inner.revisions {
                *revision += 1;
            }
        }
        let events = FieldPath::ALL
            .into_iter()
            .map(|path| WatchEvent {
                values: values.clone(),
                kind: ChangeKind::Reset,
                name: Some(path),
            })
            .collect::<Vec<_>>();
        self.emit(&events);
    }

    /// Programmatically set one field.
    pub fn set_value(&self, path: FieldPath, value: impl Into<String>) {
        let values = {
            let mut inner = self.inner.borrow_mut();
            inner.values.set_field(path, value);
            inner.revisions[path.index()] += 1;
            inner.values.clone()
        };
        self.emit(&[WatchEvent {
            values,
            kind: ChangeKind::SetValue,
            name: Some(path),
        }]);
    }

    /// Subscribe to every field mutation.
    ///
    /// The callback runs synchronously inside the mutating call. Dropping the
    /// returned handle (or calling [`WatchSubscription::unsubscribe`]) stops
    /// delivery.
    pub fn watch(&self, callback: impl Fn(&WatchEvent) + 'static) -> WatchSubscription {
        let strong: WatchRc = Rc::new(callback);
        self.inner.borrow_mut().watchers.push(Rc::downgrade(&strong));
        WatchSubscription {
            _guard: Box::new(strong),
        }
    }

    /// Registered watchers, including dead ones not yet pruned.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.inner.borrow().watchers.len()
    }

    fn revision(&self, path: FieldPath) -> u64 {
        self.inner.borrow().revisions[path.index()]
    }

    fn apply_input(&self, path: FieldPath, text: &str) {
        let values = {
            let mut inner = self.inner.borrow_mut();
            inner.values.set_field(path, text);
            inner.values.clone()
        };
        self.emit(&[WatchEvent {
            values,
            kind: ChangeKind::Change,
            name: Some(path),
        }]);
    }

    fn emit(&self, events: &[WatchEvent]) {
        // Upgraded per event: a watcher dropped mid-burst misses the rest.
        let watchers: Vec<WatchWeak> = {
            let mut inner = self.inner.borrow_mut();
            inner.watchers.retain(|w| w.strong_count() > 0);
            inner.watchers.clone()
        };
        for event in events {
            trace!(kind = ?event.kind, name = ?event.name, watchers = watchers.len(), "watch");
            for weak in &watchers {
                if let Some(cb) = weak.upgrade() {
                    cb(event);
                }
            }
        }
    }
}

/// A UI input bound to one field.
#[derive(Clone)]
pub struct FieldBinding {
    path: FieldPath,
    form: FormHolder,
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("path", &self.path)
            .field("value", &self.value())
            .finish()
    }
}

impl FieldBinding {
    /// Bound field.
    #[must_use]
    pub fn path(&self) -> FieldPath {
        self.path
    }

    /// Text the input should display.
    #[must_use]
    pub fn value(&self) -> String {
        self.form.get_value(self.path)
    }

    /// Bumped whenever the field is overwritten programmatically.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.form.revision(self.path)
    }

    /// Apply user input.
    pub fn input(&self, text: &str) {
        self.form.apply_input(self.path, text);
    }
}

/// RAII guard for a watch callback.
pub struct WatchSubscription {
    /// Keeps the callback `Rc` alive; the form only holds a `Weak`.
    _guard: Box<dyn std::any::Any>,
}

impl WatchSubscription {
    /// Stop delivery now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl fmt::Debug for WatchSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSubscription").finish_non_exhaustive()
    }
}
