#![forbid(unsafe_code)]

//! Undo/redo decorator over a [`Bridge`].
//!
//! [`HistoryTracker`] records every settled value of the bridge's read
//! channel into a bounded [`SnapshotStore`], and replays snapshots through the
//! bridge's write channel on undo/redo.
//!
//! # Commit rule
//!
//! A change of the read channel commits a new history point unless the new
//! value equals the active snapshot. Undo and redo move the cursor first and
//! then write the target snapshot; when that write settles back into the read
//! channel it matches the cursor and is absorbed, so the redo branch survives
//! the round trip.
//!
//! The read channel only reports changes, so a settle that lands on the value
//! the source already holds (e.g. the form edited back within the window after
//! an undo) is invisible to it. Whatever drives the source calls the
//! [`settle_hook`](HistoryTracker::settle_hook) on every settle to cover that
//! case; the same commit rule applies.
//!
//! # Status
//!
//! [`HistoryStatus`] is republished into an [`Observable`] after every
//! transition, so `can_undo`/`can_redo` are never stale and views can
//! subscribe instead of polling.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, info};

use super::snapshot_store::{SnapshotConfig, SnapshotStore};
use crate::reactive::{Bridge, Observable, Subscription};

/// Dispatchable history navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Undo,
    Redo,
}

/// Derived navigation flags for the current history state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    /// Cursor index.
    pub position: usize,
    /// Retained snapshots.
    pub len: usize,
}

impl HistoryStatus {
    fn of<T>(store: &SnapshotStore<T>) -> Self {
        Self {
            can_undo: store.can_undo(),
            can_redo: store.can_redo(),
            position: store.cursor(),
            len: store.len(),
        }
    }
}

/// Bounded undo/redo history wrapped around a bridge.
pub struct HistoryTracker<T> {
    store: Rc<RefCell<SnapshotStore<T>>>,
    bridge: Bridge<T>,
    status: Observable<HistoryStatus>,
    _source: Subscription,
}

impl<T: fmt::Debug> fmt::Debug for HistoryTracker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryTracker")
            .field("store", &*self.store.borrow())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> HistoryTracker<T> {
    /// Track `bridge`, retaining at most `limit` snapshots.
    ///
    /// The bridge's current value becomes the first entry.
    #[must_use]
    pub fn new(bridge: Bridge<T>, limit: usize) -> Self {
        let store = Rc::new(RefCell::new(SnapshotStore::new(
            bridge.read(),
            SnapshotConfig::new(limit),
        )));
        let status = Observable::new(HistoryStatus::of(&*store.borrow())).with_label("history");

        let weak_store = Rc::downgrade(&store);
        let status_handle = status.clone();
        let source = bridge.subscribe(move |value: &T| {
            if let Some(store) = weak_store.upgrade() {
                commit_settled(&store, &status_handle, value);
            }
        });

        Self {
            store,
            bridge,
            status,
            _source: source,
        }
    }

    /// Record `value` as a new history point, as if it had settled.
    ///
    /// Returns `false` if it equals the active snapshot.
    pub fn commit(&self, value: T) -> bool {
        commit_settled(&self.store, &self.status, &value)
    }

    /// Commit callback for the code that settles values into the source.
    ///
    /// Call it with every settled value, changed or not. It holds the history
    /// weakly and does nothing once the tracker is dropped.
    pub fn settle_hook(&self) -> impl Fn(&T) + 'static {
        let store = Rc::downgrade(&self.store);
        let status = self.status.clone();
        move |value: &T| {
            if let Some(store) = store.upgrade() {
                commit_settled(&store, &status, value);
            }
        }
    }

    /// Step back and push that snapshot through the bridge.
    /// Returns `false` (and changes nothing) when there is nothing to undo.
    pub fn undo(&self) -> bool {
        let target = self.store.borrow_mut().undo();
        self.materialize(target, HistoryAction::Undo)
    }

    /// Step forward and push that snapshot through the bridge.
    /// Returns `false` (and changes nothing) when there is nothing to redo.
    pub fn redo(&self) -> bool {
        let target = self.store.borrow_mut().redo();
        self.materialize(target, HistoryAction::Redo)
    }

    pub fn dispatch(&self, action: HistoryAction) -> bool {
        match action {
            HistoryAction::Undo => self.undo(),
            HistoryAction::Redo => self.redo(),
        }
    }

    /// Active snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<T> {
        Arc::clone(self.store.borrow().current())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.store.borrow().can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.store.borrow().can_redo()
    }

    #[must_use]
    pub fn status(&self) -> HistoryStatus {
        self.status.get()
    }

    /// Called with the new status after each transition.
    pub fn subscribe_status(&self, callback: impl Fn(&HistoryStatus) + 'static) -> Subscription {
        self.status.subscribe(callback)
    }

    /// Retained snapshots oldest first.
    #[must_use]
    pub fn snapshots(&self) -> Vec<Arc<T>> {
        self.store.borrow().iter().cloned().collect()
    }

    /// Wrapped bridge.
    #[must_use]
    pub fn bridge(&self) -> &Bridge<T> {
        &self.bridge
    }

    fn materialize(&self, target: Option<Arc<T>>, action: HistoryAction) -> bool {
        let Some(snapshot) = target else {
            debug!(?action, "history boundary, ignored");
            return false;
        };
        let status = HistoryStatus::of(&*self.store.borrow());
        info!(
            ?action,
            position = status.position,
            len = status.len,
            "history moved"
        );
        self.status.set(status);
        self.bridge.write((*snapshot).clone());
        true
    }
}

fn commit_settled<T: PartialEq + Clone>(
    store: &RefCell<SnapshotStore<T>>,
    status: &Observable<HistoryStatus>,
    value: &T,
) -> bool {
    let next = {
        let mut store = store.borrow_mut();
        if **store.current() == *value {
            return false;
        }
        let outcome = store.push(value.clone());
        info!(
            position = store.cursor(),
            len = store.len(),
            discarded_redo = outcome.discarded_redo,
            evicted = outcome.evicted,
            "history commit"
        );
        HistoryStatus::of(&*store)
    };
    status.set(next);
    true
}
