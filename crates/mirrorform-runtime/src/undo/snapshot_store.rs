#![forbid(unsafe_code)]

//! Bounded linear snapshot history.
//!
//! [`SnapshotStore`] keeps an ordered run of snapshots and a cursor naming
//! the active one. Snapshots are stored as [`Arc`]s so handing the active
//! snapshot out never copies the state.
//!
//! # Architecture
//!
//! ```text
//! push(s3)
//! ┌───────────────────────────────────────────┐
//! │ entries: [s0, s1, s2, s3]     cursor: 3   │
//! └───────────────────────────────────────────┘
//!
//! undo() x2
//! ┌───────────────────────────────────────────┐
//! │ entries: [s0, s1, s2, s3]     cursor: 1   │
//! │                   └─ redo branch ─┘       │
//! └───────────────────────────────────────────┘
//!
//! push(s4): redo branch discarded
//! ┌───────────────────────────────────────────┐
//! │ entries: [s0, s1, s4]         cursor: 2   │
//! └───────────────────────────────────────────┘
//! ```
//!
//! When a push takes the length past `max_depth`, entries are evicted from
//! the front until it fits. With a depth of `N` a tail cursor has at most
//! `N - 1` undo steps behind it.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Default number of retained snapshots.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Configuration for the snapshot store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// Maximum number of snapshots retained, including the active one.
    /// Values below 1 are treated as 1.
    pub max_depth: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SnapshotConfig {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// No depth limit (for testing).
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }

    fn effective_depth(&self) -> usize {
        self.max_depth.max(1)
    }
}

/// What a [`SnapshotStore::push`] threw away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushOutcome {
    /// Redo entries truncated because the cursor was not at the tail.
    pub discarded_redo: usize,
    /// Oldest entries evicted to respect the depth limit.
    pub evicted: usize,
}

/// Ring of snapshots plus a cursor.
///
/// # Invariants
///
/// 1. `entries` is never empty and `cursor < entries.len()`.
/// 2. `entries.len() <= max(config.max_depth, 1)` after every operation.
/// 3. `push` leaves the cursor on the new tail with no redo branch.
/// 4. `undo`/`redo` at a boundary change nothing.
pub struct SnapshotStore<T> {
    entries: VecDeque<Arc<T>>,
    cursor: usize,
    config: SnapshotConfig,
}

impl<T: fmt::Debug> fmt::Debug for SnapshotStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("len", &self.entries.len())
            .field("cursor", &self.cursor)
            .field("current", self.current())
            .field("config", &self.config)
            .finish()
    }
}

impl<T> SnapshotStore<T> {
    /// Store whose only entry is `initial`.
    #[must_use]
    pub fn new(initial: T, config: SnapshotConfig) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(Arc::new(initial));
        Self {
            entries,
            cursor: 0,
            config,
        }
    }

    /// Store with the default depth.
    #[must_use]
    pub fn with_default_config(initial: T) -> Self {
        Self::new(initial, SnapshotConfig::default())
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Append `state` after the cursor, dropping any redo branch, and make it
    /// active.
    pub fn push(&mut self, state: T) -> PushOutcome {
        self.push_arc(Arc::new(state))
    }

    /// Like [`push`](Self::push) for an already shared snapshot.
    pub fn push_arc(&mut self, state: Arc<T>) -> PushOutcome {
        let discarded_redo = self.entries.len() - self.cursor - 1;
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(state);

        let mut evicted = 0;
        while self.entries.len() > self.config.effective_depth() {
            self.entries.pop_front();
            evicted += 1;
        }
        self.cursor = self.entries.len() - 1;

        PushOutcome {
            discarded_redo,
            evicted,
        }
    }

    /// Step the cursor back. `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<Arc<T>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(Arc::clone(&self.entries[self.cursor]))
    }

    /// Step the cursor forward. `None` at the newest entry.
    pub fn redo(&mut self) -> Option<Arc<T>> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(Arc::clone(&self.entries[self.cursor]))
    }

    /// Active snapshot.
    #[must_use]
    pub fn current(&self) -> &Arc<T> {
        &self.entries[self.cursor]
    }

    // ====================================================================
    // Query
    // ====================================================================

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Cursor index into [`iter`](Self::iter).
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Steps available to undo.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    /// Steps available to redo.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.entries.len() - self.cursor - 1
    }

    /// Retained snapshots, including the active one. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; present for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Snapshots oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.entries.iter()
    }

    // ====================================================================
    // Maintenance
    // ====================================================================

    /// Forget everything except the active snapshot.
    pub fn clear(&mut self) {
        let current = Arc::clone(self.current());
        self.entries.clear();
        self.entries.push_back(current);
        self.cursor = 0;
    }
}
