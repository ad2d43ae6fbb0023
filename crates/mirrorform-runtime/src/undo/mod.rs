#![forbid(unsafe_code)]

//! Bounded snapshot history with undo/redo.
//!
//! - [`snapshot_store`]: ring of snapshots plus a cursor
//! - [`history`]: [`HistoryTracker`], the undo/redo decorator over a
//!   [`Bridge`](crate::reactive::Bridge)

pub mod history;
pub mod snapshot_store;

pub use history::{HistoryAction, HistoryStatus, HistoryTracker};
pub use snapshot_store::{DEFAULT_MAX_DEPTH, PushOutcome, SnapshotConfig, SnapshotStore};
