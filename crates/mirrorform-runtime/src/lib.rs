#![forbid(unsafe_code)]

//! mirrorform runtime
//!
//! Keeps a live form and a history-tracked mirror of it in step.
//!
//! # Key Components
//!
//! - [`Observable`] - the mirror store, a single versioned cell
//! - [`Bridge`] - read/write projection that routes writes to the form
//! - [`HistoryTracker`] - bounded undo/redo over the bridge
//! - [`Debouncer`] - trailing-edge coalescing of the form's watch stream
//! - [`Scheduler`] - single-threaded timer queue behind the debounce
//! - [`FormSync`] - mounts all of the above onto a [`FormHolder`]
//!
//! # How it fits in the system
//! `mirrorform-core` owns the edit buffer; this crate owns everything that
//! observes it. A view reads fields from the form, flags from
//! [`HistoryStatus`], and drives the loop by calling
//! [`Scheduler::run_due`] from its event loop.
//!
//! [`FormHolder`]: mirrorform_core::FormHolder

pub mod cancellation;
pub mod config;
pub mod debounce;
pub mod reactive;
pub mod sync;
pub mod timer;
pub mod undo;

pub use cancellation::{CancellationSource, CancellationToken};
pub use config::{ConfigError, SyncConfig};
pub use debounce::Debouncer;
pub use reactive::{Bridge, Observable, Subscription};
pub use sync::FormSync;
pub use timer::{Clock, ManualClock, Scheduler, SystemClock, TimerId};
pub use undo::{
    HistoryAction, HistoryStatus, HistoryTracker, PushOutcome, SnapshotConfig, SnapshotStore,
};
