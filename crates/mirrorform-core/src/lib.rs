#![forbid(unsafe_code)]

//! mirrorform core
//!
//! Leaf types shared by the rest of the workspace:
//!
//! - [`FormValues`] - the fixed-shape snapshot `{ a, b, c: { a, b } }`
//! - [`FieldPath`] - addresses one of the four editable fields
//! - [`FormHolder`] - the live, field-level edit buffer with bindings,
//!   bulk get/reset, and a synchronous watch stream
//!
//! # Role in mirrorform
//! The form holder is the fast local edit buffer. `mirrorform-runtime`
//! mirrors it into a history-tracked store and pushes snapshots back
//! into it through [`FormHolder::reset`].

pub mod form;
pub mod values;

pub use form::{ChangeKind, FieldBinding, FormHolder, WatchEvent, WatchSubscription};
pub use values::{FieldPath, FieldPathError, FormValues, NestedValues};
