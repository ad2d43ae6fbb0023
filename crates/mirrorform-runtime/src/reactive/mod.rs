#![forbid(unsafe_code)]

//! Reactive cells: the mirror store and its read/write bridge.

pub mod bridge;
pub mod observable;

pub use bridge::Bridge;
pub use observable::{Observable, Subscription};
