#![forbid(unsafe_code)]

//! Headless form screen for the mirrorform loop.
//!
//! [`App`] owns a four-field form mounted through
//! [`FormSync`](mirrorform_runtime::FormSync), [`view`] renders it as text, and
//! [`script`] turns input lines into clicks, keystrokes, and waits. [`Cli`]
//! holds the binary's arguments.

pub mod app;
pub mod cli;
pub mod script;
pub mod view;

pub use app::App;
pub use cli::Cli;
pub use script::{Command, CommandParseError, Flow};
pub use view::{Button, FormView};
