#![forbid(unsafe_code)]

//! Command-line arguments of the demo binary.

use std::path::PathBuf;

use clap::Parser;

/// Drive the mirrored form from stdin, one command per line.
///
/// Commands:
///   type <field> <text>   field is one of a, b, c.a, c.b
///   test                  set every field to 'test'
///   undo | redo
///   wait <ms>
///   show
///   quit
///
/// Lines starting with '#' are ignored. The screen is printed after each
/// command.
#[derive(Debug, Parser)]
#[command(name = "mirrorform-demo", version, verbatim_doc_comment)]
pub struct Cli {
    /// TOML or JSON config file (debounce_ms, history_limit, mirror_label).
    pub config: Option<PathBuf>,
}
