#![forbid(unsafe_code)]

//! mirrorform demo
//!
//! Reads commands from stdin and prints the form screen after each one.
//!
//! # Running
//!
//! ```sh
//! printf 'type a hello\nwait 60\ntest\nwait 60\nundo\nwait 60\n' \
//!     | cargo run -p mirrorform-demo -- mirrorform.toml
//! ```
//!
//! `--help` lists the command grammar. Log output goes to stderr, filtered by
//! `MIRRORFORM_LOG` (e.g. `MIRRORFORM_LOG=mirrorform_runtime=debug`).
//! Default: `warn`.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mirrorform_demo::{App, Cli, script};
use mirrorform_runtime::{Scheduler, SyncConfig, SystemClock};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

const LOG_ENV: &str = "MIRRORFORM_LOG";

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .compact()
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<SyncConfig, String> {
    match path {
        Some(path) => {
            SyncConfig::load_validated(&path).map_err(|e| format!("{}: {e}", path.display()))
        }
        None => Ok(SyncConfig::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("mirrorform-demo: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::new(Scheduler::new(SystemClock::new()), config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    match script::run(&mut app, stdin.lock(), &mut stdout.lock(), std::thread::sleep) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mirrorform-demo: {e}");
            ExitCode::FAILURE
        }
    }
}
