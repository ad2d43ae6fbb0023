#![forbid(unsafe_code)]

//! Line-oriented command interpreter.
//!
//! One command per line:
//!
//! ```text
//! type <field> <text>   replace the text of a field (a, b, c.a, c.b)
//! test                  click "Set Form Values to 'test'"
//! undo | redo           click the history buttons
//! wait <ms>             let time pass
//! show                  print the screen
//! quit                  stop
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. After every command
//! due timers run and the screen is printed.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use mirrorform_core::{FieldPath, FieldPathError};
use tracing::{info, warn};
use web_time::Duration;

use crate::app::App;
use crate::view::Button;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Type { path: FieldPath, text: String },
    Click(Button),
    Wait(Duration),
    Show,
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
    Field(FieldPathError),
    InvalidDuration(String),
}

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::Unknown(word) => write!(f, "unknown command '{word}'"),
            Self::MissingArgument(what) => write!(f, "missing argument: {what}"),
            Self::Field(e) => write!(f, "{e}"),
            Self::InvalidDuration(raw) => write!(f, "invalid duration '{raw}' (expected milliseconds)"),
        }
    }
}

impl std::error::Error for CommandParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Field(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FieldPathError> for CommandParseError {
    fn from(e: FieldPathError) -> Self {
        Self::Field(e)
    }
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (word, rest) = line.split_once(' ').unwrap_or((line.trim_end(), ""));
        match word {
            "" => Err(CommandParseError::Empty),
            "type" => {
                let rest = rest.trim_start();
                let (field, text) = rest.split_once(' ').unwrap_or((rest.trim_end(), ""));
                if field.is_empty() {
                    return Err(CommandParseError::MissingArgument("field"));
                }
                Ok(Self::Type {
                    path: field.parse()?,
                    text: text.to_owned(),
                })
            }
            "wait" => {
                let raw = rest.trim();
                if raw.is_empty() {
                    return Err(CommandParseError::MissingArgument("milliseconds"));
                }
                raw.parse::<u64>()
                    .map(|ms| Self::Wait(Duration::from_millis(ms)))
                    .map_err(|_| CommandParseError::InvalidDuration(raw.to_owned()))
            }
            "show" => Ok(Self::Show),
            "quit" | "exit" => Ok(Self::Quit),
            other => other
                .parse::<Button>()
                .map(Self::Click)
                .map_err(|()| CommandParseError::Unknown(other.to_owned())),
        }
    }
}

/// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    line.trim_end_matches(['\r', '\n']).parse().map(Some)
}

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply one command to `app`. `wait` is called to let time pass.
pub fn execute(app: &App, command: &Command, wait: &mut impl FnMut(Duration)) -> Flow {
    match command {
        Command::Type { path, text } => app.type_into(*path, text),
        Command::Click(button) => {
            if !app.click(*button) {
                info!(button = button.label(), "click had no effect");
            }
        }
        Command::Wait(duration) => wait(*duration),
        Command::Show => {}
        Command::Quit => return Flow::Quit,
    }
    app.tick();
    Flow::Continue
}

/// Drive `app` from `input` until EOF or `quit`, printing the screen to
/// `out` after every command. Parse errors are reported and skipped.
pub fn run(
    app: &mut App,
    input: impl BufRead,
    out: &mut impl Write,
    mut wait: impl FnMut(Duration),
) -> io::Result<()> {
    write!(out, "{}", app.view())?;
    for line in input.lines() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!(%e, line = line.as_str(), "bad command");
                writeln!(out, "error: {e}")?;
                continue;
            }
        };
        if execute(app, &command, &mut wait) == Flow::Quit {
            break;
        }
        writeln!(out, "> {}", line.trim())?;
        write!(out, "{}", app.view())?;
    }
    app.unmount();
    out.flush()
}
