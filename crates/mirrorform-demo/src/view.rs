#![forbid(unsafe_code)]

//! Text rendering of the form screen.
//!
//! A [`FormView`] is a plain snapshot: four labelled inputs, three buttons,
//! and a footer with the mirror and history state. It is rebuilt from the
//! [`App`](crate::app::App) after every command and rendered line by line.

use std::fmt;
use std::str::FromStr;

use mirrorform_core::{FieldPath, FormValues};
use mirrorform_runtime::HistoryStatus;

/// Clickable controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    SetTest,
    Undo,
    Redo,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::SetTest, Button::Undo, Button::Redo];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SetTest => "Set Form Values to 'test'",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

impl FromStr for Button {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "test" => Ok(Self::SetTest),
            "undo" => Ok(Self::Undo),
            "redo" => Ok(Self::Redo),
            _ => Err(()),
        }
    }
}

/// Caption shown next to an input.
#[must_use]
pub const fn field_label(path: FieldPath) -> &'static str {
    match path {
        FieldPath::A => "Field A",
        FieldPath::B => "Field B",
        FieldPath::CA => "Field C - A",
        FieldPath::CB => "Field C B",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub path: FieldPath,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonView {
    pub button: Button,
    pub enabled: bool,
}

/// Everything the screen shows at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub buttons: Vec<ButtonView>,
    pub mirror: FormValues,
    pub mirror_version: u64,
    pub history: HistoryStatus,
    pub pending_write: bool,
}

impl FormView {
    /// Whether `button` would respond to a click.
    #[must_use]
    pub fn is_enabled(&self, button: Button) -> bool {
        self.buttons
            .iter()
            .any(|b| b.button == button && b.enabled)
    }

    /// Value shown in the input for `path`.
    #[must_use]
    pub fn field(&self, path: FieldPath) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.value.as_str())
    }

    /// Screen as text lines, top to bottom.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let width = FieldPath::ALL
            .iter()
            .map(|p| field_label(*p).len())
            .max()
            .unwrap_or(0);

        let mut lines: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("{:<width$}  [{}]", field_label(f.path), f.value))
            .collect();

        let buttons: Vec<String> = self
            .buttons
            .iter()
            .map(|b| {
                if b.enabled {
                    format!("[{}]", b.button.label())
                } else {
                    format!("[{} (disabled)]", b.button.label())
                }
            })
            .collect();
        lines.push(buttons.join(" "));

        let mirror = FieldPath::ALL
            .iter()
            .map(|p| format!("{p}={:?}", self.mirror.field(*p)))
            .collect::<Vec<_>>()
            .join(" ");
        let marker = if self.pending_write { " (settling)" } else { "" };
        lines.push(format!("mirror v{}: {mirror}{marker}", self.mirror_version));
        lines.push(format!(
            "history {}/{}",
            self.history.position + 1,
            self.history.len
        ));
        lines
    }
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.render() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
