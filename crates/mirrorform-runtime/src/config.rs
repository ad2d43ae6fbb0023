#![forbid(unsafe_code)]

//! Synchronization settings.
//!
//! [`SyncConfig`] gathers the tunables of the form/mirror/history loop. With
//! the `config` feature it loads from TOML or JSON:
//!
//! ```toml
//! # mirrorform.toml
//! debounce_ms = 50
//! history_limit = 20
//! mirror_label = "mirror"
//! ```
//!
//! ```rust,ignore
//! let config = SyncConfig::from_toml_file("mirrorform.toml")?;
//! ```
//!
//! Every field has a default, so a partial file only overrides what it names.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use web_time::Duration;

use crate::undo::DEFAULT_MAX_DEPTH;

/// Default debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

/// Upper bound accepted for `debounce_ms`.
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Tunables for [`FormSync`](crate::sync::FormSync).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SyncConfig {
    /// Trailing debounce window between the form and the mirror. Default: 50.
    pub debounce_ms: u64,
    /// Snapshots retained by the history, active one included. Default: 20.
    pub history_limit: usize,
    /// Debug label of the mirror cell in log output. Default: "mirror".
    pub mirror_label: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            history_limit: DEFAULT_MAX_DEPTH,
            mirror_label: "mirror".into(),
        }
    }
}

impl SyncConfig {
    /// Debounce window as a [`Duration`].
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Set the debounce window (builder).
    #[must_use]
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Set the history limit (builder).
    #[must_use]
    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;
        self
    }

    /// Check every field. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.debounce_ms > MAX_DEBOUNCE_MS {
            errors.push(format!(
                "debounce_ms must be <= {MAX_DEBOUNCE_MS}, got {}",
                self.debounce_ms
            ));
        }

        // One entry is the present; undo needs at least one more.
        if self.history_limit < 2 {
            errors.push(format!(
                "history_limit must be >= 2, got {}",
                self.history_limit
            ));
        }

        if self.mirror_label.trim().is_empty() {
            errors.push("mirror_label must not be empty".into());
        }

        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load a TOML or JSON file (chosen by extension) and validate it.
    #[cfg(feature = "config")]
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_toml_str(&content)?,
        };
        config.into_validated()
    }

    /// Return `self` if it validates, otherwise every problem found.
    pub fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading a [`SyncConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// File read error.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
