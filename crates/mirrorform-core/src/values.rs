#![forbid(unsafe_code)]

//! Form value snapshots and field addressing.
//!
//! [`FormValues`] is replaced wholesale on every write; callers never
//! mutate a snapshot that has already been handed to another component.
//! Equality is structural, field by field.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The nested `c` object of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NestedValues {
    pub a: String,
    pub b: String,
}

/// A complete copy of every form field at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormValues {
    pub a: String,
    pub b: String,
    pub c: NestedValues,
}

impl FormValues {
    /// Snapshot with every field set to `text`.
    #[must_use]
    pub fn filled(text: &str) -> Self {
        Self {
            a: text.to_owned(),
            b: text.to_owned(),
            c: NestedValues {
                a: text.to_owned(),
                b: text.to_owned(),
            },
        }
    }

    /// Read one field.
    #[must_use]
    pub fn field(&self, path: FieldPath) -> &str {
        match path {
            FieldPath::A => &self.a,
            FieldPath::B => &self.b,
            FieldPath::CA => &self.c.a,
            FieldPath::CB => &self.c.b,
        }
    }

    /// Mutable access to one field.
    pub fn field_mut(&mut self, path: FieldPath) -> &mut String {
        match path {
            FieldPath::A => &mut self.a,
            FieldPath::B => &mut self.b,
            FieldPath::CA => &mut self.c.a,
            FieldPath::CB => &mut self.c.b,
        }
    }

    /// Replace one field.
    pub fn set_field(&mut self, path: FieldPath, value: impl Into<String>) {
        *self.field_mut(path) = value.into();
    }

    /// Replace one field (builder).
    #[must_use]
    pub fn with_field(mut self, path: FieldPath, value: impl Into<String>) -> Self {
        self.set_field(path, value);
        self
    }

    /// Paths whose values differ between `self` and `other`, in field order.
    #[must_use]
    pub fn changed_fields(&self, other: &Self) -> Vec<FieldPath> {
        FieldPath::ALL
            .into_iter()
            .filter(|path| self.field(*path) != other.field(*path))
            .collect()
    }
}

/// One of the four editable fields, addressed by its dotted path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPath {
    /// `a`
    A,
    /// `b`
    B,
    /// `c.a`
    CA,
    /// `c.b`
    CB,
}

impl FieldPath {
    /// Every field, in form order.
    pub const ALL: [FieldPath; 4] = [FieldPath::A, FieldPath::B, FieldPath::CA, FieldPath::CB];

    /// Dotted path string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::CA => "c.a",
            Self::CB => "c.b",
        }
    }

    /// Position in [`FieldPath::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::CA => 2,
            Self::CB => 3,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "a" => Ok(Self::A),
            "b" => Ok(Self::B),
            "c.a" => Ok(Self::CA),
            "c.b" => Ok(Self::CB),
            other => Err(FieldPathError::Unknown(other.to_owned())),
        }
    }
}

/// Errors from parsing a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPathError {
    /// The path does not name one of the form's fields.
    Unknown(String),
}

impl fmt::Display for FieldPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(path) => write!(f, "unknown field path '{path}' (expected a, b, c.a, c.b)"),
        }
    }
}

impl std::error::Error for FieldPathError {}
