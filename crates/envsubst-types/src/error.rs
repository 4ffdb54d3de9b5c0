use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message carried by the scan error for an unterminated `${`.
pub const CLOSING_BRACE_EXPECTED: &str = "closing brace expected";

/// Error category, used to branch on a failure without matching messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Scan,
    Unset,
    Empty,
    Multiple,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan => write!(f, "scan"),
            Self::Unset => write!(f, "unset"),
            Self::Empty => write!(f, "empty"),
            Self::Multiple => write!(f, "multiple"),
        }
    }
}

/// A substitution failure.
///
/// The display strings are part of the public contract; callers print
/// them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubstError {
    /// Malformed expansion, e.g. an unterminated `${`.
    #[error("{message}")]
    Scan { message: String, offset: usize },

    /// Variable required but absent from the store.
    #[error("variable ${{{name}}} not set")]
    Unset { name: String },

    /// Variable required non-empty but set to the empty string.
    #[error("variable ${{{name}}} set but empty")]
    Empty { name: String },

    /// Every failure collected during an all-errors pass, in node order.
    #[error("{}", join_messages(.errors))]
    Multiple { errors: Vec<SubstError> },
}

fn join_messages(errors: &[SubstError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl SubstError {
    /// Scan error at the given byte offset.
    pub fn scan(message: impl Into<String>, offset: usize) -> Self {
        Self::Scan {
            message: message.into(),
            offset,
        }
    }

    pub fn unset(name: impl Into<String>) -> Self {
        Self::Unset { name: name.into() }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::Empty { name: name.into() }
    }

    /// Collapse collected errors: one error stays itself, more become `Multiple`.
    ///
    /// Returns `None` when nothing was collected.
    pub fn collect(mut errors: Vec<SubstError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple { errors }),
        }
    }

    /// Get the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Scan { .. } => ErrorKind::Scan,
            Self::Unset { .. } => ErrorKind::Unset,
            Self::Empty { .. } => ErrorKind::Empty,
            Self::Multiple { .. } => ErrorKind::Multiple,
        }
    }

    /// Flattened view of the individual failures.
    pub fn errors(&self) -> Vec<&SubstError> {
        match self {
            Self::Multiple { errors } => errors.iter().flat_map(|e| e.errors()).collect(),
            other => vec![other],
        }
    }
}
