//! Top-level error type.

use std::io;
use std::path::PathBuf;

use envsubst_types::SubstError;
use thiserror::Error;

/// Errors from the substitution entry points.
///
/// File and decoding failures are kept apart from substitution failures.
#[derive(Debug, Error)]
pub enum Error {
    /// The template could not be substituted.
    #[error(transparent)]
    Subst(#[from] SubstError),

    /// Reading an input file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Byte input was not valid UTF-8 and no private-use block was free to
    /// carry its invalid bytes through substitution.
    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[source] std::str::Utf8Error),

    /// A restrictions config could not be decoded.
    #[error("invalid restrictions config: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The substitution failure, if that is what this is.
    pub fn as_subst(&self) -> Option<&SubstError> {
        match self {
            Self::Subst(err) => Some(err),
            _ => None,
        }
    }
}

/// Result alias for the top-level entry points.
pub type Result<T> = std::result::Result<T, Error>;
