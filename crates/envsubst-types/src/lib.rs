//! Shared types for envsubst.
//!
//! This crate defines source spans, the error taxonomy, the restriction
//! policy consulted during rendering, and the table of case transforms.

mod error;
mod restrictions;
mod span;
mod transform;

pub use error::{ErrorKind, SubstError, CLOSING_BRACE_EXPECTED};
pub use restrictions::{Mode, NameFilter, Restrictions};
pub use span::Span;
pub use transform::{CaseTransform, CASE_TRANSFORMS};

/// Result type used throughout the substitution pipeline.
pub type SubstResult<T> = std::result::Result<T, SubstError>;
