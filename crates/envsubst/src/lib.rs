//! Shell-style variable substitution over text.
//!
//! ```text
//! template → Lexer → Parser (node tree) → render against Env + Restrictions → output
//! ```
//!
//! Supported forms: `$VAR`, `${VAR}`, `${VAR-DEF}`, `${VAR:-DEF}`,
//! `${VAR=DEF}`, `${VAR:=DEF}`, `${VAR+ALT}`, `${VAR:+ALT}`, `${VAR^^}`,
//! `${VAR,,}`, and the `$$` escape.

mod bytes;
pub mod config;
pub mod error;
pub mod substituter;

use std::path::Path;

pub use envsubst_eval::Env;
pub use envsubst_types::{ErrorKind, Mode, NameFilter, Restrictions, SubstError, SubstResult};
pub use error::{Error, Result};
pub use substituter::Substituter;

/// Build a naming store from the process environment.
///
/// Names and values that are not valid UTF-8 are converted lossily.
pub fn os_env() -> Env {
    std::env::vars_os()
        .map(|(name, value)| {
            (
                name.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        })
        .collect()
}

/// Substitute process environment variables into `input`, relaxed policy.
pub fn substitute(input: &str) -> SubstResult<String> {
    substitute_with(input, &Restrictions::relaxed())
}

/// Substitute process environment variables into `input` under `restrictions`.
pub fn substitute_with(input: &str, restrictions: &Restrictions) -> SubstResult<String> {
    Substituter::new("string", os_env(), restrictions.clone()).substitute(input)
}

/// Byte-oriented variant of [`substitute_with`]; invalid UTF-8 passes through.
pub fn substitute_bytes(input: &[u8], restrictions: &Restrictions) -> Result<Vec<u8>> {
    Substituter::new("bytes", os_env(), restrictions.clone()).substitute_bytes(input)
}

/// Read `path` and substitute process environment variables into it.
pub fn substitute_file(path: impl AsRef<Path>, restrictions: &Restrictions) -> Result<Vec<u8>> {
    let path = path.as_ref();
    Substituter::new(path.display().to_string(), os_env(), restrictions.clone())
        .substitute_file(path)
}
