//! Restriction policy consulted by the lexer and the renderer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Predicate deciding whether a candidate name is a variable reference at all.
///
/// Rejected names are passed through as literal text and never trigger
/// unset/empty failures.
pub type NameFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Error aggregation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Stop at the first failure and discard partial output.
    #[default]
    Quick,
    /// Render every node and report all failures together.
    AllErrors,
}

/// How unset, empty and digit-led variables are handled.
///
/// `keep_unset` and the two failure flags are mutually exclusive; see
/// [`Restrictions::normalized`].
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Restrictions {
    /// Fail when a referenced variable is not set.
    pub no_unset: bool,
    /// Fail when a referenced variable is set to the empty string.
    pub no_empty: bool,
    /// Treat `$1`, `${2}` and other digit-led names as literal text.
    pub no_digit: bool,
    /// Emit unresolved references verbatim instead of substituting.
    pub keep_unset: bool,
    /// Error aggregation strategy.
    pub mode: Mode,
    /// Optional name filter; `None` accepts every name except `_`.
    #[serde(skip)]
    pub name_filter: Option<NameFilter>,
}

impl Restrictions {
    /// Unset and empty variables render as the empty string.
    pub fn relaxed() -> Self {
        Self::default()
    }

    pub fn no_unset() -> Self {
        Self::default().with_no_unset(true)
    }

    pub fn no_empty() -> Self {
        Self::default().with_no_empty(true)
    }

    /// Fail on both unset and empty variables.
    pub fn strict() -> Self {
        Self::default().with_no_unset(true).with_no_empty(true)
    }

    /// Pass unresolved references through untouched.
    pub fn keep_unset() -> Self {
        Self::default().with_keep_unset(true)
    }

    pub fn with_no_unset(mut self, on: bool) -> Self {
        self.no_unset = on;
        self
    }

    pub fn with_no_empty(mut self, on: bool) -> Self {
        self.no_empty = on;
        self
    }

    pub fn with_no_digit(mut self, on: bool) -> Self {
        self.no_digit = on;
        self
    }

    pub fn with_keep_unset(mut self, on: bool) -> Self {
        self.keep_unset = on;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_name_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.name_filter = Some(Arc::new(filter));
        self
    }

    /// Enforce the policy invariant: `keep_unset` clears both failure flags.
    pub fn normalized(mut self) -> Self {
        if self.keep_unset {
            self.no_unset = false;
            self.no_empty = false;
        }
        self
    }

    /// Returns `true` if the policy satisfies its invariant.
    pub fn is_normalized(&self) -> bool {
        !(self.keep_unset && (self.no_unset || self.no_empty))
    }
}

impl fmt::Debug for Restrictions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Restrictions")
            .field("no_unset", &self.no_unset)
            .field("no_empty", &self.no_empty)
            .field("no_digit", &self.no_digit)
            .field("keep_unset", &self.keep_unset)
            .field("mode", &self.mode)
            .field("name_filter", &self.name_filter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
