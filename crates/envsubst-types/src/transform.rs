//! Case-conversion operators.
//!
//! Each transform is keyed by its operator spelling inside an expansion,
//! e.g. `${NAME^^}`. Adding a variant here and its spelling to
//! [`CASE_TRANSFORMS`] is enough for the lexer to recognise it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Single-argument string transform applied to a variable's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseTransform {
    /// `^^`
    Upper,
    /// `,,`
    Lower,
}

/// Every case transform, in lexer lookup order.
pub const CASE_TRANSFORMS: &[CaseTransform] = &[CaseTransform::Upper, CaseTransform::Lower];

impl CaseTransform {
    /// Operator spelling as written in the template.
    pub fn operator(self) -> &'static str {
        match self {
            Self::Upper => "^^",
            Self::Lower => ",,",
        }
    }

    /// Look up a transform by its operator spelling.
    pub fn from_operator(op: &str) -> Option<Self> {
        CASE_TRANSFORMS.iter().copied().find(|t| t.operator() == op)
    }

    /// Apply the transform.
    pub fn apply(self, value: &str) -> String {
        match self {
            Self::Upper => value.to_uppercase(),
            Self::Lower => value.to_lowercase(),
        }
    }
}

impl fmt::Display for CaseTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        assert_eq!(CaseTransform::Upper.apply("Hello World"), "HELLO WORLD");
        assert_eq!(CaseTransform::Lower.apply("Hello World"), "hello world");
    }

    #[test]
    fn test_lookup_by_operator() {
        assert_eq!(CaseTransform::from_operator("^^"), Some(CaseTransform::Upper));
        assert_eq!(CaseTransform::from_operator(",,"), Some(CaseTransform::Lower));
        assert_eq!(CaseTransform::from_operator("~T"), None);
    }

    #[test]
    fn test_every_transform_has_a_two_char_operator() {
        for t in CASE_TRANSFORMS {
            assert_eq!(t.operator().chars().count(), 2, "{t:?}");
            assert_eq!(CaseTransform::from_operator(t.operator()), Some(*t));
        }
    }

    #[test]
    fn test_non_ascii_case() {
        assert_eq!(CaseTransform::Upper.apply("straße"), "STRASSE");
        assert_eq!(CaseTransform::Lower.apply("ÄÖÜ"), "äöü");
    }
}
