//! Token types for the envsubst lexer.
//!
//! Defines [`TokenKind`] covering every lexeme of the expansion grammar and
//! [`Token`], which pairs a kind with a source [`Span`].

use envsubst_types::{CaseTransform, Span};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns `true` for the two terminal kinds, `Eof` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, TokenKind::Eof | TokenKind::Error(_))
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in the expansion grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Literal text. Escapes are already resolved: `$$` arrives as `"$"`.
    Text(String),
    /// Variable reference; carries the bare name without `$`.
    Variable(String),
    /// `${`
    ExpansionStart,
    /// `}` closing an expansion.
    ExpansionEnd,

    // ── Operators ─────────────────────────────────────────────
    /// `-`
    Dash,
    /// `=`
    Equals,
    /// `+`
    Plus,
    /// `:-`
    ColonDash,
    /// `:=`
    ColonEquals,
    /// `:+`
    ColonPlus,
    /// `^^`
    CaretCaret,
    /// `,,`
    CommaComma,

    /// End of input; always last on a successful scan.
    Eof,
    /// Scan failure; always last on a failed scan.
    Error(String),
}

impl TokenKind {
    /// Returns `true` if this is one of the expansion operators.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Self::Dash
                | Self::Equals
                | Self::Plus
                | Self::ColonDash
                | Self::ColonEquals
                | Self::ColonPlus
                | Self::CaretCaret
                | Self::CommaComma
        )
    }

    /// The operator token for a case transform.
    pub fn for_transform(transform: CaseTransform) -> Self {
        match transform {
            CaseTransform::Upper => Self::CaretCaret,
            CaseTransform::Lower => Self::CommaComma,
        }
    }

    /// The text this token stands for when it is passed through literally.
    ///
    /// A `Variable` yields its bare name; `Eof` and `Error` yield nothing.
    pub fn lexeme(&self) -> &str {
        match self {
            Self::Text(s) | Self::Variable(s) => s,
            Self::ExpansionStart => "${",
            Self::ExpansionEnd => "}",
            Self::Dash => "-",
            Self::Equals => "=",
            Self::Plus => "+",
            Self::ColonDash => ":-",
            Self::ColonEquals => ":=",
            Self::ColonPlus => ":+",
            Self::CaretCaret => CaseTransform::Upper.operator(),
            Self::CommaComma => CaseTransform::Lower.operator(),
            Self::Eof | Self::Error(_) => "",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "text {s:?}"),
            Self::Variable(name) => write!(f, "variable {name}"),
            Self::Eof => write!(f, "end of input"),
            Self::Error(msg) => write!(f, "error: {msg}"),
            other => write!(f, "'{}'", other.lexeme()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_lexemes() {
        let ops = [
            (TokenKind::Dash, "-"),
            (TokenKind::Equals, "="),
            (TokenKind::Plus, "+"),
            (TokenKind::ColonDash, ":-"),
            (TokenKind::ColonEquals, ":="),
            (TokenKind::ColonPlus, ":+"),
            (TokenKind::CaretCaret, "^^"),
            (TokenKind::CommaComma, ",,"),
        ];
        for (kind, lexeme) in &ops {
            assert!(kind.is_operator(), "{kind:?}");
            assert_eq!(kind.lexeme(), *lexeme);
        }
    }

    #[test]
    fn test_non_operators() {
        assert!(!TokenKind::ExpansionStart.is_operator());
        assert!(!TokenKind::Text("-".into()).is_operator());
        assert_eq!(TokenKind::ExpansionStart.lexeme(), "${");
        assert_eq!(TokenKind::ExpansionEnd.lexeme(), "}");
    }

    #[test]
    fn test_terminal_tokens() {
        assert!(Token::new(TokenKind::Eof, Span::point(0)).is_terminal());
        assert!(Token::new(TokenKind::Error("x".into()), Span::point(0)).is_terminal());
        assert!(!Token::new(TokenKind::ExpansionEnd, Span::point(0)).is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::ColonDash.to_string(), "':-'");
        assert_eq!(TokenKind::Variable("HOME".into()).to_string(), "variable HOME");
    }
}
