//! Template lexer: a pull-based state machine over the input text.
//!
//! Features:
//! - `$NAME` and `${...}` references, with nesting tracked by depth
//! - `$$` escapes to a literal `$`
//! - Operators recognised only at the head of an expansion or right after
//!   a reference inside one: `-` `=` `+` `:-` `:=` `:+` and the case transforms
//! - Digit-led names and names rejected by the filter pass through as text
//! - An unterminated expansion ends the stream with an error token
//!
//! Tokens are computed on demand, one per [`Lexer::next_token`] call; nothing
//! is buffered ahead of the consumer.

use envsubst_types::{NameFilter, Restrictions, Span, CASE_TRANSFORMS, CLOSING_BRACE_EXPECTED};

use crate::token::{Token, TokenKind};

/// Lexer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Outside any expansion.
    Text,
    /// At the head of an expansion (`after_start`) or right after a
    /// reference inside one; an operator may follow.
    ExpansionOperator { after_start: bool },
    /// Default/alternate text inside an expansion.
    ExpansionBody,
}

/// The template lexer.
///
/// Implements [`Iterator`]: the stream ends after the first `Eof` or
/// `Error` token and cannot be restarted.
pub struct Lexer<'src> {
    /// The full template text.
    source: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    /// Start of the pending (not yet emitted) window.
    start: usize,
    /// Number of open `${`.
    depth: u32,
    mode: Mode,
    /// Treat digit-led names as literal text.
    no_digit: bool,
    name_filter: Option<&'src NameFilter>,
    /// Set once a terminal token has been handed out.
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Create a lexer over `source`.
    pub fn new(source: &'src str, no_digit: bool, name_filter: Option<&'src NameFilter>) -> Self {
        Self {
            source,
            pos: 0,
            start: 0,
            depth: 0,
            mode: Mode::Text,
            no_digit,
            name_filter,
            finished: false,
        }
    }

    /// Create a lexer configured from a restriction policy.
    pub fn with_restrictions(source: &'src str, restrictions: &'src Restrictions) -> Self {
        Self::new(
            source,
            restrictions.no_digit,
            restrictions.name_filter.as_ref(),
        )
    }

    /// Current expansion nesting depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Produce the next token, or `None` once the stream has terminated.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        let token = match self.mode {
            Mode::Text => self.scan_text(),
            Mode::ExpansionOperator { after_start } => self.scan_operator(after_start),
            Mode::ExpansionBody => self.scan_body(),
        };

        if token.is_terminal() {
            self.finished = true;
        }
        tracing::trace!(kind = %token.kind, offset = token.span.start, "token");
        Some(token)
    }

    /// Drain the whole stream into a vector.
    pub fn tokenize(self) -> Vec<Token> {
        self.collect()
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn has_pending(&self) -> bool {
        self.pos > self.start
    }

    /// Emit the pending window as a token of `kind`.
    fn emit(&mut self, kind: TokenKind) -> Token {
        let token = Token::new(kind, Span::new(self.start, self.pos));
        self.start = self.pos;
        token
    }

    /// Emit the pending window verbatim as text.
    fn emit_text(&mut self) -> Token {
        let text = self.source[self.start..self.pos].to_string();
        self.emit(TokenKind::Text(text))
    }

    fn unterminated(&mut self) -> Token {
        Token::new(
            TokenKind::Error(CLOSING_BRACE_EXPECTED.to_string()),
            Span::point(self.pos),
        )
    }

    // ─────────────────────────────────────────────────────────────
    // Top-level text
    // ─────────────────────────────────────────────────────────────

    fn scan_text(&mut self) -> Token {
        loop {
            match self.peek() {
                None => {
                    if self.has_pending() {
                        return self.emit_text();
                    }
                    return Token::new(TokenKind::Eof, Span::point(self.pos));
                }
                Some('$') => {
                    // Flush text first; the `$` is looked at on the next call.
                    if self.has_pending() {
                        return self.emit_text();
                    }
                    if let Some(token) = self.scan_dollar() {
                        return token;
                    }
                    // A lone `$` is ordinary text.
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Handle a `$` at the start of the pending window.
    ///
    /// Returns `None`, without consuming anything, when the `$` does not
    /// start an escape, an expansion, or a reference.
    fn scan_dollar(&mut self) -> Option<Token> {
        match self.peek_at(1)? {
            '$' => {
                self.advance();
                self.advance();
                Some(self.emit(TokenKind::Text("$".to_string())))
            }
            '{' => Some(self.scan_expansion_start()),
            c if is_name_char(c) => {
                self.advance();
                Some(self.scan_name())
            }
            _ => None,
        }
    }

    fn scan_expansion_start(&mut self) -> Token {
        self.advance(); // '$'
        self.advance(); // '{'
        if self.no_digit && self.peek().is_some_and(is_digit) {
            // `${1` stays literal and opens nothing.
            self.advance();
            return self.emit_text();
        }
        self.depth += 1;
        self.mode = Mode::ExpansionOperator { after_start: true };
        self.emit(TokenKind::ExpansionStart)
    }

    /// Scan the maximal name run and classify it as a reference or text.
    ///
    /// Any sigil already consumed stays part of the emitted text.
    fn scan_name(&mut self) -> Token {
        let source = self.source;
        let name_start = self.pos;
        while self.peek().is_some_and(is_name_char) {
            self.advance();
        }
        let name = &source[name_start..self.pos];

        if self.depth > 0 {
            self.mode = Mode::ExpansionOperator { after_start: false };
        }
        if self.accepts(name) {
            self.emit(TokenKind::Variable(name.to_string()))
        } else {
            self.emit_text()
        }
    }

    fn accepts(&self, name: &str) -> bool {
        if name == "_" {
            return false;
        }
        if self.no_digit && name.starts_with(is_digit) {
            return false;
        }
        self.name_filter.is_none_or(|filter| filter(name))
    }

    // ─────────────────────────────────────────────────────────────
    // Inside `${ ... }`
    // ─────────────────────────────────────────────────────────────

    fn scan_operator(&mut self, after_start: bool) -> Token {
        self.mode = Mode::ExpansionBody;
        let Some(ch) = self.peek() else {
            return self.unterminated();
        };

        match ch {
            '\n' | '\r' => self.unterminated(),
            '}' => self.close_expansion(),
            c if after_start && is_name_char(c) => self.scan_name(),
            '-' => self.operator(1, TokenKind::Dash),
            '=' => self.operator(1, TokenKind::Equals),
            '+' => self.operator(1, TokenKind::Plus),
            ':' => match self.peek_at(1) {
                Some('-') => self.operator(2, TokenKind::ColonDash),
                Some('=') => self.operator(2, TokenKind::ColonEquals),
                Some('+') => self.operator(2, TokenKind::ColonPlus),
                _ => self.scan_body(),
            },
            _ => {
                let rest = &self.source[self.pos..];
                match CASE_TRANSFORMS.iter().find(|t| rest.starts_with(t.operator())) {
                    Some(&t) => self.operator(t.operator().chars().count(), TokenKind::for_transform(t)),
                    None => self.scan_body(),
                }
            }
        }
    }

    fn operator(&mut self, width: usize, kind: TokenKind) -> Token {
        for _ in 0..width {
            self.advance();
        }
        self.emit(kind)
    }

    fn scan_body(&mut self) -> Token {
        match self.peek() {
            None | Some('\n' | '\r') => self.unterminated(),
            Some('}') => self.close_expansion(),
            Some('$') => match self.scan_dollar() {
                Some(token) => token,
                None => {
                    self.advance();
                    self.emit_text()
                }
            },
            Some(_) => {
                while let Some(ch) = self.peek() {
                    if matches!(ch, '}' | '$' | '\n' | '\r') {
                        break;
                    }
                    self.advance();
                }
                self.emit_text()
            }
        }
    }

    fn close_expansion(&mut self) -> Token {
        self.advance(); // '}'
        self.depth = self.depth.saturating_sub(1);
        self.mode = if self.depth > 0 {
            Mode::ExpansionBody
        } else {
            Mode::Text
        };
        self.emit(TokenKind::ExpansionEnd)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Letters, digits and underscore.
fn is_name_char(c: char) -> bool {
    c == '_' || c.is_alphabetic() || is_digit(c)
}

/// Any Unicode digit, not just ASCII; `no_digit` and name scanning agree on it.
fn is_digit(c: char) -> bool {
    c.is_numeric()
}
