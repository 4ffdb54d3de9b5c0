//! Recursive-descent parser over the lexer's token stream.

use std::collections::VecDeque;

use envsubst_eval::{Context, Node, Operator, SubstitutionNode, VariableNode};
use envsubst_lexer::{Lexer, Token, TokenKind};
use envsubst_types::{CaseTransform, Span, SubstError, SubstResult, CLOSING_BRACE_EXPECTED};

/// Maximum number of tokens held for lookahead.
const LOOKAHEAD: usize = 3;

/// The template parser.
///
/// Pulls tokens one at a time from any token iterator and builds the node
/// tree left to right. Nested expansions inside a default are rendered
/// while parsing, so the parser needs the render [`Context`] up front.
pub struct Parser<'a, I> {
    /// Token source.
    tokens: I,
    /// Tokens pulled but not yet consumed.
    lookahead: VecDeque<Token>,
    ctx: Context<'a>,
    /// First failure of a nested expansion inside the expansion being parsed.
    failure: Option<SubstError>,
}

/// Lex and parse `source` in one step.
pub fn parse(source: &str, ctx: Context<'_>) -> SubstResult<Vec<Node>> {
    let lexer = Lexer::with_restrictions(source, ctx.restrictions);
    Parser::new(lexer, ctx).parse()
}

impl<'a, I> Parser<'a, I>
where
    I: Iterator<Item = Token>,
{
    /// Create a parser over a token stream.
    pub fn new(tokens: I, ctx: Context<'a>) -> Self {
        Self {
            tokens,
            lookahead: VecDeque::with_capacity(LOOKAHEAD),
            ctx,
            failure: None,
        }
    }

    /// Parse the whole stream into nodes.
    ///
    /// Stops at the first scan error; the token source is dropped with
    /// whatever it had not yet produced. A nested expansion that fails to
    /// render only turns its enclosing expansion into [`Node::Failed`].
    pub fn parse(mut self) -> SubstResult<Vec<Node>> {
        let mut nodes = Vec::new();
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Error(message) => {
                    return Err(SubstError::scan(message, token.span.start));
                }
                TokenKind::Variable(name) => nodes.push(Node::variable(name)),
                TokenKind::ExpansionStart => match self.take_variable() {
                    Some(name) => nodes.push(self.parse_substitution(name)?),
                    // `${` not followed by a reference, e.g. a filtered name.
                    None => nodes.push(Node::text(TokenKind::ExpansionStart.lexeme())),
                },
                other => nodes.push(Node::text(other.lexeme())),
            }
        }
        Ok(nodes)
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Make sure at least `n` tokens are buffered, unless the source is exhausted.
    fn fill(&mut self, n: usize) {
        debug_assert!(n <= LOOKAHEAD);
        while self.lookahead.len() < n {
            match self.tokens.next() {
                Some(token) => self.lookahead.push_back(token),
                None => break,
            }
        }
    }

    /// Kind of the token `n` positions ahead; `Eof` past the end of the stream.
    fn peek_kind(&mut self, n: usize) -> &TokenKind {
        self.fill(n + 1);
        self.lookahead
            .get(n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    /// Consume and return the current token.
    fn advance(&mut self) -> Token {
        self.fill(1);
        self.lookahead
            .pop_front()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, Span::default()))
    }

    /// If the current token is a reference, consume it and return its name.
    fn take_variable(&mut self) -> Option<String> {
        if !matches!(self.peek_kind(0), TokenKind::Variable(_)) {
            return None;
        }
        match self.advance().kind {
            TokenKind::Variable(name) => Some(name),
            _ => None,
        }
    }

    fn at_default_end(&mut self) -> bool {
        matches!(
            self.peek_kind(0),
            TokenKind::ExpansionEnd | TokenKind::Error(_) | TokenKind::Eof
        )
    }

    // ── Substitutions ─────────────────────────────────────────────────────────

    /// Parse the rest of `${NAME ...}` after the name.
    fn parse_substitution(&mut self, name: String) -> SubstResult<Node> {
        let enclosing = self.failure.take();
        let node = self.parse_substitution_body(name);
        let failure = std::mem::replace(&mut self.failure, enclosing);
        match failure {
            Some(err) => node.map(|_| Node::Failed(err)),
            None => node,
        }
    }

    fn parse_substitution_body(&mut self, name: String) -> SubstResult<Node> {
        let mut operator = None;
        let mut default = None;

        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::ExpansionEnd => break,
                TokenKind::Eof => {
                    return Err(SubstError::scan(CLOSING_BRACE_EXPECTED, token.span.start));
                }
                TokenKind::Error(message) => {
                    return Err(SubstError::scan(message, token.span.start));
                }
                // A default that is exactly one reference keeps its own restrictions.
                TokenKind::Variable(var) if self.at_default_end() => {
                    default = Some(Node::variable(var));
                }
                kind if kind.is_operator() => operator = operator_for(&kind),
                kind => default = Some(Node::text(self.parse_default_text(kind)?)),
            }
        }

        Ok(Node::Substitution(SubstitutionNode::new(
            VariableNode::new(name),
            operator,
            default,
        )))
    }

    /// Accumulate a default/alternate run into one string, resolving
    /// nested expansions and references in place.
    fn parse_default_text(&mut self, first: TokenKind) -> SubstResult<String> {
        let mut text = String::new();
        self.append_piece(&mut text, first)?;
        while !self.at_default_end() {
            let token = self.advance();
            self.append_piece(&mut text, token.kind)?;
        }
        Ok(text)
    }

    fn append_piece(&mut self, text: &mut String, kind: TokenKind) -> SubstResult<()> {
        match kind {
            // Embedded references: value if set, original text otherwise.
            TokenKind::Variable(name) => match self.ctx.env.lookup(&name) {
                Some(value) => text.push_str(value),
                None => {
                    text.push('$');
                    text.push_str(&name);
                }
            },
            TokenKind::ExpansionStart => match self.take_variable() {
                Some(name) => {
                    let nested = self.parse_substitution(name)?;
                    match nested.render(&self.ctx) {
                        Ok(value) => {
                            tracing::debug!(value = %value, "resolved nested expansion");
                            text.push_str(&value);
                        }
                        Err(err) => {
                            tracing::debug!(%err, "nested expansion failed");
                            self.failure.get_or_insert(err);
                        }
                    }
                }
                None => text.push_str(TokenKind::ExpansionStart.lexeme()),
            },
            other => text.push_str(other.lexeme()),
        }
        Ok(())
    }
}

fn operator_for(kind: &TokenKind) -> Option<Operator> {
    let op = match kind {
        TokenKind::Dash => Operator::Dash,
        TokenKind::Equals => Operator::Equals,
        TokenKind::Plus => Operator::Plus,
        TokenKind::ColonDash => Operator::ColonDash,
        TokenKind::ColonEquals => Operator::ColonEquals,
        TokenKind::ColonPlus => Operator::ColonPlus,
        TokenKind::CaretCaret => Operator::Case(CaseTransform::Upper),
        TokenKind::CommaComma => Operator::Case(CaseTransform::Lower),
        _ => return None,
    };
    Some(op)
}
