//! Recursive descent parser for mgc.
//!
//! Statements are dispatched on their leading keyword with one token of
//! lookahead. Expressions use precedence climbing (see [`grammar::expr`]).
//!
//! A statement that fails to parse is recorded as a [`ParseError`] and
//! skipped up to the next `;` (or the end of its braces), so one run reports
//! every independent syntax error. An [`Ast`] whose [`ParseResult`] carries
//! errors is incomplete; callers must not resolve or evaluate it.

mod cursor;
mod error;
mod grammar;

use mgc_ir::{Ast, Span, Token, TokenKind, TokenList};

pub use cursor::Cursor;
pub use error::ParseError;

pub(crate) type PResult<T> = Result<T, ParseError>;

/// Output of [`parse`].
#[derive(Debug)]
pub struct ParseResult {
    pub ast: Ast,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parser state: a cursor over the tokens and the errors collected so far.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with an `Eof` token, as produced by the lexer.
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            errors: Vec::new(),
        }
    }

    /// Parse statements until end of input.
    pub fn parse_program(mut self) -> ParseResult {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let start = self.cursor.position();
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(error) => {
                    tracing::debug!(%error, "parse error; recovering");
                    self.errors.push(error);
                    self.recover(start);
                }
            }
        }

        ParseResult {
            ast: Ast { statements },
            errors: self.errors,
        }
    }

    /// Skip the failed statement that began at `start`.
    ///
    /// Rewinds to the statement start and consumes tokens until a `;` at
    /// brace depth zero, or the `}` that closes the outermost brace opened by
    /// the statement. Always consumes at least one token.
    fn recover(&mut self, start: usize) {
        self.cursor.set_position(start);
        let mut depth = 0usize;
        loop {
            match self.cursor.advance().kind {
                TokenKind::Eof => return,
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 && !self.check(TokenKind::Else) {
                        self.eat(TokenKind::Semi);
                        return;
                    }
                }
                TokenKind::Semi if depth == 0 => return,
                _ => {}
            }
        }
    }

    // Cursor delegation

    #[inline]
    pub(crate) fn current(&self) -> &'a Token {
        self.cursor.current()
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    pub(crate) fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    pub(crate) fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    pub(crate) fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    pub(crate) fn advance(&mut self) -> &'a Token {
        self.cursor.advance()
    }

    /// Consume the current token if it has `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of `kind` or fail with a positioned error.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<&'a Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected_token(kind, self.current()))
        }
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    pub(crate) fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous_span())
    }
}

/// Parse a token list into a syntax tree.
///
/// A list that does not end with `Eof` is treated as if it did.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &TokenList) -> ParseResult {
    let slice = tokens.as_slice();
    if slice.last().is_some_and(|t| t.is(TokenKind::Eof)) {
        return Parser::new(slice).parse_program();
    }

    let end = slice.last().map_or(0, |t| t.span.end);
    let mut terminated = slice.to_vec();
    terminated.push(Token::new(TokenKind::Eof, "", Span::new(end, end)));
    Parser::new(&terminated).parse_program()
}
