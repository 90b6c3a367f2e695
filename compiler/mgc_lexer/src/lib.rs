//! Tokenizer for mgc source text.
//!
//! Tokens are recognized by a table-driven automaton ([`dfa`]) using maximal
//! munch: the automaton runs as far as it can, remembering the last position
//! at which it was in an accepting state, and the token ends there. So `==`
//! is one token and `===` is `==` followed by a skipped `=`.
//!
//! Three shapes bypass the automaton:
//!
//! - whitespace (space, tab, CR, LF) and `//` line comments are trivia
//! - string literals are scanned up to the first unescaped `"`; the token
//!   text keeps both quotes, and an unterminated string runs to end of input
//! - a position where no accepting state is ever reached is skipped one
//!   character at a time without reporting an error

mod dfa;

use mgc_ir::{Span, Token, TokenKind, TokenList};

use crate::dfa::{Dfa, DEAD, START};

/// Reusable tokenizer. Building the automaton is the only setup cost.
pub struct Lexer {
    dfa: Dfa,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Lexer { dfa: Dfa::build() }
    }

    /// Tokenize `source`. The result always ends with an `Eof` token.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn tokenize(&self, source: &str) -> TokenList {
        let bytes = source.as_bytes();
        let mut tokens = TokenList::new();
        let mut pos = 0;

        while pos < bytes.len() {
            let b = bytes[pos];
            if matches!(b, b' ' | b'\t' | b'\r' | b'\n') {
                pos += 1;
                continue;
            }
            if b == b'/' && bytes.get(pos + 1) == Some(&b'/') {
                pos = memchr::memchr(b'\n', &bytes[pos..]).map_or(bytes.len(), |nl| pos + nl);
                continue;
            }
            if b == b'"' {
                let end = scan_string(bytes, pos);
                tokens.push(make_token(source, TokenKind::String, pos, end));
                pos = end;
                continue;
            }

            match self.longest_match(bytes, pos) {
                Some((kind, end)) => {
                    tokens.push(make_token(source, kind, pos, end));
                    pos = end;
                }
                None => {
                    let width = source[pos..].chars().next().map_or(1, char::len_utf8);
                    tracing::debug!(
                        offset = pos,
                        text = &source[pos..pos + width],
                        "skipping unrecognized character"
                    );
                    pos += width;
                }
            }
        }

        tokens.push(Token::new(
            TokenKind::Eof,
            "",
            Span::from_range(bytes.len()..bytes.len()),
        ));
        tokens
    }

    /// Run the automaton from `start`; return the last accepting kind and its end.
    fn longest_match(&self, bytes: &[u8], start: usize) -> Option<(TokenKind, usize)> {
        let mut state = START;
        let mut last_accept = None;

        for (offset, &b) in bytes[start..].iter().enumerate() {
            state = self.dfa.step(state, b);
            if state == DEAD {
                break;
            }
            if let Some(kind) = self.dfa.accepting(state) {
                last_accept = Some((kind, start + offset + 1));
            }
        }

        last_accept
    }
}

fn make_token(source: &str, kind: TokenKind, start: usize, end: usize) -> Token {
    let token = Token::new(kind, &source[start..end], Span::from_range(start..end));
    tracing::trace!(?token, "lexed");
    token
}

/// End offset (exclusive) of the string literal whose opening quote is at `start`.
///
/// A quote preceded by an odd number of backslashes is escaped.
fn scan_string(bytes: &[u8], start: usize) -> usize {
    let mut from = start + 1;
    while let Some(found) = memchr::memchr(b'"', &bytes[from..]) {
        let quote = from + found;
        let backslashes = bytes[from..quote]
            .iter()
            .rev()
            .take_while(|&&c| c == b'\\')
            .count();
        if backslashes % 2 == 0 {
            return quote + 1;
        }
        from = quote + 1;
    }
    bytes.len()
}

/// Tokenize `source` with a freshly built [`Lexer`].
pub fn tokenize(source: &str) -> TokenList {
    Lexer::new().tokenize(source)
}
