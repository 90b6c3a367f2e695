//! Parse errors.

use mgc_diagnostic::{Diagnostic, ErrorCode};
use mgc_ir::{Span, Token, TokenKind};

/// A syntax error: what was expected, what was found, and where.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {found}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub expected: String,
    pub found: String,
    pub span: Span,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, expected: impl Into<String>, found: &Token) -> Self {
        ParseError {
            code,
            expected: expected.into(),
            found: describe(found),
            span: found.span,
        }
    }

    /// An expected token that is missing.
    ///
    /// Running into end of input while looking for a closing delimiter is
    /// reported as an unclosed delimiter rather than a plain mismatch.
    #[cold]
    pub fn expected_token(kind: TokenKind, found: &Token) -> Self {
        let closing = matches!(
            kind,
            TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket
        );
        let code = match kind {
            TokenKind::Ident => ErrorCode::E1004,
            _ if closing && found.is(TokenKind::Eof) => ErrorCode::E1003,
            _ => ErrorCode::E1001,
        };
        let expected = match kind {
            TokenKind::Ident => "identifier".to_string(),
            other => format!("`{other}`"),
        };
        Self::new(code, expected, found)
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code)
            .with_message(self.to_string())
            .with_label(self.span, format!("expected {}", self.expected))
    }
}

/// Describe a token for an error message: ``identifier `foo` ``, `` `;` ``, ...
pub(crate) fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Ident => format!("identifier `{}`", token.text),
        TokenKind::Number => format!("number `{}`", token.text),
        TokenKind::String => format!("string {}", token.text),
        _ => format!("`{}`", token.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_close_paren_at_eof_is_unclosed() {
        let eof = Token::new(TokenKind::Eof, "", Span::new(5, 5));
        let err = ParseError::expected_token(TokenKind::RParen, &eof);
        assert_eq!(err.code, ErrorCode::E1003);
        assert_eq!(err.to_string(), "expected `)`, found end of input");
    }

    #[test]
    fn missing_identifier() {
        let semi = Token::new(TokenKind::Semi, ";", Span::new(4, 5));
        let err = ParseError::expected_token(TokenKind::Ident, &semi);
        assert_eq!(err.code, ErrorCode::E1004);
        assert_eq!(err.to_string(), "expected identifier, found `;`");

        let diag = err.to_diagnostic();
        assert_eq!(diag.primary_span(), Some(Span::new(4, 5)));
    }
}
