//! Literal token decoding.

use mgc_ir::{Token, TokenKind};

use crate::errors::EvalErrorKind;
use crate::Value;

pub fn literal_value(token: &Token) -> Result<Value, EvalErrorKind> {
    match token.kind {
        TokenKind::Number => token
            .text
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| EvalErrorKind::InvalidLiteral {
                text: token.text.to_string(),
            }),
        TokenKind::String => Ok(Value::string(decode_string(&token.text))),
        TokenKind::True => Ok(Value::Bool(true)),
        TokenKind::False => Ok(Value::Bool(false)),
        TokenKind::Nil => Ok(Value::Nil),
        _ => Err(EvalErrorKind::InvalidLiteral {
            text: token.text.to_string(),
        }),
    }
}

/// Strip the quotes from a string token and resolve `\"`, `\\`, `\n` and
/// `\t`. Other backslash pairs are kept as written, so a pattern literal like
/// `"a\.b"` reaches the regex engine intact.
///
/// An unterminated literal has no closing quote to strip.
pub fn decode_string(text: &str) -> String {
    let body = text.strip_prefix('"').unwrap_or(text);
    let body = if body.ends_with('"') && !ends_with_escape(body) {
        &body[..body.len() - 1]
    } else {
        body
    };

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Whether the final `"` of `body` is escaped by an odd run of backslashes.
fn ends_with_escape(body: &str) -> bool {
    let before = &body[..body.len() - 1];
    before.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgc_ir::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_quotes_and_unescapes() {
        assert_eq!(decode_string(r#""hello""#), "hello");
        assert_eq!(decode_string(r#""say \"hi\"""#), r#"say "hi""#);
        assert_eq!(decode_string(r#""a\\b""#), r"a\b");
        assert_eq!(decode_string(r#""x\ty\n""#), "x\ty\n");
    }

    #[test]
    fn unknown_escapes_survive() {
        assert_eq!(decode_string(r#""a\.b""#), r"a\.b");
        assert_eq!(decode_string(r#""\(\)""#), r"\(\)");
    }

    #[test]
    fn unterminated_literal() {
        assert_eq!(decode_string(r#""abc"#), "abc");
        assert_eq!(decode_string(r#""abc\""#), r#"abc""#);
        assert_eq!(decode_string(r#"""#), "");
    }

    #[test]
    fn number_literals() {
        let token = Token::new(TokenKind::Number, "2.50", Span::new(0, 4));
        assert_eq!(literal_value(&token), Ok(Value::Number(2.5)));
        let token = Token::new(TokenKind::Nil, "nil", Span::new(0, 3));
        assert_eq!(literal_value(&token), Ok(Value::Nil));
    }
}
