//! Pattern syntax tree and its recursive descent parser.
//!
//! ```text
//! alternation := concat ('|' concat)*
//! concat      := repeat*
//! repeat      := atom ('*' | '+' | '?')*
//! atom        := char | '.' | '\' char | '[' class ']' | '(' alternation ')'
//! class       := '^'? (char ('-' char)?)+
//! ```
//!
//! An empty pattern, or an empty side of `|`, matches the empty string.
//! Stacked repetition operators collapse into one node (`a+?` is `a*`), and
//! groups nest at most [`MAX_NESTING`] deep, so the tree depth stays bounded
//! by the group depth.

use mgc_stack::ensure_sufficient_stack;

use crate::RegexError;

/// Deepest group nesting a pattern may use.
pub const MAX_NESTING: usize = 1_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Matches the empty string.
    Empty,
    Literal(char),
    /// `.`: any single character.
    Any,
    /// `[...]` as inclusive ranges; single characters are `(c, c)`.
    Class {
        ranges: Vec<(char, char)>,
        negated: bool,
    },
    Concat(Vec<Node>),
    /// Two or more alternatives, in source order.
    Alternate(Vec<Node>),
    Star(Box<Node>),
    Plus(Box<Node>),
    Optional(Box<Node>),
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

/// Parse `pattern` into a syntax tree.
pub fn parse(pattern: &str) -> Result<Node, RegexError> {
    let mut parser = Parser {
        chars: pattern.chars().collect(),
        pos: 0,
        depth: 0,
    };
    let node = parser.parse_alternation()?;
    match parser.peek() {
        None => Ok(node),
        Some(_) => Err(RegexError::UnbalancedParen { offset: parser.pos }),
    }
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn parse_alternation(&mut self) -> Result<Node, RegexError> {
        let first = self.parse_concat()?;
        if self.peek() != Some('|') {
            return Ok(first);
        }
        let mut branches = vec![first];
        while self.peek() == Some('|') {
            self.pos += 1;
            branches.push(self.parse_concat()?);
        }
        Ok(Node::Alternate(branches))
    }

    fn parse_concat(&mut self) -> Result<Node, RegexError> {
        let mut items = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            items.push(self.parse_repeat()?);
        }
        Ok(match items.len() {
            0 => Node::Empty,
            1 => items.pop().unwrap_or(Node::Empty),
            _ => Node::Concat(items),
        })
    }

    fn parse_repeat(&mut self) -> Result<Node, RegexError> {
        let node = self.parse_atom()?;
        // (may skip, may loop); stacking operators ORs the two.
        let mut bypass = false;
        let mut looping = false;
        let mut any = false;
        while let Some(op) = self.peek() {
            match op {
                '*' => (bypass, looping) = (true, true),
                '+' => looping = true,
                '?' => bypass = true,
                _ => break,
            }
            any = true;
            self.pos += 1;
        }
        if !any {
            return Ok(node);
        }
        let inner = Box::new(node);
        Ok(match (bypass, looping) {
            (true, true) => Node::Star(inner),
            (false, true) => Node::Plus(inner),
            _ => Node::Optional(inner),
        })
    }

    fn parse_atom(&mut self) -> Result<Node, RegexError> {
        let offset = self.pos;
        let Some(c) = self.bump() else {
            return Ok(Node::Empty);
        };
        match c {
            '(' => {
                if self.depth >= MAX_NESTING {
                    return Err(RegexError::NestingTooDeep {
                        limit: MAX_NESTING,
                        offset,
                    });
                }
                self.depth += 1;
                let inner = ensure_sufficient_stack(|| self.parse_alternation());
                self.depth -= 1;
                let inner = inner?;
                if self.bump() == Some(')') {
                    Ok(inner)
                } else {
                    Err(RegexError::UnbalancedParen { offset })
                }
            }
            '[' => self.parse_class(offset),
            '.' => Ok(Node::Any),
            '\\' => self.parse_escape().map(Node::Literal),
            '*' | '+' | '?' => Err(RegexError::NothingToRepeat { op: c, offset }),
            other => Ok(Node::Literal(other)),
        }
    }

    /// The character after a consumed backslash.
    fn parse_escape(&mut self) -> Result<char, RegexError> {
        match self.bump() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some(c) => Ok(c),
            None => Err(RegexError::TrailingBackslash),
        }
    }

    /// Class body after a consumed `[` at `offset`.
    fn parse_class(&mut self, offset: usize) -> Result<Node, RegexError> {
        let negated = self.peek() == Some('^');
        if negated {
            self.pos += 1;
        }

        let mut ranges = Vec::new();
        loop {
            let c = match self.bump() {
                None => return Err(RegexError::UnterminatedClass { offset }),
                Some(']') if ranges.is_empty() => return Err(RegexError::EmptyClass { offset }),
                Some(']') => break,
                Some('\\') => self.parse_escape()?,
                Some(c) => c,
            };

            let is_range = self.peek() == Some('-')
                && self.chars.get(self.pos + 1).is_some_and(|&n| n != ']');
            if is_range {
                self.pos += 1;
                let end = match self.bump() {
                    Some('\\') => self.parse_escape()?,
                    Some(end) => end,
                    None => return Err(RegexError::UnterminatedClass { offset }),
                };
                if end < c {
                    return Err(RegexError::InvalidRange { start: c, end });
                }
                ranges.push((c, end));
            } else {
                ranges.push((c, c));
            }
        }

        Ok(Node::Class { ranges, negated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lit(c: char) -> Node {
        Node::Literal(c)
    }

    #[test]
    fn empty_pattern() {
        assert_eq!(parse(""), Ok(Node::Empty));
        assert_eq!(
            parse("a|"),
            Ok(Node::Alternate(vec![lit('a'), Node::Empty]))
        );
    }

    #[test]
    fn group_alternation_and_star() {
        assert_eq!(
            parse("a(b|c)*d"),
            Ok(Node::Concat(vec![
                lit('a'),
                Node::Star(Box::new(Node::Alternate(vec![lit('b'), lit('c')]))),
                lit('d'),
            ]))
        );
    }

    #[test]
    fn repetition_binds_to_the_last_atom() {
        assert_eq!(
            parse("ab+"),
            Ok(Node::Concat(vec![lit('a'), Node::Plus(Box::new(lit('b')))]))
        );
    }

    #[test]
    fn stacked_repetitions_collapse() {
        let star = Ok(Node::Star(Box::new(lit('a'))));
        assert_eq!(parse("a?*"), star);
        assert_eq!(parse("a+?"), star);
        assert_eq!(parse("a**"), star);
        assert_eq!(parse("a++"), Ok(Node::Plus(Box::new(lit('a')))));
        assert_eq!(parse("a??"), Ok(Node::Optional(Box::new(lit('a')))));
        assert_eq!(parse(&format!("a{}", "*".repeat(100_000))), star);
    }

    #[test]
    fn alternatives_stay_flat() {
        let Ok(Node::Alternate(branches)) = parse(&"a|".repeat(50_000)) else {
            panic!("expected an alternation");
        };
        assert_eq!(branches.len(), 50_001);
        assert_eq!(branches.last(), Some(&Node::Empty));
    }

    fn nested(depth: usize) -> String {
        format!("{}a{}", "(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn group_nesting_is_capped() {
        assert_eq!(parse(&nested(MAX_NESTING)), Ok(lit('a')));
        assert_eq!(
            parse(&nested(MAX_NESTING + 1)),
            Err(RegexError::NestingTooDeep {
                limit: MAX_NESTING,
                offset: MAX_NESTING
            })
        );
        assert_eq!(
            parse(&nested(200_000)).map(|_| ()),
            Err(RegexError::NestingTooDeep {
                limit: MAX_NESTING,
                offset: MAX_NESTING
            })
        );
    }

    #[test]
    fn classes() {
        assert_eq!(
            parse("[a-c_]"),
            Ok(Node::Class {
                ranges: vec![('a', 'c'), ('_', '_')],
                negated: false
            })
        );
        assert_eq!(
            parse("[^0-9]"),
            Ok(Node::Class {
                ranges: vec![('0', '9')],
                negated: true
            })
        );
        // A trailing `-` is literal.
        assert_eq!(
            parse("[a-]"),
            Ok(Node::Class {
                ranges: vec![('a', 'a'), ('-', '-')],
                negated: false
            })
        );
    }

    #[test]
    fn escapes() {
        assert_eq!(
            parse(r"\.\*\n"),
            Ok(Node::Concat(vec![lit('.'), lit('*'), lit('\n')]))
        );
    }

    #[test]
    fn errors() {
        assert_eq!(parse("(ab"), Err(RegexError::UnbalancedParen { offset: 0 }));
        assert_eq!(parse("ab)"), Err(RegexError::UnbalancedParen { offset: 2 }));
        assert_eq!(parse("[ab"), Err(RegexError::UnterminatedClass { offset: 0 }));
        assert_eq!(parse("x[]"), Err(RegexError::EmptyClass { offset: 1 }));
        assert_eq!(
            parse("[z-a]"),
            Err(RegexError::InvalidRange { start: 'z', end: 'a' })
        );
        assert_eq!(
            parse("*a"),
            Err(RegexError::NothingToRepeat { op: '*', offset: 0 })
        );
        assert_eq!(
            parse("a|+"),
            Err(RegexError::NothingToRepeat { op: '+', offset: 2 })
        );
        assert_eq!(parse("ab\\"), Err(RegexError::TrailingBackslash));
    }
}
