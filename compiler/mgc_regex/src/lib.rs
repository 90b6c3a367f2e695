//! Regular expressions for the `=~` operator.
//!
//! A pattern goes through three stages:
//!
//! 1. [`syntax::parse`] builds a [`Node`] tree (literals, `.`, classes,
//!    concatenation, `|`, `*`, `+`, `?`, groups).
//! 2. [`Compiler`] turns the tree into an [`Nfa`] by Thompson's construction.
//! 3. [`Nfa::is_match`] simulates the automaton over the whole input.
//!
//! Matching is anchored at both ends: `"abc" =~ "b"` is false.

mod error;
mod matcher;
pub mod nfa;
pub mod syntax;

pub use error::RegexError;
pub use nfa::{Compiler, Nfa, DEFAULT_STATE_LIMIT};
pub use syntax::{Node, MAX_NESTING};

/// A compiled pattern.
#[derive(Clone, Debug)]
pub struct Regex {
    pattern: String,
    nfa: Nfa,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self, RegexError> {
        Self::with_state_limit(pattern, DEFAULT_STATE_LIMIT)
    }

    pub fn with_state_limit(pattern: &str, limit: usize) -> Result<Self, RegexError> {
        let node = syntax::parse(pattern)?;
        let nfa = Compiler::with_state_limit(limit).compile(&node)?;
        tracing::debug!(pattern, states = nfa.state_count(), "regex compiled");
        Ok(Regex {
            pattern: pattern.to_string(),
            nfa,
        })
    }

    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.nfa.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn errors_surface_from_new() {
        assert_eq!(
            Regex::new("a(").map(|r| r.as_str().len()),
            Err(RegexError::UnbalancedParen { offset: 1 })
        );
        assert_eq!(
            Regex::with_state_limit("abc", 4).map(|r| r.nfa().state_count()),
            Err(RegexError::TooManyStates { limit: 4 })
        );
    }

    /// Escape every character so the pattern is a plain literal.
    fn escape(text: &str) -> String {
        text.chars().flat_map(|c| ['\\', c]).collect()
    }

    /// Reference backtracking matcher for `[ab]`-alphabet patterns built from
    /// literals and postfix `*`.
    fn reference(pattern: &[(char, bool)], text: &[char]) -> bool {
        match pattern.split_first() {
            None => text.is_empty(),
            Some((&(c, true), rest)) => {
                reference(rest, text)
                    || (text.first() == Some(&c) && reference(pattern, &text[1..]))
            }
            Some((&(c, false), rest)) => {
                text.first() == Some(&c) && reference(rest, &text[1..])
            }
        }
    }

    proptest! {
        #[test]
        fn literal_patterns_match_exactly_themselves(text in "[ -~]{0,16}", other in "[ -~]{0,16}") {
            let re = Regex::new(&escape(&text));
            prop_assert!(re.is_ok());
            let re = re.unwrap_or_else(|e| panic!("{e}"));
            prop_assert!(re.is_match(&text));
            prop_assert_eq!(re.is_match(&other), other == text);
        }

        #[test]
        fn agrees_with_backtracking(
            atoms in proptest::collection::vec((prop_oneof![Just('a'), Just('b')], any::<bool>()), 0..6),
            text in "[ab]{0,8}",
        ) {
            let pattern: String = atoms
                .iter()
                .map(|&(c, star)| if star { format!("{c}*") } else { c.to_string() })
                .collect();
            let chars: Vec<char> = text.chars().collect();
            let re = Regex::new(&pattern).unwrap_or_else(|e| panic!("{e}"));
            prop_assert_eq!(re.is_match(&text), reference(&atoms, &chars));
        }
    }
}
