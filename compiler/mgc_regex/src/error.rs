/// Errors from parsing or compiling a pattern. Offsets count characters.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegexError {
    #[error("unbalanced parenthesis at offset {offset}")]
    UnbalancedParen { offset: usize },

    #[error("unterminated character class starting at offset {offset}")]
    UnterminatedClass { offset: usize },

    #[error("empty character class at offset {offset}")]
    EmptyClass { offset: usize },

    #[error("invalid class range `{start}-{end}`")]
    InvalidRange { start: char, end: char },

    #[error("repetition operator `{op}` at offset {offset} has nothing to repeat")]
    NothingToRepeat { op: char, offset: usize },

    #[error("pattern ends with a bare backslash")]
    TrailingBackslash,

    #[error("groups nested more than {limit} deep at offset {offset}")]
    NestingTooDeep { limit: usize, offset: usize },

    #[error("pattern needs more than {limit} automaton states")]
    TooManyStates { limit: usize },
}
