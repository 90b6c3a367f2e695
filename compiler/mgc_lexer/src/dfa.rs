//! Deterministic automaton recognizing every non-string token shape.
//!
//! The table has one row per state and one column per ASCII byte. Rows are
//! built programmatically from [`KEYWORDS`] and [`OPERATORS`]:
//!
//! - one identifier state looping on `[A-Za-z0-9_]`
//! - a keyword trie whose nodes copy the identifier row, so every keyword
//!   prefix (and every extension of a keyword) still accepts as an identifier
//! - integer and fractional number states
//! - an operator trie whose nodes have no other exits

use mgc_ir::{TokenKind, KEYWORDS, OPERATORS};

pub(crate) type StateId = u16;

/// No transition.
pub(crate) const DEAD: StateId = 0;
/// Initial state at every token boundary.
pub(crate) const START: StateId = 1;

const COLUMNS: usize = 128;

type Row = [StateId; COLUMNS];

pub(crate) struct Dfa {
    table: Vec<Row>,
    accept: Vec<Option<TokenKind>>,
}

#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl Dfa {
    pub(crate) fn build() -> Self {
        let mut dfa = Dfa {
            table: vec![[DEAD; COLUMNS]; 2],
            accept: vec![None; 2],
        };

        let ident = dfa.add_state(Some(TokenKind::Ident));
        for b in 0..128u8 {
            if is_ident_continue(b) {
                dfa.table[usize::from(ident)][usize::from(b)] = ident;
            }
            if is_ident_start(b) {
                dfa.table[usize::from(START)][usize::from(b)] = ident;
            }
        }
        let ident_row = dfa.table[usize::from(ident)];

        let int = dfa.add_state(Some(TokenKind::Number));
        let dot = dfa.add_state(None);
        let frac = dfa.add_state(Some(TokenKind::Number));
        for b in b'0'..=b'9' {
            let col = usize::from(b);
            dfa.table[usize::from(START)][col] = int;
            dfa.table[usize::from(int)][col] = int;
            dfa.table[usize::from(dot)][col] = frac;
            dfa.table[usize::from(frac)][col] = frac;
        }
        dfa.table[usize::from(int)][usize::from(b'.')] = dot;

        for &(word, kind) in KEYWORDS {
            let mut state = START;
            for &b in word.as_bytes() {
                let next = dfa.table[usize::from(state)][usize::from(b)];
                state = if next == ident || next == DEAD {
                    let node = dfa.add_state(Some(TokenKind::Ident));
                    dfa.table[usize::from(node)] = ident_row;
                    dfa.table[usize::from(state)][usize::from(b)] = node;
                    node
                } else {
                    next
                };
            }
            dfa.accept[usize::from(state)] = Some(kind);
        }

        for &(spelling, kind) in OPERATORS {
            let mut state = START;
            for &b in spelling.as_bytes() {
                let next = dfa.table[usize::from(state)][usize::from(b)];
                state = if next == DEAD {
                    let node = dfa.add_state(None);
                    dfa.table[usize::from(state)][usize::from(b)] = node;
                    node
                } else {
                    next
                };
            }
            dfa.accept[usize::from(state)] = Some(kind);
        }

        tracing::trace!(states = dfa.table.len(), "lexer automaton built");
        dfa
    }

    fn add_state(&mut self, accept: Option<TokenKind>) -> StateId {
        let id = StateId::try_from(self.table.len()).unwrap_or(StateId::MAX);
        self.table.push([DEAD; COLUMNS]);
        self.accept.push(accept);
        id
    }

    /// Transition on `byte`; non-ASCII bytes always go to [`DEAD`].
    #[inline]
    pub(crate) fn step(&self, state: StateId, byte: u8) -> StateId {
        self.table
            .get(usize::from(state))
            .and_then(|row| row.get(usize::from(byte)))
            .copied()
            .unwrap_or(DEAD)
    }

    #[inline]
    pub(crate) fn accepting(&self, state: StateId) -> Option<TokenKind> {
        self.accept.get(usize::from(state)).copied().flatten()
    }

    #[cfg(test)]
    pub(crate) fn state_count(&self) -> usize {
        self.table.len()
    }
}
