//! Thompson construction.
//!
//! Every fragment has one start and one accept state. Fragments are wired
//! together with epsilon transitions and never shrink: the arena is
//! append-only and belongs to a single compiled pattern.

use mgc_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use crate::syntax::Node;
use crate::RegexError;

/// Default cap on states per pattern.
pub const DEFAULT_STATE_LIMIT: usize = 1 << 16;

/// Index of a state in its automaton's arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct StateId(u32);

impl StateId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Label {
    Epsilon,
    Char(char),
    /// `.`
    Any,
}

impl Label {
    #[inline]
    pub fn accepts(self, c: char) -> bool {
        match self {
            Label::Epsilon => false,
            Label::Char(expected) => expected == c,
            Label::Any => true,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Transition {
    pub label: Label,
    pub target: StateId,
}

#[derive(Clone, Debug, Default)]
pub struct State {
    pub transitions: SmallVec<[Transition; 2]>,
}

/// A compiled automaton with designated start and accept states.
#[derive(Clone, Debug)]
pub struct Nfa {
    pub(crate) states: Vec<State>,
    pub(crate) start: StateId,
    pub(crate) accept: StateId,
}

impl Nfa {
    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.index())
    }
}

#[derive(Copy, Clone)]
struct Fragment {
    start: StateId,
    accept: StateId,
}

/// Builds an [`Nfa`] from a syntax tree.
pub struct Compiler {
    states: Vec<State>,
    limit: usize,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self::with_state_limit(DEFAULT_STATE_LIMIT)
    }

    pub fn with_state_limit(limit: usize) -> Self {
        Compiler {
            states: Vec::new(),
            limit,
        }
    }

    pub fn compile(mut self, node: &Node) -> Result<Nfa, RegexError> {
        let fragment = self.fragment(node)?;
        tracing::trace!(states = self.states.len(), "compiled pattern");
        Ok(Nfa {
            states: self.states,
            start: fragment.start,
            accept: fragment.accept,
        })
    }

    fn new_state(&mut self) -> Result<StateId, RegexError> {
        let too_many = RegexError::TooManyStates { limit: self.limit };
        if self.states.len() >= self.limit {
            return Err(too_many);
        }
        let id = u32::try_from(self.states.len()).map_err(|_| too_many)?;
        self.states.push(State::default());
        Ok(StateId(id))
    }

    fn connect(&mut self, from: StateId, label: Label, to: StateId) {
        if let Some(state) = self.states.get_mut(from.index()) {
            state.transitions.push(Transition { label, target: to });
        }
    }

    fn pair(&mut self) -> Result<Fragment, RegexError> {
        Ok(Fragment {
            start: self.new_state()?,
            accept: self.new_state()?,
        })
    }

    fn fragment(&mut self, node: &Node) -> Result<Fragment, RegexError> {
        ensure_sufficient_stack(|| self.fragment_inner(node))
    }

    fn fragment_inner(&mut self, node: &Node) -> Result<Fragment, RegexError> {
        match node {
            Node::Empty => {
                let f = self.pair()?;
                self.connect(f.start, Label::Epsilon, f.accept);
                Ok(f)
            }
            Node::Literal(c) => {
                let f = self.pair()?;
                self.connect(f.start, Label::Char(*c), f.accept);
                Ok(f)
            }
            Node::Any => {
                let f = self.pair()?;
                self.connect(f.start, Label::Any, f.accept);
                Ok(f)
            }
            Node::Class { ranges, negated } => {
                let f = self.pair()?;
                if *negated {
                    // Complement over printable ASCII.
                    for c in ' '..='~' {
                        if !ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(&c)) {
                            self.connect(f.start, Label::Char(c), f.accept);
                        }
                    }
                } else {
                    for &(lo, hi) in ranges {
                        for c in lo..=hi {
                            self.connect(f.start, Label::Char(c), f.accept);
                        }
                    }
                }
                Ok(f)
            }
            Node::Concat(items) => {
                let mut iter = items.iter();
                let Some(first) = iter.next() else {
                    return self.fragment(&Node::Empty);
                };
                let mut whole = self.fragment(first)?;
                for item in iter {
                    let next = self.fragment(item)?;
                    self.connect(whole.accept, Label::Epsilon, next.start);
                    whole.accept = next.accept;
                }
                Ok(whole)
            }
            Node::Alternate(branches) => {
                let f = self.pair()?;
                for branch in branches {
                    let b = self.fragment(branch)?;
                    self.connect(f.start, Label::Epsilon, b.start);
                    self.connect(b.accept, Label::Epsilon, f.accept);
                }
                Ok(f)
            }
            Node::Star(inner) => self.repeat(inner, true, true),
            Node::Plus(inner) => self.repeat(inner, false, true),
            Node::Optional(inner) => self.repeat(inner, true, false),
        }
    }

    /// Wrap `inner` with an optional bypass (`*`, `?`) and loop (`*`, `+`).
    fn repeat(&mut self, inner: &Node, bypass: bool, looping: bool) -> Result<Fragment, RegexError> {
        let m = self.fragment(inner)?;
        let f = self.pair()?;
        self.connect(f.start, Label::Epsilon, m.start);
        if bypass {
            self.connect(f.start, Label::Epsilon, f.accept);
        }
        if looping {
            self.connect(m.accept, Label::Epsilon, m.start);
        }
        self.connect(m.accept, Label::Epsilon, f.accept);
        Ok(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    fn compile(pattern: &str) -> Nfa {
        let node = parse(pattern).unwrap_or(Node::Empty);
        Compiler::new().compile(&node).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn literal_is_two_states() {
        let nfa = compile("a");
        assert_eq!(nfa.state_count(), 2);
        let start = nfa.state(nfa.start()).map(|s| s.transitions.to_vec());
        assert_eq!(
            start,
            Some(vec![Transition {
                label: Label::Char('a'),
                target: nfa.accept()
            }])
        );
    }

    #[test]
    fn accept_state_has_no_exits() {
        for pattern in ["a(b|c)*d", "x+y?", "[a-z]*", ""] {
            let nfa = compile(pattern);
            let accept = nfa.state(nfa.accept());
            assert!(accept.is_some_and(|s| s.transitions.is_empty()), "{pattern}");
        }
    }

    #[test]
    fn negated_class_complements_printable_ascii() {
        let nfa = compile("[^a-z]");
        let fan = nfa.state(nfa.start()).map_or(0, |s| s.transitions.len());
        assert_eq!(fan, 95 - 26);
    }

    #[test]
    fn deeply_nested_groups_compile() {
        let depth = crate::MAX_NESTING;
        let pattern = format!("{}a{}", "(".repeat(depth), ")*".repeat(depth));
        let nfa = compile(&pattern);
        assert_eq!(nfa.state_count(), 2 + 2 * depth);
        assert!(nfa.is_match(""));
        assert!(nfa.is_match("aaa"));
    }

    #[test]
    fn state_limit_is_enforced() {
        let node = parse("abcdef").unwrap_or(Node::Empty);
        let err = Compiler::with_state_limit(8).compile(&node);
        assert_eq!(err.map(|n| n.state_count()), Err(RegexError::TooManyStates { limit: 8 }));
    }
}
