//! Subset simulation: run an [`Nfa`] without building a DFA.
//!
//! The current set of states starts as the epsilon-closure of the start
//! state. Each input character maps the set through matching transitions
//! (`move`) and closes it again. The text matches when the accept state is
//! in the set after the last character. Work is `O(text * states)`.

use crate::nfa::{Label, Nfa, StateId};

/// Insertion-ordered set of states with constant-time membership.
struct StateSet {
    members: Vec<StateId>,
    present: Vec<bool>,
}

impl StateSet {
    fn new(capacity: usize) -> Self {
        StateSet {
            members: Vec::with_capacity(capacity),
            present: vec![false; capacity],
        }
    }

    /// Returns `false` if `id` was already present.
    fn insert(&mut self, id: StateId) -> bool {
        match self.present.get_mut(id.index()) {
            Some(slot) if !*slot => {
                *slot = true;
                self.members.push(id);
                true
            }
            _ => false,
        }
    }

    fn contains(&self, id: StateId) -> bool {
        self.present.get(id.index()).copied().unwrap_or(false)
    }

    fn clear(&mut self) {
        for id in self.members.drain(..) {
            if let Some(slot) = self.present.get_mut(id.index()) {
                *slot = false;
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Nfa {
    /// Add `from` and every state reachable from it by epsilon transitions.
    fn epsilon_closure(&self, from: StateId, set: &mut StateSet, stack: &mut Vec<StateId>) {
        if !set.insert(from) {
            return;
        }
        stack.push(from);
        while let Some(id) = stack.pop() {
            let Some(state) = self.state(id) else {
                continue;
            };
            for t in &state.transitions {
                if t.label == Label::Epsilon && set.insert(t.target) {
                    stack.push(t.target);
                }
            }
        }
    }

    /// Whether the whole of `text` is accepted.
    pub fn is_match(&self, text: &str) -> bool {
        let n = self.state_count();
        let mut current = StateSet::new(n);
        let mut next = StateSet::new(n);
        let mut stack = Vec::new();

        self.epsilon_closure(self.start, &mut current, &mut stack);

        for c in text.chars() {
            next.clear();
            for &id in &current.members {
                let Some(state) = self.state(id) else {
                    continue;
                };
                for t in &state.transitions {
                    if t.label.accepts(c) {
                        self.epsilon_closure(t.target, &mut next, &mut stack);
                    }
                }
            }
            std::mem::swap(&mut current, &mut next);
            if current.is_empty() {
                return false;
            }
        }

        current.contains(self.accept)
    }
}
