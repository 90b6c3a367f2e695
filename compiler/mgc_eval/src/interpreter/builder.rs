//! `InterpreterBuilder` for configuring an [`Interpreter`].

use std::rc::Rc;

use mgc_regex::DEFAULT_STATE_LIMIT;
use rustc_hash::FxHashMap;

use super::{Interpreter, DEFAULT_MAX_CALL_DEPTH};
use crate::environment::Environment;
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::value_stack::ValueStack;
use crate::Value;

/// Builder for [`Interpreter`].
///
/// ```text
/// let interpreter = InterpreterBuilder::new()
///     .print_handler(buffer_handler())
///     .max_call_depth(500)
///     .define("limit", Value::Number(10.0))
///     .build();
/// ```
pub struct InterpreterBuilder {
    print_handler: Option<SharedPrintHandler>,
    max_call_depth: usize,
    regex_state_limit: usize,
    globals: Vec<(Rc<str>, Value)>,
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        InterpreterBuilder {
            print_handler: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            regex_state_limit: DEFAULT_STATE_LIMIT,
            globals: Vec::new(),
        }
    }

    /// Where `print`/`println` output goes. Defaults to stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Deepest call nesting before `StackOverflow`.
    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Cap on automaton states per `=~` pattern.
    #[must_use]
    pub fn regex_state_limit(mut self, limit: usize) -> Self {
        self.regex_state_limit = limit;
        self
    }

    /// Pre-bind a global before any code runs.
    #[must_use]
    pub fn define(mut self, name: &str, value: Value) -> Self {
        self.globals.push((name.into(), value));
        self
    }

    pub fn build(self) -> Interpreter {
        let env = Environment::new();
        for (name, value) in self.globals {
            env.define(name, value);
        }
        Interpreter {
            env,
            stack: ValueStack::new(),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            patterns: FxHashMap::default(),
            call_depth: 0,
            max_call_depth: self.max_call_depth,
            regex_state_limit: self.regex_state_limit,
        }
    }
}
