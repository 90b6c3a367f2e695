//! Scope guard: enter a scope, leave it on every exit path.
//!
//! [`ScopedInterpreter`] holds `&mut Interpreter` and derefs to it, so code
//! inside the scope calls interpreter methods as usual. Dropping the guard
//! follows the scope's `control` link back to where evaluation came from,
//! whether the body finished, returned early with `?`, or panicked.

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::environment::{LocalScope, Scope};

pub struct ScopedInterpreter<'guard> {
    interpreter: &'guard mut Interpreter,
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        self.interpreter.env.exit();
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Make `scope` current until the returned guard is dropped.
    pub(crate) fn scoped(&mut self, scope: LocalScope<Scope>) -> ScopedInterpreter<'_> {
        tracing::trace!(depth = self.env.depth(), "enter scope");
        self.env.enter(scope);
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` with `scope` current.
    pub(crate) fn with_scope<T, F>(&mut self, scope: LocalScope<Scope>, f: F) -> T
    where
        F: FnOnce(&mut Interpreter) -> T,
    {
        let mut scoped = self.scoped(scope);
        f(&mut *scoped)
    }
}
