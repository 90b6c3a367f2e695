//! Runtime scopes.
//!
//! Scopes form two chains through the same nodes:
//!
//! - `enclosing` is the lexical parent. The resolver's hop counts walk this
//!   chain, so a closure sees the scope it was created in no matter where it
//!   is later called from.
//! - `control` is the scope to return to when this one is left. For a block it
//!   is the same as `enclosing`; for a call it is the caller's scope.
//!
//! The global scope has neither and is always reachable directly.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use mgc_ir::ScopeDepth;
use rustc_hash::FxHashMap;

use crate::Value;

/// Shared, interior-mutable handle to a scope.
///
/// Closures, instances and the interpreter all hold scopes; a scope lives as
/// long as anything points at it.
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Identity comparison: two handles to the same scope.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(inner) => f.debug_tuple("LocalScope").field(&*inner).finish(),
            Err(_) => f.write_str("LocalScope(<borrowed>)"),
        }
    }
}

/// One frame of bindings.
#[derive(Default)]
pub struct Scope {
    bindings: FxHashMap<Rc<str>, Value>,
    enclosing: Option<LocalScope<Scope>>,
    control: Option<LocalScope<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn with_parents(enclosing: LocalScope<Scope>, control: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            enclosing: Some(enclosing),
            control: Some(control),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bind `name`, replacing any previous binding in this scope.
    pub fn define(&mut self, name: Rc<str>, value: Value) {
        self.bindings.insert(name, value);
    }

    pub fn enclosing(&self) -> Option<LocalScope<Scope>> {
        self.enclosing.clone()
    }

    pub fn control(&self) -> Option<LocalScope<Scope>> {
        self.control.clone()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Binding names in sorted order.
    pub fn names(&self) -> Vec<Rc<str>> {
        let mut names: Vec<_> = self.bindings.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Parents are omitted: closures make the graph cyclic.
        f.debug_struct("Scope")
            .field("names", &self.names())
            .field("enclosing", &self.enclosing.is_some())
            .finish_non_exhaustive()
    }
}

/// Why a variable access failed.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LookupError {
    /// The addressed scope has no such binding.
    Undefined,
    /// The token was never resolved.
    Unresolved,
}

/// The interpreter's view of the scope graph.
#[derive(Debug)]
pub struct Environment {
    current: LocalScope<Scope>,
    global: LocalScope<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            current: global.clone(),
            global,
        }
    }

    pub fn current(&self) -> &LocalScope<Scope> {
        &self.current
    }

    pub fn global(&self) -> &LocalScope<Scope> {
        &self.global
    }

    pub fn is_global(&self) -> bool {
        self.current.ptr_eq(&self.global)
    }

    /// A fresh scope lexically inside `enclosing` that returns to the
    /// current scope when left.
    pub fn child_of(&self, enclosing: &LocalScope<Scope>) -> LocalScope<Scope> {
        LocalScope::new(Scope::with_parents(enclosing.clone(), self.current.clone()))
    }

    /// Make `scope` current.
    pub fn enter(&mut self, scope: LocalScope<Scope>) {
        self.current = scope;
    }

    /// Leave the current scope through its `control` link.
    pub fn exit(&mut self) {
        let control = self.current.borrow().control();
        self.current = control.unwrap_or_else(|| self.global.clone());
    }

    /// Drop back to the global scope.
    pub fn reset(&mut self) {
        self.current = self.global.clone();
    }

    /// Number of `control` links between the current scope and the global
    /// scope.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.current.borrow().control();
        while let Some(s) = scope {
            depth += 1;
            scope = s.borrow().control();
        }
        depth
    }

    /// Bind `name` in the current scope.
    pub fn define(&self, name: Rc<str>, value: Value) {
        self.current.borrow_mut().define(name, value);
    }

    pub fn lookup(&self, name: &str, depth: ScopeDepth) -> Result<Value, LookupError> {
        let scope = self.addressed(depth)?;
        let value = scope.borrow().get(name);
        value.ok_or(LookupError::Undefined)
    }

    /// Write `value` into the scope `depth` addresses, creating the binding
    /// there if it does not exist yet.
    pub fn assign(&self, name: Rc<str>, depth: ScopeDepth, value: Value) -> Result<(), LookupError> {
        let scope = self.addressed(depth)?;
        scope.borrow_mut().define(name, value);
        Ok(())
    }

    fn addressed(&self, depth: ScopeDepth) -> Result<LocalScope<Scope>, LookupError> {
        match depth {
            ScopeDepth::Unresolved => Err(LookupError::Unresolved),
            ScopeDepth::Global => Ok(self.global.clone()),
            ScopeDepth::Local(hops) => self.ancestor(hops).ok_or(LookupError::Undefined),
        }
    }

    /// Follow `hops` enclosing links from the current scope.
    fn ancestor(&self, hops: u32) -> Option<LocalScope<Scope>> {
        let mut scope = self.current.clone();
        for _ in 0..hops {
            let next = scope.borrow().enclosing()?;
            scope = next;
        }
        Some(scope)
    }
}
