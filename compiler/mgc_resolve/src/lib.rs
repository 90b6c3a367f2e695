//! Static scope resolution.
//!
//! Walks a parsed [`Ast`] and writes a [`ScopeDepth`] onto every identifier
//! token that refers to a variable. The walk opens a scope for exactly the
//! constructs the interpreter opens one for at run time:
//!
//! - block statements
//! - function and lambda bodies (one scope holding parameters and body)
//! - class bodies
//!
//! `while` and `if` bodies run in the surrounding scope in both passes.
//! Names found in no open scope are [`ScopeDepth::Global`].
//!
//! Run the resolver exactly once per parsed unit, before evaluation.

use std::rc::Rc;

use mgc_ir::{Ast, Expr, FunctionDecl, LetStmt, ScopeDepth, Stmt, Token};
use mgc_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;

/// One open scope: name to "initializer finished" flag.
type ScopeMap = FxHashMap<Rc<str>, bool>;

/// Resolver state. Reusable across parse units; each [`resolve`](Self::resolve)
/// starts from an empty scope stack.
#[derive(Default)]
pub struct ScopeResolver {
    scopes: Vec<ScopeMap>,
}

impl ScopeResolver {
    pub fn new() -> Self {
        ScopeResolver { scopes: Vec::new() }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(statements = ast.statements.len()))]
    pub fn resolve(&mut self, ast: &Ast) {
        self.scopes.clear();
        self.resolve_stmts(&ast.statements);
        debug_assert!(self.scopes.is_empty(), "unbalanced scope stack");
    }

    fn begin_scope(&mut self) {
        self.scopes.push(ScopeMap::default());
        tracing::trace!(depth = self.scopes.len(), "open scope");
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
        tracing::trace!(depth = self.scopes.len(), "close scope");
    }

    /// Add `name` to the innermost scope as not yet initialized.
    ///
    /// At top level there is no open scope and declarations are global.
    fn declare(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(Rc::clone(&name.text), false);
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(Rc::clone(&name.text), true);
        }
    }

    /// Annotate a variable reference with its distance to the innermost
    /// scope declaring it.
    fn resolve_reference(&self, token: &Token) {
        if token.depth().is_resolved() {
            tracing::debug!(name = &*token.text, depth = ?token.depth(), "token already resolved");
        }

        let found = self
            .scopes
            .iter()
            .rev()
            .enumerate()
            .find_map(|(hops, scope)| scope.get(&token.text).map(|ready| (hops, *ready)));

        let depth = match found {
            Some((hops, ready)) => {
                if !ready {
                    tracing::warn!(
                        name = &*token.text,
                        offset = token.span.start,
                        "variable read in its own initializer"
                    );
                }
                ScopeDepth::Local(u32::try_from(hops).unwrap_or(u32::MAX))
            }
            None => ScopeDepth::Global,
        };
        tracing::trace!(name = &*token.text, ?depth, "resolved");
        token.set_depth(depth);
    }

    fn resolve_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        ensure_sufficient_stack(|| match stmt {
            Stmt::Block(block) => {
                self.begin_scope();
                self.resolve_stmts(&block.statements);
                self.end_scope();
            }
            Stmt::Print(print) => self.resolve_expr(&print.value),
            Stmt::Let(let_stmt) => self.resolve_let(let_stmt),
            Stmt::While(while_stmt) => {
                self.resolve_expr(&while_stmt.condition);
                self.resolve_stmts(&while_stmt.body);
            }
            Stmt::If(if_stmt) => {
                self.resolve_expr(&if_stmt.condition);
                self.resolve_stmts(&if_stmt.then_branch);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.resolve_stmts(else_branch);
                }
            }
            Stmt::FuncDef(decl) => {
                if let Some(name) = &decl.name {
                    // Declared before the body so the function can recurse.
                    self.declare(name);
                    self.define(name);
                }
                self.resolve_function(decl);
            }
            Stmt::Return(ret) => {
                if let Some(value) = &ret.value {
                    self.resolve_expr(value);
                }
            }
            Stmt::Expr(expr) => self.resolve_expr(expr),
            Stmt::ClassDef(class) => {
                self.declare(&class.name);
                self.define(&class.name);
                self.begin_scope();
                self.resolve_stmts(&class.body);
                self.end_scope();
            }
        });
    }

    /// `let` and parameters: declare, resolve the initializer, then define.
    fn resolve_let(&mut self, let_stmt: &LetStmt) {
        self.declare(&let_stmt.name);
        if let Some(init) = &let_stmt.init {
            self.resolve_expr(init);
        }
        self.define(&let_stmt.name);
    }

    fn resolve_function(&mut self, decl: &FunctionDecl) {
        self.begin_scope();
        for param in &decl.params {
            self.resolve_let(param);
        }
        self.resolve_stmts(&decl.body);
        self.end_scope();
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        ensure_sufficient_stack(|| match expr {
            Expr::Constant(_) => {}
            Expr::Ident(token) => self.resolve_reference(token),
            Expr::Unary { operand, .. } => self.resolve_expr(operand),
            Expr::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Assign { target, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(target);
            }
            Expr::Call { callee, args, .. } => {
                self.resolve_expr(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Subscript { target, index, .. } => {
                self.resolve_expr(target);
                self.resolve_expr(index);
            }
            Expr::Array { elements, .. } => {
                for element in elements {
                    self.resolve_expr(element);
                }
            }
            Expr::ListOp { list, arg, .. } => {
                self.resolve_expr(list);
                if let Some(arg) = arg {
                    self.resolve_expr(arg);
                }
            }
            Expr::Lambda(decl) => self.resolve_function(decl),
            Expr::New { class, .. } => self.resolve_reference(class),
            // Member names are looked up in the instance, not lexically.
            Expr::Member { object, .. } => self.resolve_expr(object),
        });
    }
}

/// Resolve `ast` with a fresh [`ScopeResolver`].
pub fn resolve(ast: &Ast) {
    ScopeResolver::new().resolve(ast);
}
