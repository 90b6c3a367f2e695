//! Tree-walking interpreter.
//!
//! Statements run against the [`Environment`]; expressions run against the
//! [`ValueStack`]. The interpreter persists across units, so globals defined
//! by one REPL line are visible to the next.

mod builder;
mod call;
mod expr;
mod list_ops;
mod scope_guard;

use std::rc::Rc;

use mgc_ir::{Ast, Span, Stmt};
use mgc_regex::Regex;
use rustc_hash::FxHashMap;

pub use builder::InterpreterBuilder;

use crate::environment::Environment;
use crate::errors::{EvalError, EvalErrorKind, EvalResult};
use crate::print_handler::SharedPrintHandler;
use crate::value::{Class, Function};
use crate::value_stack::ValueStack;
use crate::Value;

/// Default bound on nested calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Distinct `=~` patterns kept compiled before the cache starts over.
pub const PATTERN_CACHE_LIMIT: usize = 256;

/// How a statement completed.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    Normal,
    /// `return` is unwinding towards the nearest call.
    Return(Value),
}

pub struct Interpreter {
    pub(crate) env: Environment,
    pub(crate) stack: ValueStack,
    pub(crate) print_handler: SharedPrintHandler,
    /// Compiled `=~` patterns by source text, at most [`PATTERN_CACHE_LIMIT`].
    pub(crate) patterns: FxHashMap<Rc<str>, Rc<Regex>>,
    pub(crate) call_depth: usize,
    pub(crate) max_call_depth: usize,
    pub(crate) regex_state_limit: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    /// Run every statement of `ast`.
    ///
    /// A failing statement is abandoned and the next one runs; an
    /// out-of-bounds access ends the unit. A top-level `return` also ends the
    /// unit. All errors are returned in order.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = ast.statements.len()))]
    pub fn evaluate(&mut self, ast: &Ast) -> Vec<EvalError> {
        let mut errors = Vec::new();
        for stmt in &ast.statements {
            let base = self.stack.len();
            match self.exec_stmt(stmt) {
                Ok(Flow::Normal) => {}
                Ok(Flow::Return(value)) => {
                    tracing::debug!(%value, "return at top level");
                    break;
                }
                Err(err) => {
                    tracing::debug!(error = %err, "statement failed");
                    self.stack.truncate(base);
                    self.env.reset();
                    self.call_depth = 0;
                    let fatal = err.is_fatal();
                    errors.push(err);
                    if fatal {
                        break;
                    }
                }
            }
        }
        errors
    }

    /// Current value of a global binding.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.env.global().borrow().get(name)
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Height of the value stack; zero between statements.
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Names bound in the global scope, sorted.
    pub fn global_names(&self) -> Vec<Rc<str>> {
        self.env.global().borrow().names()
    }

    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        mgc_stack::ensure_sufficient_stack(|| self.exec_stmt_inner(stmt))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::Block(block) => {
                let scope = self.env.child_of(self.env.current());
                self.with_scope(scope, |interp| interp.exec_block(&block.statements))
            }
            Stmt::Print(print) => {
                let value = self.eval(&print.value)?;
                let text = value.to_string();
                if print.newline {
                    self.print_handler.println(&text);
                } else {
                    self.print_handler.print(&text);
                }
                Ok(Flow::Normal)
            }
            Stmt::Let(stmt) => {
                let value = match &stmt.init {
                    Some(init) => self.eval(init)?,
                    None => Value::Nil,
                };
                self.env.define(Rc::clone(&stmt.name.text), value);
                Ok(Flow::Normal)
            }
            Stmt::While(stmt) => {
                while self.eval(&stmt.condition)?.is_truthy() {
                    if let Flow::Return(value) = self.exec_block(&stmt.body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::If(stmt) => {
                if self.eval(&stmt.condition)?.is_truthy() {
                    self.exec_block(&stmt.then_branch)
                } else if let Some(else_branch) = &stmt.else_branch {
                    self.exec_block(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::FuncDef(decl) => {
                let function = Function {
                    decl: Rc::clone(decl),
                    closure: self.env.current().clone(),
                };
                if let Some(name) = &decl.name {
                    self.env
                        .define(Rc::clone(&name.text), Value::Function(Rc::new(function)));
                }
                Ok(Flow::Normal)
            }
            Stmt::ClassDef(decl) => {
                let class = Class {
                    decl: Rc::clone(decl),
                    closure: self.env.current().clone(),
                };
                self.env
                    .define(Rc::clone(&decl.name.text), Value::Class(Rc::new(class)));
                Ok(Flow::Normal)
            }
            Stmt::Return(stmt) => {
                let value = match &stmt.value {
                    Some(value) => self.eval(value)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            }
            Stmt::Expr(expr) => {
                self.eval(expr)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Run statements in the current scope, stopping at the first `return`.
    pub(crate) fn exec_block(&mut self, statements: &[Stmt]) -> EvalResult<Flow> {
        for stmt in statements {
            if let Flow::Return(value) = self.exec_stmt(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    pub(crate) fn pop(&mut self, span: Span) -> EvalResult<Value> {
        self.stack
            .pop()
            .ok_or_else(|| EvalErrorKind::StackUnderflow.at(span))
    }

    pub(crate) fn pop_n(&mut self, n: usize, span: Span) -> EvalResult<Vec<Value>> {
        self.stack
            .pop_n(n)
            .ok_or_else(|| EvalErrorKind::StackUnderflow.at(span))
    }
}

/// Evaluate `ast` with `interpreter`, returning every runtime error.
pub fn evaluate(ast: &Ast, interpreter: &mut Interpreter) -> Vec<EvalError> {
    interpreter.evaluate(ast)
}

#[cfg(test)]
mod tests;
