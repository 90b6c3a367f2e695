//! Tree-walking interpreter for mgc.
//!
//! Input is a resolved [`mgc_ir::Ast`]: every identifier token already carries
//! its [`mgc_ir::ScopeDepth`]. The interpreter uses those depths to walk the
//! runtime scope chain directly instead of searching it by name.
//!
//! # Architecture
//!
//! - [`Environment`]: current and global scopes; lookups by hop count.
//! - [`ValueStack`]: operand stack for expression evaluation.
//! - [`evaluate_binary`] / [`evaluate_unary`]: operator dispatch.
//! - [`Interpreter`]: statements, calls, classes, list primitives and `=~`.

mod environment;
pub mod errors;
mod interpreter;
mod literal;
mod operators;
mod print_handler;
mod value;
mod value_stack;

pub use environment::{Environment, LocalScope, LookupError, Scope};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{evaluate, Flow, Interpreter, InterpreterBuilder, DEFAULT_MAX_CALL_DEPTH};
pub use literal::decode_string;
pub use operators::{evaluate_binary, evaluate_unary};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use value::{ArrayRef, Class, Function, Instance, Value};
pub use value_stack::ValueStack;
