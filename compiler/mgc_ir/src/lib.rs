//! Shared intermediate representation for the mgc pipeline.
//!
//! Everything downstream of the lexer speaks in terms of this crate:
//!
//! - [`Span`]: byte range into the source of one parse unit
//! - [`Token`] / [`TokenKind`] / [`TokenList`]: lexer output
//! - [`ScopeDepth`]: the lexical address the resolver writes onto identifier tokens
//! - [`ast`]: the statement and expression tree built by the parser

pub mod ast;
mod span;
mod token;

pub use ast::{
    AssignOp, Ast, BinaryOp, Block, ClassDecl, Expr, FunctionDecl, IfStmt, LetStmt, ListOp,
    PrintStmt, ReturnStmt, Stmt, UnaryOp, WhileStmt,
};
pub use span::Span;
pub use token::{ScopeDepth, Token, TokenKind, TokenList, KEYWORDS, OPERATORS};
