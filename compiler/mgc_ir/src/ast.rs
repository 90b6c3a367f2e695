//! Syntax tree.
//!
//! The tree is owned top-down. The only sharing is through `Rc` on
//! [`FunctionDecl`] and [`ClassDecl`], because a runtime function or class
//! value keeps its declaration alive after the defining statement has been
//! evaluated and dropped.
//!
//! Every pass (resolver, interpreter, debug dump) is a single `match` over
//! these enums, so adding a node kind is a compile error in every pass that
//! forgets it.

use std::rc::Rc;

use crate::{Span, Token};

/// One parse unit: a flat list of top-level statements.
#[derive(Clone, Debug, Default)]
pub struct Ast {
    pub statements: Vec<Stmt>,
}

#[derive(Clone, Debug)]
pub enum Stmt {
    /// `{ ... }`; opens a scope.
    Block(Block),
    /// `print expr` / `println expr`.
    Print(PrintStmt),
    /// `let name [:= init]`.
    Let(LetStmt),
    While(WhileStmt),
    If(IfStmt),
    /// `def name(params) { body }`.
    FuncDef(Rc<FunctionDecl>),
    Return(ReturnStmt),
    Expr(Expr),
    /// `class Name { body }`.
    ClassDef(Rc<ClassDecl>),
}

#[derive(Clone, Debug)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct PrintStmt {
    pub newline: bool,
    pub value: Expr,
    pub span: Span,
}

/// Variable declaration; also the shape of a function parameter.
#[derive(Clone, Debug)]
pub struct LetStmt {
    pub name: Token,
    /// Initializer, or the default value when used as a parameter.
    pub init: Option<Expr>,
    pub span: Span,
}

/// `while (cond) { body }`. The body shares the surrounding scope.
#[derive(Clone, Debug)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `if (cond) { .. } else { .. }`. Branches share the surrounding scope.
///
/// `else if` is stored as an `else_branch` holding a single nested `If`.
#[derive(Clone, Debug)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Vec<Stmt>,
    pub else_branch: Option<Vec<Stmt>>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// Function or lambda declaration.
#[derive(Debug)]
pub struct FunctionDecl {
    /// `None` for lambdas.
    pub name: Option<Token>,
    pub params: Vec<LetStmt>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl FunctionDecl {
    /// Fewest arguments a call may pass: every parameter up to the last one
    /// without a default must be supplied.
    pub fn min_args(&self) -> usize {
        self.params
            .iter()
            .rposition(|p| p.init.is_none())
            .map_or(0, |last| last + 1)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_ref().map_or("lambda", |t| &t.text)
    }
}

#[derive(Debug)]
pub struct ClassDecl {
    pub name: Token,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Prefix `-`.
    Neg,
    /// `++`, prefix or postfix; yields the updated value.
    Increment,
    /// `--`, prefix or postfix; yields the updated value.
    Decrement,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
    /// `subject =~ pattern`.
    Match,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Match => "=~",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    /// `:=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Sub,
}

/// List primitives, written like calls: `first(xs)`, `map(xs, f)`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ListOp {
    First,
    Rest,
    Empty,
    Size,
    Pop,
    Push,
    Append,
    Get,
    Map,
    Filter,
    Reduce,
}

impl ListOp {
    /// Whether the primitive takes a second operand after the list.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            ListOp::Push
                | ListOp::Append
                | ListOp::Get
                | ListOp::Map
                | ListOp::Filter
                | ListOp::Reduce
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ListOp::First => "first",
            ListOp::Rest => "rest",
            ListOp::Empty => "empty",
            ListOp::Size => "size",
            ListOp::Pop => "pop",
            ListOp::Push => "push",
            ListOp::Append => "append",
            ListOp::Get => "get",
            ListOp::Map => "map",
            ListOp::Filter => "filter",
            ListOp::Reduce => "reduce",
        }
    }
}

#[derive(Clone, Debug)]
pub enum Expr {
    /// Number, string, `true`, `false` or `nil` literal.
    Constant(Token),
    /// Variable reference; the token carries the resolved depth.
    Ident(Token),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    /// `target op value` where target is an identifier, subscript or member.
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    Subscript {
        target: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    Array {
        elements: Vec<Expr>,
        span: Span,
    },
    ListOp {
        op: ListOp,
        list: Box<Expr>,
        arg: Option<Box<Expr>>,
        span: Span,
    },
    Lambda(Rc<FunctionDecl>),
    /// `new Name`.
    New {
        class: Token,
        span: Span,
    },
    /// `object.name`.
    Member {
        object: Box<Expr>,
        name: Token,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Constant(token) | Expr::Ident(token) => token.span,
            Expr::Lambda(decl) => decl.span,
            Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Assign { span, .. }
            | Expr::Call { span, .. }
            | Expr::Subscript { span, .. }
            | Expr::Array { span, .. }
            | Expr::ListOp { span, .. }
            | Expr::New { span, .. }
            | Expr::Member { span, .. } => *span,
        }
    }

    /// Whether this expression may appear on the left of `:=`, `+=`, `++`.
    pub fn is_place(&self) -> bool {
        matches!(
            self,
            Expr::Ident(_) | Expr::Subscript { .. } | Expr::Member { .. }
        )
    }
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Block(block) => block.span,
            Stmt::Print(stmt) => stmt.span,
            Stmt::Let(stmt) => stmt.span,
            Stmt::While(stmt) => stmt.span,
            Stmt::If(stmt) => stmt.span,
            Stmt::FuncDef(decl) => decl.span,
            Stmt::Return(stmt) => stmt.span,
            Stmt::Expr(expr) => expr.span(),
            Stmt::ClassDef(decl) => decl.span,
        }
    }
}
