//! Expression parsing by precedence climbing.
//!
//! | operators                          | precedence | associativity |
//! |------------------------------------|-----------:|---------------|
//! | `:=` `+=` `-=`                     | 20         | right         |
//! | `or` `\|\|`                        | 22         | left          |
//! | `and` `&&`                         | 24         | left          |
//! | `==` `!=` `<` `>` `<=` `>=` `=~`   | 30         | left          |
//! | `+` `-`                            | 50         | left          |
//! | `*` `/` `%`                        | 60         | left          |
//! | prefix `-` `++` `--` (operand)     | 90         |               |
//! | call, subscript, `.`, postfix `++` | 100        | left          |

use std::rc::Rc;

use mgc_diagnostic::ErrorCode;
use mgc_ir::{
    AssignOp, BinaryOp, Expr, FunctionDecl, LetStmt, ListOp, ReturnStmt, Stmt, Token, TokenKind,
    UnaryOp,
};
use mgc_stack::ensure_sufficient_stack;

use crate::{PResult, ParseError, Parser};

pub(crate) mod prec {
    pub const LOWEST: u8 = 0;
    pub const ASSIGN: u8 = 20;
    pub const OR: u8 = 22;
    pub const AND: u8 = 24;
    pub const COMPARE: u8 = 30;
    pub const ADDITIVE: u8 = 50;
    pub const MULTIPLICATIVE: u8 = 60;
    pub const PREFIX: u8 = 90;
    pub const POSTFIX: u8 = 100;
}

/// Precedence of `kind` when it continues an expression, if it can.
pub(crate) fn infix_precedence(kind: TokenKind) -> Option<u8> {
    let p = match kind {
        TokenKind::Assign | TokenKind::AddAssign | TokenKind::SubAssign => prec::ASSIGN,
        TokenKind::Or => prec::OR,
        TokenKind::And => prec::AND,
        TokenKind::EqEq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::Gt
        | TokenKind::LtEq
        | TokenKind::GtEq
        | TokenKind::MatchRe => prec::COMPARE,
        TokenKind::Plus | TokenKind::Minus => prec::ADDITIVE,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => prec::MULTIPLICATIVE,
        TokenKind::LParen
        | TokenKind::LBracket
        | TokenKind::Period
        | TokenKind::Increment
        | TokenKind::Decrement => prec::POSTFIX,
        _ => return None,
    };
    Some(p)
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        TokenKind::MatchRe => BinaryOp::Match,
        _ => return None,
    };
    Some(op)
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    match kind {
        TokenKind::Assign => Some(AssignOp::Assign),
        TokenKind::AddAssign => Some(AssignOp::Add),
        TokenKind::SubAssign => Some(AssignOp::Sub),
        _ => None,
    }
}

fn step_op(kind: TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Increment => Some(UnaryOp::Increment),
        TokenKind::Decrement => Some(UnaryOp::Decrement),
        _ => None,
    }
}

fn list_op(kind: TokenKind) -> Option<ListOp> {
    let op = match kind {
        TokenKind::First => ListOp::First,
        TokenKind::Rest => ListOp::Rest,
        TokenKind::Empty => ListOp::Empty,
        TokenKind::Size => ListOp::Size,
        TokenKind::Pop => ListOp::Pop,
        TokenKind::Push => ListOp::Push,
        TokenKind::Append => ListOp::Append,
        TokenKind::Get => ListOp::Get,
        TokenKind::Map => ListOp::Map,
        TokenKind::Filter => ListOp::Filter,
        TokenKind::Reduce => ListOp::Reduce,
        _ => return None,
    };
    Some(op)
}

fn invalid_target(target: &Expr, op: &Token) -> ParseError {
    ParseError {
        code: ErrorCode::E1005,
        expected: format!("variable, subscript or member before `{}`", op.text),
        found: "expression".to_string(),
        span: target.span(),
    }
}

impl Parser<'_> {
    /// Parse a full expression.
    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_expression(prec::LOWEST)
    }

    /// Parse an expression whose infix operators all bind at least as
    /// tightly as `min_prec`.
    pub(crate) fn parse_expression(&mut self, min_prec: u8) -> PResult<Expr> {
        ensure_sufficient_stack(|| self.parse_expression_inner(min_prec))
    }

    fn parse_expression_inner(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut left = self.parse_prefix()?;

        loop {
            let kind = self.current_kind();
            let Some(p) = infix_precedence(kind) else {
                break;
            };
            if p < min_prec {
                break;
            }

            let op_token = self.advance();
            let start = left.span();
            left = if let Some(op) = assign_op(kind) {
                if !left.is_place() {
                    return Err(invalid_target(&left, op_token));
                }
                // Right-associative: `a := b := 1` is `a := (b := 1)`.
                let value = self.parse_expression(p)?;
                Expr::Assign {
                    op,
                    target: Box::new(left),
                    value: Box::new(value),
                    span: self.span_from(start),
                }
            } else if let Some(op) = binary_op(kind) {
                let right = self.parse_expression(p + 1)?;
                Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                    span: self.span_from(start),
                }
            } else if let Some(op) = step_op(kind) {
                if !left.is_place() {
                    return Err(invalid_target(&left, op_token));
                }
                Expr::Unary {
                    op,
                    operand: Box::new(left),
                    span: self.span_from(start),
                }
            } else {
                match kind {
                    TokenKind::LParen => {
                        let args = self.parse_call_args()?;
                        Expr::Call {
                            callee: Box::new(left),
                            args,
                            span: self.span_from(start),
                        }
                    }
                    TokenKind::LBracket => {
                        let index = self.parse_expr()?;
                        self.expect(TokenKind::RBracket)?;
                        Expr::Subscript {
                            target: Box::new(left),
                            index: Box::new(index),
                            span: self.span_from(start),
                        }
                    }
                    _ => {
                        let name = self.expect(TokenKind::Ident)?.clone();
                        Expr::Member {
                            object: Box::new(left),
                            name,
                            span: self.span_from(start),
                        }
                    }
                }
            };
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> PResult<Expr> {
        let token = self.current();
        let start = token.span;

        match token.kind {
            TokenKind::Number
            | TokenKind::String
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Nil => Ok(Expr::Constant(self.advance().clone())),
            TokenKind::Ident => Ok(Expr::Ident(self.advance().clone())),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                self.advance();
                let elements = self.parse_comma_list(TokenKind::RBracket)?;
                Ok(Expr::Array {
                    elements,
                    span: self.span_from(start),
                })
            }
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_expression(prec::PREFIX)?;
                Ok(Expr::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                    span: self.span_from(start),
                })
            }
            TokenKind::Increment | TokenKind::Decrement => {
                let op_token = self.advance();
                let operand = self.parse_expression(prec::PREFIX)?;
                if !operand.is_place() {
                    return Err(invalid_target(&operand, op_token));
                }
                Ok(Expr::Unary {
                    op: step_op(token.kind).unwrap_or(UnaryOp::Increment),
                    operand: Box::new(operand),
                    span: self.span_from(start),
                })
            }
            TokenKind::Lambda => {
                self.advance();
                let decl = self.parse_function_tail(None, start)?;
                Ok(Expr::Lambda(Rc::new(decl)))
            }
            TokenKind::New => {
                self.advance();
                let class = self.expect(TokenKind::Ident)?.clone();
                if self.eat(TokenKind::LParen) {
                    self.expect(TokenKind::RParen)?;
                }
                Ok(Expr::New {
                    class,
                    span: self.span_from(start),
                })
            }
            kind => match list_op(kind) {
                Some(op) => self.parse_list_op(op),
                None => Err(ParseError::new(ErrorCode::E1002, "expression", token)),
            },
        }
    }

    /// `first(xs)`, `push(xs, v)`, ...
    fn parse_list_op(&mut self, op: ListOp) -> PResult<Expr> {
        let start = self.advance().span;
        self.expect(TokenKind::LParen)?;
        let list = self.parse_expr()?;
        let arg = if op.is_binary() {
            self.expect(TokenKind::Comma)?;
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect(TokenKind::RParen)?;
        Ok(Expr::ListOp {
            op,
            list: Box::new(list),
            arg,
            span: self.span_from(start),
        })
    }

    /// Arguments after an already consumed `(`.
    fn parse_call_args(&mut self) -> PResult<Vec<Expr>> {
        self.parse_comma_list(TokenKind::RParen)
    }

    /// Comma-separated expressions up to and including `close`.
    fn parse_comma_list(&mut self, close: TokenKind) -> PResult<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.check(close) {
            items.push(self.parse_expr()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Ok(items)
    }

    /// Parameter list and body shared by `def` and `lambda`.
    ///
    /// Parameters reuse the `let` grammar: `(let x, y, let z := 1)`.
    /// The body is a braced block, or `=> expr` which becomes `{ return expr; }`.
    pub(crate) fn parse_function_tail(
        &mut self,
        name: Option<Token>,
        start: mgc_ir::Span,
    ) -> PResult<FunctionDecl> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) {
            params.push(self.parse_param()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        let body = if self.check(TokenKind::Produce) {
            let arrow = self.advance().span;
            let value = self.parse_expr()?;
            let span = arrow.merge(value.span());
            vec![Stmt::Return(ReturnStmt {
                value: Some(value),
                span,
            })]
        } else {
            self.parse_braced_body()?
        };

        Ok(FunctionDecl {
            name,
            params,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_param(&mut self) -> PResult<LetStmt> {
        let start = self.current_span();
        self.eat(TokenKind::Let);
        let name = self.expect(TokenKind::Ident)?.clone();
        let init = if self.eat(TokenKind::Assign) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(LetStmt {
            name,
            init,
            span: self.span_from(start),
        })
    }
}
