//! Expression evaluation.
//!
//! `eval_expr` leaves exactly one value on the stack. Sub-expressions are
//! evaluated left to right, and their results are popped back off in reverse.

use std::rc::Rc;

use mgc_ir::{AssignOp, BinaryOp, Expr, Span, Token, UnaryOp};
use mgc_regex::Regex;

use super::{Interpreter, PATTERN_CACHE_LIMIT};
use crate::environment::{LocalScope, LookupError, Scope};
use crate::errors::{EvalError, EvalErrorKind, EvalResult};
use crate::literal::literal_value;
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::value::{ArrayRef, Function};
use crate::Value;

/// A location an assignment or `++`/`--` can write to.
enum Place {
    Variable(Token),
    Element { items: ArrayRef, index: usize },
    Member { fields: LocalScope<Scope>, class: Rc<str>, name: Rc<str> },
}

impl Interpreter {
    /// Evaluate `expr` and take its value off the stack.
    pub(crate) fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.eval_expr(expr)?;
        self.pop(expr.span())
    }

    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        mgc_stack::ensure_sufficient_stack(|| self.eval_expr_inner(expr))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult {
        let value = match expr {
            Expr::Constant(token) => literal_value(token).map_err(|kind| kind.at(token.span))?,
            Expr::Ident(token) => self.read_variable(token)?,
            Expr::Unary { op, operand, span } => self.eval_unary(*op, operand, *span)?,
            Expr::Binary {
                op: op @ (BinaryOp::And | BinaryOp::Or),
                left,
                right,
                ..
            } => self.eval_logical(*op, left, right)?,
            Expr::Binary {
                op,
                left,
                right,
                span,
            } => {
                self.eval_expr(left)?;
                self.eval_expr(right)?;
                let rhs = self.pop(*span)?;
                let lhs = self.pop(*span)?;
                if *op == BinaryOp::Match {
                    self.eval_match(&lhs, &rhs, *span)?
                } else {
                    evaluate_binary(*op, &lhs, &rhs).map_err(|kind| kind.at(*span))?
                }
            }
            Expr::Assign {
                op,
                target,
                value,
                span,
            } => self.eval_assign(*op, target, value, *span)?,
            Expr::Call { callee, args, span } => {
                self.eval_expr(callee)?;
                for arg in args {
                    self.eval_expr(arg)?;
                }
                let args = self.pop_n(args.len(), *span)?;
                let callee = self.pop(*span)?;
                match callee {
                    Value::Function(function) => self.call_function(&function, args, *span)?,
                    other => {
                        return Err(EvalErrorKind::NotCallable {
                            found: other.type_name(),
                        }
                        .at(*span))
                    }
                }
            }
            Expr::Subscript {
                target,
                index,
                span,
            } => {
                let (items, index) = self.eval_element(target, index, *span)?;
                element_at(&items, index, *span)?
            }
            Expr::Array { elements, span } => {
                for element in elements {
                    self.eval_expr(element)?;
                }
                Value::array(self.pop_n(elements.len(), *span)?)
            }
            Expr::ListOp {
                op,
                list,
                arg,
                span,
            } => self.eval_list_op(*op, list, arg.as_deref(), *span)?,
            Expr::Lambda(decl) => Value::Function(Rc::new(Function {
                decl: Rc::clone(decl),
                closure: self.env.current().clone(),
            })),
            Expr::New { class, span } => self.instantiate(class, *span)?,
            Expr::Member { object, name, span } => {
                let place = self.member_place(object, name, *span)?;
                self.read_place(&place, *span)?
            }
        };
        self.stack.push(value);
        Ok(())
    }

    fn read_variable(&self, token: &Token) -> EvalResult<Value> {
        self.env
            .lookup(&token.text, token.depth())
            .map_err(|err| lookup_error(err, token))
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr, span: Span) -> EvalResult<Value> {
        match op {
            UnaryOp::Neg => {
                self.eval_expr(operand)?;
                let value = self.pop(span)?;
                evaluate_unary(op, &value).map_err(|kind| kind.at(span))
            }
            UnaryOp::Increment | UnaryOp::Decrement => {
                let place = self.place(operand)?;
                let current = self.read_place(&place, span)?;
                let updated = evaluate_unary(op, &current).map_err(|kind| kind.at(span))?;
                self.write_place(place, updated.clone(), span)?;
                Ok(updated)
            }
        }
    }

    fn eval_logical(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult<Value> {
        let symbol = op.as_symbol();
        let lhs = self.eval(left)?;
        let lhs = expect_bool(&lhs, symbol, left.span())?;
        let short_circuit = match op {
            BinaryOp::And => !lhs,
            _ => lhs,
        };
        if short_circuit {
            return Ok(Value::Bool(lhs));
        }
        let rhs = self.eval(right)?;
        expect_bool(&rhs, symbol, right.span()).map(Value::Bool)
    }

    /// `subject =~ pattern`. Patterns are compiled once per interpreter.
    fn eval_match(&mut self, subject: &Value, pattern: &Value, span: Span) -> EvalResult<Value> {
        let (Value::Str(subject), Value::Str(pattern)) = (subject, pattern) else {
            let found = if matches!(subject, Value::Str(_)) {
                pattern.type_name()
            } else {
                subject.type_name()
            };
            return Err(EvalErrorKind::ExpectedString { op: "=~", found }.at(span));
        };
        let regex = match self.patterns.get(pattern) {
            Some(regex) => Rc::clone(regex),
            None => {
                let regex = Regex::with_state_limit(pattern, self.regex_state_limit)
                    .map_err(|err| EvalErrorKind::from(err).at(span))?;
                let regex = Rc::new(regex);
                if self.patterns.len() >= PATTERN_CACHE_LIMIT {
                    self.patterns.clear();
                }
                self.patterns.insert(Rc::clone(pattern), Rc::clone(&regex));
                regex
            }
        };
        Ok(Value::Bool(regex.is_match(subject)))
    }

    fn eval_assign(&mut self, op: AssignOp, target: &Expr, value: &Expr, span: Span) -> EvalResult<Value> {
        let place = self.place(target)?;
        let value = match op {
            AssignOp::Assign => self.eval(value)?,
            AssignOp::Add | AssignOp::Sub => {
                let current = self.read_place(&place, span)?;
                let rhs = self.eval(value)?;
                let op = if op == AssignOp::Add {
                    BinaryOp::Add
                } else {
                    BinaryOp::Sub
                };
                evaluate_binary(op, &current, &rhs).map_err(|kind| kind.at(span))?
            }
        };
        self.write_place(place, value.clone(), span)?;
        Ok(value)
    }

    /// Evaluate the parts of a place expression, without reading it.
    fn place(&mut self, target: &Expr) -> EvalResult<Place> {
        match target {
            Expr::Ident(token) => Ok(Place::Variable(token.clone())),
            Expr::Subscript {
                target,
                index,
                span,
            } => {
                let (items, index) = self.eval_element(target, index, *span)?;
                Ok(Place::Element { items, index })
            }
            Expr::Member { object, name, span } => self.member_place(object, name, *span),
            other => Err(EvalErrorKind::InvalidTarget.at(other.span())),
        }
    }

    fn member_place(&mut self, object: &Expr, name: &Token, span: Span) -> EvalResult<Place> {
        match self.eval(object)? {
            Value::Instance(instance) => Ok(Place::Member {
                fields: instance.fields.clone(),
                class: instance.class.decl.name.text.clone(),
                name: Rc::clone(&name.text),
            }),
            other => Err(EvalErrorKind::NotAnInstance {
                member: name.text.to_string(),
                found: other.type_name(),
            }
            .at(span)),
        }
    }

    /// Evaluate `target[index]` down to an array and a checked-integral index.
    /// Bounds are checked by the caller.
    fn eval_element(&mut self, target: &Expr, index: &Expr, span: Span) -> EvalResult<(ArrayRef, usize)> {
        self.eval_expr(target)?;
        self.eval_expr(index)?;
        let index = self.pop(span)?;
        let target = self.pop(span)?;
        let Value::Array(items) = target else {
            return Err(EvalErrorKind::ExpectedArray {
                op: "[]",
                found: target.type_name(),
            }
            .at(span));
        };
        let index = to_index(&index).map_err(|kind| kind.at(span))?;
        Ok((items, index))
    }

    fn read_place(&self, place: &Place, span: Span) -> EvalResult<Value> {
        match place {
            Place::Variable(token) => self.read_variable(token),
            Place::Element { items, index } => element_at(items, *index, span),
            Place::Member {
                fields,
                class,
                name,
            } => fields.borrow().get(name).ok_or_else(|| {
                EvalErrorKind::NoSuchMember {
                    class: class.to_string(),
                    member: name.to_string(),
                }
                .at(span)
            }),
        }
    }

    fn write_place(&mut self, place: Place, value: Value, span: Span) -> EvalResult {
        match place {
            Place::Variable(token) => self
                .env
                .assign(Rc::clone(&token.text), token.depth(), value)
                .map_err(|err| lookup_error(err, &token)),
            Place::Element { items, index } => {
                let mut items = items.borrow_mut();
                let len = items.len();
                let slot = items
                    .get_mut(index)
                    .ok_or_else(|| out_of_bounds(index, len, span))?;
                *slot = value;
                Ok(())
            }
            Place::Member { fields, name, .. } => {
                fields.borrow_mut().define(name, value);
                Ok(())
            }
        }
    }
}

fn lookup_error(err: LookupError, token: &Token) -> EvalError {
    let name = token.text.to_string();
    match err {
        LookupError::Undefined => EvalErrorKind::UndefinedVariable { name },
        LookupError::Unresolved => EvalErrorKind::Unresolved { name },
    }
    .at(token.span)
}

fn expect_bool(value: &Value, op: &'static str, span: Span) -> EvalResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(EvalErrorKind::ExpectedBool {
            op,
            found: other.type_name(),
        }
        .at(span)),
    }
}

pub(crate) fn out_of_bounds(index: usize, len: usize, span: Span) -> EvalError {
    EvalErrorKind::IndexOutOfBounds { index, len }.at(span)
}

pub(crate) fn element_at(items: &ArrayRef, index: usize, span: Span) -> EvalResult<Value> {
    let items = items.borrow();
    let element = items.get(index).cloned();
    element.ok_or_else(|| out_of_bounds(index, items.len(), span))
}

/// A non-negative integral number as an index.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "guarded by the non-negative integral check"
)]
pub(crate) fn to_index(value: &Value) -> Result<usize, EvalErrorKind> {
    match value {
        Value::Number(n) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => Ok(*n as usize),
        other => Err(EvalErrorKind::InvalidIndex {
            found: other.to_string(),
        }),
    }
}
