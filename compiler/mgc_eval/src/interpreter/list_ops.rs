//! Built-in list primitives.
//!
//! `push` and `pop` work at the front of the array, `append` at the back.
//! Mutating primitives change the array in place and return it, so every
//! alias sees the change.

use std::rc::Rc;

use mgc_ir::{Expr, ListOp, Span};

use super::expr::{element_at, out_of_bounds, to_index};
use super::Interpreter;
use crate::errors::{EvalErrorKind, EvalResult};
use crate::value::{ArrayRef, Function};
use crate::Value;

impl Interpreter {
    pub(crate) fn eval_list_op(&mut self, op: ListOp, list: &Expr, arg: Option<&Expr>, span: Span) -> EvalResult<Value> {
        self.eval_expr(list)?;
        let arg = match arg {
            Some(arg) => {
                self.eval_expr(arg)?;
                Some(self.pop(span)?)
            }
            None => None,
        };
        let list = self.pop(span)?;
        let Value::Array(items) = list else {
            return Err(EvalErrorKind::ExpectedArray {
                op: op.name(),
                found: list.type_name(),
            }
            .at(span));
        };
        let arg = arg.unwrap_or(Value::Nil);

        match op {
            ListOp::First => element_at(&items, 0, span),
            ListOp::Rest => {
                let rest = items.borrow().iter().skip(1).cloned().collect();
                Ok(Value::array(rest))
            }
            ListOp::Empty => {
                let empty = items.borrow().is_empty();
                Ok(Value::Bool(empty))
            }
            ListOp::Size => {
                #[allow(clippy::cast_precision_loss, reason = "array lengths fit in f64")]
                let len = items.borrow().len() as f64;
                Ok(Value::Number(len))
            }
            ListOp::Pop => {
                let mut borrowed = items.borrow_mut();
                if borrowed.is_empty() {
                    return Err(out_of_bounds(0, 0, span));
                }
                Ok(borrowed.remove(0))
            }
            ListOp::Push => {
                items.borrow_mut().insert(0, arg);
                Ok(Value::Array(items))
            }
            ListOp::Append => {
                items.borrow_mut().push(arg);
                Ok(Value::Array(items))
            }
            ListOp::Get => {
                let index = to_index(&arg).map_err(|kind| kind.at(span))?;
                element_at(&items, index, span)
            }
            ListOp::Map => {
                let function = expect_function(op, arg, span)?;
                let mut mapped = Vec::new();
                for item in snapshot(&items) {
                    mapped.push(self.call_function(&function, vec![item], span)?);
                }
                Ok(Value::array(mapped))
            }
            ListOp::Filter => {
                let function = expect_function(op, arg, span)?;
                let mut kept = Vec::new();
                for item in snapshot(&items) {
                    if self.call_function(&function, vec![item.clone()], span)?.is_truthy() {
                        kept.push(item);
                    }
                }
                Ok(Value::array(kept))
            }
            ListOp::Reduce => {
                let function = expect_function(op, arg, span)?;
                let mut elements = snapshot(&items).into_iter();
                let Some(mut acc) = elements.next() else {
                    return Ok(Value::Nil);
                };
                for item in elements {
                    acc = self.call_function(&function, vec![acc, item], span)?;
                }
                Ok(acc)
            }
        }
    }
}

/// Copy of the elements, so callbacks may mutate the array being walked.
fn snapshot(items: &ArrayRef) -> Vec<Value> {
    items.borrow().clone()
}

fn expect_function(op: ListOp, value: Value, span: Span) -> EvalResult<Rc<Function>> {
    match value {
        Value::Function(function) => Ok(function),
        other => Err(EvalErrorKind::ExpectedFunction {
            op: op.name(),
            found: other.type_name(),
        }
        .at(span)),
    }
}
