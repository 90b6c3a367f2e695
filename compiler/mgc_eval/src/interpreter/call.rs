//! Function calls and class instantiation.

use std::rc::Rc;

use mgc_ir::{Span, Token};

use super::{Flow, Interpreter};
use crate::errors::{EvalErrorKind, EvalResult};
use crate::value::{Function, Instance};
use crate::Value;

impl Interpreter {
    /// Call `function` with already-evaluated arguments.
    ///
    /// The call scope is lexically inside the function's closure and returns
    /// to the caller's scope. Missing trailing arguments take their defaults,
    /// evaluated in the call scope after the earlier parameters are bound.
    #[tracing::instrument(level = "debug", skip_all, fields(function = function.decl.display_name(), args = args.len()))]
    pub(crate) fn call_function(&mut self, function: &Rc<Function>, args: Vec<Value>, span: Span) -> EvalResult<Value> {
        let decl = &function.decl;
        let min = decl.min_args();
        let max = decl.params.len();
        if args.len() < min || args.len() > max {
            let expected = if min == max {
                max.to_string()
            } else {
                format!("{min} to {max}")
            };
            return Err(EvalErrorKind::ArityMismatch {
                name: decl.display_name().to_string(),
                expected,
                found: args.len(),
                defined_at: decl.name.as_ref().map_or(decl.span, |name| name.span),
            }
            .at(span));
        }
        if self.call_depth >= self.max_call_depth {
            return Err(EvalErrorKind::StackOverflow {
                limit: self.max_call_depth,
            }
            .at(span));
        }

        let scope = self.env.child_of(&function.closure);
        self.call_depth += 1;
        let flow = self.with_scope(scope, |interp| {
            let mut args = args.into_iter();
            for param in &decl.params {
                let value = match (args.next(), &param.init) {
                    (Some(value), _) => value,
                    (None, Some(default)) => interp.eval(default)?,
                    (None, None) => Value::Nil,
                };
                interp.env.define(Rc::clone(&param.name.text), value);
            }
            interp.exec_block(&decl.body)
        });
        self.call_depth -= 1;

        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }

    /// `new Class`: run the class body in a fresh scope and keep that scope as
    /// the instance's fields.
    pub(crate) fn instantiate(&mut self, class: &Token, span: Span) -> EvalResult<Value> {
        let value = self
            .env
            .lookup(&class.text, class.depth())
            .map_err(|_| {
                EvalErrorKind::UndefinedVariable {
                    name: class.text.to_string(),
                }
                .at(class.span)
            })?;
        let Value::Class(class_value) = value else {
            return Err(EvalErrorKind::NotAClass {
                name: class.text.to_string(),
            }
            .at(span));
        };

        let fields = self.env.child_of(&class_value.closure);
        self.with_scope(fields.clone(), |interp| interp.exec_block(&class_value.decl.body))?;
        tracing::debug!(class = class_value.name(), fields = fields.borrow().len(), "instance created");

        Ok(Value::Instance(Rc::new(Instance {
            class: class_value,
            fields,
        })))
    }
}
