//! Operator dispatch.
//!
//! Direct matching on `(op, left, right)`. `and`, `or` and `=~` are not here:
//! the first two short-circuit and `=~` needs the interpreter's pattern cache.

use mgc_ir::{BinaryOp, UnaryOp};

use crate::errors::EvalErrorKind;
use crate::Value;

pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalErrorKind> {
    use Value::{Number, Str};

    match (op, left, right) {
        (BinaryOp::Add, Number(a), Number(b)) => Ok(Number(a + b)),
        (BinaryOp::Add, _, _) => Ok(Value::string(format!("{left}{right}"))),

        (BinaryOp::Sub, Number(a), Number(b)) => Ok(Number(a - b)),
        (BinaryOp::Mul, Number(a), Number(b)) => Ok(Number(a * b)),
        (BinaryOp::Div, Number(a), Number(b)) => Ok(Number(a / b)),
        (BinaryOp::Mod, Number(a), Number(b)) => Ok(Number(a % b)),

        (BinaryOp::Lt, Number(a), Number(b)) => Ok(Value::Bool(a < b)),
        (BinaryOp::Gt, Number(a), Number(b)) => Ok(Value::Bool(a > b)),
        (BinaryOp::LtEq, Number(a), Number(b)) => Ok(Value::Bool(a <= b)),
        (BinaryOp::GtEq, Number(a), Number(b)) => Ok(Value::Bool(a >= b)),
        (BinaryOp::Lt, Str(a), Str(b)) => Ok(Value::Bool(a < b)),
        (BinaryOp::Gt, Str(a), Str(b)) => Ok(Value::Bool(a > b)),
        (BinaryOp::LtEq, Str(a), Str(b)) => Ok(Value::Bool(a <= b)),
        (BinaryOp::GtEq, Str(a), Str(b)) => Ok(Value::Bool(a >= b)),

        (BinaryOp::Eq, _, _) => Ok(Value::Bool(left == right)),
        (BinaryOp::NotEq, _, _) => Ok(Value::Bool(left != right)),

        (BinaryOp::And, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a && *b)),
        (BinaryOp::Or, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a || *b)),

        _ => Err(mismatch(op, left, right)),
    }
}

pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> Result<Value, EvalErrorKind> {
    match (op, operand) {
        (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOp::Increment, Value::Number(n)) => Ok(Value::Number(n + 1.0)),
        (UnaryOp::Decrement, Value::Number(n)) => Ok(Value::Number(n - 1.0)),
        _ => Err(EvalErrorKind::UnaryTypeMismatch {
            op: unary_symbol(op),
            operand: operand.type_name(),
        }),
    }
}

fn mismatch(op: BinaryOp, left: &Value, right: &Value) -> EvalErrorKind {
    EvalErrorKind::BinaryTypeMismatch {
        op: op.as_symbol(),
        left: left.type_name(),
        right: right.type_name(),
    }
}

fn unary_symbol(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "-",
        UnaryOp::Increment => "++",
        UnaryOp::Decrement => "--",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn arithmetic() {
        assert_eq!(evaluate_binary(BinaryOp::Add, &num(2.0), &num(3.0)), Ok(num(5.0)));
        assert_eq!(evaluate_binary(BinaryOp::Mod, &num(7.0), &num(3.0)), Ok(num(1.0)));
        assert_eq!(evaluate_binary(BinaryOp::Mod, &num(-7.0), &num(3.0)), Ok(num(-1.0)));
        assert_eq!(
            evaluate_binary(BinaryOp::Div, &num(1.0), &num(0.0)),
            Ok(num(f64::INFINITY))
        );
    }

    #[test]
    fn plus_concatenates_display_strings() {
        assert_eq!(
            evaluate_binary(BinaryOp::Add, &"n = ".into(), &num(4.0)),
            Ok(Value::string("n = 4"))
        );
        assert_eq!(
            evaluate_binary(BinaryOp::Add, &Value::array(vec![num(1.0)]), &Value::Nil),
            Ok(Value::string("[1]nil"))
        );
    }

    #[test]
    fn comparisons() {
        assert_eq!(evaluate_binary(BinaryOp::LtEq, &num(2.0), &num(2.0)), Ok(Value::Bool(true)));
        assert_eq!(evaluate_binary(BinaryOp::Lt, &"abc".into(), &"abd".into()), Ok(Value::Bool(true)));
        assert_eq!(
            evaluate_binary(BinaryOp::Lt, &"a".into(), &num(1.0)),
            Err(EvalErrorKind::BinaryTypeMismatch {
                op: "<",
                left: "string",
                right: "number"
            })
        );
    }

    #[test]
    fn equality_across_types_is_false() {
        assert_eq!(evaluate_binary(BinaryOp::Eq, &num(1.0), &"1".into()), Ok(Value::Bool(false)));
        assert_eq!(evaluate_binary(BinaryOp::NotEq, &Value::Nil, &Value::Bool(false)), Ok(Value::Bool(true)));
    }

    #[test]
    fn subtraction_needs_numbers() {
        assert_eq!(
            evaluate_binary(BinaryOp::Sub, &"a".into(), &num(1.0)),
            Err(EvalErrorKind::BinaryTypeMismatch {
                op: "-",
                left: "string",
                right: "number"
            })
        );
    }

    #[test]
    fn unary() {
        assert_eq!(evaluate_unary(UnaryOp::Neg, &num(2.0)), Ok(num(-2.0)));
        assert_eq!(evaluate_unary(UnaryOp::Decrement, &num(2.0)), Ok(num(1.0)));
        assert_eq!(
            evaluate_unary(UnaryOp::Increment, &Value::Nil),
            Err(EvalErrorKind::UnaryTypeMismatch {
                op: "++",
                operand: "nil"
            })
        );
    }
}
