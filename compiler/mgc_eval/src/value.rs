//! Runtime values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use mgc_ir::{ClassDecl, FunctionDecl};
use mgc_stack::ensure_sufficient_stack;

use crate::environment::{LocalScope, Scope};

/// Arrays are shared: assigning one to another variable aliases it.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

#[derive(Clone)]
pub enum Value {
    Number(f64),
    Str(Rc<str>),
    Bool(bool),
    Function(Rc<Function>),
    Array(ArrayRef),
    Nil,
    Class(Rc<Class>),
    Instance(Rc<Instance>),
}

/// A named function or lambda together with the scope it was created in.
pub struct Function {
    pub decl: Rc<FunctionDecl>,
    pub closure: LocalScope<Scope>,
}

impl Function {
    pub fn name(&self) -> Option<&str> {
        self.decl.name.as_ref().map(|t| &*t.text)
    }
}

pub struct Class {
    pub decl: Rc<ClassDecl>,
    pub closure: LocalScope<Scope>,
}

impl Class {
    pub fn name(&self) -> &str {
        &self.decl.name.text
    }
}

/// Object created by `new`; its fields are the bindings left in the scope the
/// class body ran in.
pub struct Instance {
    pub class: Rc<Class>,
    pub fields: LocalScope<Scope>,
}

impl Value {
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn string(text: impl Into<Rc<str>>) -> Self {
        Value::Str(text.into())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::Function(_) => "function",
            Value::Array(_) => "array",
            Value::Nil => "nil",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }

    /// `false` and `nil` are falsy; everything else, including `0` and `""`,
    /// is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false) | Value::Nil)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    /// Numbers, strings and booleans compare by value, arrays element-wise,
    /// and functions, classes and instances by identity.
    fn eq(&self, other: &Self) -> bool {
        eq_inner(self, other, &mut Vec::new())
    }
}

type ArrayPtr = *const RefCell<Vec<Value>>;

/// A pair of arrays already under comparison counts as equal, so
/// self-referencing arrays compare by shape instead of recursing forever.
fn eq_inner(left: &Value, right: &Value, visited: &mut Vec<(ArrayPtr, ArrayPtr)>) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Nil, Value::Nil) => true,
        (Value::Array(a), Value::Array(b)) => {
            if Rc::ptr_eq(a, b) {
                return true;
            }
            let pair = (Rc::as_ptr(a), Rc::as_ptr(b));
            if visited.contains(&pair) {
                return true;
            }
            let (Ok(a), Ok(b)) = (a.try_borrow(), b.try_borrow()) else {
                return false;
            };
            if a.len() != b.len() {
                return false;
            }
            visited.push(pair);
            let equal = ensure_sufficient_stack(|| {
                a.iter().zip(b.iter()).all(|(x, y)| eq_inner(x, y, visited))
            });
            visited.pop();
            equal
        }
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
        (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(self, f, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s:?}"),
            other => write!(f, "{other}"),
        }
    }
}

/// `open` holds the arrays currently being written so a self-containing
/// array prints `[...]` instead of recursing forever.
fn write_value(value: &Value, f: &mut fmt::Formatter<'_>, open: &mut Vec<ArrayPtr>) -> fmt::Result {
    match value {
        Value::Number(n) => write!(f, "{n}"),
        Value::Str(s) => f.write_str(s),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Nil => f.write_str("nil"),
        Value::Function(func) => match func.name() {
            Some(name) => write!(f, "<fn {name}>"),
            None => f.write_str("<lambda>"),
        },
        Value::Class(class) => write!(f, "<class {}>", class.name()),
        Value::Instance(instance) => write!(f, "<{} instance>", instance.class.name()),
        Value::Array(items) => {
            let ptr = Rc::as_ptr(items);
            if open.contains(&ptr) {
                return f.write_str("[...]");
            }
            let Ok(items) = items.try_borrow() else {
                return f.write_str("[...]");
            };
            open.push(ptr);
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(item, f, open)?;
            }
            open.pop();
            f.write_str("]")
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.decl.display_name())
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name())
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} instance>", self.class.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_print_without_trailing_zero() {
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
    }

    #[test]
    fn arrays_print_their_elements() {
        let nested = Value::array(vec![Value::Number(1.0), Value::array(vec![]), "x".into()]);
        assert_eq!(nested.to_string(), "[1, [], x]");
    }

    #[test]
    fn self_containing_array_prints() {
        let a = Value::array(vec![Value::Number(1.0)]);
        if let Value::Array(items) = &a {
            items.borrow_mut().push(a.clone());
        }
        assert_eq!(a.to_string(), "[1, [...]]");
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::string("").is_truthy());
        assert!(Value::array(vec![]).is_truthy());
    }

    #[test]
    fn equality() {
        assert_eq!(Value::Number(1.0), Value::Number(1.0));
        assert_ne!(Value::Number(1.0), Value::string("1"));
        assert_eq!(
            Value::array(vec![Value::Number(1.0)]),
            Value::array(vec![Value::Number(1.0)])
        );
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_eq!(Value::Nil, Value::Nil);
    }
}
