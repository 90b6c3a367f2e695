//! Operand stack for expression evaluation.
//!
//! Every expression pushes exactly one value. Operators pop their operands in
//! reverse order and push their result, so after a statement the stack is back
//! at the height it started from.

use crate::Value;

#[derive(Debug, Default)]
pub struct ValueStack {
    values: Vec<Value>,
}

impl ValueStack {
    pub fn new() -> Self {
        ValueStack::default()
    }

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Value> {
        self.values.pop()
    }

    /// Pop the top `n` values, returned bottom first.
    pub fn pop_n(&mut self, n: usize) -> Option<Vec<Value>> {
        let start = self.values.len().checked_sub(n)?;
        Some(self.values.split_off(start))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop everything above `len`.
    pub fn truncate(&mut self, len: usize) {
        self.values.truncate(len);
    }
}
