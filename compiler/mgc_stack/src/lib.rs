//! Stack growth for deeply nested scripts.
//!
//! The parser, the scope resolver and the evaluator all recurse on the
//! shape of the syntax tree, so a script like `((((...))))` or a long chain
//! of nested blocks maps directly onto host stack frames. Each recursive
//! entry point calls [`ensure_sufficient_stack`], which switches to a freshly
//! allocated segment when the remaining stack drops below [`RED_ZONE`].
//!
//! Language-level recursion is bounded separately by the interpreter's call
//! depth limit; this crate only keeps the host from faulting first.

/// Remaining stack below which a new segment is allocated.
pub const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
pub const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than [`RED_ZONE`] bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// Passthrough on wasm, where the runtime owns the stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
