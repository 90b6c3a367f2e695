//! Driver for the mgc scripting language.
//!
//! [`Session`] owns the lexer, resolver and interpreter shared by every unit
//! of input. The `mgc` binary in `main.rs` wraps it with a file runner, an
//! inline evaluator, debug dumps and a REPL.

pub mod commands;
pub mod dump;
mod session;
pub mod tracing_setup;

pub use session::{read_source, Session, SessionError};
