//! Diagnostics for every phase of the mgc pipeline.
//!
//! Each phase keeps its own typed error enum; those errors convert into a
//! [`Diagnostic`] carrying an [`ErrorCode`], a message and labeled spans.
//! The [`emitter`] renders diagnostics against the source text for the
//! terminal.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::{ErrorCode, UnknownErrorCode};
