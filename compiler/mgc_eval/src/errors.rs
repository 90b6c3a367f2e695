//! Evaluation errors.
//!
//! Every error carries the span of the expression or statement that raised
//! it. [`EvalError::to_diagnostic`] maps each kind onto its `E2xxx` code.

use mgc_diagnostic::{Diagnostic, ErrorCode};
use mgc_ir::Span;
use mgc_regex::RegexError;

pub type EvalResult<T = ()> = Result<T, EvalError>;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("undefined variable `{name}`")]
    UndefinedVariable { name: String },

    #[error("`{name}` was never resolved")]
    Unresolved { name: String },

    #[error("cannot apply `{op}` to {left} and {right}")]
    BinaryTypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("cannot apply `{op}` to {operand}")]
    UnaryTypeMismatch { op: &'static str, operand: &'static str },

    #[error("`{op}` expects bool operands, found {found}")]
    ExpectedBool { op: &'static str, found: &'static str },

    #[error("`{op}` expects string operands, found {found}")]
    ExpectedString { op: &'static str, found: &'static str },

    #[error("`{name}` takes {expected} argument(s) but {found} were supplied")]
    ArityMismatch {
        name: String,
        expected: String,
        found: usize,
        /// Name of the function, or the whole lambda.
        defined_at: Span,
    },

    #[error("{found} is not callable")]
    NotCallable { found: &'static str },

    #[error("index {index} is out of bounds for an array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("`{op}` expects an array, found {found}")]
    ExpectedArray { op: &'static str, found: &'static str },

    #[error("`{op}` expects a function, found {found}")]
    ExpectedFunction { op: &'static str, found: &'static str },

    #[error("array index must be a non-negative integer, found {found}")]
    InvalidIndex { found: String },

    #[error("invalid literal `{text}`")]
    InvalidLiteral { text: String },

    #[error("maximum call depth of {limit} exceeded")]
    StackOverflow { limit: usize },

    #[error("`{name}` is not a class")]
    NotAClass { name: String },

    #[error("`{class}` instance has no member `{member}`")]
    NoSuchMember { class: String, member: String },

    #[error("cannot access member `{member}` on {found}")]
    NotAnInstance { member: String, found: &'static str },

    #[error("invalid pattern: {0}")]
    Regex(#[from] RegexError),

    #[error("expression cannot be assigned to")]
    InvalidTarget,

    #[error("value stack underflow")]
    StackUnderflow,
}

impl EvalErrorKind {
    pub fn at(self, span: Span) -> EvalError {
        EvalError { kind: self, span }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            EvalErrorKind::UndefinedVariable { .. } => ErrorCode::E2001,
            EvalErrorKind::BinaryTypeMismatch { .. } => ErrorCode::E2002,
            EvalErrorKind::UnaryTypeMismatch { .. } => ErrorCode::E2003,
            EvalErrorKind::ArityMismatch { .. } => ErrorCode::E2004,
            EvalErrorKind::NotCallable { .. } => ErrorCode::E2005,
            EvalErrorKind::IndexOutOfBounds { .. } => ErrorCode::E2006,
            EvalErrorKind::ExpectedArray { .. } => ErrorCode::E2007,
            EvalErrorKind::ExpectedFunction { .. } => ErrorCode::E2008,
            EvalErrorKind::InvalidIndex { .. } => ErrorCode::E2009,
            EvalErrorKind::StackOverflow { .. } => ErrorCode::E2010,
            EvalErrorKind::NotAClass { .. } => ErrorCode::E2011,
            EvalErrorKind::NoSuchMember { .. } => ErrorCode::E2012,
            EvalErrorKind::NotAnInstance { .. } => ErrorCode::E2013,
            EvalErrorKind::ExpectedBool { .. } => ErrorCode::E2014,
            EvalErrorKind::ExpectedString { .. } => ErrorCode::E2015,
            EvalErrorKind::Regex(
                RegexError::TooManyStates { .. } | RegexError::NestingTooDeep { .. },
            ) => ErrorCode::E3002,
            EvalErrorKind::Regex(_) => ErrorCode::E3001,
            EvalErrorKind::Unresolved { .. }
            | EvalErrorKind::InvalidLiteral { .. }
            | EvalErrorKind::InvalidTarget
            | EvalErrorKind::StackUnderflow => ErrorCode::E9001,
        }
    }
}

/// A runtime error at a source location.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Span,
}

impl EvalError {
    /// Errors after which the rest of the unit is not run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            EvalErrorKind::IndexOutOfBounds { .. } | EvalErrorKind::StackUnderflow
        )
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.kind.code())
            .with_message(self.kind.to_string())
            .with_label(self.span, self.label());
        match &self.kind {
            EvalErrorKind::ArityMismatch { defined_at, .. } => diagnostic
                .with_secondary_label(*defined_at, "defined here")
                .with_note("parameters with a default value may be omitted"),
            EvalErrorKind::StackOverflow { .. } => {
                diagnostic.with_note("the limit is set with `--max-call-depth`")
            }
            _ => diagnostic,
        }
    }

    fn label(&self) -> String {
        match &self.kind {
            EvalErrorKind::UndefinedVariable { .. } => "not found in scope".to_string(),
            EvalErrorKind::BinaryTypeMismatch { .. }
            | EvalErrorKind::UnaryTypeMismatch { .. }
            | EvalErrorKind::ExpectedBool { .. }
            | EvalErrorKind::ExpectedString { .. } => "operand types do not fit".to_string(),
            EvalErrorKind::ArityMismatch { found, .. } => format!("called with {found}"),
            EvalErrorKind::IndexOutOfBounds { index, .. } => format!("index {index}"),
            EvalErrorKind::Regex(_) => "in this pattern".to_string(),
            _ => String::new(),
        }
    }
}
