//! A session: one lexer, one resolver and one interpreter shared by every
//! input, so definitions made by one REPL line stay visible to the next.

use std::path::Path;

use mgc_diagnostic::Diagnostic;
use mgc_eval::{EvalError, Interpreter};
use mgc_lexer::Lexer;
use mgc_parse::ParseError;
use mgc_resolve::ScopeResolver;

use crate::dump;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{} syntax error(s)", .0.len())]
    Parse(Vec<ParseError>),

    #[error("{} runtime error(s)", .0.len())]
    Eval(Vec<EvalError>),

    #[error("cannot read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            SessionError::Parse(errors) => errors.iter().map(ParseError::to_diagnostic).collect(),
            SessionError::Eval(errors) => errors.iter().map(EvalError::to_diagnostic).collect(),
            SessionError::Io { .. } => Vec::new(),
        }
    }
}

pub struct Session {
    lexer: Lexer,
    resolver: ScopeResolver,
    interpreter: Interpreter,
    dump_ast: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_interpreter(Interpreter::new())
    }

    pub fn with_interpreter(interpreter: Interpreter) -> Self {
        Session {
            lexer: Lexer::new(),
            resolver: ScopeResolver::new(),
            interpreter,
            dump_ast: false,
        }
    }

    /// Print each resolved syntax tree to stderr before it runs.
    pub fn set_dump_ast(&mut self, on: bool) {
        self.dump_ast = on;
    }

    pub fn dump_ast(&self) -> bool {
        self.dump_ast
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Lex, parse, resolve and evaluate one unit of source.
    ///
    /// A unit with syntax errors is not run at all. Runtime errors are
    /// collected; statements after a failing one still run unless the
    /// failure ends the unit.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn run_source(&mut self, source: &str) -> Result<(), SessionError> {
        let tokens = self.lexer.tokenize(source);
        let parsed = mgc_parse::parse(&tokens);
        if parsed.has_errors() {
            return Err(SessionError::Parse(parsed.errors));
        }

        self.resolver.resolve(&parsed.ast);
        if self.dump_ast {
            eprint!("{}", dump::ast(&parsed.ast));
        }

        let errors = self.interpreter.evaluate(&parsed.ast);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SessionError::Eval(errors))
        }
    }
}

/// Read a source file, mapping failure to [`SessionError::Io`].
pub fn read_source(path: &Path) -> Result<String, SessionError> {
    std::fs::read_to_string(path).map_err(|source| SessionError::Io {
        path: path.display().to_string(),
        source,
    })
}
