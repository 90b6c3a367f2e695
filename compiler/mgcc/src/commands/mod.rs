//! Command handlers for the `mgc` binary.
//!
//! Each submodule implements one command. Option parsing and error reporting
//! shared between them live here.

use std::io::IsTerminal;

use mgc_diagnostic::emitter::{SourceFile, TerminalEmitter};
use mgc_eval::{Interpreter, InterpreterBuilder};

use crate::SessionError;

mod debug;
mod explain;
mod repl;
mod run;

pub use debug::{lex_file, parse_file};
pub use explain::explain_error;
pub use repl::run_repl;
pub use run::{eval_source, run_file};

/// Flags accepted by `run`, `eval` and `repl`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Dump each resolved tree and enable `trace` level events.
    pub trace: bool,
    /// Overrides the interpreter's default call depth limit.
    pub max_call_depth: Option<usize>,
}

impl RunOptions {
    /// Parse option flags, returning the options and the remaining
    /// positional arguments.
    pub fn parse(args: &[String]) -> Result<(RunOptions, Vec<String>), String> {
        let mut options = RunOptions::default();
        let mut positional = Vec::new();
        for arg in args {
            if arg == "--trace" {
                options.trace = true;
            } else if let Some(depth) = arg.strip_prefix("--max-call-depth=") {
                let depth = depth
                    .parse()
                    .map_err(|_| format!("invalid call depth `{depth}`"))?;
                options.max_call_depth = Some(depth);
            } else if arg.starts_with("--") {
                return Err(format!("unknown option `{arg}`"));
            } else {
                positional.push(arg.clone());
            }
        }
        Ok((options, positional))
    }

    pub(crate) fn interpreter(&self) -> Interpreter {
        let mut builder = InterpreterBuilder::new();
        if let Some(depth) = self.max_call_depth {
            builder = builder.max_call_depth(depth);
        }
        builder.build()
    }
}

/// Render a session failure on stderr.
///
/// Syntax and runtime errors print as diagnostics with a source excerpt;
/// I/O failures print a single line.
pub fn report(err: &SessionError, name: &str, source: &str) {
    let diagnostics = err.diagnostics();
    if diagnostics.is_empty() {
        eprintln!("error: {err}");
        return;
    }
    let stderr = std::io::stderr();
    let colors = stderr.is_terminal();
    let mut emitter = TerminalEmitter::new(stderr.lock(), colors);
    if let Err(io_err) = emitter.emit_all(&diagnostics, &SourceFile::new(name, source)) {
        eprintln!("error: {err} ({io_err})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn options_and_positionals_separate() {
        let (options, rest) = RunOptions::parse(&args(&["--trace", "main.mgc", "--max-call-depth=64"]))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            options,
            RunOptions {
                trace: true,
                max_call_depth: Some(64),
            }
        );
        assert_eq!(rest, args(&["main.mgc"]));
    }

    #[test]
    fn bad_flags_are_rejected() {
        assert!(RunOptions::parse(&args(&["--max-call-depth=lots"])).is_err());
        assert!(RunOptions::parse(&args(&["--verbose"])).is_err());
    }
}
