//! The `run` and `eval` commands.

use std::path::Path;

use super::{report, RunOptions};
use crate::tracing_setup::TraceControl;
use crate::{read_source, Session};

/// Run a source file in a fresh session. Returns `false` if anything was
/// reported.
pub fn run_file(path: &str, options: &RunOptions, tracing: Option<&TraceControl>) -> bool {
    let source = match read_source(Path::new(path)) {
        Ok(source) => source,
        Err(err) => {
            report(&err, path, "");
            return false;
        }
    };
    run(path, &source, options, tracing)
}

/// Run source given on the command line.
pub fn eval_source(source: &str, options: &RunOptions, tracing: Option<&TraceControl>) -> bool {
    run("<eval>", source, options, tracing)
}

fn run(name: &str, source: &str, options: &RunOptions, tracing: Option<&TraceControl>) -> bool {
    if options.trace {
        if let Some(control) = tracing {
            control.set_verbose(true);
        }
    }
    let mut session = Session::with_interpreter(options.interpreter());
    session.set_dump_ast(options.trace);
    match session.run_source(source) {
        Ok(()) => true,
        Err(err) => {
            report(&err, name, source);
            false
        }
    }
}
