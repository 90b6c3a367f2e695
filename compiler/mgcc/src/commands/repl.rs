//! Interactive read-eval-print loop.
//!
//! Every line is one unit of source run in a shared [`Session`], so
//! definitions persist from line to line. Lines starting with `.` are REPL
//! commands.

use std::io::{self, BufRead, Write};

use super::{report, RunOptions};
use crate::tracing_setup::TraceControl;
use crate::Session;

const PROMPT: &str = "mgc> ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Line<'a> {
    Empty,
    Quit,
    Trace,
    Help,
    Unknown(&'a str),
    Source(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    match trimmed {
        "" => Line::Empty,
        ".quit" | ".exit" => Line::Quit,
        ".trace" => Line::Trace,
        ".help" => Line::Help,
        _ if trimmed.starts_with('.') => Line::Unknown(trimmed),
        _ => Line::Source(line),
    }
}

/// Run the REPL on stdin until `.quit` or end of input.
pub fn run_repl(options: &RunOptions, tracing: Option<&TraceControl>) -> io::Result<()> {
    let mut session = Session::with_interpreter(options.interpreter());
    set_trace(&mut session, tracing, options.trace);

    println!("mgc {} (type .help for commands)", env!("CARGO_PKG_VERSION"));
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut buffer = String::new();
    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        buffer.clear();
        if input.read_line(&mut buffer)? == 0 {
            println!();
            return Ok(());
        }

        match classify(&buffer) {
            Line::Empty => {}
            Line::Quit => return Ok(()),
            Line::Trace => {
                let on = !session.dump_ast();
                set_trace(&mut session, tracing, on);
                println!("tracing {}", if on { "on" } else { "off" });
            }
            Line::Help => print_help(),
            Line::Unknown(command) => {
                eprintln!("unknown command `{command}`; type .help for a list");
            }
            Line::Source(source) => {
                if let Err(err) = session.run_source(source) {
                    report(&err, "<repl>", source);
                }
            }
        }
    }
}

fn set_trace(session: &mut Session, tracing: Option<&TraceControl>, on: bool) {
    session.set_dump_ast(on);
    if let Some(control) = tracing {
        control.set_verbose(on);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  .trace   Toggle syntax tree dumps and trace events");
    println!("  .help    Show this message");
    println!("  .quit    Leave the REPL (also .exit or end of input)");
}
