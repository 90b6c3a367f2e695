//! mgc command-line interface.

use mgcc::commands::{
    eval_source, explain_error, lex_file, parse_file, run_file, run_repl, RunOptions,
};
use mgcc::tracing_setup::init_tracing;

fn main() {
    let tracing = init_tracing();
    let args: Vec<String> = std::env::args().collect();

    let Some(command) = args.get(1) else {
        repl(&[], tracing);
        return;
    };

    let ok = match command.as_str() {
        "repl" => {
            repl(&args[2..], tracing);
            true
        }
        "run" => {
            let (options, rest) = options_or_exit(&args[2..]);
            let [path] = rest.as_slice() else {
                eprintln!("Usage: mgc run <file.mgc> [--trace] [--max-call-depth=N]");
                std::process::exit(1);
            };
            run_file(path, &options, tracing)
        }
        "eval" => {
            let (options, rest) = options_or_exit(&args[2..]);
            if rest.is_empty() {
                eprintln!("Usage: mgc eval <source> [--trace] [--max-call-depth=N]");
                std::process::exit(1);
            }
            eval_source(&rest.join(" "), &options, tracing)
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: mgc lex <file.mgc>");
                std::process::exit(1);
            }
            lex_file(&args[2])
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: mgc parse <file.mgc>");
                std::process::exit(1);
            }
            parse_file(&args[2])
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: mgc explain <ERROR_CODE>");
                eprintln!("Example: mgc explain E2004");
                std::process::exit(1);
            }
            explain_error(&args[2])
        }
        "help" | "--help" | "-h" => {
            print_usage();
            true
        }
        "version" | "--version" | "-V" => {
            println!("mgc {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("mgc"))
            {
                let (options, _) = options_or_exit(&args[2..]);
                run_file(command, &options, tracing)
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                false
            }
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

fn repl(args: &[String], tracing: Option<&'static mgcc::tracing_setup::TraceControl>) {
    let (options, _) = options_or_exit(args);
    if let Err(err) = run_repl(&options, tracing) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn options_or_exit(args: &[String]) -> (RunOptions, Vec<String>) {
    match RunOptions::parse(args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("mgc, a small scripting language with closures, classes and regex matching");
    println!();
    println!("Usage: mgc [command] [options]");
    println!();
    println!("Commands:");
    println!("  repl                 Start the interactive prompt (default)");
    println!("  run <file.mgc>       Run a program");
    println!("  eval <source>        Run source given on the command line");
    println!("  lex <file.mgc>       Tokenize and display tokens");
    println!("  parse <file.mgc>     Parse, resolve and display the syntax tree");
    println!("  explain <code>       Explain an error code (e.g., E2004)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options for repl, run and eval:");
    println!("  --trace              Dump syntax trees and show trace events");
    println!("  --max-call-depth=N   Limit nested calls (default 10000)");
    println!();
    println!("Environment:");
    println!("  RUST_LOG             Starting log filter (default: warn)");
    println!();
    println!("Examples:");
    println!("  mgc main.mgc");
    println!("  mgc eval 'println [1, 2, 3];'");
    println!("  mgc explain E2007");
}
