//! Debug commands: `lex` and `parse` for inspecting the front end.

use std::path::Path;

use super::report;
use crate::{dump, read_source, SessionError};

/// Print the token stream of a file.
pub fn lex_file(path: &str) -> bool {
    let Some(source) = load(path) else {
        return false;
    };
    let tokens = mgc_lexer::tokenize(&source);
    println!("Tokens for '{path}' ({} tokens):", tokens.len());
    print!("{}", dump::tokens(&tokens));
    true
}

/// Print the resolved syntax tree of a file, or its syntax errors.
pub fn parse_file(path: &str) -> bool {
    let Some(source) = load(path) else {
        return false;
    };
    let parsed = mgc_parse::parse(&mgc_lexer::tokenize(&source));
    if parsed.has_errors() {
        report(&SessionError::Parse(parsed.errors), path, &source);
        return false;
    }
    mgc_resolve::resolve(&parsed.ast);
    println!("Syntax tree for '{path}' ({} statements):", parsed.ast.statements.len());
    print!("{}", dump::ast(&parsed.ast));
    true
}

fn load(path: &str) -> Option<String> {
    match read_source(Path::new(path)) {
        Ok(source) => Some(source),
        Err(err) => {
            report(&err, path, "");
            None
        }
    }
}
