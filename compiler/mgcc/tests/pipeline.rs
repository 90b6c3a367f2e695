//! End-to-end tests: source text through lexer, parser, resolver and
//! interpreter inside a [`Session`].

use std::path::Path;

use mgc_diagnostic::emitter::{render, SourceFile};
use mgc_diagnostic::ErrorCode;
use mgc_eval::{buffer_handler, EvalErrorKind, InterpreterBuilder, SharedPrintHandler};
use mgcc::{read_source, Session, SessionError};
use pretty_assertions::assert_eq;

fn session() -> (Session, SharedPrintHandler) {
    let handler = buffer_handler();
    let interpreter = InterpreterBuilder::new()
        .print_handler(handler.clone())
        .build();
    (Session::with_interpreter(interpreter), handler)
}

fn output(source: &str) -> String {
    let (mut session, handler) = session();
    if let Err(err) = session.run_source(source) {
        panic!("{source:?} failed: {err:?}");
    }
    handler.output()
}

fn codes(err: &SessionError) -> Vec<ErrorCode> {
    err.diagnostics().iter().map(|d| d.code).collect()
}

#[test]
fn default_parameter_fills_missing_argument() {
    assert_eq!(
        output("def f(let x, let y := 1) { return x + y; } println f(4);"),
        "5\n"
    );
}

#[test]
fn arity_error_skips_the_body() {
    let (mut session, handler) = session();
    let err = session
        .run_source(r#"def f(let x) { println "body"; return x; } f(1, 2);"#)
        .err()
        .unwrap_or_else(|| panic!("expected an arity error"));
    let SessionError::Eval(errors) = &err else {
        panic!("expected runtime errors, got {err:?}");
    };
    assert!(matches!(
        errors[0].kind,
        EvalErrorKind::ArityMismatch { found: 2, .. }
    ));
    assert_eq!(codes(&err), vec![ErrorCode::E2004]);
    let source = r#"def f(let x) { println "body"; return x; } f(1, 2);"#;
    let rendered = render(&err.diagnostics(), &SourceFile::new("demo.mgc", source));
    assert!(rendered.contains("::: demo.mgc:1:5"), "{rendered}");
    assert_eq!(handler.output(), "");
}

#[test]
fn closure_keeps_its_parameter() {
    assert_eq!(
        output("def make(let n) { return lambda() => n; } let g := make(5); println g();"),
        "5\n"
    );
}

#[test]
fn shadowed_binding_restored_after_block() {
    assert_eq!(
        output("let a := 1; { let a := 2; println a; } println a;"),
        "2\n1\n"
    );
}

#[test]
fn arrays_are_shared_between_bindings() {
    assert_eq!(
        output("let a := [1, 2, 3]; let b := a; push(b, 0); println a;"),
        "[0, 1, 2, 3]\n"
    );
}

#[test]
fn regex_match_operator() {
    let source = r#"
        println "ad" =~ "a(b|c)*d";
        println "abcbcd" =~ "a(b|c)*d";
        println "abx" =~ "a(b|c)*d";
        println "" =~ "";
    "#;
    assert_eq!(output(source), "true\ntrue\nfalse\ntrue\n");
}

#[test]
fn syntax_error_prevents_evaluation() {
    let (mut session, handler) = session();
    let err = session
        .run_source(r#"println "before"; let := 3;"#)
        .err()
        .unwrap_or_else(|| panic!("expected a syntax error"));
    assert!(matches!(err, SessionError::Parse(_)));
    assert_eq!(codes(&err), vec![ErrorCode::E1004]);
    assert_eq!(handler.output(), "");
}

#[test]
fn definitions_persist_between_units() {
    let (mut session, handler) = session();
    for line in [
        "let total := 0;",
        "def add(let n) { total += n; return total; }",
        "add(3); add(4);",
        "println total;",
    ] {
        if let Err(err) = session.run_source(line) {
            panic!("{line:?} failed: {err:?}");
        }
    }
    assert_eq!(handler.output(), "7\n");
    assert_eq!(
        session.interpreter().global("total").map(|v| v.to_string()),
        Some("7".to_string())
    );
}

#[test]
fn session_recovers_after_runtime_error() {
    let (mut session, handler) = session();
    assert!(session.run_source("println missing;").is_err());
    assert!(session.run_source("println 1;").is_ok());
    assert_eq!(handler.output(), "1\n");
}

#[test]
fn runtime_errors_render_with_location() {
    let (mut session, _) = session();
    let source = "let a := 1;\nprintln a - \"x\";\n";
    let err = session
        .run_source(source)
        .err()
        .unwrap_or_else(|| panic!("expected a type error"));
    let rendered = render(&err.diagnostics(), &SourceFile::new("demo.mgc", source));
    assert!(rendered.starts_with("error[E2002]"), "{rendered}");
    assert!(rendered.contains("--> demo.mgc:2:9"), "{rendered}");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = read_source(Path::new("does/not/exist.mgc"))
        .err()
        .unwrap_or_else(|| panic!("expected an I/O error"));
    assert!(matches!(err, SessionError::Io { .. }));
    assert!(err.diagnostics().is_empty());
    assert!(err.to_string().starts_with("cannot read `does/not/exist.mgc`"));
}

#[test]
fn classes_and_higher_order_primitives() {
    let source = "
        class Stack {
            let items := [];
            def add(let x) { append(items, x); return size(items); }
        }
        let s := new Stack;
        s.add(1); s.add(2);
        println map(s.items, lambda(let x) => x * 10);
        println reduce(s.items, lambda(let a, let b) => a + b);
    ";
    assert_eq!(output(source), "[10, 20]\n3\n");
}
