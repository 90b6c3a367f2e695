use super::*;
use crate::print_handler::buffer_handler;
use pretty_assertions::assert_eq;

fn run_with(interpreter: &mut Interpreter, source: &str) -> Vec<EvalError> {
    let tokens = mgc_lexer::tokenize(source);
    let parsed = mgc_parse::parse(&tokens);
    assert!(
        parsed.errors.is_empty(),
        "parse errors in {source:?}: {:?}",
        parsed.errors
    );
    mgc_resolve::resolve(&parsed.ast);
    interpreter.evaluate(&parsed.ast)
}

fn run(source: &str) -> (String, Vec<EvalError>) {
    let handler = buffer_handler();
    let mut interpreter = InterpreterBuilder::new()
        .print_handler(handler.clone())
        .build();
    let errors = run_with(&mut interpreter, source);
    assert_eq!(interpreter.stack_len(), 0, "value stack not balanced");
    (handler.output(), errors)
}

fn output(source: &str) -> String {
    let (out, errors) = run(source);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    out
}

fn error_kinds(source: &str) -> Vec<EvalErrorKind> {
    run(source).1.into_iter().map(|e| e.kind).collect()
}

#[test]
fn arithmetic_and_display() {
    assert_eq!(output("println 1 + 2 * 3"), "7\n");
    assert_eq!(output("println 10 / 4; println 7 % 3"), "2.5\n1\n");
    assert_eq!(output("println -(2 - 5)"), "3\n");
    assert_eq!(output(r#"println "n = " + 4"#), "n = 4\n");
    assert_eq!(output(r#"print "a"; print "b"; println """#), "ab\n");
    assert_eq!(output("println 1 / 0"), "inf\n");
}

#[test]
fn comparisons_and_logic() {
    assert_eq!(output("println 1 < 2 and 2 <= 2"), "true\n");
    assert_eq!(output("println 1 == 1 or 1 != 1"), "true\n");
    assert_eq!(output(r#"println "abc" < "abd""#), "true\n");
    assert_eq!(output(r#"println 1 == "1""#), "false\n");
}

#[test]
fn logic_short_circuits() {
    assert_eq!(output("println false and nope"), "false\n");
    assert_eq!(output("println true or nope"), "true\n");
}

#[test]
fn logic_requires_bools() {
    assert_eq!(
        error_kinds("println 1 and true"),
        vec![EvalErrorKind::ExpectedBool {
            op: "and",
            found: "number"
        }]
    );
}

#[test]
fn default_parameter() {
    let source = "def f(let x, let y := 1) { return x + y; } println f(4); println f(4, 2)";
    assert_eq!(output(source), "5\n6\n");
}

#[test]
fn default_sees_earlier_parameters() {
    let source = "def f(let x, let y := x * 10) { return y; } println f(3)";
    assert_eq!(output(source), "30\n");
}

#[test]
fn arity_mismatch_does_not_run_the_body() {
    let (out, errors) = run(r#"def f(let x) { println "body"; return x; } f(1, 2)"#);
    assert_eq!(out, "");
    assert_eq!(
        errors.into_iter().map(|e| e.kind).collect::<Vec<_>>(),
        vec![EvalErrorKind::ArityMismatch {
            name: "f".to_string(),
            expected: "1".to_string(),
            found: 2,
            defined_at: Span::new(4, 5),
        }]
    );
}

#[test]
fn missing_required_argument() {
    let kinds = error_kinds("def f(let x, let y := 1) { return x; } f()");
    assert_eq!(
        kinds,
        vec![EvalErrorKind::ArityMismatch {
            name: "f".to_string(),
            expected: "1 to 2".to_string(),
            found: 0,
            defined_at: Span::new(4, 5),
        }]
    );
}

#[test]
fn function_without_return_yields_nil() {
    assert_eq!(output("def f() { let x := 1; } println f()"), "nil\n");
}

#[test]
fn closure_captures_defining_scope() {
    let source = "
        def make(let n) { return lambda() => n; }
        let g := make(5);
        let n := 99;
        println g();
    ";
    assert_eq!(output(source), "5\n");
}

#[test]
fn closures_share_captured_state() {
    let source = "
        def counter() {
            let count := 0;
            return lambda() { count += 1; return count; };
        }
        let tick := counter();
        tick();
        tick();
        println tick();
    ";
    assert_eq!(output(source), "3\n");
}

#[test]
fn shadowing_in_nested_blocks() {
    let source = "{ let a := 1; { let a := 2; println a; } println a; }";
    assert_eq!(output(source), "2\n1\n");
}

#[test]
fn inner_block_writes_outer_binding() {
    let source = "{ let a := 1; { a := 2; } println a; }";
    assert_eq!(output(source), "2\n");
}

#[test]
fn recursion() {
    let source = "
        def fib(let n) {
            if (n < 2) { return n; }
            return fib(n - 1) + fib(n - 2);
        }
        println fib(15);
    ";
    assert_eq!(output(source), "610\n");
}

#[test]
fn deep_recursion_below_the_limit() {
    let source = "
        def down(let n) { if (n == 0) { return 0; } return down(n - 1); }
        println down(3000);
    ";
    assert_eq!(output(source), "0\n");
}

#[test]
fn call_depth_limit() {
    let handler = buffer_handler();
    let mut interpreter = InterpreterBuilder::new()
        .print_handler(handler.clone())
        .max_call_depth(50)
        .build();
    let errors = run_with(
        &mut interpreter,
        "def f(let n) { return f(n + 1); } f(0); println \"after\"",
    );
    assert_eq!(
        errors.into_iter().map(|e| e.kind).collect::<Vec<_>>(),
        vec![EvalErrorKind::StackOverflow { limit: 50 }]
    );
    assert_eq!(handler.output(), "after\n");
    assert!(interpreter.env.is_global());
    assert_eq!(interpreter.call_depth, 0);
}

#[test]
fn return_unwinds_through_loops() {
    let source = "
        def find(let xs, let target) {
            let i := 0;
            while (i < size(xs)) {
                if (xs[i] == target) { return i; }
                i++;
            }
            return -1;
        }
        println find([4, 5, 6], 6);
        println find([4, 5, 6], 7);
    ";
    assert_eq!(output(source), "2\n-1\n");
}

#[test]
fn top_level_return_ends_the_unit() {
    assert_eq!(output("println 1; return; println 2"), "1\n");
}

#[test]
fn while_with_compound_assignment() {
    let source = "
        let i := 0;
        let sum := 0;
        while (i < 5) { sum += i; i++; }
        println sum;
        println i;
    ";
    assert_eq!(output(source), "10\n5\n");
}

#[test]
fn increment_yields_updated_value() {
    assert_eq!(output("let i := 1; println ++i; println i--; println i"), "2\n1\n1\n");
}

#[test]
fn if_else_chain() {
    let source = "
        def sign(let n) {
            if (n < 0) { return \"neg\"; } else if (n == 0) { return \"zero\"; } else { return \"pos\"; }
        }
        println sign(-3); println sign(0); println sign(8);
    ";
    assert_eq!(output(source), "neg\nzero\npos\n");
}

#[test]
fn truthiness_of_conditions() {
    assert_eq!(output("if (nil) { println 1; } else { println 2; }"), "2\n");
    assert_eq!(output("if (0) { println 1; } else { println 2; }"), "1\n");
}

#[test]
fn arrays_alias_on_assignment() {
    let source = "let a := [1, 2, 3]; let b := a; push(b, 0); println a;";
    assert_eq!(output(source), "[0, 1, 2, 3]\n");
}

#[test]
fn self_referencing_arrays_compare_by_shape() {
    let source = "
        let a := [1]; append(a, a);
        let b := [1]; append(b, b);
        let c := [2]; append(c, c);
        println a == b;
        println a != b;
        println a == c;
        println a;
    ";
    assert_eq!(output(source), "true\nfalse\nfalse\n[1, [...]]\n");
}

#[test]
fn list_primitives() {
    let source = "
        let xs := [1, 2, 3];
        println first(xs);
        println rest(xs);
        println size(xs);
        println empty([]);
        println pop(xs);
        println xs;
        println append(xs, 4);
        println get(xs, 2);
    ";
    assert_eq!(output(source), "1\n[2, 3]\n3\ntrue\n1\n[2, 3]\n[2, 3, 4]\n4\n");
}

#[test]
fn rest_returns_a_new_array() {
    let source = "let a := [1, 2]; let r := rest(a); append(r, 9); println a; println r;";
    assert_eq!(output(source), "[1, 2]\n[2, 9]\n");
}

#[test]
fn higher_order_primitives() {
    let source = "
        let xs := [1, 2, 3, 4];
        println map(xs, lambda(x) => x * 2);
        println filter(xs, lambda(x) => x % 2 == 1);
        println reduce(xs, lambda(acc, x) => acc + x);
        println reduce([], lambda(acc, x) => acc + x);
        println xs;
    ";
    assert_eq!(output(source), "[2, 4, 6, 8]\n[1, 3]\n10\nnil\n[1, 2, 3, 4]\n");
}

#[test]
fn map_takes_named_functions() {
    let source = "def square(let x) { return x * x; } println map([1, 2, 3], square);";
    assert_eq!(output(source), "[1, 4, 9]\n");
}

#[test]
fn list_primitive_type_errors() {
    assert_eq!(
        error_kinds("first(1)"),
        vec![EvalErrorKind::ExpectedArray {
            op: "first",
            found: "number"
        }]
    );
    assert_eq!(
        error_kinds("map([1], 2)"),
        vec![EvalErrorKind::ExpectedFunction {
            op: "map",
            found: "number"
        }]
    );
}

#[test]
fn subscript_read_and_write() {
    let source = "let a := [1, 2, 3]; a[1] := 9; a[2] += 1; println a; println a[0];";
    assert_eq!(output(source), "[1, 9, 4]\n1\n");
}

#[test]
fn invalid_index() {
    assert_eq!(
        error_kinds("let a := [1]; println a[0.5]"),
        vec![EvalErrorKind::InvalidIndex {
            found: "0.5".to_string()
        }]
    );
}

#[test]
fn out_of_bounds_stops_the_unit() {
    let (out, errors) = run(r#"let a := [1]; println a[3]; println "after""#);
    assert_eq!(out, "");
    assert_eq!(
        errors.into_iter().map(|e| e.kind).collect::<Vec<_>>(),
        vec![EvalErrorKind::IndexOutOfBounds { index: 3, len: 1 }]
    );
    assert_eq!(
        error_kinds("pop([])"),
        vec![EvalErrorKind::IndexOutOfBounds { index: 0, len: 0 }]
    );
}

#[test]
fn other_errors_continue_with_the_next_statement() {
    let (out, errors) = run("println x; println 2; y(); println 3");
    assert_eq!(out, "2\n3\n");
    assert_eq!(
        errors.into_iter().map(|e| e.kind).collect::<Vec<_>>(),
        vec![
            EvalErrorKind::UndefinedVariable {
                name: "x".to_string()
            },
            EvalErrorKind::UndefinedVariable {
                name: "y".to_string()
            },
        ]
    );
}

#[test]
fn error_inside_a_call_restores_the_global_scope() {
    let handler = buffer_handler();
    let mut interpreter = InterpreterBuilder::new()
        .print_handler(handler.clone())
        .build();
    let errors = run_with(&mut interpreter, "def f() { { return nope; } } f(); let z := 4;");
    assert_eq!(errors.len(), 1);
    assert!(interpreter.env.is_global());
    assert_eq!(interpreter.global("z"), Some(Value::Number(4.0)));
}

#[test]
fn calling_a_non_function() {
    assert_eq!(
        error_kinds("let x := 1; x()"),
        vec![EvalErrorKind::NotCallable { found: "number" }]
    );
}

#[test]
fn type_mismatch_spans_the_expression() {
    let (_, errors) = run(r#"println 1 - "a""#);
    let [err] = errors.as_slice() else {
        panic!("expected one error, got {errors:?}");
    };
    assert_eq!(err.span, Span::new(8, 15));
    assert_eq!(err.kind.code(), mgc_diagnostic::ErrorCode::E2002);
}

#[test]
fn regex_match_operator() {
    let source = r#"
        println "ad" =~ "a(b|c)*d";
        println "abcbcd" =~ "a(b|c)*d";
        println "abx" =~ "a(b|c)*d";
        println "" =~ "";
        println "a.b" =~ "a\.b";
        println "axb" =~ "a\.b";
    "#;
    assert_eq!(output(source), "true\ntrue\nfalse\ntrue\ntrue\nfalse\n");
}

#[test]
fn regex_patterns_are_cached() {
    let handler = buffer_handler();
    let mut interpreter = InterpreterBuilder::new()
        .print_handler(handler.clone())
        .build();
    let errors = run_with(
        &mut interpreter,
        r#"let i := 0; while (i < 3) { println "ab" =~ "a+b"; i++; }"#,
    );
    assert!(errors.is_empty());
    assert_eq!(handler.output(), "true\ntrue\ntrue\n");
    assert_eq!(interpreter.patterns.len(), 1);
}

#[test]
fn regex_cache_is_bounded() {
    let handler = buffer_handler();
    let mut interpreter = InterpreterBuilder::new()
        .print_handler(handler.clone())
        .build();
    let count = PATTERN_CACHE_LIMIT + 44;
    let source: String = (0..count)
        .map(|i| format!(r#"println "a" =~ "a|{i}";"#))
        .collect();
    let errors = run_with(&mut interpreter, &source);
    assert!(errors.is_empty());
    assert_eq!(handler.output(), "true\n".repeat(count));
    assert!(interpreter.patterns.len() <= PATTERN_CACHE_LIMIT);
    assert_eq!(interpreter.patterns.len(), 44);
}

#[test]
fn regex_errors() {
    assert_eq!(
        error_kinds(r#"println "a" =~ "(a""#),
        vec![EvalErrorKind::Regex(mgc_regex::RegexError::UnbalancedParen {
            offset: 0
        })]
    );
    assert_eq!(
        error_kinds(r#"println "a" =~ 1"#),
        vec![EvalErrorKind::ExpectedString {
            op: "=~",
            found: "number"
        }]
    );
}

#[test]
fn regex_state_limit_is_configurable() {
    let mut interpreter = InterpreterBuilder::new()
        .print_handler(buffer_handler())
        .regex_state_limit(4)
        .build();
    let errors = run_with(&mut interpreter, r#"println "abc" =~ "abc""#);
    assert_eq!(
        errors.into_iter().map(|e| e.kind).collect::<Vec<_>>(),
        vec![EvalErrorKind::Regex(mgc_regex::RegexError::TooManyStates {
            limit: 4
        })]
    );
}

#[test]
fn nested_regex_groups() {
    let pattern = |depth: usize| format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(
        output(&format!(r#"println "a" =~ "{}";"#, pattern(500))),
        "true\n"
    );
    assert_eq!(
        error_kinds(&format!(r#"println "a" =~ "{}";"#, pattern(200_000))),
        vec![EvalErrorKind::Regex(mgc_regex::RegexError::NestingTooDeep {
            limit: mgc_regex::MAX_NESTING,
            offset: mgc_regex::MAX_NESTING,
        })]
    );
}

#[test]
fn classes_and_instances() {
    let source = "
        class Counter {
            let count := 0;
            def inc() { count += 1; return count; }
        }
        let c := new Counter;
        c.inc();
        println c.inc();
        println c.count;
        c.count := 10;
        println c.inc();
        let d := new Counter();
        println d.count;
        println c;
        println Counter;
    ";
    assert_eq!(
        output(source),
        "2\n2\n11\n0\n<Counter instance>\n<class Counter>\n"
    );
}

#[test]
fn member_errors() {
    assert_eq!(
        error_kinds("class A { let x := 1; } let a := new A; println a.y"),
        vec![EvalErrorKind::NoSuchMember {
            class: "A".to_string(),
            member: "y".to_string()
        }]
    );
    assert_eq!(
        error_kinds("let n := 1; println n.x"),
        vec![EvalErrorKind::NotAnInstance {
            member: "x".to_string(),
            found: "number"
        }]
    );
    assert_eq!(
        error_kinds("let n := 1; new n"),
        vec![EvalErrorKind::NotAClass {
            name: "n".to_string()
        }]
    );
}

#[test]
fn function_display() {
    assert_eq!(
        output("def f() { } println f; println lambda() => 1;"),
        "<fn f>\n<lambda>\n"
    );
}

#[test]
fn string_escapes() {
    assert_eq!(output(r#"println "a\tb\"c\"""#), "a\tb\"c\"\n");
}

#[test]
fn globals_persist_across_units() {
    let handler = buffer_handler();
    let mut interpreter = InterpreterBuilder::new()
        .print_handler(handler.clone())
        .build();
    assert!(run_with(&mut interpreter, "let x := 41; def inc(let n) { return n + 1; }").is_empty());
    assert!(run_with(&mut interpreter, "println inc(x)").is_empty());
    assert_eq!(handler.output(), "42\n");
    assert_eq!(
        interpreter.global_names(),
        vec![Rc::<str>::from("inc"), Rc::<str>::from("x")]
    );
}

#[test]
fn builder_predefines_globals() {
    let handler = buffer_handler();
    let mut interpreter = InterpreterBuilder::new()
        .print_handler(handler.clone())
        .define("limit", Value::Number(3.0))
        .build();
    assert!(run_with(&mut interpreter, "println limit * 2").is_empty());
    assert_eq!(handler.output(), "6\n");
}

#[test]
fn unresolved_tokens_are_reported() {
    let tokens = mgc_lexer::tokenize("println a");
    let parsed = mgc_parse::parse(&tokens);
    let mut interpreter = InterpreterBuilder::new()
        .print_handler(buffer_handler())
        .build();
    let errors = evaluate(&parsed.ast, &mut interpreter);
    assert_eq!(
        errors.into_iter().map(|e| e.kind).collect::<Vec<_>>(),
        vec![EvalErrorKind::Unresolved {
            name: "a".to_string()
        }]
    );
}
