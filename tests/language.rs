use std::{fs, path::Path};

use pretty_assertions::assert_eq;
use retread::{
    Config, Error, Interpreter, Mode,
    error::{ParseError, RuntimeError},
    get_output, run,
};
use walkdir::WalkDir;

#[test]
fn script_fixtures_match_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "rt"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected = fs::read_to_string(path.with_extension("out")).unwrap_or_else(|e| {
                           panic!("Missing expected output for {path:?}: {e}")
                       });

        count += 1;
        match get_output(&source) {
            Ok(output) => assert_eq!(output, expected, "output of {}", display(path)),
            Err(e) => panic!("Script {} failed:\n{source}\nError: {e}", display(path)),
        }
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn assert_output(src: &str, expected: &str) {
    match get_output(src) {
        Ok(output) => assert_eq!(output, expected, "script:\n{src}"),
        Err(e) => panic!("Script failed: {e}\n{src}"),
    }
}

fn assert_failure(src: &str) -> Error {
    match get_output(src) {
        Ok(output) => panic!("Script succeeded with output {output:?} but was expected to fail"),
        Err(e) => e,
    }
}

/// Runs `src` to completion and hands back the interpreter state.
fn finished<'a>(src: &'a str, out: &'a mut Vec<u8>) -> Interpreter<'a, &'a mut Vec<u8>> {
    let mut interpreter = Interpreter::new(src, &Config::default(), out);
    interpreter.run().unwrap_or_else(|e| panic!("Script failed: {e}"));
    interpreter
}

#[test]
fn arithmetic_and_promotion() {
    assert_output("eval 5 / 2;", "2\n");
    assert_output("eval 5.0 / 2;", "2.5\n");
    assert_output("eval 7 % 3, -7 % 3;", "-1\n");
    assert_output("eval 2 + 3 * 4 - 1;", "13\n");
    assert_output("eval (2 + 3) * 4;", "20\n");
    assert_output("eval 1 + 0.5;", "1.5\n");
    assert_output("eval 4.0 * 2;", "8.0\n");
}

#[test]
fn division_by_zero_fails() {
    let e = assert_failure("eval 5 % 0;");
    assert!(matches!(e, Error::Runtime(RuntimeError::DivisionByZero { .. })));
    assert!(matches!(assert_failure("eval 1 / 0;"),
                     Error::Runtime(RuntimeError::DivisionByZero { .. })));
}

#[test]
fn integer_overflow_fails() {
    assert!(matches!(assert_failure("eval 9223372036854775807 + 1;"),
                     Error::Runtime(RuntimeError::Overflow { .. })));
}

#[test]
fn bitwise_and_shifts() {
    assert_output("eval 6 & 3, 6 | 3, 6 ^ 3, ~0;", "-1\n");
    assert_output("eval 6 & 3; eval 6 | 3; eval 6 ^ 3;", "2\n7\n5\n");
    assert_output("eval 1 << 4; eval -16 >> 2;", "16\n-4\n");
    assert_output("eval -1 >>> 60;", "15\n");
    assert_output("eval 0x1F + 010;", "39\n");
}

#[test]
fn comparisons_and_logic() {
    assert_output("eval 1 < 2, 2 <= 1;", "false\n");
    assert_output("eval 1 == 1.0;", "true\n");
    assert_output("eval true != false;", "true\n");
    assert_output("eval !(1 > 2) && 3 >= 3;", "true\n");
    assert!(matches!(assert_failure("eval true + 1;"),
                     Error::Runtime(RuntimeError::IncompatibleOperation { .. })));
    assert!(matches!(assert_failure("eval 1 && true;"),
                     Error::Runtime(RuntimeError::IncompatibleOperation { .. })));
}

#[test]
fn logical_operators_short_circuit() {
    assert_output("var hits = 0; procedure hit() { hits += 1; return true; } \
                   eval false && hit(); eval true || hit(); eval hits;",
                  "false\ntrue\n0\n");
    assert_output("var x = 0; eval true && (x = 5) == 5; eval x;", "true\n5\n");
}

#[test]
fn ternary_evaluates_one_branch() {
    assert_output("var x = 0; eval true ? 1 : (x = 9); eval x;", "1\n0\n");
    assert_output("eval false ? 1 : true ? 2 : 3;", "2\n");
    assert!(matches!(assert_failure("eval 1 ? 2 : 3;"),
                     Error::Runtime(RuntimeError::NonBooleanCondition { .. })));
}

#[test]
fn character_literals_are_code_points() {
    assert_output("eval 'A'; eval '\\n';", "65\n10\n");
}

#[test]
fn strings_are_not_values() {
    assert!(matches!(assert_failure("eval \"hello\";"),
                     Error::Runtime(RuntimeError::StringNotAValue { .. })));
    assert_output("if (false) { eval \"skipped\"; } eval 1;", "1\n");
}

#[test]
fn assignment_forms() {
    assert_output("var a, b; a = b = 4; eval a + b;", "8\n");
    assert_output("var x = 10; x += 5; x -= 3; x *= 2; x /= 4; x %= 4; eval x;", "2\n");
    assert_output("var x = 1; x <<= 3; x |= 1; x &= 7; x ^= 2; x >>= 1; eval x;", "1\n");
    assert_output("var x = 1; x = 2.5; eval x;", "2.5\n");
}

#[test]
fn uninitialized_and_undefined_names() {
    assert!(matches!(assert_failure("var x; eval x;"),
                     Error::Runtime(RuntimeError::UninitializedIdentifier { .. })));
    assert!(matches!(assert_failure("var x; x += 1;"),
                     Error::Runtime(RuntimeError::UninitializedIdentifier { .. })));
    assert!(matches!(assert_failure("y = 1;"),
                     Error::Runtime(RuntimeError::UndefinedIdentifier { .. })));
}

#[test]
fn shadowing_and_redefinition() {
    assert_output("var x = 1; { var x = 2; eval x; } eval x;", "2\n1\n");
    assert_output("var x = 1; { x = 3; } eval x;", "3\n");
    let e = assert_failure("var x = 1; var x = 2;");
    assert!(matches!(e, Error::Runtime(RuntimeError::RedefinedIdentifier { ref name, .. }) if name == "x"));
}

#[test]
fn if_elif_else_chain() {
    let chain = |n: i64| {
        format!("var n = {n}; if (n < 0) {{ eval 1; }} elif (n == 0) {{ eval 2; }} \
                 elif (n < 10) {{ eval 3; }} else {{ eval 4; }}")
    };
    assert_output(&chain(-5), "1\n");
    assert_output(&chain(0), "2\n");
    assert_output(&chain(7), "3\n");
    assert_output(&chain(70), "4\n");
}

#[test]
fn untaken_conditions_are_not_evaluated() {
    assert_output("var x = 0; if (true) { } elif ((x = 1) == 1) { } eval x;", "0\n");
}

#[test]
fn while_and_do_while() {
    assert_output("var i = 0; while (i < 3) { eval i; i += 1; }", "0\n1\n2\n");
    assert_output("var i = 5; while (i < 3) { eval i; }", "");
    assert_output("var i = 5; do { eval i; } while (i < 3);", "5\n");
}

#[test]
fn for_runs_n_times() {
    for n in [0, 1, 5] {
        let src = format!("var count = 0; for (var i = 0; i < {n}; i = i + 1) {{ count += 1; }} eval count;");
        assert_output(&src, &format!("{n}\n"));
    }
}

#[test]
fn for_increment_persists_and_body_locals_reset() {
    assert_output("for (var i = 0; i < 3; i += 1) { var seen; eval i; seen = i; }",
                  "0\n1\n2\n");
    assert_output("for (var i = 0, j = 10; i < 2; i += 1) { j -= 1; eval j; }", "9\n8\n");
}

#[test]
fn for_with_empty_clauses() {
    assert_output("var i = 0; for (;;) { i += 1; if (i == 4) { break; } } eval i;", "4\n");
}

#[test]
fn continue_runs_increment_once() {
    assert_output("var runs = 0; for (var i = 0; i < 4; i += 1) { runs += 1; continue; } eval runs;",
                  "4\n");
    assert_output("for (var i = 0; i < 5; i += 1) { if (i % 2 == 0) { continue; } eval i; }",
                  "1\n3\n");
}

#[test]
fn break_from_nested_if_in_nested_loops() {
    let src = "var pairs = 0;
               for (var i = 0; i < 3; i += 1) {
                   var j = 0;
                   while (true) {
                       if (j == i) { if (true) { break; } }
                       pairs += 1;
                       j += 1;
                   }
               }
               eval pairs;";
    assert_output(src, "3\n");
}

#[test]
fn recursion_releases_everything() {
    let src = "procedure fact(n) { if (n <= 1) { return 1; } return n * fact(n - 1); }
               var result = fact(5);";
    let mut out = Vec::new();
    let interpreter = finished(src, &mut out);
    assert_eq!(interpreter.lookup("result"), Some(retread::interpreter::value::Value::Integer(120)));
    assert_eq!(interpreter.live_scopes(), 1);
    assert_eq!(interpreter.call_depth(), 0);
}

#[test]
fn call_returns_to_the_call_site() {
    let src = "procedure fact(n) { if (n <= 1) { return 1; } return n * fact(n - 1); }
               var result = fact(5) + fact(3) * 2; eval result;";
    let position_after = |mode: Mode| {
        let mut out = Vec::new();
        let mut interpreter = Interpreter::new(src, &Config::default(), &mut out);
        interpreter.step(mode).unwrap();
        interpreter.step(mode).unwrap();
        assert_eq!(interpreter.call_depth(), 0);
        assert_eq!(interpreter.live_scopes(), 1);
        interpreter.position()
    };

    let executed = position_after(Mode::Execute);
    assert_eq!(executed, position_after(Mode::Skip));

    let mut out = Vec::new();
    let mut interpreter = Interpreter::new(src, &Config::default(), &mut out);
    interpreter.run().unwrap();
    assert_eq!(interpreter.lookup("result"), Some(retread::interpreter::value::Value::Integer(132)));
    drop(interpreter);
    assert_eq!(out, b"132\n");
}

#[test]
fn procedures_without_return_yield_no_value() {
    assert_output("procedure p() { } eval p();", "<no value>\n");
    assert_output("procedure p() { return; } eval p();", "<no value>\n");
}

#[test]
fn arguments_are_passed_by_value() {
    assert_output("var x = 1; procedure p(x) { x = 5; return x; } eval p(x); eval x;", "5\n1\n");
    assert_output("var y = 1; procedure q(a) { a += 10; return a; } eval q(y); eval q(y); eval y;",
                  "11\n11\n1\n");
}

#[test]
fn arity_errors() {
    assert!(matches!(assert_failure("procedure p(a, b) { } p(1);"),
                     Error::Runtime(RuntimeError::TooFewParameters { expected: 2, found: 1, .. })));
    assert!(matches!(assert_failure("procedure p(a) { } p(1, 2, 3);"),
                     Error::Runtime(RuntimeError::TooManyParameters { expected: 1, found: 3, .. })));
}

#[test]
fn calling_a_variable_fails() {
    assert!(matches!(assert_failure("var x = 1; x();"),
                     Error::Runtime(RuntimeError::NotAProcedure { .. })));
}

#[test]
fn misplaced_interrupts() {
    assert!(matches!(assert_failure("break;"),
                     Error::Runtime(RuntimeError::InvalidContext { keyword: "break", .. })));
    assert!(matches!(assert_failure("procedure p() { continue; } p();"),
                     Error::Runtime(RuntimeError::InvalidContext { keyword: "continue", .. })));
    assert!(matches!(assert_failure("return;"),
                     Error::Runtime(RuntimeError::InvalidContext { keyword: "return", .. })));
}

#[test]
fn return_unwinds_loops() {
    assert_output("procedure first_even(limit) { for (var i = 1; i < limit; i += 1) { \
                   while (true) { if (i % 2 == 0) { return i; } break; } } return -1; } \
                   eval first_even(10);",
                  "2\n");
}

#[test]
fn runaway_recursion_overflows() {
    let config = Config { max_call_depth: 16 };
    let result = run("procedure f(n) { return f(n + 1); } f(0);", &config, &mut Vec::new());
    assert!(matches!(result, Err(Error::Runtime(RuntimeError::StackOverflow { depth: 16, .. }))));
}

#[test]
fn parse_errors_carry_locations() {
    let e = assert_failure("var x = 1;\neval x +;");
    match e {
        Error::Parse(ParseError::UnexpectedToken { at, .. }) => {
            assert_eq!((at.line, at.column), (2, 9));
        },
        other => panic!("unexpected error {other:?}"),
    }
    assert!(matches!(assert_failure("eval 1"), Error::Parse(ParseError::ExpectedToken { .. })));
    assert!(matches!(assert_failure("eval 1 @ 2;"),
                     Error::Parse(ParseError::IllegalCharacter { .. })));
    assert!(matches!(assert_failure("if (true) eval 1;"),
                     Error::Parse(ParseError::ExpectedToken { expected: "'{'", .. })));
}

#[test]
fn exit_codes() {
    assert_eq!(assert_failure("eval 1 / 0;").exit_code(), 1);
    assert_eq!(assert_failure("eval $;").exit_code(), 1);
}

#[test]
fn errors_in_skipped_code_are_syntax_only() {
    assert_output("if (false) { eval undefined_name / 0; } eval 1;", "1\n");
    assert!(matches!(assert_failure("if (false) { eval 1 +; }"),
                     Error::Parse(ParseError::UnexpectedToken { .. })));
}

#[test]
fn comments_are_ignored() {
    assert_output("// line\nvar x = 1; /* block\n comment */ eval x;", "1\n");
}
