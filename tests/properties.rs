//! Property-based tests for the interpreter.
//!
//! These generate random integer expressions and token soups and check:
//! 1. Skipping a statement consumes exactly the tokens executing it does.
//! 2. Re-reading the token stream after a seek yields identical lexemes.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use proptest::prelude::*;
use retread::{
    Config, Interpreter, Mode,
    interpreter::cursor::TokenCursor,
};

// -- Generation Strategies --

/// A parenthesized integer expression built from small literals.
///
/// Only operators that cannot overflow at this size are used, so every
/// generated expression evaluates successfully.
fn expr_strategy(depth: u32) -> impl Strategy<Value = String> {
    let leaf = (0i64..100).prop_map(|n| n.to_string());
    leaf.prop_recursive(depth, 32, 2, |inner| {
            prop_oneof![
                (inner.clone(), prop::sample::select(vec!["+", "-", "&", "|", "^"]), inner.clone())
                    .prop_map(|(l, op, r)| format!("({l} {op} {r})")),
                (prop::sample::select(vec!["-", "~"]), inner.clone()).prop_map(|(op, e)| format!("{op}{e}")),
                inner.prop_map(|e| format!("({e})")),
            ]
        })
}

/// A statement wrapping generated expressions in a branch and a loop.
fn statement_strategy() -> impl Strategy<Value = String> {
    (expr_strategy(3), expr_strategy(3), expr_strategy(3)).prop_map(|(a, b, c)| {
        format!("if ({a} == {b}) {{ eval {c}; }} elif ({b} < {c}) {{ var t = {a}; }} else {{ \
                 for (var i = 0; i < 2; i += 1) {{ eval i + {c}; }} }}")
    })
}

/// One control-flow construct in its own block, built around generated
/// expressions.
///
/// Covers loops with `break` and `continue`, procedures with `return` and
/// recursion, the conditional operator, short-circuit logic and every
/// assignment form. Each construct terminates and never overflows.
fn construct_strategy() -> impl Strategy<Value = String> {
    (0usize..7, expr_strategy(2), expr_strategy(2), expr_strategy(2)).prop_map(|(kind, x, y, z)| {
        let body = match kind {
            0 => format!("var n = 0; while (n < 3) {{ n += 1; if ({x} < {y}) {{ break; }} \
                          elif (n == 2) {{ continue; }} a = {z}; }}"),
            1 => format!("var n = 0; do {{ n += 1; if ({x} == n) {{ continue; }} \
                          if (n > 2) {{ break; }} b -= {y}; }} while (n < 4);"),
            2 => format!("for (var i = 0; i < 3; i += 1) {{ if (i == 1) {{ continue; }} a ^= {x}; \
                          if ({y} > {z}) {{ break; }} }}"),
            3 => format!("procedure f(p, q) {{ if (p > q) {{ return p - q; }} return; }} \
                          a = {x} > {y} ? f({x}, {y}) : {z}; f({y}, {x});"),
            4 => format!("procedure r(k) {{ return k <= 0 ? 0 : k + r(k - 1); }} b = r(({x}) & 7);"),
            5 => format!("var t = ({x} < {y}) && ({y} != {z}) || !({x} == {z}); \
                          eval t ? {x} : {y}; a |= {z};"),
            _ => format!("a += {x}; b -= {y}; a &= {z}; b |= {x}; a <<= 2; b >>= 1; \
                          a %= 7; b /= 3; a = b = {z};"),
        };
        format!("{{ {body} }}")
    })
}

/// A block declaring `a` and `b`, followed by several constructs.
fn program_strategy() -> impl Strategy<Value = String> {
    (expr_strategy(2), expr_strategy(2), prop::collection::vec(construct_strategy(), 1..5))
        .prop_map(|(a, b, parts)| format!("{{ var a = {a}, b = {b}; {} }}", parts.join(" ")))
}

/// Whitespace-separated fragments that always lex.
fn token_soup_strategy() -> impl Strategy<Value = String> {
    let fragment = prop::sample::select(vec!["var", "x", "y_1", "42", "0x1f", "07", "3.25", "'c'", "\"s\\n\"",
                                             "+", ">>>=", "<<", "&&", "?", ":", "{", "}", "(", ")", ";",
                                             "// note\n", "/* block */", "\n"]);
    prop::collection::vec(fragment, 0..40).prop_map(|parts| parts.join(" "))
}

/// Position after running one statement of `source` in `mode`.
fn position_after(source: &str, mode: Mode) -> usize {
    let mut out = Vec::new();
    let mut interpreter = Interpreter::new(source, &Config::default(), &mut out);
    interpreter.step(mode).unwrap();
    interpreter.position()
}

// -- Property Tests --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Skipping an expression statement lands where executing it does.
    #[test]
    fn prop_expression_skip_parity(expr in expr_strategy(4)) {
        let source = format!("eval {expr}; eval 0;");
        prop_assert_eq!(position_after(&source, Mode::Skip), position_after(&source, Mode::Execute));
    }

    /// Skipping a compound statement lands where executing it does.
    #[test]
    fn prop_statement_skip_parity(statement in statement_strategy()) {
        let source = format!("{statement} eval 0;");
        prop_assert_eq!(position_after(&source, Mode::Skip), position_after(&source, Mode::Execute));
    }

    /// Skipping loops, procedures and jumps lands where executing them does.
    #[test]
    fn prop_control_flow_skip_parity(program in program_strategy()) {
        let source = format!("{program} eval 0;");
        prop_assert_eq!(position_after(&source, Mode::Skip), position_after(&source, Mode::Execute));
    }

    /// Lexemes read again after seeking back are identical to the first read.
    #[test]
    fn prop_cursor_replay_is_identical(source in token_soup_strategy()) {
        let mut cursor = TokenCursor::new(&source);
        let mut first = Vec::new();
        loop {
            let lexeme = cursor.next().unwrap();
            let end = lexeme.is_end();
            first.push(lexeme);
            if end {
                break;
            }
        }

        cursor.set_position(0).unwrap();
        for expected in &first {
            prop_assert_eq!(&cursor.next().unwrap(), expected);
        }
        prop_assert!(cursor.next().unwrap().is_end());
    }
}
