//! # retread
//!
//! retread interprets a small imperative scripting language without building
//! a syntax tree. The source is lexed once into a cached token stream, and
//! loops, branches and procedure calls are executed by seeking back and
//! forth in that stream.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::io::Write;

/// Provides unified error types for lexing, parsing and execution.
///
/// This module defines every error a run can end with. Script errors carry
/// the line and column they were detected at; internal errors describe a
/// broken interpreter invariant.
///
/// # Responsibilities
/// - Defines the parse, runtime and internal error enums.
/// - Wraps them, together with output failures, in a single [`Error`].
/// - Maps each error to a process exit code.
pub mod error;
/// Orchestrates the execution of scripts.
///
/// This module ties together the lexer, the token cursor, scopes, the call
/// stack, the expression evaluator and the statement interpreter.
pub mod interpreter;
/// General utilities.
///
/// Numeric helpers shared by the operator implementations, and native stack
/// growth for deeply nested scripts.
pub mod util;

pub use error::Error;
pub use interpreter::{
    call_stack::DEFAULT_MAX_CALL_DEPTH,
    evaluator::core::{Interpreter, Mode},
    statement::core::Signal,
};

/// Runtime limits for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of nested procedure calls before a run fails with a
    /// stack overflow error.
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_call_depth: DEFAULT_MAX_CALL_DEPTH }
    }
}

/// Runs `source` to completion, writing the output of `eval` statements to
/// `out`.
///
/// Scopes are torn down whether the run succeeds or not.
///
/// # Errors
/// Returns the first error the run hits. A teardown failure is only reported
/// if the run itself succeeded.
///
/// # Examples
/// ```
/// use retread::{Config, run};
///
/// let mut out = Vec::new();
/// run("var x = 3; eval x * x;", &Config::default(), &mut out).unwrap();
/// assert_eq!(out, b"9\n");
///
/// // 'y' is never declared.
/// assert!(run("eval y;", &Config::default(), &mut Vec::new()).is_err());
/// ```
pub fn run<W: Write>(source: &str, config: &Config, out: W) -> Result<(), Error> {
    let mut interpreter = Interpreter::new(source, config, out);
    let result = interpreter.run();
    let teardown = interpreter.teardown();
    result?;
    teardown?;
    interpreter.out.flush()?;
    Ok(())
}

/// Runs `source` with the default configuration and returns everything it
/// printed.
///
/// # Errors
/// Same as [`run`].
///
/// # Examples
/// ```
/// use retread::get_output;
///
/// assert_eq!(get_output("eval 5 / 2; eval 5.0 / 2;").unwrap(), "2\n2.5\n");
/// ```
pub fn get_output(source: &str) -> Result<String, Error> {
    let mut out = Vec::new();
    run(source, &Config::default(), &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
