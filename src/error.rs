/// Internal errors.
///
/// Raised when the interpreter itself is in an inconsistent state: a stale
/// scope handle, a cursor seek outside the cached token range, or a call
/// stack popped while empty. A user script can never legitimately trigger
/// one of these.
pub mod internal_error;
/// Parsing errors.
///
/// Defines all error types that can occur while lexing or consuming the
/// token stream: illegal characters, malformed literals, and missing or
/// unexpected tokens.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised while executing statements
/// and evaluating expressions. Runtime errors include undefined identifiers,
/// incompatible operand types, division by zero, and invalid control flow.
pub mod runtime_error;

use std::fmt;

pub use internal_error::InternalError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Exit status for faults in the user script (parse or runtime).
pub const EXIT_SCRIPT_ERROR: u8 = 1;
/// Exit status for interpreter bugs.
pub const EXIT_INTERNAL_ERROR: u8 = 2;
/// Exit status when `eval` output could not be written.
pub const EXIT_OUTPUT_ERROR: u8 = 3;

/// A 1-based source position attached to every user-facing diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// Source line, starting at 1.
    pub line:   usize,
    /// Source column, starting at 1.
    pub column: usize,
}

impl Location {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Any fatal condition that aborts interpretation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The interpreter is broken.
    #[error(transparent)]
    Internal(#[from] InternalError),
    /// The script could not be tokenized or is syntactically wrong.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The script failed while executing.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// Writing `eval` output failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl Error {
    /// Returns the process exit status for this error.
    ///
    /// Script faults and interpreter faults map to different codes so callers
    /// can tell a broken script from a broken interpreter.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Internal(_) => EXIT_INTERNAL_ERROR,
            Self::Parse(_) | Self::Runtime(_) => EXIT_SCRIPT_ERROR,
            Self::Output(_) => EXIT_OUTPUT_ERROR,
        }
    }

    /// Returns `true` when the error was caused by the user script.
    #[must_use]
    pub const fn is_script_error(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Runtime(_))
    }
}
