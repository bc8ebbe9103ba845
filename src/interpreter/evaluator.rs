/// Core evaluation state and the loosest expression rules.
///
/// Holds the [`core::Interpreter`], the execute/skip [`core::Mode`], and the
/// comma, assignment and conditional rules.
pub mod core;

/// Binary operator levels.
///
/// One iterative rule per precedence level, from logical or down to the
/// multiplicative operators.
pub mod binary;

/// Prefix operators and atoms.
///
/// Handles `! ~ -`, literals, identifiers, parenthesized expressions and the
/// hand-off to procedure calls.
pub mod unary;

/// Procedure calls.
///
/// Evaluates arguments, pushes a call frame, replays the procedure body from
/// its recorded position and seeks back to the call site.
pub mod call;
