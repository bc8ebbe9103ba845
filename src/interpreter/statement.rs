/// Statement dispatch and blocks.
///
/// Defines the interrupt [`core::Signal`] and executes blocks, declarations,
/// `eval`, jumps and expression statements.
pub mod core;

/// Branches and loops.
///
/// `if`/`elif`/`else`, `while`, `do ... while` and `for`, all implemented by
/// seeking the token cursor back to recorded positions.
pub mod control;

/// Procedure definitions and parameter lists.
pub mod procedure;
