/// Numeric conversion helpers.
///
/// Integer-to-real promotion and the shift-count rule shared by the
/// operator table.
pub mod num;
/// Stack growth guard for the recursive interpreter entry points.
///
/// Statement and expression evaluation call each other recursively, one
/// native frame per nested block, expression or procedure call. The guard
/// grows the native stack on demand so deeply nested scripts fail with a
/// proper error instead of overflowing.
pub mod stack;
