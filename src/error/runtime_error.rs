use crate::error::Location;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Represents all errors that can occur while executing a script.
pub enum RuntimeError {
    /// Tried to use or assign a name that is not visible from the current
    /// scope.
    #[error("Error at {at}: Undefined identifier '{name}'.")]
    UndefinedIdentifier {
        /// The name of the identifier.
        name: String,
        /// Where the identifier appears.
        at:   Location,
    },
    /// Declared a name twice in the same scope.
    #[error("Error at {at}: Identifier '{name}' is already defined in this scope.")]
    RedefinedIdentifier {
        /// The name of the identifier.
        name: String,
        /// Where the second declaration appears.
        at:   Location,
    },
    /// Read a variable that was declared without an initializer and never
    /// assigned.
    #[error("Error at {at}: Identifier '{name}' is used before it is initialized.")]
    UninitializedIdentifier {
        /// The name of the identifier.
        name: String,
        /// Where the read happens.
        at:   Location,
    },
    /// A binary operator was applied to operand types it does not accept.
    #[error("Error at {at}: Incompatible operation: {left} {op} {right}.")]
    IncompatibleOperation {
        /// The operator symbol.
        op:    &'static str,
        /// Type of the left operand.
        left:  &'static str,
        /// Type of the right operand.
        right: &'static str,
        /// Location of the operator.
        at:    Location,
    },
    /// A unary operator was applied to an operand type it does not accept.
    #[error("Error at {at}: Incompatible operation: {op}{operand}.")]
    IncompatibleUnary {
        /// The operator symbol.
        op:      &'static str,
        /// Type of the operand.
        operand: &'static str,
        /// Location of the operator.
        at:      Location,
    },
    /// A string literal was used where a runtime value is required.
    #[error("Error at {at}: String literals are not runtime values.")]
    StringNotAValue {
        /// Location of the literal.
        at: Location,
    },
    /// Integer division or modulo by zero.
    #[error("Error at {at}: Division by zero.")]
    DivisionByZero {
        /// Location of the operator.
        at: Location,
    },
    /// Integer arithmetic overflowed.
    #[error("Error at {at}: Integer overflow while trying to compute result.")]
    Overflow {
        /// Location of the operator.
        at: Location,
    },
    /// A condition did not evaluate to a boolean.
    #[error("Error at {at}: Condition must be a boolean, found {found}.")]
    NonBooleanCondition {
        /// Type of the value found.
        found: &'static str,
        /// Where the condition starts.
        at:    Location,
    },
    /// Called something that is not a procedure.
    #[error("Error at {at}: '{name}' is not a procedure.")]
    NotAProcedure {
        /// The name that was called.
        name: String,
        /// Location of the call.
        at:   Location,
    },
    /// More arguments than parameters.
    #[error("Error at {at}: Too many parameters: expected {expected}, found {found}.")]
    TooManyParameters {
        /// Number of declared parameters.
        expected: usize,
        /// Number of supplied arguments.
        found:    usize,
        /// Location of the call.
        at:       Location,
    },
    /// Fewer arguments than parameters.
    #[error("Error at {at}: Too few parameters: expected {expected}, found {found}.")]
    TooFewParameters {
        /// Number of declared parameters.
        expected: usize,
        /// Number of supplied arguments.
        found:    usize,
        /// Location of the call.
        at:       Location,
    },
    /// `break`, `continue` or `return` outside of a construct that accepts
    /// it.
    #[error("Error at {at}: '{keyword}' is not valid in this context.")]
    InvalidContext {
        /// The offending keyword.
        keyword: &'static str,
        /// Location of the keyword.
        at:      Location,
    },
    /// The procedure's defining scope has already been destroyed.
    #[error("Error at {at}: Procedure '{name}' outlived the scope that defined it.")]
    ProcedureOutOfScope {
        /// The name used for the call.
        name: String,
        /// Location of the call.
        at:   Location,
    },
    /// The call stack exceeded its configured depth.
    #[error("Error at {at}: Call stack exhausted at depth {depth}.")]
    StackOverflow {
        /// The configured maximum depth.
        depth: usize,
        /// Location of the call that overflowed.
        at:    Location,
    },
}
