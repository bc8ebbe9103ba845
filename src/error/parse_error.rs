use crate::error::Location;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Represents all errors that can occur during lexing or token consumption.
pub enum ParseError {
    /// A character that cannot start any token.
    #[error("Error at {at}: Illegal character '{found}'.")]
    IllegalCharacter {
        /// The offending source text.
        found: String,
        /// Where the character appears.
        at:    Location,
    },
    /// A literal that matched a literal shape but could not be decoded.
    #[error("Error at {at}: Malformed {kind} literal '{text}'.")]
    MalformedLiteral {
        /// The kind of literal, e.g. `integer` or `character`.
        kind: &'static str,
        /// The literal as written.
        text: String,
        /// Where the literal starts.
        at:   Location,
    },
    /// A specific token was required but something else was found.
    #[error("Error at {at}: Expected {expected} but found {found}.")]
    ExpectedToken {
        /// Description of the required token.
        expected: &'static str,
        /// Description of the token actually found.
        found:    String,
        /// Where the found token starts.
        at:       Location,
    },
    /// A token that cannot start or continue the current construct.
    #[error("Error at {at}: Unexpected token {found}.")]
    UnexpectedToken {
        /// Description of the token.
        found: String,
        /// Where the token starts.
        at:    Location,
    },
    /// The input ended in the middle of a construct.
    #[error("Error at {at}: Unexpected end of input.")]
    UnexpectedEndOfInput {
        /// Location of the end of input.
        at: Location,
    },
}
