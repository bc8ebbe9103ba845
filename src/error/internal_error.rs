#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Represents faults inside the interpreter itself.
pub enum InternalError {
    /// A handle no longer refers to a live object.
    #[error("Internal error: invalid {what} handle.")]
    InvalidHandle {
        /// The kind of object the handle pointed to.
        what: &'static str,
    },
    /// An index was outside of the valid range.
    #[error("Internal error: index {index} out of range for {what} of length {len}.")]
    IndexOutOfRange {
        /// The container being indexed.
        what:  &'static str,
        /// The requested index.
        index: usize,
        /// The current length of the container.
        len:   usize,
    },
    /// Execution reached a state that should be impossible.
    #[error("Internal error: unreachable code reached in {context}.")]
    Unreachable {
        /// Where the impossible state was observed.
        context: &'static str,
    },
}
