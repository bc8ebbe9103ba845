use crate::{
    error::{InternalError, Location, RuntimeError},
    interpreter::value::Value,
};

/// Default limit on nested procedure calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// State saved for one active procedure call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallFrame {
    /// Token position to seek back to when the call returns.
    pub resume:    usize,
    /// Argument values evaluated in the caller's scope, in call order.
    pub arguments: Vec<Value>,
}

/// LIFO of active calls with a depth limit.
///
/// # Example
/// ```
/// use retread::{
///     error::Location,
///     interpreter::call_stack::{CallFrame, CallStack},
/// };
///
/// let mut calls = CallStack::new(1);
/// let frame = CallFrame { resume:    7,
///                         arguments: Vec::new(), };
///
/// calls.push(frame.clone(), Location::default()).unwrap();
/// assert!(calls.push(frame.clone(), Location::default()).is_err());
/// assert_eq!(calls.pop().unwrap().resume, 7);
/// ```
#[derive(Debug)]
pub struct CallStack {
    frames:    Vec<CallFrame>,
    max_depth: usize,
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CALL_DEPTH)
    }
}

impl CallStack {
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self { frames: Vec::new(),
               max_depth }
    }

    /// Pushes a frame for a new call.
    ///
    /// # Errors
    /// Returns [`RuntimeError::StackOverflow`] if the stack is already at its
    /// maximum depth.
    pub fn push(&mut self, frame: CallFrame, at: Location) -> Result<(), RuntimeError> {
        if self.frames.len() >= self.max_depth {
            return Err(RuntimeError::StackOverflow { depth: self.max_depth,
                                                     at });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Removes the innermost frame.
    ///
    /// # Errors
    /// Returns [`InternalError::Unreachable`] if no call is active.
    pub fn pop(&mut self) -> Result<CallFrame, InternalError> {
        self.frames
            .pop()
            .ok_or(InternalError::Unreachable { context: "call stack pop" })
    }

    /// The innermost frame.
    ///
    /// # Errors
    /// Returns [`InternalError::Unreachable`] if no call is active.
    pub fn top(&self) -> Result<&CallFrame, InternalError> {
        self.frames
            .last()
            .ok_or(InternalError::Unreachable { context: "call stack top" })
    }

    /// Number of active calls.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }
}
