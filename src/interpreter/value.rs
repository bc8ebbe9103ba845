use std::fmt;

use crate::{
    error::{Location, RuntimeError},
    interpreter::scope::ScopeId,
};

/// Where a procedure lives in the token stream and which scope it closes
/// over.
///
/// Created once when a `procedure` statement executes and never mutated.
/// Calls seek to `entry`, which is the position of the opening parenthesis
/// of the parameter list, and open their scope under `scope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcedureDescriptor {
    /// Token position immediately before the parameter list.
    pub entry: usize,
    /// The scope that was current when the procedure was defined.
    pub scope: ScopeId,
}

/// Represents a runtime value in the interpreter.
///
/// Values are dynamically typed and always passed by value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64 bit signed integer.
    Integer(i64),
    /// A double precision floating-point number.
    Real(f64),
    /// A boolean value (`true` or `false`).
    /// Produced by comparison and logical operators and required by every
    /// condition.
    Bool(bool),
    /// The result of a procedure that returned nothing.
    NoValue,
    /// A callable procedure.
    Procedure(ProcedureDescriptor),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl Value {
    /// Human readable type name used in diagnostics.
    ///
    /// # Example
    /// ```
    /// use retread::interpreter::value::Value;
    ///
    /// assert_eq!(Value::Integer(1).type_name(), "integer");
    /// assert_eq!(Value::Bool(true).type_name(), "boolean");
    /// ```
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Bool(_) => "boolean",
            Self::NoValue => "no value",
            Self::Procedure(_) => "procedure",
        }
    }

    /// Interprets the value as a condition.
    ///
    /// # Errors
    /// Returns [`RuntimeError::NonBooleanCondition`] for anything but a
    /// boolean.
    pub const fn as_condition(&self, at: Location) -> Result<bool, RuntimeError> {
        match self {
            Self::Bool(b) => Ok(*b),
            _ => Err(RuntimeError::NonBooleanCondition { found: self.type_name(),
                                                         at }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) if r.is_finite() && r.fract() == 0.0 => write!(f, "{r:.1}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::NoValue => write!(f, "<no value>"),
            Self::Procedure(descriptor) => write!(f, "<procedure @{}>", descriptor.entry),
        }
    }
}
