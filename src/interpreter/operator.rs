use std::fmt;

use crate::{
    error::{Location, RuntimeError},
    interpreter::{lexer::Token, value::Value},
    util::num::{int_to_real, shift_count, unsigned_shr},
};

/// Binding strength of binary operators, loosest first.
///
/// Assignment, the ternary conditional and the comma sit below these levels
/// and are handled by dedicated rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
}

impl Precedence {
    /// The loosest binary level.
    pub const LOWEST: Self = Self::LogicalOr;

    /// The next tighter level, or `None` above which only unary operators
    /// remain.
    #[must_use]
    pub const fn tighter(self) -> Option<Self> {
        match self {
            Self::LogicalOr => Some(Self::LogicalAnd),
            Self::LogicalAnd => Some(Self::BitOr),
            Self::BitOr => Some(Self::BitXor),
            Self::BitXor => Some(Self::BitAnd),
            Self::BitAnd => Some(Self::Equality),
            Self::Equality => Some(Self::Relational),
            Self::Relational => Some(Self::Shift),
            Self::Shift => Some(Self::Additive),
            Self::Additive => Some(Self::Multiplicative),
            Self::Multiplicative => None,
        }
    }
}

/// All binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOperator {
    /// Maps a token to its corresponding binary operator.
    ///
    /// Returns `None` for tokens that are not binary operators, including the
    /// compound assignment operators.
    ///
    /// # Example
    /// ```
    /// use retread::interpreter::{lexer::Token, operator::BinaryOperator};
    ///
    /// assert_eq!(BinaryOperator::from_token(&Token::UnsignedShiftRight),
    ///            Some(BinaryOperator::UnsignedShiftRight));
    /// assert_eq!(BinaryOperator::from_token(&Token::PlusAssign), None);
    /// ```
    #[must_use]
    pub const fn from_token(token: &Token) -> Option<Self> {
        Some(match token {
                 Token::Plus => Self::Add,
                 Token::Minus => Self::Sub,
                 Token::Star => Self::Mul,
                 Token::Slash => Self::Div,
                 Token::Percent => Self::Mod,
                 Token::ShiftLeft => Self::ShiftLeft,
                 Token::ShiftRight => Self::ShiftRight,
                 Token::UnsignedShiftRight => Self::UnsignedShiftRight,
                 Token::Ampersand => Self::BitAnd,
                 Token::Pipe => Self::BitOr,
                 Token::Caret => Self::BitXor,
                 Token::DoubleAmpersand => Self::And,
                 Token::DoublePipe => Self::Or,
                 Token::EqualEqual => Self::Equal,
                 Token::BangEqual => Self::NotEqual,
                 Token::Less => Self::Less,
                 Token::LessEqual => Self::LessEqual,
                 Token::Greater => Self::Greater,
                 Token::GreaterEqual => Self::GreaterEqual,
                 _ => return None,
             })
    }

    #[must_use]
    pub const fn precedence(self) -> Precedence {
        match self {
            Self::Or => Precedence::LogicalOr,
            Self::And => Precedence::LogicalAnd,
            Self::BitOr => Precedence::BitOr,
            Self::BitXor => Precedence::BitXor,
            Self::BitAnd => Precedence::BitAnd,
            Self::Equal | Self::NotEqual => Precedence::Equality,
            Self::Less | Self::LessEqual | Self::Greater | Self::GreaterEqual => {
                Precedence::Relational
            },
            Self::ShiftLeft | Self::ShiftRight | Self::UnsignedShiftRight => Precedence::Shift,
            Self::Add | Self::Sub => Precedence::Additive,
            Self::Mul | Self::Div | Self::Mod => Precedence::Multiplicative,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::UnsignedShiftRight => ">>>",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::And => "&&",
            Self::Or => "||",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `-`, numeric negation.
    Negate,
    /// `!`, boolean negation.
    Not,
    /// `~`, bitwise complement.
    Complement,
}

impl UnaryOperator {
    #[must_use]
    pub const fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Minus => Some(Self::Negate),
            Token::Bang => Some(Self::Not),
            Token::Tilde => Some(Self::Complement),
            _ => None,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::Not => "!",
            Self::Complement => "~",
        }
    }
}

/// The operator of an assignment expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// `=`
    Plain,
    /// `+=`, `<<=` and friends: combine the old value with the right-hand
    /// side.
    Compound(BinaryOperator),
}

impl Assignment {
    #[must_use]
    pub const fn from_token(token: &Token) -> Option<Self> {
        use BinaryOperator::{
            Add, BitAnd, BitOr, BitXor, Div, Mod, Mul, ShiftLeft, ShiftRight, Sub,
            UnsignedShiftRight,
        };

        Some(match token {
                 Token::Equals => Self::Plain,
                 Token::PlusAssign => Self::Compound(Add),
                 Token::MinusAssign => Self::Compound(Sub),
                 Token::StarAssign => Self::Compound(Mul),
                 Token::SlashAssign => Self::Compound(Div),
                 Token::PercentAssign => Self::Compound(Mod),
                 Token::ShiftLeftAssign => Self::Compound(ShiftLeft),
                 Token::ShiftRightAssign => Self::Compound(ShiftRight),
                 Token::UnsignedShiftRightAssign => Self::Compound(UnsignedShiftRight),
                 Token::AmpersandAssign => Self::Compound(BitAnd),
                 Token::CaretAssign => Self::Compound(BitXor),
                 Token::PipeAssign => Self::Compound(BitOr),
                 _ => return None,
             })
    }
}

/// Operand pair after coercion.
///
/// This is the single coercion table of the language: two integers stay
/// integers, an integer mixed with a real becomes two reals, two booleans
/// stay booleans, and everything else is incompatible.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Operands {
    Integers(i64, i64),
    Reals(f64, f64),
    Bools(bool, bool),
}

impl Operands {
    const fn coerce(left: &Value, right: &Value) -> Option<Self> {
        use Value::{Bool, Integer, Real};

        Some(match (left, right) {
                 (Integer(a), Integer(b)) => Self::Integers(*a, *b),
                 (Real(a), Real(b)) => Self::Reals(*a, *b),
                 (Integer(a), Real(b)) => Self::Reals(int_to_real(*a), *b),
                 (Real(a), Integer(b)) => Self::Reals(*a, int_to_real(*b)),
                 (Bool(a), Bool(b)) => Self::Bools(*a, *b),
                 _ => return None,
             })
    }
}

/// Applies a binary operator to two values.
///
/// - Arithmetic (`+ - * / %`) accepts integers and reals; mixing them
///   promotes to real. Integer overflow and integer division or modulo by
///   zero are errors; real division follows IEEE semantics.
/// - Relational operators accept integers and reals.
/// - Equality accepts two numbers or two booleans.
/// - Bitwise and shift operators accept integers only.
/// - Logical operators accept booleans only.
///
/// # Errors
/// Returns [`RuntimeError::IncompatibleOperation`],
/// [`RuntimeError::DivisionByZero`] or [`RuntimeError::Overflow`], all
/// located at the operator.
///
/// # Example
/// ```
/// use retread::{
///     error::Location,
///     interpreter::{
///         operator::{BinaryOperator, apply_binary},
///         value::Value,
///     },
/// };
///
/// let at = Location::new(1, 3);
/// assert_eq!(apply_binary(BinaryOperator::Div, &Value::Integer(5), &Value::Integer(2), at).unwrap(),
///            Value::Integer(2));
/// assert_eq!(apply_binary(BinaryOperator::Div, &Value::Real(5.0), &Value::Integer(2), at).unwrap(),
///            Value::Real(2.5));
/// assert!(apply_binary(BinaryOperator::Mod, &Value::Integer(5), &Value::Integer(0), at).is_err());
/// ```
pub fn apply_binary(op: BinaryOperator,
                    left: &Value,
                    right: &Value,
                    at: Location)
                    -> Result<Value, RuntimeError> {
    use BinaryOperator::{
        Add, And, BitAnd, BitOr, BitXor, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod,
        Mul, NotEqual, Or, ShiftLeft, ShiftRight, Sub, UnsignedShiftRight,
    };
    use Operands::{Bools, Integers, Reals};

    let incompatible = || RuntimeError::IncompatibleOperation { op: op.symbol(),
                                                                left: left.type_name(),
                                                                right: right.type_name(),
                                                                at };
    let operands = Operands::coerce(left, right).ok_or_else(incompatible)?;

    let value = match (op, operands) {
        (Add | Sub | Mul | Div | Mod, Integers(a, b)) => {
            if matches!(op, Div | Mod) && b == 0 {
                return Err(RuntimeError::DivisionByZero { at });
            }
            let result = match op {
                Add => a.checked_add(b),
                Sub => a.checked_sub(b),
                Mul => a.checked_mul(b),
                Div => a.checked_div(b),
                _ => a.checked_rem(b),
            };
            Value::Integer(result.ok_or(RuntimeError::Overflow { at })?)
        },
        (Add | Sub | Mul | Div | Mod, Reals(a, b)) => Value::Real(match op {
                                                                      Add => a + b,
                                                                      Sub => a - b,
                                                                      Mul => a * b,
                                                                      Div => a / b,
                                                                      _ => a % b,
                                                                  }),

        (Less | LessEqual | Greater | GreaterEqual, Integers(a, b)) => {
            Value::Bool(compare(op, &a, &b))
        },
        (Less | LessEqual | Greater | GreaterEqual, Reals(a, b)) => Value::Bool(compare(op, &a, &b)),

        (Equal, Integers(a, b)) => Value::Bool(a == b),
        (Equal, Reals(a, b)) => Value::Bool(a == b),
        (Equal, Bools(a, b)) => Value::Bool(a == b),
        (NotEqual, Integers(a, b)) => Value::Bool(a != b),
        (NotEqual, Reals(a, b)) => Value::Bool(a != b),
        (NotEqual, Bools(a, b)) => Value::Bool(a != b),

        (BitAnd, Integers(a, b)) => Value::Integer(a & b),
        (BitOr, Integers(a, b)) => Value::Integer(a | b),
        (BitXor, Integers(a, b)) => Value::Integer(a ^ b),
        (ShiftLeft, Integers(a, b)) => Value::Integer(a.wrapping_shl(shift_count(b))),
        (ShiftRight, Integers(a, b)) => Value::Integer(a.wrapping_shr(shift_count(b))),
        (UnsignedShiftRight, Integers(a, b)) => Value::Integer(unsigned_shr(a, b)),

        (And, Bools(a, b)) => Value::Bool(a && b),
        (Or, Bools(a, b)) => Value::Bool(a || b),

        _ => return Err(incompatible()),
    };
    Ok(value)
}

fn compare<T: PartialOrd>(op: BinaryOperator, a: &T, b: &T) -> bool {
    match op {
        BinaryOperator::Less => a < b,
        BinaryOperator::LessEqual => a <= b,
        BinaryOperator::Greater => a > b,
        _ => a >= b,
    }
}

/// Applies a prefix operator.
///
/// `-` accepts integers and reals, `!` booleans, `~` integers.
///
/// # Errors
/// Returns [`RuntimeError::IncompatibleUnary`] for other operand types and
/// [`RuntimeError::Overflow`] when negating `i64::MIN`.
pub fn apply_unary(op: UnaryOperator, value: &Value, at: Location) -> Result<Value, RuntimeError> {
    match (op, value) {
        (UnaryOperator::Negate, Value::Integer(n)) => {
            n.checked_neg().map(Value::Integer).ok_or(RuntimeError::Overflow { at })
        },
        (UnaryOperator::Negate, Value::Real(r)) => Ok(Value::Real(-r)),
        (UnaryOperator::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOperator::Complement, Value::Integer(n)) => Ok(Value::Integer(!n)),
        _ => Err(RuntimeError::IncompatibleUnary { op: op.symbol(),
                                                   operand: value.type_name(),
                                                   at }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const AT: Location = Location::new(1, 1);

    fn binary(op: BinaryOperator, left: Value, right: Value) -> Result<Value, RuntimeError> {
        apply_binary(op, &left, &right, AT)
    }

    #[test]
    fn mixed_arithmetic_promotes_to_real() {
        use Value::{Integer, Real};

        assert_eq!(binary(BinaryOperator::Add, Integer(1), Real(0.5)), Ok(Real(1.5)));
        assert_eq!(binary(BinaryOperator::Mod, Real(7.5), Integer(2)), Ok(Real(1.5)));
        assert_eq!(binary(BinaryOperator::Less, Integer(1), Real(1.5)), Ok(Value::Bool(true)));
        assert_eq!(binary(BinaryOperator::Equal, Integer(2), Real(2.0)), Ok(Value::Bool(true)));
    }

    #[test]
    fn real_division_by_zero_is_not_checked() {
        assert_eq!(binary(BinaryOperator::Div, Value::Real(1.0), Value::Integer(0)),
                   Ok(Value::Real(f64::INFINITY)));
    }

    #[test]
    fn integer_faults() {
        use Value::Integer;

        assert_eq!(binary(BinaryOperator::Div, Integer(1), Integer(0)),
                   Err(RuntimeError::DivisionByZero { at: AT }));
        assert_eq!(binary(BinaryOperator::Mul, Integer(i64::MAX), Integer(2)),
                   Err(RuntimeError::Overflow { at: AT }));
        assert_eq!(binary(BinaryOperator::Div, Integer(i64::MIN), Integer(-1)),
                   Err(RuntimeError::Overflow { at: AT }));
    }

    #[test]
    fn shifts_and_bits() {
        use Value::Integer;

        assert_eq!(binary(BinaryOperator::ShiftLeft, Integer(1), Integer(4)), Ok(Integer(16)));
        assert_eq!(binary(BinaryOperator::ShiftRight, Integer(-16), Integer(2)), Ok(Integer(-4)));
        assert_eq!(binary(BinaryOperator::UnsignedShiftRight, Integer(-1), Integer(63)),
                   Ok(Integer(1)));
        assert_eq!(binary(BinaryOperator::BitXor, Integer(6), Integer(3)), Ok(Integer(5)));
    }

    #[test]
    fn booleans_do_not_mix_with_numbers() {
        for op in [BinaryOperator::Add, BinaryOperator::Equal, BinaryOperator::And] {
            let error = binary(op, Value::Bool(true), Value::Integer(1)).unwrap_err();
            assert!(matches!(error, RuntimeError::IncompatibleOperation { .. }));
        }
        let error = binary(BinaryOperator::BitAnd, Value::Real(1.5), Value::Integer(1)).unwrap_err();
        assert!(matches!(error, RuntimeError::IncompatibleOperation { .. }));
        let error = binary(BinaryOperator::Less, Value::Bool(true), Value::Bool(false)).unwrap_err();
        assert!(matches!(error, RuntimeError::IncompatibleOperation { .. }));
    }

    #[test]
    fn unary_rules() {
        assert_eq!(apply_unary(UnaryOperator::Complement, &Value::Integer(0), AT),
                   Ok(Value::Integer(-1)));
        assert_eq!(apply_unary(UnaryOperator::Not, &Value::Bool(false), AT), Ok(Value::Bool(true)));
        assert!(apply_unary(UnaryOperator::Not, &Value::Integer(1), AT).is_err());
        assert!(apply_unary(UnaryOperator::Negate, &Value::Integer(i64::MIN), AT).is_err());
    }
}
