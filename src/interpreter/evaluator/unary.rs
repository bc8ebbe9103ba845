use std::io::Write;

use crate::{
    error::{Location, ParseError, RuntimeError},
    interpreter::{
        evaluator::core::{EvalResult, Interpreter, Mode},
        lexer::Token,
        operator::{UnaryOperator, apply_unary},
        value::Value,
    },
    util::stack::ensure_sufficient_stack,
};

impl<W: Write> Interpreter<'_, W> {
    /// Evaluates a prefix operator chain followed by an atom.
    ///
    /// Every nested expression passes through here, so this is where the
    /// native stack is grown for deeply nested input.
    pub(crate) fn unary(&mut self, mode: Mode) -> EvalResult<Value> {
        ensure_sufficient_stack(|| {
            let lexeme = self.cursor.peek()?;
            let Some(op) = UnaryOperator::from_token(&lexeme.token) else {
                return self.atom(mode);
            };
            let at = lexeme.location();
            self.cursor.next()?;

            let operand = self.unary(mode)?;
            if !mode.executes() {
                return Ok(Value::NoValue);
            }
            Ok(apply_unary(op, &operand, at)?)
        })
    }

    /// Evaluates a literal, a variable read, a call or a parenthesized
    /// expression.
    ///
    /// Character literals evaluate to their code point. String literals are
    /// only legal in skipped code.
    fn atom(&mut self, mode: Mode) -> EvalResult<Value> {
        let lexeme = self.cursor.next()?;
        let at = lexeme.location();
        match lexeme.token {
            Token::Integer(n) => Ok(Value::Integer(n)),
            Token::Real(r) => Ok(Value::Real(r)),
            Token::Char(c) => Ok(Value::Integer(i64::from(u32::from(c)))),
            Token::True => Ok(Value::Bool(true)),
            Token::False => Ok(Value::Bool(false)),
            Token::Str(_) if mode.executes() => Err(RuntimeError::StringNotAValue { at }.into()),
            Token::Str(_) => Ok(Value::NoValue),
            Token::Identifier(name) => {
                if self.peek_is(&Token::LParen)? {
                    return self.call(&name, at, mode);
                }
                if !mode.executes() {
                    return Ok(Value::NoValue);
                }
                self.read_variable(&name, at)
            },
            Token::LParen => {
                let value = self.expression(mode)?;
                self.expect(&Token::RParen, "')'")?;
                Ok(value)
            },
            Token::EndOfInput => Err(ParseError::UnexpectedEndOfInput { at }.into()),
            other => Err(ParseError::UnexpectedToken { found: other.to_string(),
                                                       at }.into()),
        }
    }

    fn read_variable(&self, name: &str, at: Location) -> EvalResult<Value> {
        let symbol = self.scopes
                         .lookup(self.current, name)?
                         .ok_or_else(|| RuntimeError::UndefinedIdentifier { name: name.to_string(),
                                                                            at })?;
        Ok(symbol.value
                 .clone()
                 .ok_or_else(|| RuntimeError::UninitializedIdentifier { name: name.to_string(),
                                                                        at })?)
    }
}
