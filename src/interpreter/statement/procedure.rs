use std::io::Write;

use crate::{
    error::{Location, ParseError, RuntimeError},
    interpreter::{
        evaluator::core::{EvalResult, Interpreter, Mode},
        lexer::Token,
        statement::core::Signal,
        value::{ProcedureDescriptor, Value},
    },
};

impl<W: Write> Interpreter<'_, W> {
    /// `procedure name(params) { ... }`, after `procedure`.
    ///
    /// Nothing inside runs here. The definition records where its parameter
    /// list starts and which scope it was defined in, then skips to the
    /// token after the body.
    pub(crate) fn procedure_definition(&mut self, mode: Mode) -> EvalResult<Signal> {
        let (name, at) = self.expect_identifier()?;
        let entry = self.cursor.position();
        self.parameter_list()?;
        self.braced_statements(Mode::Skip)?;

        if mode.executes() {
            let procedure = ProcedureDescriptor { entry,
                                                  scope: self.current };
            if !self.scopes.declare(self.current, &name, Some(Value::Procedure(procedure)))? {
                return Err(RuntimeError::RedefinedIdentifier { name, at }.into());
            }
            tracing::debug!(name = %name, entry, "procedure defined");
        }
        Ok(Signal::Normal)
    }

    /// Parses `(name, name, ...)` and returns the names with their
    /// locations.
    pub(crate) fn parameter_list(&mut self) -> EvalResult<Vec<(String, Location)>> {
        self.expect(&Token::LParen, "'('")?;
        let mut parameters = Vec::new();
        if self.peek_is(&Token::RParen)? {
            self.cursor.next()?;
            return Ok(parameters);
        }
        loop {
            parameters.push(self.expect_identifier()?);
            let lexeme = self.cursor.next()?;
            let at = lexeme.location();
            match lexeme.token {
                Token::Comma => {},
                Token::RParen => return Ok(parameters),
                other => {
                    return Err(ParseError::ExpectedToken { expected: "',' or ')'",
                                                           found: other.to_string(),
                                                           at }.into());
                },
            }
        }
    }
}
