use std::io::Write;

use crate::{
    error::{Location, ParseError, RuntimeError},
    interpreter::{
        call_stack::CallFrame,
        evaluator::core::{EvalResult, Interpreter, Mode},
        lexer::Token,
        scope::ScopeKind,
        statement::core::Signal,
        symbol::Symbol,
        value::{ProcedureDescriptor, Value},
    },
};

impl<W: Write> Interpreter<'_, W> {
    /// Calls the procedure `name`. The cursor is on the opening parenthesis
    /// of the argument list.
    ///
    /// Arguments are evaluated left to right in the caller's scope and passed
    /// by value. The body then runs in a fresh scope whose parent is the scope
    /// the procedure was defined in, and the cursor seeks back to the token
    /// after the call when it returns.
    ///
    /// # Example
    /// ```
    /// use retread::get_output;
    ///
    /// let source = "procedure add(a, b) { return a + b; } eval add(2, 3) * 2;";
    /// assert_eq!(get_output(source).unwrap(), "10\n");
    /// ```
    pub(crate) fn call(&mut self, name: &str, at: Location, mode: Mode) -> EvalResult<Value> {
        self.expect(&Token::LParen, "'('")?;
        if !mode.executes() {
            self.arguments(Mode::Skip)?;
            return Ok(Value::NoValue);
        }

        let procedure = self.resolve_procedure(name, at)?;
        let arguments = self.arguments(Mode::Execute)?;
        if !self.scopes.contains(procedure.scope) {
            return Err(RuntimeError::ProcedureOutOfScope { name: name.to_string(),
                                                           at }.into());
        }

        self.calls.push(CallFrame { resume: self.cursor.position(),
                                    arguments },
                        at)?;
        tracing::trace!(name, depth = self.calls.depth(), "call");

        self.cursor.set_position(procedure.entry)?;
        let scope = self.scopes.create_child(procedure.scope, ScopeKind::Procedure)?;
        let signal = self.in_scope(scope, |this| {
                             this.bind_parameters(at)?;
                             this.braced_statements(Mode::Execute)
                         });
        self.scopes.destroy(scope)?;
        let frame = self.calls.pop()?;
        self.cursor.set_position(frame.resume)?;
        tracing::trace!(name, depth = self.calls.depth(), "return");

        match signal? {
            Signal::Return(value, _) => Ok(value),
            Signal::Normal | Signal::ReturnVoid(_) => Ok(Value::NoValue),
            Signal::Break(origin) => Err(RuntimeError::InvalidContext { keyword: "break",
                                                                        at:      origin, }.into()),
            Signal::Continue(origin) => {
                Err(RuntimeError::InvalidContext { keyword: "continue",
                                                   at:      origin, }.into())
            },
        }
    }

    fn resolve_procedure(&self, name: &str, at: Location) -> EvalResult<ProcedureDescriptor> {
        match self.scopes.lookup(self.current, name)? {
            Some(Symbol { value: Some(Value::Procedure(procedure)),
                          .. }) => Ok(*procedure),
            Some(_) => Err(RuntimeError::NotAProcedure { name: name.to_string(),
                                                         at }.into()),
            None => Err(RuntimeError::UndefinedIdentifier { name: name.to_string(),
                                                            at }.into()),
        }
    }

    /// Parses `arg, arg, ... )`, the opening parenthesis already consumed.
    fn arguments(&mut self, mode: Mode) -> EvalResult<Vec<Value>> {
        let mut values = Vec::new();
        if self.peek_is(&Token::RParen)? {
            self.cursor.next()?;
            return Ok(values);
        }
        loop {
            values.push(self.assignment(mode)?);
            let lexeme = self.cursor.next()?;
            let at = lexeme.location();
            match lexeme.token {
                Token::Comma => {},
                Token::RParen => return Ok(values),
                other => {
                    return Err(ParseError::ExpectedToken { expected: "',' or ')'",
                                                           found: other.to_string(),
                                                           at }.into());
                },
            }
        }
    }

    /// Reads the parameter list at the procedure entry and declares each
    /// parameter in the current (call) scope with its argument value.
    fn bind_parameters(&mut self, at: Location) -> EvalResult<()> {
        let parameters = self.parameter_list()?;
        let arguments = self.calls.top()?.arguments.clone();
        let (expected, found) = (parameters.len(), arguments.len());
        if found > expected {
            return Err(RuntimeError::TooManyParameters { expected, found, at }.into());
        }
        if found < expected {
            return Err(RuntimeError::TooFewParameters { expected, found, at }.into());
        }

        for ((name, name_at), value) in parameters.into_iter().zip(arguments) {
            if !self.scopes.declare(self.current, &name, Some(value))? {
                return Err(RuntimeError::RedefinedIdentifier { name,
                                                               at: name_at }.into());
            }
        }
        Ok(())
    }
}
