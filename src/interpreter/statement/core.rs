use std::io::Write;

use tracing::debug;

use crate::{
    error::{Location, ParseError, RuntimeError},
    interpreter::{
        evaluator::core::{EvalResult, Interpreter, Mode},
        lexer::Token,
        scope::ScopeKind,
        value::Value,
    },
    util::stack::ensure_sufficient_stack,
};

/// How a statement finished.
///
/// Anything other than `Normal` is an interrupt that unwinds enclosing
/// statements until a loop or procedure call consumes it. Each interrupt
/// remembers where its keyword appeared.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Ran to completion.
    Normal,
    /// `break;`
    Break(Location),
    /// `continue;`
    Continue(Location),
    /// `return;`
    ReturnVoid(Location),
    /// `return expr;`
    Return(Value, Location),
}

impl Signal {
    #[must_use]
    pub const fn is_interrupt(&self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// The error to raise when this signal reaches a place that cannot
    /// consume it, or `None` for [`Signal::Normal`].
    #[must_use]
    pub fn context_error(&self) -> Option<RuntimeError> {
        let (keyword, at) = match self {
            Self::Normal => return None,
            Self::Break(at) => ("break", *at),
            Self::Continue(at) => ("continue", *at),
            Self::ReturnVoid(at) | Self::Return(_, at) => ("return", *at),
        };
        Some(RuntimeError::InvalidContext { keyword, at })
    }
}

impl<W: Write> Interpreter<'_, W> {
    /// Executes the whole program.
    ///
    /// An interrupt that reaches the top level (including `return`) is an
    /// error.
    ///
    /// # Errors
    /// Returns the first parse, runtime or output error encountered.
    pub fn run(&mut self) -> EvalResult<()> {
        debug!("run started");
        while !self.cursor.peek()?.is_end() {
            let signal = self.step(Mode::Execute)?;
            if let Some(error) = signal.context_error() {
                return Err(error.into());
            }
        }
        debug!(tokens = self.cursor.cached_len(), "run finished");
        Ok(())
    }

    /// Executes or skips exactly one statement starting at the current
    /// position.
    ///
    /// # Errors
    /// Returns any error raised by the statement.
    pub fn step(&mut self, mode: Mode) -> EvalResult<Signal> {
        ensure_sufficient_stack(|| self.statement(mode))
    }

    fn statement(&mut self, mode: Mode) -> EvalResult<Signal> {
        let lexeme = self.cursor.next()?;
        let at = lexeme.location();
        match lexeme.token {
            Token::LBrace => {
                self.cursor.rollback()?;
                self.block(mode)
            },
            Token::If => self.if_chain(mode),
            Token::While => self.while_loop(mode),
            Token::Do => self.do_while_loop(mode),
            Token::For => self.for_loop(mode),
            Token::Procedure => self.procedure_definition(mode),
            Token::Var => {
                self.declaration(mode)?;
                self.expect(&Token::Semicolon, "';'")?;
                Ok(Signal::Normal)
            },
            Token::Eval => {
                let value = self.expression(mode)?;
                self.expect(&Token::Semicolon, "';'")?;
                if mode.executes() {
                    writeln!(self.out, "{value}")?;
                }
                Ok(Signal::Normal)
            },
            Token::Break => self.jump(mode, Signal::Break(at)),
            Token::Continue => self.jump(mode, Signal::Continue(at)),
            Token::Return => self.return_statement(mode, at),
            Token::Semicolon => Ok(Signal::Normal),
            Token::EndOfInput => Err(ParseError::UnexpectedEndOfInput { at }.into()),
            _ => {
                self.cursor.rollback()?;
                self.expression(mode)?;
                self.expect(&Token::Semicolon, "';'")?;
                Ok(Signal::Normal)
            },
        }
    }

    /// Runs `{ ... }` in a new block scope.
    pub(crate) fn block(&mut self, mode: Mode) -> EvalResult<Signal> {
        if !mode.executes() {
            return self.braced_statements(mode);
        }
        let scope = self.scopes.create_child(self.current, ScopeKind::Block)?;
        let signal = self.in_scope(scope, |this| this.braced_statements(Mode::Execute));
        self.scopes.destroy(scope)?;
        signal
    }

    /// Runs `{ ... }` in the current scope, stopping at the first interrupt.
    ///
    /// After an interrupt the cursor is left inside the braces; the
    /// construct that consumes the signal is responsible for seeking past
    /// them.
    pub(crate) fn braced_statements(&mut self, mode: Mode) -> EvalResult<Signal> {
        self.expect(&Token::LBrace, "'{'")?;
        loop {
            let lexeme = self.cursor.peek()?;
            match lexeme.token {
                Token::RBrace => {
                    self.cursor.next()?;
                    return Ok(Signal::Normal);
                },
                Token::EndOfInput => {
                    return Err(ParseError::ExpectedToken { expected: "'}'",
                                                           found:    lexeme.token.to_string(),
                                                           at:       lexeme.location(), }.into());
                },
                _ => {},
            }
            let signal = self.step(mode)?;
            if signal.is_interrupt() {
                return Ok(signal);
            }
        }
    }

    /// Parses `name [= value] ("," name [= value])*` after `var`.
    ///
    /// Each name is declared in the current scope as soon as its initializer
    /// has been evaluated, so later initializers can refer to earlier names.
    pub(crate) fn declaration(&mut self, mode: Mode) -> EvalResult<()> {
        loop {
            let (name, at) = self.expect_identifier()?;
            let value = if self.peek_is(&Token::Equals)? {
                self.cursor.next()?;
                Some(self.assignment(mode)?)
            } else {
                None
            };
            if mode.executes() && !self.scopes.declare(self.current, &name, value)? {
                return Err(RuntimeError::RedefinedIdentifier { name, at }.into());
            }
            if !self.peek_is(&Token::Comma)? {
                return Ok(());
            }
            self.cursor.next()?;
        }
    }

    fn jump(&mut self, mode: Mode, signal: Signal) -> EvalResult<Signal> {
        self.expect(&Token::Semicolon, "';'")?;
        Ok(if mode.executes() { signal } else { Signal::Normal })
    }

    fn return_statement(&mut self, mode: Mode, at: Location) -> EvalResult<Signal> {
        if self.peek_is(&Token::Semicolon)? {
            self.cursor.next()?;
            return Ok(if mode.executes() { Signal::ReturnVoid(at) } else { Signal::Normal });
        }
        let value = self.expression(mode)?;
        self.expect(&Token::Semicolon, "';'")?;
        Ok(if mode.executes() { Signal::Return(value, at) } else { Signal::Normal })
    }
}
