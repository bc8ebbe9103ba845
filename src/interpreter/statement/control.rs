use std::io::Write;

use tracing::trace;

use crate::{
    error::InternalError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter, Mode},
        lexer::Token,
        scope::{ScopeId, ScopeKind},
        statement::core::Signal,
    },
};

/// Outcome of one loop iteration.
enum Step {
    /// Run another iteration.
    Again,
    /// The condition failed; the cursor is past the loop.
    Exit,
    /// The body raised an interrupt the iteration does not consume.
    Leave(Signal),
}

impl<W: Write> Interpreter<'_, W> {
    /// `if (cond) { ... } elif (cond) { ... } else { ... }`, after `if`.
    ///
    /// At most one branch executes. Conditions after the taken branch are
    /// skipped, not evaluated.
    pub(crate) fn if_chain(&mut self, mode: Mode) -> EvalResult<Signal> {
        let mut pending = mode.executes();
        loop {
            if pending && self.loop_condition(Mode::Execute)? {
                pending = false;
                let signal = self.block(Mode::Execute)?;
                if signal.is_interrupt() {
                    return Ok(signal);
                }
            } else {
                if !pending {
                    self.loop_condition(Mode::Skip)?;
                }
                self.block(Mode::Skip)?;
            }

            let lexeme = self.cursor.next()?;
            match lexeme.token {
                Token::Elif => {},
                Token::Else => {
                    return self.block(if pending { Mode::Execute } else { Mode::Skip });
                },
                _ => {
                    self.cursor.rollback()?;
                    return Ok(Signal::Normal);
                },
            }
        }
    }

    /// `while (cond) { ... }`, after `while`.
    ///
    /// Every iteration seeks back to the condition and evaluates it inside a
    /// fresh loop scope.
    pub(crate) fn while_loop(&mut self, mode: Mode) -> EvalResult<Signal> {
        let entry = self.cursor.position();
        if !mode.executes() {
            self.loop_condition(Mode::Skip)?;
            self.braced_statements(Mode::Skip)?;
            return Ok(Signal::Normal);
        }

        loop {
            self.cursor.set_position(entry)?;
            let scope = self.scopes.create_child(self.current, ScopeKind::Loop { resume: entry })?;
            let step = self.in_scope(scope, |this| {
                           if !this.loop_condition(Mode::Execute)? {
                               this.braced_statements(Mode::Skip)?;
                               return Ok(Step::Exit);
                           }
                           Ok(match this.braced_statements(Mode::Execute)? {
                                  Signal::Normal | Signal::Continue(_) => Step::Again,
                                  signal => Step::Leave(signal),
                              })
                       });
            self.scopes.destroy(scope)?;

            match step? {
                Step::Again => trace!(entry, "while iteration"),
                Step::Exit => return Ok(Signal::Normal),
                Step::Leave(Signal::Break(_)) => {
                    self.cursor.set_position(entry)?;
                    return self.while_loop(Mode::Skip);
                },
                Step::Leave(signal) => return Ok(signal),
            }
        }
    }

    /// `do { ... } while (cond);`, after `do`.
    ///
    /// The condition is evaluated in the scope of the iteration that just
    /// ran, so it can see the body's declarations.
    pub(crate) fn do_while_loop(&mut self, mode: Mode) -> EvalResult<Signal> {
        let entry = self.cursor.position();
        if !mode.executes() {
            self.braced_statements(Mode::Skip)?;
            self.do_while_condition(Mode::Skip)?;
            return Ok(Signal::Normal);
        }

        loop {
            self.cursor.set_position(entry)?;
            let scope = self.scopes.create_child(self.current, ScopeKind::DoWhile { resume: entry })?;
            let step = self.in_scope(scope, |this| {
                           match this.braced_statements(Mode::Execute)? {
                               Signal::Normal => {},
                               Signal::Continue(_) => this.resume_past_body(scope)?,
                               signal => return Ok(Step::Leave(signal)),
                           }
                           Ok(if this.do_while_condition(Mode::Execute)? { Step::Again } else { Step::Exit })
                       });
            self.scopes.destroy(scope)?;

            match step? {
                Step::Again => trace!(entry, "do-while iteration"),
                Step::Exit => return Ok(Signal::Normal),
                Step::Leave(Signal::Break(_)) => {
                    self.cursor.set_position(entry)?;
                    return self.do_while_loop(Mode::Skip);
                },
                Step::Leave(signal) => return Ok(signal),
            }
        }
    }

    /// `for (init; cond; incr) { ... }`, after `for`.
    ///
    /// Variables declared by `init` live in a scope of their own. Each
    /// iteration starts from a copy of that scope's symbols; after the
    /// increment the copied names are written back, while anything the body
    /// declared is dropped with the iteration scope.
    pub(crate) fn for_loop(&mut self, mode: Mode) -> EvalResult<Signal> {
        self.expect(&Token::LParen, "'('")?;
        if !mode.executes() {
            self.for_initializer(Mode::Skip)?;
            self.skip_for_remainder()?;
            return Ok(Signal::Normal);
        }

        let init = self.scopes.create_child(self.current, ScopeKind::ForInit)?;
        let signal = self.in_scope(init, |this| {
                             this.for_initializer(Mode::Execute)?;
                             this.for_iterations(init)
                         });
        self.scopes.destroy(init)?;
        signal
    }

    fn for_iterations(&mut self, init: ScopeId) -> EvalResult<Signal> {
        let entry = self.cursor.position();
        loop {
            self.cursor.set_position(entry)?;
            let iteration = self.scopes.create_child(init, ScopeKind::Loop { resume: entry })?;
            self.scopes.copy_symbols(init, iteration)?;
            let step = self.in_scope(iteration, |this| this.for_iteration(iteration));
            if matches!(step, Ok(Step::Again)) {
                self.scopes.write_back(iteration, init)?;
            }
            self.scopes.destroy(iteration)?;

            match step? {
                Step::Again => trace!(entry, "for iteration"),
                Step::Exit => return Ok(Signal::Normal),
                Step::Leave(Signal::Break(_)) => {
                    self.cursor.set_position(entry)?;
                    self.skip_for_remainder()?;
                    return Ok(Signal::Normal);
                },
                Step::Leave(signal) => return Ok(signal),
            }
        }
    }

    /// One `for` iteration, from the condition to the end of the increment.
    fn for_iteration(&mut self, iteration: ScopeId) -> EvalResult<Step> {
        let holds = self.for_condition(Mode::Execute)?;
        let increment = self.cursor.position();
        self.scopes.get_mut(iteration)?.kind = ScopeKind::Loop { resume: increment };
        self.for_increment(Mode::Skip)?;

        if !holds {
            self.braced_statements(Mode::Skip)?;
            return Ok(Step::Exit);
        }
        match self.braced_statements(Mode::Execute)? {
            Signal::Normal | Signal::Continue(_) => {
                let resume = self.resume_position(iteration)?;
                self.cursor.set_position(resume)?;
                self.for_increment(Mode::Execute)?;
                Ok(Step::Again)
            },
            signal => Ok(Step::Leave(signal)),
        }
    }

    /// `var` declarations or an expression, then `;`.
    fn for_initializer(&mut self, mode: Mode) -> EvalResult<()> {
        if self.peek_is(&Token::Var)? {
            self.cursor.next()?;
            self.declaration(mode)?;
        } else if !self.peek_is(&Token::Semicolon)? {
            self.expression(mode)?;
        }
        self.expect(&Token::Semicolon, "';'")?;
        Ok(())
    }

    /// An optional condition followed by `;`. An empty condition holds.
    fn for_condition(&mut self, mode: Mode) -> EvalResult<bool> {
        let mut holds = true;
        if !self.peek_is(&Token::Semicolon)? {
            let at = self.cursor.peek()?.location();
            let value = self.expression(mode)?;
            if mode.executes() {
                holds = value.as_condition(at)?;
            }
        }
        self.expect(&Token::Semicolon, "';'")?;
        Ok(holds)
    }

    /// An optional increment followed by `)`.
    fn for_increment(&mut self, mode: Mode) -> EvalResult<()> {
        if !self.peek_is(&Token::RParen)? {
            self.expression(mode)?;
        }
        self.expect(&Token::RParen, "')'")?;
        Ok(())
    }

    /// Skips `cond; incr) { ... }`.
    fn skip_for_remainder(&mut self) -> EvalResult<()> {
        self.for_condition(Mode::Skip)?;
        self.for_increment(Mode::Skip)?;
        self.braced_statements(Mode::Skip)?;
        Ok(())
    }

    /// `(cond)`, returning whether it holds. In skip mode it never holds.
    pub(crate) fn loop_condition(&mut self, mode: Mode) -> EvalResult<bool> {
        self.expect(&Token::LParen, "'('")?;
        let at = self.cursor.peek()?.location();
        let value = self.expression(mode)?;
        self.expect(&Token::RParen, "')'")?;
        if !mode.executes() {
            return Ok(false);
        }
        Ok(value.as_condition(at)?)
    }

    /// `while (cond);` closing a do-while loop.
    fn do_while_condition(&mut self, mode: Mode) -> EvalResult<bool> {
        self.expect(&Token::While, "'while'")?;
        let holds = self.loop_condition(mode)?;
        self.expect(&Token::Semicolon, "';'")?;
        Ok(holds)
    }

    /// After `continue` in a do-while body: seeks to the body and skips it,
    /// leaving the cursor on the trailing `while`.
    fn resume_past_body(&mut self, scope: ScopeId) -> EvalResult<()> {
        let resume = self.resume_position(scope)?;
        self.cursor.set_position(resume)?;
        self.braced_statements(Mode::Skip)?;
        Ok(())
    }

    fn resume_position(&self, scope: ScopeId) -> EvalResult<usize> {
        Ok(self.scopes
               .get(scope)?
               .kind
               .resume()
               .ok_or(InternalError::Unreachable { context: "resume position of a non-loop scope" })?)
    }
}
