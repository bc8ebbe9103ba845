use std::io::Write;

use crate::{
    Config,
    error::{Error, InternalError, Location, ParseError, RuntimeError},
    interpreter::{
        call_stack::CallStack,
        cursor::{Lexeme, TokenCursor},
        lexer::{LexWarning, Token},
        operator::{Assignment, Precedence, apply_binary},
        scope::{ScopeId, ScopeTree},
        value::Value,
    },
};

/// Result type used by the evaluator and the statement interpreter.
///
/// Every fatal condition, whatever its taxonomy, travels as an [`Error`].
pub type EvalResult<T> = Result<T, Error>;

/// Selects which of the two grammars a rule runs.
///
/// Both modes consume exactly the same tokens. `Execute` evaluates, resolves
/// names and opens scopes; `Skip` only advances the cursor past a
/// syntactically valid construct and produces [`Value::NoValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run the construct.
    Execute,
    /// Scan past the construct without running it.
    Skip,
}

impl Mode {
    #[must_use]
    pub const fn executes(self) -> bool {
        matches!(self, Self::Execute)
    }
}

/// Stores the runtime interpretation state.
///
/// There is no syntax tree: the interpreter holds a cursor into the cached
/// token stream and re-reads tokens whenever a loop body, a branch or a
/// procedure has to run again.
///
/// ## Usage
///
/// ```
/// use retread::{Config, Interpreter, interpreter::value::Value};
///
/// let mut output = Vec::new();
/// let mut interpreter = Interpreter::new("var x = 6 * 7; eval x;", &Config::default(), &mut output);
/// interpreter.run().unwrap();
///
/// assert_eq!(interpreter.lookup("x"), Some(Value::Integer(42)));
/// drop(interpreter);
/// assert_eq!(output, b"42\n");
/// ```
pub struct Interpreter<'src, W: Write> {
    pub(crate) cursor:  TokenCursor<'src>,
    pub(crate) scopes:  ScopeTree,
    pub(crate) calls:   CallStack,
    /// The scope the running statement resolves names in.
    pub(crate) current: ScopeId,
    pub(crate) out:     W,
}

impl<'src, W: Write> Interpreter<'src, W> {
    /// Creates an interpreter positioned at the start of `source`, with an
    /// empty global scope. `eval` statements write to `out`.
    pub fn new(source: &'src str, config: &Config, out: W) -> Self {
        let scopes = ScopeTree::new();
        let current = scopes.root();
        Self { cursor: TokenCursor::new(source),
               scopes,
               calls: CallStack::new(config.max_call_depth),
               current,
               out }
    }

    /// Returns the value `name` resolves to from the current scope, if it is
    /// defined and initialized.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.scopes
            .lookup(self.current, name)
            .ok()
            .flatten()
            .and_then(|symbol| symbol.value.clone())
    }

    /// Number of live scopes, the global scope included.
    #[must_use]
    pub const fn live_scopes(&self) -> usize {
        self.scopes.live()
    }

    /// Number of procedure calls currently active.
    #[must_use]
    pub fn call_depth(&self) -> usize {
        self.calls.depth()
    }

    /// Current token stream position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Escape warnings raised while lexing so far.
    #[must_use]
    pub fn warnings(&self) -> &[LexWarning] {
        self.cursor.warnings()
    }

    /// Destroys every scope below the global scope and empties it.
    ///
    /// # Errors
    /// Returns an [`InternalError`] if the scope tree is inconsistent.
    pub fn teardown(&mut self) -> Result<(), InternalError> {
        let live = self.scopes.live();
        self.scopes.teardown()?;
        self.current = self.scopes.root();
        tracing::debug!(released = live - self.scopes.live(), "scopes torn down");
        Ok(())
    }

    /// Evaluates a full expression, including the comma operator, and
    /// returns the value of its last operand.
    ///
    /// Grammar: `expression := assignment ("," assignment)*`
    ///
    /// # Errors
    /// Returns any parse or runtime error raised by the operands.
    pub fn expression(&mut self, mode: Mode) -> EvalResult<Value> {
        let mut value = self.assignment(mode)?;
        while self.peek_is(&Token::Comma)? {
            self.cursor.next()?;
            value = self.assignment(mode)?;
        }
        Ok(value)
    }

    /// Evaluates an assignment or, failing that, a conditional expression.
    ///
    /// An identifier directly followed by `=` or a compound operator is an
    /// assignment; anything else is rolled back and parsed as a conditional.
    /// Assignment is right associative and yields the stored value.
    ///
    /// Grammar: `assignment := identifier assign_op assignment | conditional`
    pub(crate) fn assignment(&mut self, mode: Mode) -> EvalResult<Value> {
        let target = self.cursor.next()?;
        if let Token::Identifier(name) = &target.token {
            let operator = self.cursor.next()?;
            if let Some(assignment) = Assignment::from_token(&operator.token) {
                let value = self.assignment(mode)?;
                if !mode.executes() {
                    return Ok(Value::NoValue);
                }
                return self.assign(name, assignment, value, target.location(), operator.location());
            }
            self.cursor.rollback()?;
        }
        self.cursor.rollback()?;
        self.conditional(mode)
    }

    /// Evaluates `condition ? then : else`.
    ///
    /// Only the chosen branch executes; the other one is skipped.
    fn conditional(&mut self, mode: Mode) -> EvalResult<Value> {
        let at = self.cursor.peek()?.location();
        let condition = self.binary(mode, Precedence::LOWEST)?;
        if !self.peek_is(&Token::Question)? {
            return Ok(condition);
        }
        self.cursor.next()?;

        let chosen = if mode.executes() { Some(condition.as_condition(at)?) } else { None };
        let branch_mode = |taken: bool| if chosen == Some(taken) { Mode::Execute } else { Mode::Skip };

        let then_value = self.assignment(branch_mode(true))?;
        self.expect(&Token::Colon, "':'")?;
        let else_value = self.conditional(branch_mode(false))?;

        Ok(match chosen {
               Some(true) => then_value,
               Some(false) => else_value,
               None => Value::NoValue,
           })
    }

    /// Stores `value` into the symbol `name` resolves to.
    ///
    /// The symbol takes the type of the new value. Compound assignments
    /// combine the old value with `value` first.
    fn assign(&mut self,
              name: &str,
              assignment: Assignment,
              value: Value,
              at: Location,
              operator_at: Location)
              -> EvalResult<Value> {
        let symbol = self.scopes
                         .lookup_mut(self.current, name)?
                         .ok_or_else(|| RuntimeError::UndefinedIdentifier { name: name.to_string(),
                                                                            at })?;
        let value = match assignment {
            Assignment::Plain => value,
            Assignment::Compound(op) => {
                let old = symbol.value.as_ref().ok_or_else(|| {
                              RuntimeError::UninitializedIdentifier { name: name.to_string(),
                                                                      at }
                          })?;
                apply_binary(op, old, &value, operator_at)?
            },
        };
        symbol.value = Some(value.clone());
        Ok(value)
    }

    /// Consumes the next token, which must be `expected`.
    pub(crate) fn expect(&mut self,
                         expected: &Token,
                         description: &'static str)
                         -> EvalResult<Lexeme> {
        let lexeme = self.cursor.next()?;
        if lexeme.token == *expected {
            return Ok(lexeme);
        }
        Err(ParseError::ExpectedToken { expected: description,
                                        found:    lexeme.token.to_string(),
                                        at:       lexeme.location(), }.into())
    }

    /// Consumes an identifier and returns its name and location.
    pub(crate) fn expect_identifier(&mut self) -> EvalResult<(String, Location)> {
        let lexeme = self.cursor.next()?;
        let at = lexeme.location();
        match lexeme.token {
            Token::Identifier(name) => Ok((name, at)),
            other => Err(ParseError::ExpectedToken { expected: "identifier",
                                                     found: other.to_string(),
                                                     at }.into()),
        }
    }

    /// Returns `true` if the next token is `token`, without consuming it.
    pub(crate) fn peek_is(&mut self, token: &Token) -> EvalResult<bool> {
        Ok(self.cursor.peek()?.token == *token)
    }

    /// Runs `body` with `scope` as the current scope, restoring the previous
    /// one afterwards.
    pub(crate) fn in_scope<T>(&mut self,
                              scope: ScopeId,
                              body: impl FnOnce(&mut Self) -> EvalResult<T>)
                              -> EvalResult<T> {
        let enclosing = std::mem::replace(&mut self.current, scope);
        let result = body(self);
        self.current = enclosing;
        result
    }
}
