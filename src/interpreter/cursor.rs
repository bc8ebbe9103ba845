use logos::Logos;

use crate::{
    error::{Error, InternalError, Location, ParseError},
    interpreter::lexer::{LexError, LexWarning, LexerExtras, Token},
};

/// A token together with where it came from.
///
/// Lexemes are immutable once produced; the cursor hands out clones of its
/// cached entries so revisiting a position always yields identical data.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    /// The token itself, including any literal value.
    pub token:    Token,
    /// Source line, starting at 1.
    pub line:     usize,
    /// Source column, starting at 1.
    pub column:   usize,
    /// Index of this lexeme in the token stream.
    pub position: usize,
}

impl Lexeme {
    /// Returns the source location of the lexeme.
    #[must_use]
    pub const fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }

    /// Returns `true` if the lexeme is the end-of-input terminator.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        matches!(self.token, Token::EndOfInput)
    }
}

/// A randomly seekable view over the token stream.
///
/// Every token ever lexed is cached by position. Seeking back to a visited
/// position and reading again never re-lexes, which is what makes replaying
/// loop bodies and procedure bodies affordable.
///
/// The position is the index of the next token [`TokenCursor::next`] will
/// return.
///
/// # Example
/// ```
/// use retread::interpreter::{cursor::TokenCursor, lexer::Token};
///
/// let mut cursor = TokenCursor::new("x = 1;");
/// let start = cursor.position();
///
/// let first = cursor.next().unwrap();
/// assert_eq!(first.token, Token::Identifier("x".into()));
///
/// cursor.set_position(start).unwrap();
/// assert_eq!(cursor.next().unwrap(), first);
/// ```
pub struct TokenCursor<'src> {
    lexer:    logos::Lexer<'src, Token>,
    cache:    Vec<Lexeme>,
    position: usize,
}

impl<'src> TokenCursor<'src> {
    /// Creates a cursor at the start of `source`. Nothing is lexed yet.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { lexer:    Token::lexer_with_extras(source, LexerExtras::new()),
               cache:    Vec::new(),
               position: 0, }
    }

    /// Returns the token at the current position and advances past it.
    ///
    /// Lexes one more token if the position is at the end of the cache.
    /// Past the end of the source this keeps returning
    /// [`Token::EndOfInput`].
    ///
    /// # Errors
    /// Returns a [`ParseError`] if the source contains an illegal character
    /// or malformed literal at this point.
    pub fn next(&mut self) -> Result<Lexeme, Error> {
        self.fill()?;
        let lexeme = self.cache[self.position].clone();
        self.position += 1;
        Ok(lexeme)
    }

    /// Returns the token at the current position without advancing.
    ///
    /// # Errors
    /// Same as [`TokenCursor::next`].
    pub fn peek(&mut self) -> Result<&Lexeme, Error> {
        self.fill()?;
        Ok(&self.cache[self.position])
    }

    /// Moves one position back.
    ///
    /// # Errors
    /// Returns [`InternalError::IndexOutOfRange`] when already at the start.
    pub fn rollback(&mut self) -> Result<(), InternalError> {
        if self.position == 0 {
            return Err(self.out_of_range(0));
        }
        self.position -= 1;
        Ok(())
    }

    /// Returns the most recently consumed token (the one at position − 1).
    ///
    /// # Errors
    /// Returns [`InternalError::IndexOutOfRange`] when nothing has been
    /// consumed.
    pub fn current(&self) -> Result<&Lexeme, InternalError> {
        self.position
            .checked_sub(1)
            .and_then(|index| self.cache.get(index))
            .ok_or_else(|| self.out_of_range(self.position))
    }

    /// Returns the current position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Seeks to an absolute position.
    ///
    /// Only positions inside the cached range (or one past it) are valid;
    /// seeking never lexes.
    ///
    /// # Errors
    /// Returns [`InternalError::IndexOutOfRange`] for a position beyond the
    /// cache.
    pub fn set_position(&mut self, position: usize) -> Result<(), InternalError> {
        if position > self.cache.len() {
            return Err(self.out_of_range(position));
        }
        self.position = position;
        Ok(())
    }

    /// Number of tokens lexed so far.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Escape-sequence warnings collected while lexing.
    #[must_use]
    pub fn warnings(&self) -> &[LexWarning] {
        &self.lexer.extras.warnings
    }

    /// Makes sure the token at the current position is cached.
    fn fill(&mut self) -> Result<(), Error> {
        while self.cache.len() <= self.position {
            self.lex_one()?;
        }
        Ok(())
    }

    fn lex_one(&mut self) -> Result<(), Error> {
        let token = match self.lexer.next() {
            Some(Ok(token)) => token,
            Some(Err(error)) => {
                let found = self.lexer.slice().to_string();
                let at = self.lexer.extras.location_of(self.lexer.span().start);
                return Err(match error {
                               LexError::IllegalCharacter => {
                                   ParseError::IllegalCharacter { found, at }
                               },
                               LexError::MalformedLiteral(kind) => {
                                   ParseError::MalformedLiteral { kind, text: found, at }
                               },
                           }.into());
            },
            None => Token::EndOfInput,
        };
        let start = if matches!(token, Token::EndOfInput) {
            self.lexer.source().len()
        } else {
            self.lexer.span().start
        };
        let at = self.lexer.extras.location_of(start);
        self.cache.push(Lexeme { token,
                                 line: at.line,
                                 column: at.column,
                                 position: self.cache.len() });
        Ok(())
    }

    const fn out_of_range(&self, index: usize) -> InternalError {
        InternalError::IndexOutOfRange { what: "token stream",
                                         index,
                                         len: self.cache.len() }
    }
}
