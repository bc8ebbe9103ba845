use std::fmt;

use logos::{Lexer, Logos};

use crate::error::Location;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    /// Real literal tokens such as `3.14`. Digits are required on both sides
    /// of the dot.
    #[regex(r"[0-9]+\.[0-9]+", parse_real)]
    Real(f64),
    /// Integer literal tokens: decimal `42`, octal `052` or hexadecimal
    /// `0x2A`.
    #[regex(r"[0-9]+", parse_integer)]
    #[regex(r"0[xX][0-9a-fA-F]+", parse_hex)]
    Integer(i64),
    /// Character literal tokens such as `'a'` or `'\n'`.
    #[regex(r"'([^'\\\n]|\\[^\n])*'", parse_char, allow_greedy = true)]
    Char(char),
    /// String literal tokens such as `"hello\n"`.
    #[regex(r#""([^"\\\n]|\\[^\n])*""#, parse_string, allow_greedy = true)]
    Str(String),
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `var`
    #[token("var")]
    Var,
    /// `if`
    #[token("if")]
    If,
    /// `elif`
    #[token("elif")]
    Elif,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `do`
    #[token("do")]
    Do,
    /// `for`
    #[token("for")]
    For,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `return`
    #[token("return")]
    Return,
    /// `procedure`
    #[token("procedure")]
    Procedure,
    /// `eval`
    #[token("eval")]
    Eval,
    /// Identifier tokens; variable or procedure names such as `x` or `fact`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n\r]*", logos::skip, allow_greedy = true)]
    Comment,
    /// ```text
    /// /* Multi line comments. */
    /// ```
    #[regex(r"/\*([^*]|\*[^/])*\*/", |lex| {
        let comment = lex.slice();
        if let Some(last) = comment.rfind('\n') {
            lex.extras.line += comment.matches('\n').count();
            lex.extras.line_start = lex.span().start + last + 1;
        }
        logos::Skip
    })]
    MultiLineComment,
    /// Line breaks; skipped, but they advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        lex.extras.line_start = lex.span().end;
        logos::Skip
    })]
    NewLine,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `<<`
    #[token("<<")]
    ShiftLeft,
    /// `>>`
    #[token(">>")]
    ShiftRight,
    /// `>>>`
    #[token(">>>")]
    UnsignedShiftRight,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `^`
    #[token("^")]
    Caret,
    /// `~`
    #[token("~")]
    Tilde,
    /// `!`
    #[token("!")]
    Bang,
    /// `&&`
    #[token("&&")]
    DoubleAmpersand,
    /// `||`
    #[token("||")]
    DoublePipe,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `=`
    #[token("=")]
    Equals,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    StarAssign,
    /// `/=`
    #[token("/=")]
    SlashAssign,
    /// `%=`
    #[token("%=")]
    PercentAssign,
    /// `<<=`
    #[token("<<=")]
    ShiftLeftAssign,
    /// `>>=`
    #[token(">>=")]
    ShiftRightAssign,
    /// `>>>=`
    #[token(">>>=")]
    UnsignedShiftRightAssign,
    /// `&=`
    #[token("&=")]
    AmpersandAssign,
    /// `^=`
    #[token("^=")]
    CaretAssign,
    /// `|=`
    #[token("|=")]
    PipeAssign,
    /// `?`
    #[token("?")]
    Question,
    /// `:`
    #[token(":")]
    Colon,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// Terminator appended by the token cursor once the source is exhausted.
    EndOfInput,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Real(r) => return write!(f, "real literal {r}"),
            Self::Integer(n) => return write!(f, "integer literal {n}"),
            Self::Char(c) => return write!(f, "character literal {c:?}"),
            Self::Str(s) => return write!(f, "string literal {s:?}"),
            Self::Identifier(name) => return write!(f, "identifier '{name}'"),
            Self::EndOfInput => return write!(f, "end of input"),
            Self::True => "true",
            Self::False => "false",
            Self::Var => "var",
            Self::If => "if",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::While => "while",
            Self::Do => "do",
            Self::For => "for",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Return => "return",
            Self::Procedure => "procedure",
            Self::Eval => "eval",
            Self::Comment | Self::MultiLineComment => "comment",
            Self::NewLine => "newline",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::UnsignedShiftRight => ">>>",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Tilde => "~",
            Self::Bang => "!",
            Self::DoubleAmpersand => "&&",
            Self::DoublePipe => "||",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equals => "=",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::StarAssign => "*=",
            Self::SlashAssign => "/=",
            Self::PercentAssign => "%=",
            Self::ShiftLeftAssign => "<<=",
            Self::ShiftRightAssign => ">>=",
            Self::UnsignedShiftRightAssign => ">>>=",
            Self::AmpersandAssign => "&=",
            Self::CaretAssign => "^=",
            Self::PipeAssign => "|=",
            Self::Question => "?",
            Self::Colon => ":",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
        };
        write!(f, "'{symbol}'")
    }
}

/// Lexing failures reported by the token callbacks.
///
/// The default variant is what logos produces for input that matches no
/// token at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexError {
    /// No token starts with this character.
    #[default]
    IllegalCharacter,
    /// The text has the shape of a literal but cannot be decoded.
    MalformedLiteral(&'static str),
}

/// An unrecognized escape sequence inside a character or string literal.
///
/// Warnings never stop interpretation; the escaped character is used as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexWarning {
    /// The character following the backslash.
    pub escape: char,
    /// Location of the backslash.
    pub at:     Location,
}

impl fmt::Display for LexWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
               "Warning at {}: Unrecognized escape sequence '\\{}', using '{}'.",
               self.at, self.escape, self.escape)
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line and the byte offset where it starts, so token
/// columns can be derived from spans, and collects escape warnings.
#[derive(Debug, Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
    /// Escape warnings raised so far.
    pub warnings:   Vec<LexWarning>,
}

impl LexerExtras {
    /// Creates extras positioned at the first line of the source.
    #[must_use]
    pub const fn new() -> Self {
        Self { line:       1,
               line_start: 0,
               warnings:   Vec::new(), }
    }

    /// Converts a byte offset on the current line into a location.
    #[must_use]
    pub const fn location_of(&self, offset: usize) -> Location {
        Location::new(self.line, offset.saturating_sub(self.line_start) + 1)
    }
}

/// Parses a real literal from the current token slice.
fn parse_real(lex: &Lexer<Token>) -> Result<f64, LexError> {
    lex.slice().parse().map_err(|_| LexError::MalformedLiteral("real"))
}

/// Parses a decimal or octal integer literal.
///
/// A leading zero followed by more digits selects base 8, so `017` is 15 and
/// `019` is malformed.
fn parse_integer(lex: &Lexer<Token>) -> Result<i64, LexError> {
    let text = lex.slice();
    let parsed = match text.strip_prefix('0') {
        Some(octal) if !octal.is_empty() => i64::from_str_radix(octal, 8),
        _ => text.parse(),
    };
    parsed.map_err(|_| LexError::MalformedLiteral("integer"))
}

/// Parses a hexadecimal integer literal with its `0x` prefix.
fn parse_hex(lex: &Lexer<Token>) -> Result<i64, LexError> {
    i64::from_str_radix(&lex.slice()[2..], 16).map_err(|_| LexError::MalformedLiteral("integer"))
}

/// Parses a character literal; it must decode to exactly one character.
fn parse_char(lex: &mut Lexer<Token>) -> Result<char, LexError> {
    let decoded = unescape(lex, "character")?;
    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(LexError::MalformedLiteral("character")),
    }
}

/// Parses a string literal.
fn parse_string(lex: &mut Lexer<Token>) -> Result<String, LexError> {
    unescape(lex, "string")
}

/// Decodes the escapes of the quoted literal in the current slice.
///
/// Unknown escapes produce a [`LexWarning`] and keep the escaped character.
fn unescape(lex: &mut Lexer<Token>, kind: &'static str) -> Result<String, LexError> {
    let slice = lex.slice();
    let body_start = lex.span().start + 1;
    let body = &slice[1..slice.len() - 1];

    let mut decoded = String::with_capacity(body.len());
    let mut warnings = Vec::new();
    let mut chars = body.char_indices();

    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        let Some((_, escaped)) = chars.next() else {
            return Err(LexError::MalformedLiteral(kind));
        };
        let c = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0C',
            'v' => '\x0B',
            '\\' | '\'' | '"' => escaped,
            'x' => {
                let digits: String = chars.by_ref().take(2).map(|(_, d)| d).collect();
                if digits.len() != 2 {
                    return Err(LexError::MalformedLiteral(kind));
                }
                u8::from_str_radix(&digits, 16).map(char::from)
                                               .map_err(|_| LexError::MalformedLiteral(kind))?
            },
            other => {
                let warning = LexWarning { escape: other,
                                           at:     lex.extras.location_of(body_start + offset), };
                tracing::warn!("{warning}");
                warnings.push(warning);
                other
            },
        };
        decoded.push(c);
    }

    lex.extras.warnings.append(&mut warnings);
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lex_all(source: &str) -> Vec<Result<Token, LexError>> {
        Token::lexer_with_extras(source, LexerExtras::new()).collect()
    }

    #[test]
    fn integer_literal_bases() {
        assert_eq!(lex_all("42 052 0x2A 0"),
                   vec![Ok(Token::Integer(42)),
                        Ok(Token::Integer(42)),
                        Ok(Token::Integer(42)),
                        Ok(Token::Integer(0))]);
    }

    #[test]
    fn malformed_octal_is_rejected() {
        assert_eq!(lex_all("019"), vec![Err(LexError::MalformedLiteral("integer"))]);
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(lex_all(">>>= >>> >> >= >"),
                   vec![Ok(Token::UnsignedShiftRightAssign),
                        Ok(Token::UnsignedShiftRight),
                        Ok(Token::ShiftRight),
                        Ok(Token::GreaterEqual),
                        Ok(Token::Greater)]);
    }

    #[test]
    fn keywords_are_not_identifiers() {
        assert_eq!(lex_all("procedure procedures"),
                   vec![Ok(Token::Procedure), Ok(Token::Identifier("procedures".into()))]);
    }

    #[test]
    fn escapes_are_decoded() {
        assert_eq!(lex_all(r#"'\n' '\x41' "a\tb""#),
                   vec![Ok(Token::Char('\n')), Ok(Token::Char('A')), Ok(Token::Str("a\tb".into()))]);
    }

    #[test]
    fn unknown_escape_warns_and_substitutes() {
        let mut lexer = Token::lexer_with_extras("\n  'x' \"\\q\"", LexerExtras::new());
        assert_eq!(lexer.next(), Some(Ok(Token::Char('x'))));
        assert_eq!(lexer.next(), Some(Ok(Token::Str("q".into()))));
        assert_eq!(lexer.extras.warnings,
                   vec![LexWarning { escape: 'q',
                                     at:     Location::new(2, 8), }]);
    }

    #[test]
    fn comments_keep_line_numbers() {
        let mut lexer = Token::lexer_with_extras("/* a\nb */ x // c\ny", LexerExtras::new());
        assert_eq!(lexer.next(), Some(Ok(Token::Identifier("x".into()))));
        assert_eq!(lexer.extras.location_of(lexer.span().start), Location::new(2, 6));
        assert_eq!(lexer.next(), Some(Ok(Token::Identifier("y".into()))));
        assert_eq!(lexer.extras.location_of(lexer.span().start), Location::new(3, 1));
    }

    #[test]
    fn quoted_literals_end_at_the_first_unescaped_quote() {
        assert_eq!(lex_all(r#""a\"b" "c" '\'' 'd' // to the end"#),
                   vec![Ok(Token::Str("a\"b".into())),
                        Ok(Token::Str("c".into())),
                        Ok(Token::Char('\'')),
                        Ok(Token::Char('d'))]);
    }

    #[test]
    fn real_requires_digits_on_both_sides() {
        assert_eq!(lex_all("1.5"), vec![Ok(Token::Real(1.5))]);
        assert_eq!(lex_all("1."), vec![Ok(Token::Integer(1)), Err(LexError::IllegalCharacter)]);
    }
}
