/// The call stack module tracks active procedure calls.
///
/// Each frame records where to resume in the token stream and the argument
/// values bound for the call. The stack refuses to grow past its configured
/// depth.
pub mod call_stack;
/// The cursor module gives random access to the token stream.
///
/// Tokens are lexed lazily and cached by position, so the interpreter can
/// seek back to any earlier position and read the exact same tokens again.
///
/// # Responsibilities
/// - Lexes on demand and caches every token with its source location.
/// - Supports peeking, stepping back one token and absolute seeks.
/// - Repeats the end-of-input token once the source is exhausted.
pub mod cursor;
/// The evaluator module computes expression values.
///
/// Expressions are evaluated straight from the token stream with one
/// recursive rule per precedence level. Every rule also has a skip mode that
/// consumes the same tokens without evaluating anything.
///
/// # Responsibilities
/// - Evaluates the comma, assignment, conditional, binary and unary levels.
/// - Reads and writes variables through the scope tree.
/// - Performs procedure calls.
pub mod evaluator;
/// The lexer module tokenizes source code.
///
/// The lexer reads the raw source text and produces tokens for keywords,
/// identifiers, literals and operators, tracking line and column as it goes.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source locations.
/// - Decodes numeric, character and string literals, including escapes.
/// - Reports illegal characters and malformed literals, and records warnings
///   for unknown escape sequences.
pub mod lexer;
/// Operator tables and the value coercion rules.
pub mod operator;
/// The scope module owns every lexical scope of a run.
///
/// Scopes live in a generational arena and form a tree rooted at the global
/// scope. Name resolution walks parent links outward.
pub mod scope;
/// The statement module executes statements.
///
/// # Responsibilities
/// - Dispatches on the leading keyword of each statement.
/// - Implements blocks, declarations, `eval`, jumps and procedure
///   definitions.
/// - Implements branches and loops by seeking the cursor.
pub mod statement;
/// Per-scope symbol tables.
pub mod symbol;
/// The value module defines the runtime data types.
///
/// Values are integers, reals, booleans, procedure descriptors and the
/// placeholder produced by skipped or value-less expressions.
pub mod value;
