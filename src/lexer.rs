//! Position-tracking scanner.
//!
//! There is no separate tokenization pass: the parser asks the [`Scanner`]
//! whether the text at the cursor matches a lexical [`Pattern`], and the
//! scanner either consumes the matching text or reports a [`SyntaxError`]
//! carrying the current [`Position`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::trace;

/// A location in the source text.
///
/// `offset` counts bytes, `line` and `column` are 1-based and count
/// characters. A position only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The position of the first character of a source text.
    pub const fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// What went wrong while scanning or parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// The text at the cursor does not match the required pattern.
    #[error("expected token matching `{0}`")]
    Expected(&'static str),

    /// End of input was reached before the closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// End of input was reached where a value was required.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// No value production starts with the character at the cursor.
    #[error("expected a number, string, dictionary or variable reference ($[name])")]
    ExpectedValue,

    /// A digit sequence that does not fit in an unsigned 64-bit integer.
    #[error("number literal `{0}` is out of range")]
    NumberOutOfRange(String),
}

/// A positioned syntax error. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position}: {kind}")]
pub struct SyntaxError {
    pub position: Position,
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub fn new(position: Position, kind: SyntaxErrorKind) -> Self {
        SyntaxError { position, kind }
    }
}

/// A named lexical pattern, matched only at the cursor.
pub struct Pattern {
    source: &'static str,
    regex: LazyLock<Regex>,
}

impl Pattern {
    /// Length in bytes of the match at the very start of `text`, if any.
    fn match_len(&self, text: &str) -> Option<usize> {
        self.regex.find(text).map(|m| m.end())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

fn anchored(source: &str) -> Regex {
    Regex::new(&format!(r"\A(?:{source})")).expect("lexical patterns are valid regular expressions")
}

macro_rules! patterns {
    ($($(#[$meta:meta])* $name:ident = $re:literal;)*) => {
        $(
            $(#[$meta])*
            pub static $name: Pattern = Pattern {
                source: $re,
                regex: LazyLock::new(|| anchored($re)),
            };
        )*
    };
}

patterns! {
    /// `let` keyword
    LET = "let";
    /// Opening of a query directive
    QUERY_OPEN = r"q\(";
    CLOSE_PAREN = r"\)";
    EQUALS = "=";
    /// Separator between a dictionary key and its value
    ARROW = "=>";
    LBRACE = r"\{";
    RBRACE = r"\}";
    COMMA = ",";
    DOLLAR = r"\$";
    LBRACKET = r"\[";
    RBRACKET = r"\]";
    QUOTE = "\"";
    /// Lowercase ASCII letters and underscore only
    IDENTIFIER = "[_a-z]+";
    /// Unsigned decimal digits only
    NUMBER = "[0-9]+";
}

/// Cursor over a source text.
#[derive(Debug, Clone)]
pub struct Scanner<'src> {
    source: &'src str,
    position: Position,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Scanner {
            source,
            position: Position::start(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// The unconsumed part of the source.
    pub fn rest(&self) -> &'src str {
        &self.source[self.position.offset..]
    }

    pub fn at_end(&self) -> bool {
        self.position.offset >= self.source.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Builds an error at the current position.
    pub fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(self.position, kind)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position.offset += ch.len_utf8();
        if ch == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Some(ch)
    }

    fn consume(&mut self, len: usize) -> &'src str {
        let text = &self.rest()[..len];
        for _ in text.chars() {
            self.advance();
        }
        text
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Skips whitespace, then consumes and returns the text matching
    /// `pattern` at the cursor.
    pub fn match_pattern(&mut self, pattern: &Pattern) -> Result<&'src str, SyntaxError> {
        self.skip_whitespace();
        match pattern.match_len(self.rest()) {
            Some(len) => {
                let token = self.consume(len);
                trace!(token, line = self.position.line, column = self.position.column, "matched");
                Ok(token)
            }
            None => Err(self.error(SyntaxErrorKind::Expected(pattern.source))),
        }
    }

    /// Consumes the body of a string literal up to, but not including, the
    /// closing quote. A backslash always takes the next character with it,
    /// and escapes are returned undecoded.
    pub fn scan_string_body(&mut self) -> Result<&'src str, SyntaxError> {
        let start = self.position.offset;
        loop {
            match self.peek() {
                None => return Err(self.error(SyntaxErrorKind::UnterminatedString)),
                Some('"') => break,
                Some('\\') => {
                    self.advance();
                    if self.advance().is_none() {
                        return Err(self.error(SyntaxErrorKind::UnterminatedString));
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        Ok(&self.source[start..self.position.offset])
    }
}

#[test]
fn test_keywords() {
    let mut scanner = Scanner::new("let q(");
    assert_eq!(scanner.match_pattern(&LET), Ok("let"));
    assert_eq!(scanner.match_pattern(&QUERY_OPEN), Ok("q("));
    assert!(scanner.at_end());
}

#[test]
fn test_pattern_only_matches_at_cursor() {
    let mut scanner = Scanner::new("abc 123");
    let err = scanner.match_pattern(&NUMBER).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::Expected("[0-9]+"));
    assert_eq!(scanner.position(), Position::start());
}
