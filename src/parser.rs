use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    ast::{Expr, Program, Statement},
    lexer::{
        ARROW, CLOSE_PAREN, COMMA, DOLLAR, EQUALS, IDENTIFIER, LBRACE, LBRACKET, LET, NUMBER,
        QUERY_OPEN, QUOTE, RBRACE, RBRACKET, Scanner, SyntaxError, SyntaxErrorKind,
    },
};

/// Recursive-descent parser with one function per grammar production.
///
/// Lexing is interleaved with parsing: every production is written in terms
/// of [`Scanner::match_pattern`] calls. The first mismatch ends parsing.
pub struct Parser<'src> {
    scanner: Scanner<'src>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Parser {
            scanner: Scanner::new(source),
        }
    }

    /// Parse the whole source into a [`Program`].
    ///
    /// Either every statement parses or nothing is returned.
    pub fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let mut statements = vec![];

        loop {
            self.scanner.skip_whitespace();
            if self.scanner.at_end() {
                break;
            }
            statements.push(self.parse_statement()?);
        }

        debug!(statements = statements.len(), "parsed program");
        Ok(Program::new(statements))
    }

    /// Dispatch on the text at the cursor: `let` and `q(` select their
    /// statements, anything else is an expression statement.
    pub fn parse_statement(&mut self) -> Result<Statement, SyntaxError> {
        self.scanner.skip_whitespace();

        if self.scanner.starts_with("let") {
            self.parse_let()
        } else if self.scanner.starts_with("q(") {
            self.parse_query()
        } else {
            self.parse_expression().map(Statement::Expression)
        }
    }

    fn parse_let(&mut self) -> Result<Statement, SyntaxError> {
        self.scanner.match_pattern(&LET)?;
        let name = self.parse_identifier()?;
        self.scanner.match_pattern(&EQUALS)?;
        let value = self.parse_value()?;
        Ok(Statement::Let { name, value })
    }

    fn parse_query(&mut self) -> Result<Statement, SyntaxError> {
        self.scanner.match_pattern(&QUERY_OPEN)?;
        let value = self.parse_value()?;
        self.scanner.match_pattern(&CLOSE_PAREN)?;
        Ok(Statement::Query(value))
    }

    pub fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.scanner.skip_whitespace();
        if self.scanner.peek() == Some('$') {
            self.parse_var_ref()
        } else {
            self.parse_value()
        }
    }

    /// Parse a value, choosing the production from the first character.
    pub fn parse_value(&mut self) -> Result<Expr, SyntaxError> {
        self.scanner.skip_whitespace();

        match self.scanner.peek() {
            None => Err(self.scanner.error(SyntaxErrorKind::UnexpectedEnd)),
            Some(ch) if ch.is_ascii_digit() => self.parse_number().map(Expr::Number),
            Some('"') => self.parse_string().map(Expr::String),
            Some('{') => self.parse_dict(),
            Some('$') => self.parse_var_ref(),
            Some(_) => Err(self.scanner.error(SyntaxErrorKind::ExpectedValue)),
        }
    }

    fn parse_dict(&mut self) -> Result<Expr, SyntaxError> {
        self.scanner.match_pattern(&LBRACE)?;
        let mut entries = IndexMap::new();

        while !self.at_dict_end() {
            // Commas only separate entries, so `{,}` and `{a => 1,}` fail
            if !entries.is_empty() {
                self.scanner.match_pattern(&COMMA)?;
            }

            let key = self.parse_identifier()?;
            self.scanner.match_pattern(&ARROW)?;
            let value = self.parse_value()?;

            let (index, previous) = entries.insert_full(key, value);
            if previous.is_some() {
                trace!(index, "duplicate dictionary key replaced");
            }
        }

        self.scanner.match_pattern(&RBRACE)?;
        Ok(Expr::Dict(entries))
    }

    fn at_dict_end(&mut self) -> bool {
        self.scanner.skip_whitespace();
        matches!(self.scanner.peek(), None | Some('}'))
    }

    fn parse_var_ref(&mut self) -> Result<Expr, SyntaxError> {
        self.scanner.match_pattern(&DOLLAR)?;
        self.scanner.match_pattern(&LBRACKET)?;
        let name = self.parse_identifier()?;
        self.scanner.match_pattern(&RBRACKET)?;
        Ok(Expr::VarRef(name))
    }

    fn parse_string(&mut self) -> Result<String, SyntaxError> {
        self.scanner.match_pattern(&QUOTE)?;
        let body = self.scanner.scan_string_body()?;
        self.scanner.match_pattern(&QUOTE)?;
        Ok(body.to_string())
    }

    fn parse_number(&mut self) -> Result<u64, SyntaxError> {
        self.scanner.skip_whitespace();
        let start = self.scanner.position();
        let digits = self.scanner.match_pattern(&NUMBER)?;

        digits.parse::<u64>().map_err(|_| {
            SyntaxError::new(start, SyntaxErrorKind::NumberOutOfRange(digits.to_string()))
        })
    }

    fn parse_identifier(&mut self) -> Result<String, SyntaxError> {
        self.scanner.match_pattern(&IDENTIFIER).map(str::to_string)
    }
}

/// Parse a complete source text.
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    Parser::new(source).parse_program()
}
