//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, the error types and the
//! statement loop.
//!
//! # Parser Architecture
//!
//! - This module: Parser state (scanner plus one lookahead token), helper
//!   methods, and the statement driver
//! - `expressions`: Precedence climbing for binary expressions
//!
//! The lookahead is "the most recently scanned token not yet consumed by a
//! grammar rule". Every rule that consumes it calls [`Parser::advance`] to pull
//! the next one from the scanner, so scanning and parsing interleave.

use std::mem;
use std::str::Chars;

use thiserror::Error;
use tracing::debug;

use crate::parser::ast::{AstNode, Program};
use crate::parser::lexer::{LexError, Scanner, Token};

/// A syntax error, tagged with the line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error on line {line}: {kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// Only integer literals may start an expression or follow an operator.
    #[error("expected an integer literal, found {found}")]
    ExpectedPrimary { found: Token },

    /// A token in operator position that has no binding power.
    #[error("expected an operator or ';', found {found}")]
    NotAnOperator { found: Token },

    /// The operator mapping was handed a token that is not `+ - * /`.
    #[error("{found} is not an arithmetic operator")]
    InvalidArithOp { found: Token },

    #[error("expected {what}, found {found}")]
    Expected { what: &'static str, found: Token },
}

/// Any error that stops a parse. Lexical and syntactic errors stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl ParseError {
    /// Line the error was detected on.
    pub fn line(&self) -> usize {
        match self {
            ParseError::Lex(err) => err.line,
            ParseError::Syntax(err) => err.line,
        }
    }
}

/// Expression parser with a single token of lookahead
pub struct Parser<I: Iterator<Item = char>> {
    pub(crate) scanner: Scanner<I>,
    pub(crate) token: Token,
}

impl<'a> Parser<Chars<'a>> {
    /// Create a parser over a source string and prime the lookahead.
    pub fn new(source: &'a str) -> Result<Self, ParseError> {
        Self::from_scanner(Scanner::new(source))
    }
}

impl<I: Iterator<Item = char>> Parser<I> {
    /// Wrap an existing scanner and prime the lookahead with its first token.
    pub fn from_scanner(mut scanner: Scanner<I>) -> Result<Self, ParseError> {
        let token = scanner.scan()?;
        Ok(Self { scanner, token })
    }

    /// Parse `;`-terminated expression statements until end of input.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            let stmt = self.parse_statement()?;
            program.nodes.push(stmt);
        }

        debug!(statements = program.nodes.len(), "parsed program");
        Ok(program)
    }

    /// Parse one expression and the `;` that ends it.
    pub fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        let expr = self.parse_expression()?;
        self.expect_semicolon()?;
        debug!(line = self.line(), %expr, "parsed statement");
        Ok(expr)
    }

    /// The current lookahead token.
    pub fn token(&self) -> Token {
        self.token
    }

    /// Line the scanner has reached.
    pub fn line(&self) -> usize {
        self.scanner.line()
    }

    pub fn is_at_end(&self) -> bool {
        self.token.is_eof()
    }

    /// Consume the lookahead if it is the same kind as `expected`.
    pub fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        if mem::discriminant(&self.token) == mem::discriminant(&expected) {
            self.advance()
        } else {
            Err(self.syntax_error(SyntaxErrorKind::Expected {
                what,
                found: self.token,
            }))
        }
    }

    pub fn expect_semicolon(&mut self) -> Result<(), ParseError> {
        self.expect(Token::Semicolon, "';'")
    }

    // ===== Helper methods =====

    /// Replace the lookahead with the next scanned token.
    pub(crate) fn advance(&mut self) -> Result<(), ParseError> {
        self.token = self.scanner.scan()?;
        Ok(())
    }

    pub(crate) fn syntax_error(&self, kind: SyntaxErrorKind) -> ParseError {
        ParseError::Syntax(SyntaxError {
            kind,
            line: self.line(),
        })
    }
}
