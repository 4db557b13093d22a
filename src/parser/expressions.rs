//! Expression parsing implementation
//!
//! Binary expressions are parsed by precedence climbing over the binding
//! powers in [`Token::precedence`]: `*` and `/` at 20, `+` and `-` at 10, and 0
//! for everything else.
//!
//! # Algorithm
//!
//! [`Parser::parse_binary`] takes a floor `min_prec`. It parses a primary, then
//! keeps absorbing operators whose level is strictly greater than the floor,
//! parsing each right operand recursively with the operator's own level as the
//! new floor. An operator of equal level therefore never binds to the right,
//! which gives left-to-right grouping, while a tighter operator is absorbed by
//! the recursive call before it returns.
//!
//! An expression ends at `;`. The separator is checked after every subtree so
//! the climb stops as soon as the statement is complete; any other token in
//! operator position with level 0 is a syntax error.

use crate::parser::ast::{AstNode, BinOp};
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser, SyntaxErrorKind};

impl<I: Iterator<Item = char>> Parser<I> {
    /// Parse expression (top-level entry point)
    pub fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary(0)
    }

    /// Parse a binary expression whose operators all bind tighter than
    /// `min_prec`.
    pub(crate) fn parse_binary(&mut self, min_prec: u8) -> Result<AstNode, ParseError> {
        let mut left = self.parse_primary()?;

        if self.token == Token::Semicolon {
            return Ok(left);
        }

        loop {
            let op_token = self.token;
            let prec = self.op_precedence(op_token)?;
            if prec <= min_prec {
                break;
            }

            let op = BinOp::from_token(op_token, self.line())?;
            self.advance()?;

            let right = self.parse_binary(prec)?;
            left = AstNode::binary(op, left, right);

            if self.token == Token::Semicolon {
                return Ok(left);
            }
        }

        Ok(left)
    }

    /// Parse a primary: an integer literal.
    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        match self.token {
            Token::IntLiteral(value) => {
                self.advance()?;
                Ok(AstNode::IntLiteral(value))
            }
            found => Err(self.syntax_error(SyntaxErrorKind::ExpectedPrimary { found })),
        }
    }

    /// Binding power of a token in operator position; level 0 is an error.
    fn op_precedence(&self, token: Token) -> Result<u8, ParseError> {
        match token.precedence() {
            0 => Err(self.syntax_error(SyntaxErrorKind::NotAnOperator { found: token })),
            prec => Ok(prec),
        }
    }
}
