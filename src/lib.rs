//! # Introduction
//!
//! exprc is the front end of a small expression language: it scans a
//! character stream into tokens and parses those tokens into an abstract
//! syntax tree with correct operator precedence.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Scanner → Parser → AST → Interpreter
//! ```
//!
//! 1. [`parser::lexer`] — turns characters into [`parser::lexer::Token`]s on
//!    demand, with one character of pushback and a line counter.
//! 2. [`parser::parse`] — holds the single lookahead token and drives the
//!    statement loop; [`parser::expressions`] builds expression trees by
//!    precedence climbing.
//! 3. [`parser::ast`] — the [`parser::ast::AstNode`] sum type.
//! 4. [`interpreter`] — a recursive evaluator over finished trees.
//!
//! Scanning and parsing interleave token by token. There is no separate
//! tokenization pass.
//!
//! ## Supported language
//!
//! Statements are integer-literal arithmetic expressions using `+ - * /`,
//! each terminated by `;`. The scanner also recognises identifiers,
//! comparisons, assignment, braces, parentheses and the keywords `print`,
//! `int`, `if`, `else`, `while`, `for` and `void`; no grammar rule consumes
//! them yet.

pub mod interpreter;
pub mod parser;

use parser::ast::Program;
use parser::parse::{ParseError, Parser};

/// Parse a whole source string into a [`Program`].
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::new(source)?.parse_program()
}
