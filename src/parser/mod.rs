//! Expression source parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Scanning (characters → tokens, one at a time)
//! - [`parse`]: Parser state, error types and the statement loop
//! - [`expressions`]: Precedence climbing for binary operators
//! - [`ast`]: AST node definitions
//!
//! # Parser Implementation
//!
//! Hand-written parser that keeps exactly one token of lookahead and pulls the
//! next token from the scanner whenever a grammar rule consumes the current one.
//! No external parser generator dependencies.

pub mod ast;
pub mod expressions;
pub mod lexer;
pub mod parse;
