// AST (Abstract Syntax Tree) definitions for arithmetic expressions

use std::fmt;
use std::mem;

use crate::parser::lexer::Token;
use crate::parser::parse::{SyntaxError, SyntaxErrorKind};

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// Map an operator token to its AST operator.
    ///
    /// The parser only calls this on tokens with a nonzero precedence, so an
    /// error here means the precedence table and this mapping disagree.
    pub fn from_token(token: Token, line: usize) -> Result<Self, SyntaxError> {
        BinOp::try_from(token).map_err(|found| SyntaxError {
            kind: SyntaxErrorKind::InvalidArithOp { found },
            line,
        })
    }

    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }
}

impl TryFrom<Token> for BinOp {
    type Error = Token;

    fn try_from(token: Token) -> Result<Self, Self::Error> {
        match token {
            Token::Plus => Ok(BinOp::Add),
            Token::Minus => Ok(BinOp::Sub),
            Token::Star => Ok(BinOp::Mul),
            Token::Slash => Ok(BinOp::Div),
            other => Err(other),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Expression tree node.
///
/// Each node owns its children outright; a literal has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    IntLiteral(i32),
    BinaryOp {
        op: BinOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
}

impl AstNode {
    pub fn binary(op: BinOp, left: AstNode, right: AstNode) -> Self {
        AstNode::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of nodes in this tree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            if let AstNode::BinaryOp { left, right, .. } = node {
                pending.push(right.as_ref());
                pending.push(left.as_ref());
            }
        }
        count
    }
}

/// Trees are unlinked onto a heap stack so a long operator chain does not
/// recurse once per level when it is dropped.
impl Drop for AstNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

fn detach_children(node: &mut AstNode, pending: &mut Vec<AstNode>) {
    if let AstNode::BinaryOp { left, right, .. } = node {
        pending.push(mem::replace(left.as_mut(), AstNode::IntLiteral(0)));
        pending.push(mem::replace(right.as_mut(), AstNode::IntLiteral(0)));
    }
}

enum Piece<'a> {
    Node(&'a AstNode),
    Op(BinOp),
    Close,
}

/// Fully parenthesized infix form, e.g. `(2 + (3 * 4))`.
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![Piece::Node(self)];
        while let Some(piece) = pending.pop() {
            match piece {
                Piece::Node(AstNode::IntLiteral(n)) => write!(f, "{}", n)?,
                Piece::Node(AstNode::BinaryOp { op, left, right }) => {
                    f.write_str("(")?;
                    pending.push(Piece::Close);
                    pending.push(Piece::Node(right.as_ref()));
                    pending.push(Piece::Op(*op));
                    pending.push(Piece::Node(left.as_ref()));
                }
                Piece::Op(op) => write!(f, " {} ", op)?,
                Piece::Close => f.write_str(")")?,
            }
        }
        Ok(())
    }
}

/// Parsed statements, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub nodes: Vec<AstNode>,
}

impl Program {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
