// Evaluation engine for expression trees

use tracing::debug;

use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{AstNode, BinOp, Program};

enum Step<'a> {
    Visit(&'a AstNode),
    Apply(BinOp),
}

/// Evaluate one expression tree.
///
/// Operands are evaluated left then right, and the walk uses heap stacks, so
/// tree depth is bounded by memory rather than by the thread's stack.
pub fn evaluate(node: &AstNode) -> Result<i32, RuntimeError> {
    let mut steps = vec![Step::Visit(node)];
    let mut values: Vec<i32> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Visit(AstNode::IntLiteral(n)) => values.push(*n),
            Step::Visit(AstNode::BinaryOp { op, left, right }) => {
                steps.push(Step::Apply(*op));
                steps.push(Step::Visit(right.as_ref()));
                steps.push(Step::Visit(left.as_ref()));
            }
            Step::Apply(op) => {
                let (Some(rhs), Some(lhs)) = (values.pop(), values.pop()) else {
                    unreachable!("operator applied without two operands");
                };
                values.push(apply(op, lhs, rhs)?);
            }
        }
    }

    match values.as_slice() {
        [value] => Ok(*value),
        _ => unreachable!("expression left {} values", values.len()),
    }
}

fn apply(op: BinOp, lhs: i32, rhs: i32) -> Result<i32, RuntimeError> {
    match op {
        BinOp::Add => Ok(lhs.wrapping_add(rhs)),
        BinOp::Sub => Ok(lhs.wrapping_sub(rhs)),
        BinOp::Mul => Ok(lhs.wrapping_mul(rhs)),
        BinOp::Div => {
            if rhs == 0 {
                return Err(RuntimeError::DivisionByZero { dividend: lhs });
            }
            // i32::MIN / -1 wraps to i32::MIN
            Ok(lhs.wrapping_div(rhs))
        }
    }
}

/// Runs every statement of a program and keeps each statement's value
pub struct Interpreter {
    program: Program,
    results: Vec<i32>,
}

impl Interpreter {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            results: Vec::new(),
        }
    }

    /// Evaluate all statements in order, stopping at the first error.
    ///
    /// Values computed before the failing statement remain available through
    /// [`Interpreter::results`].
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        self.results.clear();

        for (index, node) in self.program.nodes.iter().enumerate() {
            let value = evaluate(node).map_err(|err| RuntimeError::InStatement {
                statement: index + 1,
                source: Box::new(err),
            })?;
            debug!(statement = index + 1, value, "evaluated statement");
            self.results.push(value);
        }

        Ok(())
    }

    /// Values of the statements evaluated so far, in source order.
    pub fn results(&self) -> &[i32] {
        &self.results
    }

    pub fn program(&self) -> &Program {
        &self.program
    }
}
