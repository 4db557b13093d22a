//! Runtime error types for the evaluator
//!
//! [`RuntimeError`] covers failures while evaluating a finished tree, as
//! opposed to the lexical and syntax errors raised while building it.

use thiserror::Error;

/// Runtime errors that can occur during evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Division by zero
    #[error("division by zero ({dividend} / 0)")]
    DivisionByZero { dividend: i32 },

    /// Evaluation failed inside a numbered statement (1-based)
    #[error("statement {statement}: {source}")]
    InStatement {
        statement: usize,
        #[source]
        source: Box<RuntimeError>,
    },
}

impl RuntimeError {
    /// Strip any statement context and return the underlying error.
    pub fn root(&self) -> &RuntimeError {
        match self {
            RuntimeError::InStatement { source, .. } => source.root(),
            other => other,
        }
    }
}
