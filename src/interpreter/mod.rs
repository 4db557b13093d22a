//! Expression evaluator
//!
//! This module provides a small tree-walking evaluator:
//! - [`engine`]: [`engine::Interpreter`] over a whole program, and
//!   [`engine::evaluate`] for a single tree
//! - [`errors`]: Runtime error types
//!
//! # Execution Model
//!
//! Each statement is evaluated post-order in 32-bit integer arithmetic. Add,
//! subtract and multiply wrap on overflow; division by zero is an error.

pub mod engine;
pub mod errors;
