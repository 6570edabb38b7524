//! Condition and expression evaluation for record transforms
//!
//! Conditions and expressions are short strings authored in pipeline
//! definitions (`value > 5`, `record.customer.tier == 'gold'`,
//! `value.toUpperCase()`, `value > 0 ? 'in stock' : 'sold out'`). They are
//! recognized by an ordered list of patterns rather than parsed into a
//! general AST: the first pattern that matches decides the meaning, and
//! anything unrecognized falls back to a safe default. No code is executed.
//!
//! # Module Organization
//!
//! - [`literal`] - Literal coercion shared by comparisons and ternary branches
//! - [`condition`] - Boolean conditions
//! - [`evaluator`] - Value-producing expressions
//! - [`template`] - `${path}` interpolation
//!
//! # Failure behaviour
//!
//! The public entry points never fail. A condition that cannot be evaluated
//! is `false`; an expression that cannot be evaluated returns the input value
//! unchanged. The `try_*` variants expose the underlying [`EvalError`] for
//! diagnostics.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

pub mod condition;
pub mod evaluator;
pub mod literal;
pub mod template;


pub use condition::{evaluate_condition, try_evaluate_condition, ComparisonOperator};
pub use evaluator::{evaluate_expression, try_evaluate_expression};
pub use literal::parse_literal;
pub use template::interpolate_template;

/// Errors raised while evaluating a condition or expression.
///
/// These never cross the public fail-soft functions; they are logged at
/// debug level and replaced by the documented fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Condition matches none of the supported forms
    #[error("Unrecognized condition: {0}")]
    UnrecognizedCondition(String),

    /// A `record.` reference was used but no record was supplied
    #[error("Condition references record.{path} but no record was provided")]
    MissingRecord { path: String },

    /// Numeric argument could not be represented
    #[error("Invalid numeric literal '{literal}' in {context}")]
    InvalidNumber { literal: String, context: String },
}

impl EvalError {
    pub(crate) fn invalid_number(literal: &str, context: &str) -> Self {
        Self::InvalidNumber {
            literal: literal.to_string(),
            context: context.to_string(),
        }
    }
}
