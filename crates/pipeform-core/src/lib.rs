//! Pipeform Core - record-level transform engine for data-integration pipelines
//!
//! This crate evaluates small, user-authored condition and expression strings
//! against a single record and applies named transforms to field values,
//! without executing arbitrary code.
//!
//! # Main Components
//!
//! - **Value model**: dot-path resolution and JavaScript-compatible coercions
//!   over `serde_json::Value`
//! - **Expressions**: the condition evaluator, the expression evaluator and
//!   `${path}` template interpolation
//! - **Transforms**: the built-in transform registry keyed by wire-format
//!   identifiers, the asynchronous `LOOKUP` transform and a field-transform
//!   pipeline that applies a sequence of transforms to a record
//!
//! # Example
//!
//! ```
//! use pipeform_core::{evaluate_condition, evaluate_expression, apply_transform, TransformConfig};
//! use serde_json::json;
//!
//! assert!(evaluate_condition("value > 5", &json!(10), None));
//! assert_eq!(evaluate_expression("value.toUpperCase()", &json!("abc"), None), json!("ABC"));
//!
//! let trimmed = apply_transform("TRIM", &json!("  hi  "), &TransformConfig::default(), None);
//! assert_eq!(trimmed, Some(json!("hi")));
//! ```

/// Declares a function returning a lazily compiled, process-wide regex.
macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static ::regex::Regex {
            static RE: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            RE.get_or_init(|| ::regex::Regex::new($pattern).expect("static pattern compiles"))
        }
    };
}

pub mod error;
pub mod expression;
pub mod transform;
pub mod value;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use expression::{
    evaluate_condition, evaluate_expression, interpolate_template, parse_literal,
    ComparisonOperator, EvalError,
};
pub use transform::{
    apply_transform, is_built_in_transform, perform_lookup, EntityRepository, EntityType,
    FieldTransform, FieldTransformBuilder, InMemoryRepository, LogLookupLogger, LookupContext,
    LookupError, LookupLogger, LookupType, PipelineDefinition, RequestContext, TransformConfig,
    TransformFn, TransformPipeline, TransformRegistry, TransformType,
};
pub use value::{get_nested_value, Record};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
