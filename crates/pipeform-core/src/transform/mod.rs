//! Field transforms for records flowing through a pipeline step
//!
//! Every transform is a pure function `(value, config, record) -> value`
//! identified by a case-sensitive wire name such as `TRIM` or `MAP_ARRAY`.
//! The synchronous transforms are dispatched through the
//! [`TransformRegistry`]; `LOOKUP` performs I/O against an injected entity
//! store and runs through [`perform_lookup`] instead.
//!
//! # Module Organization
//!
//! - [`types`] - Transform identifiers, configuration and handler signature
//! - [`registry`] - Identifier to handler dispatch
//! - [`record`] - Conditional, coalescing and expression-driven transforms
//! - [`map`] - Static value mapping
//! - [`lookup`] - Asynchronous entity and static lookup
//! - [`string`], [`number`], [`date`], [`convert`], [`array`] - Leaf transforms
//! - [`pipeline`] - Ordered field-transform steps applied to a record
//! - [`builder`] - Fluent builder API for pipeline steps
//!
//! # Examples
//!
//! ```
//! use pipeform_core::{FieldTransformBuilder, TransformConfig, TransformPipeline, TransformType};
//! use serde_json::json;
//!
//! let slug = FieldTransformBuilder::new("slug", "name")
//!     .target("slug")
//!     .transform(TransformType::Slugify)
//!     .build()
//!     .unwrap();
//!
//! let tier = FieldTransformBuilder::new("tier", "price")
//!     .target("tier")
//!     .transform(TransformType::IfElse)
//!     .config(TransformConfig {
//!         condition: Some("value >= 100".to_string()),
//!         then_value: Some(json!("premium")),
//!         else_value: Some(json!("standard")),
//!         ..Default::default()
//!     })
//!     .build()
//!     .unwrap();
//!
//! let pipeline = TransformPipeline::new().add_step(slug).add_step(tier);
//! let output = pipeline.apply(&json!({"name": "Blue Shoe", "price": 120})).unwrap();
//!
//! assert_eq!(output["slug"], json!("blue-shoe"));
//! assert_eq!(output["tier"], json!("premium"));
//! ```
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

// Core types
pub mod types;

// Dispatch
pub mod registry;

// Record-aware and lookup transforms
pub mod lookup;
pub mod map;
pub mod record;

// Leaf transforms
pub mod array;
pub mod convert;
pub mod date;
pub mod number;
pub mod string;

// Pipeline
pub mod builder;
pub mod pipeline;


pub use types::{
    LookupType, MathOperation, PadPosition, TransformConfig, TransformFn, TransformType,
    UnknownTransformType,
};

pub use builder::FieldTransformBuilder;
pub use lookup::{
    perform_lookup, EntityRepository, EntityType, InMemoryRepository, LogLookupLogger,
    LookupContext, LookupError, LookupLogger, RequestContext,
};
pub use map::apply_map;
pub use pipeline::{FieldTransform, PipelineDefinition, TransformPipeline};
pub use record::{apply_coalesce, apply_default, apply_filter, apply_if_else, apply_map_array};
pub use registry::{apply_transform, is_built_in_transform, TransformRegistry};
