//! Builder for pipeline steps
//!
//! Fluent construction of [`FieldTransform`] steps with validation on build.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use super::pipeline::FieldTransform;
use super::types::{TransformConfig, TransformType};
use crate::error::{Error, Result};

/// Builder for creating pipeline steps
pub struct FieldTransformBuilder {
    id: String,
    field: String,
    target: Option<String>,
    transform_type: Option<String>,
    config: TransformConfig,
    optional: bool,
}

impl FieldTransformBuilder {
    /// Create a new step builder for the value at `field`
    pub fn new(id: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            target: None,
            transform_type: None,
            config: TransformConfig::default(),
            optional: false,
        }
    }

    /// Write the result to another field
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Use a built-in transform
    pub fn transform(mut self, transform_type: TransformType) -> Self {
        self.transform_type = Some(transform_type.as_str().to_string());
        self
    }

    /// Use a transform by identifier, e.g. one registered as custom
    pub fn transform_named(mut self, transform_type: impl Into<String>) -> Self {
        self.transform_type = Some(transform_type.into());
        self
    }

    pub fn config(mut self, config: TransformConfig) -> Self {
        self.config = config;
        self
    }

    /// Make the step optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Build the step
    pub fn build(self) -> Result<FieldTransform> {
        let transform_type = self
            .transform_type
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::Configuration {
                message: "Transform type is required".to_string(),
                step_id: Some(self.id.clone()),
            })?;

        if self.field.is_empty() {
            return Err(Error::Configuration {
                message: "Source field is required".to_string(),
                step_id: Some(self.id),
            });
        }

        Ok(FieldTransform {
            id: self.id,
            field: self.field,
            target: self.target,
            transform_type,
            config: self.config,
            optional: self.optional,
        })
    }
}
