//! Field-transform pipeline
//!
//! A pipeline applies an ordered list of [`FieldTransform`] steps to one
//! record. Each step reads the value at its `field` from the working copy,
//! runs its transform and writes the result at its `target` (default
//! `field`). Every transform sees the original input record, which is never
//! modified.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use super::lookup::{perform_lookup, LookupContext};
use super::registry::TransformRegistry;
use super::types::{TransformConfig, TransformFn, TransformType};
use crate::error::{Error, Result};
use crate::value::get_nested_value;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One step of a pipeline: a transform applied to one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTransform {
    /// Step identifier used in diagnostics
    pub id: String,
    /// Dot path of the value to transform
    pub field: String,
    /// Dot path receiving the result, `field` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Transform identifier, built in or registered as custom
    #[serde(rename = "type")]
    pub transform_type: String,
    #[serde(default)]
    pub config: TransformConfig,
    /// Failures of optional steps are logged and skipped
    #[serde(default)]
    pub optional: bool,
}

impl FieldTransform {
    pub fn target_field(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.field)
    }
}

/// Serializable pipeline definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineDefinition {
    pub name: Option<String>,
    pub transforms: Vec<FieldTransform>,
}

/// Ordered transform steps plus custom transforms registered by name
#[derive(Debug, Clone, Default)]
pub struct TransformPipeline {
    steps: Vec<FieldTransform>,
    custom: HashMap<String, TransformFn>,
}

enum Resolved {
    Sync(TransformFn),
    Lookup,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pipeline from a deserialized definition
    pub fn from_definition(definition: PipelineDefinition) -> Self {
        Self::new().add_steps(definition.transforms)
    }

    /// Append a step
    pub fn add_step(mut self, step: FieldTransform) -> Self {
        self.steps.push(step);
        self
    }

    /// Append several steps, keeping their order
    pub fn add_steps<I>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = FieldTransform>,
    {
        self.steps.extend(steps);
        self
    }

    /// Register a custom transform. Built-in identifiers take precedence.
    pub fn with_custom(mut self, name: impl Into<String>, handler: TransformFn) -> Self {
        self.custom.insert(name.into(), handler);
        self
    }

    pub fn steps(&self) -> &[FieldTransform] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Whether any step needs [`apply_with_lookup`](Self::apply_with_lookup)
    pub fn requires_lookup(&self) -> bool {
        self.steps
            .iter()
            .any(|step| step.transform_type == TransformType::Lookup.as_str())
    }

    /// Check that every step has a type and every required step names a
    /// known transform.
    pub fn validate(&self) -> Result<()> {
        for step in &self.steps {
            if step.transform_type.trim().is_empty() {
                return Err(Error::Configuration {
                    message: "Transform type is required".to_string(),
                    step_id: Some(step.id.clone()),
                });
            }
            if !step.optional {
                self.resolve(step)?;
            }
        }
        Ok(())
    }

    /// Apply all steps synchronously.
    ///
    /// Fails with [`Error::AsyncTransform`] on a `LOOKUP` step and with
    /// [`Error::UnknownTransform`] on an unrecognized type, unless the step
    /// is optional.
    pub fn apply(&self, record: &Value) -> Result<Value> {
        let mut result = record.clone();

        for step in &self.steps {
            let outcome = self.resolve(step).and_then(|resolved| match resolved {
                Resolved::Sync(handler) => {
                    let value = get_nested_value(&result, &step.field);
                    let transformed = handler(&value, &step.config, Some(record));
                    set_value_at_path(&mut result, step.target_field(), transformed, &step.id)
                }
                Resolved::Lookup => Err(Error::AsyncTransform {
                    transform_type: step.transform_type.clone(),
                }),
            });
            self.handle_outcome(step, outcome)?;
        }

        Ok(result)
    }

    /// Apply all steps, resolving `LOOKUP` steps through `lookup`.
    pub async fn apply_with_lookup(&self, record: &Value, lookup: &LookupContext) -> Result<Value> {
        let mut result = record.clone();

        for step in &self.steps {
            let outcome = match self.resolve(step) {
                Ok(resolved) => {
                    let value = get_nested_value(&result, &step.field);
                    let transformed = match resolved {
                        Resolved::Sync(handler) => handler(&value, &step.config, Some(record)),
                        Resolved::Lookup => {
                            perform_lookup(&value, &step.config, Some(record), lookup).await
                        }
                    };
                    set_value_at_path(&mut result, step.target_field(), transformed, &step.id)
                }
                Err(e) => Err(e),
            };
            self.handle_outcome(step, outcome)?;
        }

        Ok(result)
    }

    fn resolve(&self, step: &FieldTransform) -> Result<Resolved> {
        let transform_type = step.transform_type.as_str();
        if transform_type == TransformType::Lookup.as_str() {
            return Ok(Resolved::Lookup);
        }
        TransformRegistry::builtin()
            .get(transform_type)
            .or_else(|| self.custom.get(transform_type).copied())
            .map(Resolved::Sync)
            .ok_or_else(|| Error::UnknownTransform {
                transform_type: transform_type.to_string(),
                field: Some(step.field.clone()),
            })
    }

    fn handle_outcome(&self, step: &FieldTransform, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(e) if step.optional => {
                log::warn!("Optional transform step '{}' failed: {}", step.id, e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Write `value` at a dot path, creating intermediate objects.
///
/// Numeric segments address existing array elements, mirroring how paths are
/// read; arrays are never extended.
fn set_value_at_path(data: &mut Value, path: &str, value: Value, step_id: &str) -> Result<()> {
    let path_error = |message: String| Error::Configuration {
        message,
        step_id: Some(step_id.to_string()),
    };

    let mut parts = path.split('.').peekable();
    let mut current = data;

    while let Some(part) = parts.next() {
        let is_last = parts.peek().is_none();

        let slot = match current {
            Value::Object(object) => {
                if is_last {
                    object.insert(part.to_string(), value);
                    return Ok(());
                }
                object
                    .entry(part.to_string())
                    .or_insert_with(|| Value::Object(Map::new()))
            }
            Value::Array(items) => {
                let len = items.len();
                let slot = part
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get_mut(index))
                    .ok_or_else(|| {
                        path_error(format!(
                            "Cannot write '{}': '{}' is not an index into an array of {}",
                            path, part, len
                        ))
                    })?;
                if is_last {
                    *slot = value;
                    return Ok(());
                }
                slot
            }
            _ => {
                return Err(path_error(format!(
                    "Cannot write '{}': '{}' is not inside an object",
                    path, part
                )))
            }
        };

        if slot.is_null() {
            *slot = Value::Object(Map::new());
        }
        current = slot;
    }

    Err(path_error("Target path is empty".to_string()))
}
