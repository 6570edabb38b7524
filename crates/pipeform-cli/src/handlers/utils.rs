//! Shared utilities for command handlers

use crate::config::read_structured;
use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Records read from an input file
#[derive(Debug, Clone, PartialEq)]
pub enum RecordBatch {
    /// The file held a single object
    Single(Value),
    /// The file held an array of objects
    Many(Vec<Value>),
}

impl RecordBatch {
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(records) => records.len(),
        }
    }

    pub fn records(&self) -> &[Value] {
        match self {
            Self::Single(record) => std::slice::from_ref(record),
            Self::Many(records) => records,
        }
    }

    /// Package results in the same shape the input had
    pub fn reshape(&self, mut results: Vec<Value>) -> Value {
        match self {
            Self::Single(_) if results.len() == 1 => results.remove(0),
            _ => Value::Array(results),
        }
    }
}

/// Load a records file holding one object or an array of objects
pub fn load_records(path: &Path) -> Result<RecordBatch> {
    let content: Value = read_structured(path)?;
    let invalid = |message: String| Error::InvalidFormat {
        path: path.to_path_buf(),
        expected: "an object or an array of objects".to_string(),
        message,
    };

    match content {
        Value::Object(_) => Ok(RecordBatch::Single(content)),
        Value::Array(items) => {
            if let Some(index) = items.iter().position(|item| !item.is_object()) {
                return Err(invalid(format!("element {} is not an object", index)));
            }
            Ok(RecordBatch::Many(items))
        }
        other => Err(invalid(format!(
            "found {}",
            pipeform_core::value::value_type_name(&other)
        ))),
    }
}

/// Parse a `--value` argument: JSON when it parses, otherwise the bare text
pub fn parse_value_arg(text: Option<&str>) -> Value {
    match text {
        None => Value::Null,
        Some(text) => serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())),
    }
}

/// Parse an argument that must be JSON
pub fn parse_json_arg(name: &str, text: Option<&str>) -> Result<Option<Value>> {
    text.map(|text| {
        serde_json::from_str(text)
            .map_err(|e| Error::invalid_args(format!("--{} is not valid JSON: {}", name, e)))
    })
    .transpose()
}
