//! Boolean and type-conversion transforms
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use super::types::TransformConfig;
use crate::value::{is_truthy, number_value, parse_numeric_str, to_js_string};
use serde_json::Value;

const DEFAULT_TRUE_VALUES: [&str; 5] = ["true", "1", "yes", "y", "on"];
const DEFAULT_FALSE_VALUES: [&str; 5] = ["false", "0", "no", "n", "off"];

fn matches_any(candidate: &str, configured: Option<&Vec<String>>, defaults: &[&str]) -> bool {
    match configured {
        Some(values) => values.iter().any(|v| v.trim().to_lowercase() == candidate),
        None => defaults.contains(&candidate),
    }
}

/// `PARSE_BOOLEAN`: match the string form against `trueValues` and
/// `falseValues`, case-insensitively. Anything else is `null`.
pub fn parse_boolean(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    match value {
        Value::Bool(_) => value.clone(),
        Value::Null => Value::Null,
        other => {
            let candidate = to_js_string(other).trim().to_lowercase();
            if matches_any(&candidate, config.true_values.as_ref(), &DEFAULT_TRUE_VALUES) {
                Value::Bool(true)
            } else if matches_any(&candidate, config.false_values.as_ref(), &DEFAULT_FALSE_VALUES) {
                Value::Bool(false)
            } else {
                Value::Null
            }
        }
    }
}

pub fn negate(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    Value::Bool(!is_truthy(value))
}

pub fn to_boolean(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    Value::Bool(is_truthy(value))
}

/// `null` becomes `""`, arrays and objects become JSON text.
pub fn to_string(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    let text = match value {
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
        other => to_js_string(other),
    };
    Value::String(text)
}

/// `Number(value)` for strings: blank is 0, `0x`/`0o`/`0b` prefixes are
/// honoured, anything else must be a whole decimal literal.
fn number_from_str(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    match radix {
        Some(radix) => u64::from_str_radix(&trimmed[2..], radix).ok().map(|n| n as f64),
        None => parse_numeric_str(trimmed),
    }
}

/// `TO_NUMBER`: `Number()` semantics; `null` stays `null` and NaN becomes `null`.
pub fn to_number(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    let number = match value {
        Value::Null => return Value::Null,
        Value::Number(_) => return value.clone(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => number_from_str(s),
        Value::Array(_) => number_from_str(&to_js_string(value)),
        Value::Object(_) => None,
    };
    number.map(number_value).unwrap_or(Value::Null)
}

pub fn to_array(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    match value {
        Value::Array(_) => value.clone(),
        Value::Null => Value::Array(Vec::new()),
        other => Value::Array(vec![other.clone()]),
    }
}

/// Serialize to JSON text, indented when `pretty` is set.
pub fn to_json(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let serialized = if config.pretty == Some(true) {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match serialized {
        Ok(text) => Value::String(text),
        Err(err) => {
            log::debug!("TO_JSON left value unchanged: {}", err);
            value.clone()
        }
    }
}

/// Parse JSON text; values that are not valid JSON text pass through.
pub fn parse_json(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    let Value::String(text) = value else {
        return value.clone();
    };
    serde_json::from_str(text).unwrap_or_else(|_| value.clone())
}
