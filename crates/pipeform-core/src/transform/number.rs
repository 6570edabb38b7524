//! Number transforms
//!
//! Numeric strings and booleans are coerced before arithmetic; values that are
//! not numeric pass through unchanged. The `PARSE_*` transforms instead yield
//! `null` when nothing numeric can be read.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use super::types::{MathOperation, TransformConfig};
use crate::value::{as_number, number_value, to_js_string};
use serde_json::Value;

static_regex!(float_prefix_regex, r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?");
static_regex!(int_prefix_regex, r"^[+-]?\d+");
static_regex!(
    number_token_regex,
    r"[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?"
);

/// Apply `f` to the numeric view of the value, passing non-numeric values through.
fn map_number(value: &Value, f: impl FnOnce(f64) -> f64) -> Value {
    match as_number(value) {
        Some(n) => number_value(f(n)),
        None => value.clone(),
    }
}

/// Half-up rounding (`Math.round`).
fn round_half_up(n: f64) -> f64 {
    (n + 0.5).floor()
}

/// Parse formatted numbers such as `"$1,234.50"` or `"1.234,50 €"`.
pub fn parse_number(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let text = match value {
        Value::Number(_) => return value.clone(),
        Value::String(s) => s,
        _ => return Value::Null,
    };

    let decimal = config.decimal_separator.as_deref().unwrap_or(".");
    let default_thousands = if decimal == "," { "." } else { "," };
    let thousands = config
        .thousands_separator
        .as_deref()
        .unwrap_or(default_thousands);

    let mut normalized = text.to_string();
    if !thousands.is_empty() && thousands != decimal {
        normalized = normalized.replace(thousands, "");
    }
    if decimal != "." && !decimal.is_empty() {
        normalized = normalized.replace(decimal, ".");
    }
    normalized.retain(|c| !c.is_whitespace());

    // The first numeric token wins; surrounding text such as "EUR" is ignored
    number_token_regex()
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .map(number_value)
        .unwrap_or(Value::Null)
}

/// `parseFloat`: longest leading decimal literal, `null` if none.
pub fn parse_float(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    if let Value::Number(_) = value {
        return value.clone();
    }
    let text = to_js_string(value);
    float_prefix_regex()
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(number_value)
        .unwrap_or(Value::Null)
}

/// `parseInt(value, 10)`: leading integer digits, `null` if none.
pub fn parse_int(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    if let Some(n) = value.as_f64() {
        return number_value(n.trunc());
    }
    let text = to_js_string(value);
    int_prefix_regex()
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(number_value)
        .unwrap_or(Value::Null)
}

/// Round half-up to `decimals` places (default 0).
pub fn round(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let factor = 10f64.powi(config.decimals.unwrap_or(0) as i32);
    map_number(value, |n| round_half_up(n * factor) / factor)
}

pub fn floor(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    map_number(value, f64::floor)
}

pub fn ceil(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    map_number(value, f64::ceil)
}

pub fn abs(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    map_number(value, f64::abs)
}

pub fn to_cents(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    map_number(value, |n| round_half_up(n * 100.0))
}

pub fn from_cents(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    map_number(value, |n| n / 100.0)
}

/// Apply `operation` with `operand`; division or modulo by zero yields `null`.
pub fn math(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let (Some(operation), Some(operand)) = (config.operation, config.operand) else {
        return value.clone();
    };
    let Some(n) = as_number(value) else {
        return value.clone();
    };

    let result = match operation {
        MathOperation::Add => n + operand,
        MathOperation::Subtract => n - operand,
        MathOperation::Multiply => n * operand,
        MathOperation::Divide | MathOperation::Modulo if operand == 0.0 => return Value::Null,
        MathOperation::Divide => n / operand,
        MathOperation::Modulo => n % operand,
        MathOperation::Power => n.powf(operand),
    };
    number_value(result)
}
