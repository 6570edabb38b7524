//! Expression evaluation
//!
//! Recognized forms, in order:
//!
//! 1. `value`
//! 2. `record.<path>` (when a record is supplied)
//! 3. string methods: `value.toUpperCase()`, `value.toLowerCase()`,
//!    `value.trim()`, `value.length`, `value.substring(start[, end])`,
//!    `value.split('sep')`
//! 4. array methods: `value.length`, `value[N]`, `value.join(',')`
//! 5. arithmetic on numbers: `value + N`, `value - N`, `value * N`, `value / N`
//! 6. single-level ternary `<condition> ? <literal> : <literal>`
//! 7. templates containing `${...}` (when a record is supplied)
//!
//! Anything else returns the input value unchanged.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use super::condition::evaluate_condition;
use super::literal::parse_literal;
use super::template::interpolate_template;
use super::EvalError;
use crate::value::{as_number, get_nested_value, number_value, to_display_string};
use serde_json::Value;

static_regex!(record_path_regex, r"^record\.([\w.]+)$");
static_regex!(
    substring_regex,
    r"^value\.substring\(\s*(-?\d+)\s*(?:,\s*(-?\d+)\s*)?\)$"
);
static_regex!(split_regex, r#"^value\.split\(\s*['"](.*)['"]\s*\)$"#);
static_regex!(index_regex, r"^value\[(\d+)\]$");
static_regex!(join_regex, r#"^value\.join\(\s*['"](.*)['"]\s*\)$"#);
static_regex!(arithmetic_regex, r"^value\s*([+\-*/])\s*(-?\d+(?:\.\d+)?)$");

/// Evaluate an expression, returning `value` unchanged whenever it cannot be
/// evaluated.
pub fn evaluate_expression(expression: &str, value: &Value, record: Option<&Value>) -> Value {
    match try_evaluate_expression(expression, value, record) {
        Ok(result) => result,
        Err(err) => {
            log::debug!("Expression '{}' left value unchanged: {}", expression, err);
            value.clone()
        }
    }
}

/// Evaluate an expression, reporting why it could not be evaluated.
///
/// Unrecognized expressions are not errors: they yield the input value.
pub fn try_evaluate_expression(
    expression: &str,
    value: &Value,
    record: Option<&Value>,
) -> Result<Value, EvalError> {
    let expression = expression.trim();

    if expression == "value" {
        return Ok(value.clone());
    }

    if let Some(record) = record {
        if let Some(caps) = record_path_regex().captures(expression) {
            return Ok(get_nested_value(record, &caps[1]));
        }
    }

    let method_result = match value {
        Value::String(text) => evaluate_string_method(expression, text)?,
        Value::Array(items) => evaluate_array_method(expression, items),
        Value::Number(_) => evaluate_arithmetic(expression, value)?,
        _ => None,
    };
    if let Some(result) = method_result {
        return Ok(result);
    }

    if let Some((condition, then_branch, else_branch)) = split_ternary(expression) {
        let branch = if evaluate_condition(condition, value, record) {
            then_branch
        } else {
            else_branch
        };
        return Ok(parse_literal(branch));
    }

    if let Some(record) = record {
        if expression.contains("${") {
            return Ok(Value::String(interpolate_template(expression, record, value)));
        }
    }

    Ok(value.clone())
}

/// Split `<condition> ? <then> : <else>` at the first `?` and the following
/// `:` that sit outside quotes.
fn split_ternary(expression: &str) -> Option<(&str, &str, &str)> {
    let mut quote: Option<char> = None;
    let mut question = None;

    for (index, c) in expression.char_indices() {
        match (quote, c) {
            (Some(open), _) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '?') if question.is_none() => question = Some(index),
            (None, ':') => {
                if let Some(q) = question {
                    let condition = expression[..q].trim();
                    let then_branch = expression[q + 1..index].trim();
                    let else_branch = expression[index + 1..].trim();
                    if condition.is_empty() || then_branch.is_empty() || else_branch.is_empty() {
                        return None;
                    }
                    return Some((condition, then_branch, else_branch));
                }
            }
            _ => {}
        }
    }
    None
}

fn evaluate_string_method(expression: &str, text: &str) -> Result<Option<Value>, EvalError> {
    let result = match expression {
        "value.toUpperCase()" => Value::String(text.to_uppercase()),
        "value.toLowerCase()" => Value::String(text.to_lowercase()),
        "value.trim()" => Value::String(text.trim().to_string()),
        "value.length" => Value::from(text.chars().count() as u64),
        _ => {
            if let Some(caps) = substring_regex().captures(expression) {
                let start = parse_index(&caps[1])?;
                let end = caps.get(2).map(|m| parse_index(m.as_str())).transpose()?;
                Value::String(substring(text, start, end))
            } else if let Some(caps) = split_regex().captures(expression) {
                let separator = &caps[1];
                let parts: Vec<Value> = if separator.is_empty() {
                    text.chars().map(|c| Value::String(c.to_string())).collect()
                } else {
                    text.split(separator)
                        .map(|part| Value::String(part.to_string()))
                        .collect()
                };
                Value::Array(parts)
            } else {
                return Ok(None);
            }
        }
    };
    Ok(Some(result))
}

fn evaluate_array_method(expression: &str, items: &[Value]) -> Option<Value> {
    if expression == "value.length" {
        return Some(Value::from(items.len() as u64));
    }
    if let Some(caps) = index_regex().captures(expression) {
        let item = caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index))
            .cloned()
            .unwrap_or(Value::Null);
        return Some(item);
    }
    if let Some(caps) = join_regex().captures(expression) {
        let joined = items
            .iter()
            .map(to_display_string)
            .collect::<Vec<_>>()
            .join(&caps[1]);
        return Some(Value::String(joined));
    }
    None
}

fn evaluate_arithmetic(expression: &str, value: &Value) -> Result<Option<Value>, EvalError> {
    let Some(caps) = arithmetic_regex().captures(expression) else {
        return Ok(None);
    };
    let left = as_number(value).ok_or_else(|| EvalError::invalid_number(expression, "arithmetic"))?;
    let right = caps[2]
        .parse::<f64>()
        .map_err(|_| EvalError::invalid_number(&caps[2], "arithmetic"))?;

    let result = match &caps[1] {
        "+" => number_value(left + right),
        "-" => number_value(left - right),
        "*" => number_value(left * right),
        _ if right == 0.0 => Value::Null,
        _ => number_value(left / right),
    };
    Ok(Some(result))
}

fn parse_index(raw: &str) -> Result<i64, EvalError> {
    raw.parse::<i64>()
        .map_err(|_| EvalError::invalid_number(raw, "substring"))
}

/// Character-based `substring`: bounds clamp to the string, swapped bounds
/// are reordered.
fn substring(text: &str, start: i64, end: Option<i64>) -> String {
    let length = text.chars().count() as i64;
    let clamp = |n: i64| n.clamp(0, length) as usize;
    let mut from = clamp(start);
    let mut to = clamp(end.unwrap_or(length));
    if from > to {
        std::mem::swap(&mut from, &mut to);
    }
    text.chars().skip(from).take(to - from).collect()
}
