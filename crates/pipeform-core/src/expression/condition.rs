//! Condition evaluation
//!
//! A condition is matched against these forms, first match wins:
//!
//! 1. `value == null`, `value != null` (and the `===`/`!==` spellings)
//! 2. `value <op> <literal>`
//! 3. `value.includes('x')`, `value.startsWith('x')`, `value.endsWith('x')`
//!    when the value is a string
//! 4. `value.length <op> N` when the value is a string or an array
//! 5. `record.<path> <op> <literal>`
//! 6. any other condition about `value`: truthiness of the value
//!
//! Equality operators are strict. Ordering operators hold only when both
//! sides are numbers.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use super::literal::parse_literal;
use super::EvalError;
use crate::value::{get_nested_value, is_truthy, value_type_name, values_equal};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

static_regex!(null_check_regex, r"^value\s*(===|!==|==|!=)\s*null$");
static_regex!(
    value_comparison_regex,
    r"^value\s*(===|!==|==|!=|>=|<=|>|<)\s*(.+)$"
);
static_regex!(
    string_method_regex,
    r#"^value\.(includes|startsWith|endsWith)\(\s*['"](.*)['"]\s*\)$"#
);
static_regex!(
    length_comparison_regex,
    r"^value\.length\s*(===|!==|==|!=|>=|<=|>|<)\s*(\d+)$"
);
static_regex!(
    record_comparison_regex,
    r"^record\.([\w.]+)\s*(===|!==|==|!=|>=|<=|>|<)\s*(.+)$"
);
static_regex!(value_subject_regex, r"^value\b");

/// Comparison operators accepted in conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,
    StrictEqual,
    NotEqual,
    StrictNotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl ComparisonOperator {
    /// Apply the operator to two values.
    pub fn apply(self, left: &Value, right: &Value) -> bool {
        match self {
            Self::Equal | Self::StrictEqual => values_equal(left, right),
            Self::NotEqual | Self::StrictNotEqual => !values_equal(left, right),
            Self::GreaterThan => compare_numbers(left, right, |a, b| a > b),
            Self::GreaterThanOrEqual => compare_numbers(left, right, |a, b| a >= b),
            Self::LessThan => compare_numbers(left, right, |a, b| a < b),
            Self::LessThanOrEqual => compare_numbers(left, right, |a, b| a <= b),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::StrictEqual => "===",
            Self::NotEqual => "!=",
            Self::StrictNotEqual => "!==",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
        }
    }
}

impl FromStr for ComparisonOperator {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Self::Equal),
            "===" => Ok(Self::StrictEqual),
            "!=" => Ok(Self::NotEqual),
            "!==" => Ok(Self::StrictNotEqual),
            ">" => Ok(Self::GreaterThan),
            ">=" => Ok(Self::GreaterThanOrEqual),
            "<" => Ok(Self::LessThan),
            "<=" => Ok(Self::LessThanOrEqual),
            other => Err(EvalError::UnrecognizedCondition(other.to_string())),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn compare_numbers<F>(left: &Value, right: &Value, compare: F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => compare(a, b),
            _ => false,
        },
        _ => false,
    }
}

/// Evaluate a condition, returning `false` whenever it cannot be evaluated.
pub fn evaluate_condition(condition: &str, value: &Value, record: Option<&Value>) -> bool {
    match try_evaluate_condition(condition, value, record) {
        Ok(result) => result,
        Err(err) => {
            log::debug!("Condition '{}' evaluated to false: {}", condition, err);
            false
        }
    }
}

/// Evaluate a condition, reporting why it could not be evaluated.
pub fn try_evaluate_condition(
    condition: &str,
    value: &Value,
    record: Option<&Value>,
) -> Result<bool, EvalError> {
    let condition = condition.trim();

    if let Some(caps) = null_check_regex().captures(condition) {
        let negated = caps[1].starts_with('!');
        return Ok(value.is_null() != negated);
    }

    if let Some(caps) = value_comparison_regex().captures(condition) {
        let operator: ComparisonOperator = caps[1].parse()?;
        return Ok(operator.apply(value, &parse_literal(&caps[2])));
    }

    if let Some(caps) = string_method_regex().captures(condition) {
        if let Value::String(text) = value {
            let needle = &caps[2];
            return Ok(match &caps[1] {
                "includes" => text.contains(needle),
                "startsWith" => text.starts_with(needle),
                _ => text.ends_with(needle),
            });
        }
    }

    if let Some(caps) = length_comparison_regex().captures(condition) {
        let length = match value {
            Value::String(text) => Some(text.chars().count()),
            Value::Array(items) => Some(items.len()),
            _ => None,
        };
        if let Some(length) = length {
            let operator: ComparisonOperator = caps[1].parse()?;
            let expected = caps[2]
                .parse::<u64>()
                .map_err(|_| EvalError::invalid_number(&caps[2], "length comparison"))?;
            return Ok(operator.apply(&Value::from(length as u64), &Value::from(expected)));
        }
    }

    if let Some(caps) = record_comparison_regex().captures(condition) {
        let path = &caps[1];
        let record = record.ok_or_else(|| EvalError::MissingRecord {
            path: path.to_string(),
        })?;
        let operator: ComparisonOperator = caps[2].parse()?;
        return Ok(operator.apply(&get_nested_value(record, path), &parse_literal(&caps[3])));
    }

    if value_subject_regex().is_match(condition) {
        log::trace!(
            "Condition '{}' not recognized for {} value, using truthiness",
            condition,
            value_type_name(value)
        );
        return Ok(is_truthy(value));
    }

    Err(EvalError::UnrecognizedCondition(condition.to_string()))
}
