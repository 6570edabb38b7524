//! Record-aware transforms
//!
//! Conditional, coalescing and array transforms that consult the condition
//! and expression evaluators and, through them, the surrounding record.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use super::types::TransformConfig;
use crate::expression::{evaluate_condition, evaluate_expression};
use crate::value::{get_nested_value, is_nil_or_empty};
use serde_json::Value;

/// `IF_ELSE`: `thenValue` when the condition holds, `elseValue` otherwise.
/// Without a condition the value passes through.
pub fn apply_if_else(value: &Value, config: &TransformConfig, record: Option<&Value>) -> Value {
    match &config.condition {
        Some(condition) => {
            let branch = if evaluate_condition(condition, value, record) {
                &config.then_value
            } else {
                &config.else_value
            };
            branch.clone().unwrap_or(Value::Null)
        }
        None => value.clone(),
    }
}

/// `COALESCE`: the value if present, else the first present field of the
/// record in `fields` order, else `defaultValue`.
pub fn apply_coalesce(value: &Value, config: &TransformConfig, record: Option<&Value>) -> Value {
    if !is_nil_or_empty(value) {
        return value.clone();
    }

    if let (Some(fields), Some(record)) = (&config.fields, record) {
        for field in fields {
            let candidate = get_nested_value(record, field);
            if !is_nil_or_empty(&candidate) {
                return candidate;
            }
        }
    }

    config.default_or_null()
}

/// `DEFAULT`: `defaultValue` when the value is null or empty.
pub fn apply_default(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    if is_nil_or_empty(value) {
        config.default_or_null()
    } else {
        value.clone()
    }
}

/// `FILTER`: keep the array items for which `expression` holds as a condition.
pub fn apply_filter(value: &Value, config: &TransformConfig, record: Option<&Value>) -> Value {
    match (value, &config.expression) {
        (Value::Array(items), Some(expression)) => Value::Array(
            items
                .iter()
                .filter(|item| evaluate_condition(expression, item, record))
                .cloned()
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// `MAP_ARRAY`: replace each array item with `expression` evaluated on it.
pub fn apply_map_array(value: &Value, config: &TransformConfig, record: Option<&Value>) -> Value {
    match (value, &config.expression) {
        (Value::Array(items), Some(expression)) => Value::Array(
            items
                .iter()
                .map(|item| evaluate_expression(expression, item, record))
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// `EXPRESSION`: evaluate `expression` against the value.
pub fn apply_expression(value: &Value, config: &TransformConfig, record: Option<&Value>) -> Value {
    match &config.expression {
        Some(expression) => evaluate_expression(expression, value, record),
        None => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_with_expression(expression: &str) -> TransformConfig {
        TransformConfig {
            expression: Some(expression.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_if_else() {
        let config = TransformConfig {
            condition: Some("value > 100".to_string()),
            then_value: Some(json!("premium")),
            else_value: Some(json!("standard")),
            ..Default::default()
        };
        assert_eq!(apply_if_else(&json!(150), &config, None), json!("premium"));
        assert_eq!(apply_if_else(&json!(50), &config, None), json!("standard"));
        assert_eq!(apply_if_else(&json!("n/a"), &config, None), json!("standard"));
    }

    #[test]
    fn test_if_else_missing_branches_are_null() {
        let config = TransformConfig {
            condition: Some("value".to_string()),
            ..Default::default()
        };
        assert_eq!(apply_if_else(&json!(1), &config, None), Value::Null);
        assert_eq!(apply_if_else(&json!(0), &config, None), Value::Null);
    }

    #[test]
    fn test_if_else_without_condition_passes_through() {
        let config = TransformConfig {
            then_value: Some(json!("x")),
            ..Default::default()
        };
        assert_eq!(apply_if_else(&json!(7), &config, None), json!(7));
    }

    #[test]
    fn test_coalesce_prefers_value_then_fields_in_order() {
        let config = TransformConfig {
            fields: Some(vec!["b".to_string(), "c".to_string()]),
            default_value: Some(json!("Z")),
            ..Default::default()
        };
        let record = json!({"b": "", "c": "Y"});
        assert_eq!(apply_coalesce(&Value::Null, &config, Some(&record)), json!("Y"));
        assert_eq!(apply_coalesce(&json!("own"), &config, Some(&record)), json!("own"));
        assert_eq!(apply_coalesce(&json!(0), &config, Some(&record)), json!(0));
        assert_eq!(apply_coalesce(&json!(false), &config, Some(&record)), json!(false));
        assert_eq!(apply_coalesce(&json!(""), &config, Some(&json!({}))), json!("Z"));
        assert_eq!(apply_coalesce(&Value::Null, &config, None), json!("Z"));
    }

    #[test]
    fn test_coalesce_accepts_zero_from_record() {
        let config = TransformConfig {
            fields: Some(vec!["a".to_string(), "b".to_string()]),
            ..Default::default()
        };
        let record = json!({"a": null, "b": 0});
        assert_eq!(apply_coalesce(&Value::Null, &config, Some(&record)), json!(0));
        assert_eq!(apply_coalesce(&Value::Null, &config, Some(&json!({}))), Value::Null);
    }

    #[test]
    fn test_default() {
        let config = TransformConfig {
            default_value: Some(json!("unknown")),
            ..Default::default()
        };
        assert_eq!(apply_default(&Value::Null, &config, None), json!("unknown"));
        assert_eq!(apply_default(&json!(""), &config, None), json!("unknown"));
        assert_eq!(apply_default(&json!(0), &config, None), json!(0));
        assert_eq!(apply_default(&Value::Null, &TransformConfig::default(), None), Value::Null);
    }

    #[test]
    fn test_filter() {
        let config = config_with_expression("value > 2");
        assert_eq!(apply_filter(&json!([1, 2, 3, 4]), &config, None), json!([3, 4]));
        assert_eq!(apply_filter(&json!("not an array"), &config, None), json!("not an array"));
        assert_eq!(
            apply_filter(&json!([1, 2]), &TransformConfig::default(), None),
            json!([1, 2])
        );
    }

    #[test]
    fn test_filter_with_record_condition() {
        let config = config_with_expression("record.includeAll == true");
        let record = json!({"includeAll": false});
        assert_eq!(apply_filter(&json!([1, 2]), &config, Some(&record)), json!([]));
    }

    #[test]
    fn test_map_array() {
        let config = config_with_expression("value.toUpperCase()");
        assert_eq!(
            apply_map_array(&json!(["a", "b", 3]), &config, None),
            json!(["A", "B", 3])
        );
        let doubled = apply_map_array(&json!([1, 2.5]), &config_with_expression("value * 2"), None);
        assert_eq!(doubled, json!([2, 5]));
        assert_eq!(apply_map_array(&json!({"a": 1}), &config, None), json!({"a": 1}));
    }

    #[test]
    fn test_expression() {
        let record = json!({"name": "Widget"});
        let config = config_with_expression("record.name");
        assert_eq!(apply_expression(&Value::Null, &config, Some(&record)), json!("Widget"));
        assert_eq!(apply_expression(&json!(1), &TransformConfig::default(), None), json!(1));
    }
}
