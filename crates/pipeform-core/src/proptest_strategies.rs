//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating random values,
//! records, conditions and expressions for property testing of the
//! evaluators and transforms.

#![cfg(test)]

use crate::expression::{evaluate_condition, evaluate_expression};
use crate::transform::{apply_transform, TransformConfig, TransformType};
use proptest::collection::{hash_map, vec};
use proptest::prelude::*;
use serde_json::Value;

/// Strategy for generating JSON values with controlled depth
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        (-1.0e6f64..1.0e6).prop_map(crate::value::number_value),
        "[a-zA-Z0-9 ,.-]{0,30}".prop_map(Value::String),
    ];

    leaf.prop_recursive(
        3,  // max depth
        10, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                vec(inner.clone(), 0..5).prop_map(Value::Array),
                hash_map("[a-z][a-zA-Z0-9_]{0,10}", inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

/// Strategy for generating records: objects keyed by simple field names
pub fn record_strategy() -> impl Strategy<Value = Value> {
    hash_map("[a-z]{1,6}", json_value_strategy(), 0..6)
        .prop_map(|m| Value::Object(m.into_iter().collect()))
}

/// Strategy for generating literal operands
pub fn literal_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("null".to_string()),
        Just("undefined".to_string()),
        Just("true".to_string()),
        Just("false".to_string()),
        (-1000i64..1000).prop_map(|n| n.to_string()),
        (-1000.0f64..1000.0).prop_map(|n| format!("{:.2}", n)),
        "[a-z]{0,8}".prop_map(|s| format!("'{}'", s)),
        "[a-z]{0,8}".prop_map(|s| format!("\"{}\"", s)),
    ]
}

/// Strategy for generating comparison operators
pub fn operator_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("=="),
        Just("==="),
        Just("!="),
        Just("!=="),
        Just(">"),
        Just(">="),
        Just("<"),
        Just("<="),
    ]
}

/// Strategy for generating conditions from the supported grammar
pub fn condition_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("value != null".to_string()),
        Just("value === null".to_string()),
        Just("value".to_string()),
        (operator_strategy(), literal_strategy()).prop_map(|(op, lit)| format!("value {} {}", op, lit)),
        (
            prop_oneof![Just("includes"), Just("startsWith"), Just("endsWith")],
            "[a-z]{0,4}",
        )
            .prop_map(|(method, arg)| format!("value.{}('{}')", method, arg)),
        (operator_strategy(), 0u32..20).prop_map(|(op, n)| format!("value.length {} {}", op, n)),
        ("[a-z]{1,6}", operator_strategy(), literal_strategy())
            .prop_map(|(path, op, lit)| format!("record.{} {} {}", path, op, lit)),
    ]
}

/// Strategy for generating expressions from the supported grammar
pub fn expression_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("value".to_string()),
        Just("value.toUpperCase()".to_string()),
        Just("value.toLowerCase()".to_string()),
        Just("value.trim()".to_string()),
        Just("value.length".to_string()),
        (-5i64..20, proptest::option::of(-5i64..20)).prop_map(|(start, end)| match end {
            Some(end) => format!("value.substring({}, {})", start, end),
            None => format!("value.substring({})", start),
        }),
        Just("value.split(',')".to_string()),
        (0usize..6).prop_map(|i| format!("value[{}]", i)),
        Just("value.join('-')".to_string()),
        (
            prop_oneof![Just('+'), Just('-'), Just('*'), Just('/')],
            -100i64..100,
        )
            .prop_map(|(op, n)| format!("value {} {}", op, n)),
        (condition_strategy(), literal_strategy(), literal_strategy())
            .prop_map(|(cond, a, b)| format!("{} ? {} : {}", cond, a, b)),
        "[a-z]{1,6}".prop_map(|path| format!("record.{}", path)),
        ("[a-z]{1,6}", "[a-z ]{0,6}").prop_map(|(path, text)| format!("${{{}}}{}${{value}}", path, text)),
    ]
}

/// Strategy for generating arbitrary, mostly malformed, condition text
pub fn garbage_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        ".{0,60}",
        "[a-z.()'\"<>=!?:${} 0-9-]{0,40}",
        "value[<>=!. ]{0,6}.{0,20}",
    ]
}

/// Strategy for picking a synchronous built-in transform
pub fn sync_transform_strategy() -> impl Strategy<Value = TransformType> {
    proptest::sample::select(
        TransformType::ALL
            .iter()
            .copied()
            .filter(|t| !t.is_async() && *t != TransformType::Now)
            .collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_json_value_strategy_generates_valid_json(value in json_value_strategy()) {
            // Should be serializable
            let serialized = serde_json::to_string(&value);
            prop_assert!(serialized.is_ok());
        }

        #[test]
        fn test_grammar_conditions_never_panic(
            condition in condition_strategy(),
            value in json_value_strategy(),
            record in record_strategy(),
        ) {
            let _ = evaluate_condition(&condition, &value, Some(&record));
            let _ = evaluate_condition(&condition, &value, None);
        }

        #[test]
        fn test_malformed_conditions_are_false(
            condition in garbage_strategy(),
            value in json_value_strategy(),
        ) {
            // Only conditions about `value` can fall back to truthiness
            if !condition.trim_start().starts_with("value") {
                prop_assert!(!evaluate_condition(&condition, &value, None));
            }
        }

        #[test]
        fn test_expressions_never_panic(
            expression in prop_oneof![expression_strategy(), garbage_strategy()],
            value in json_value_strategy(),
            record in record_strategy(),
        ) {
            let _ = evaluate_expression(&expression, &value, Some(&record));
            let _ = evaluate_expression(&expression, &value, None);
        }

        #[test]
        fn test_transforms_are_deterministic(
            transform in sync_transform_strategy(),
            value in json_value_strategy(),
            record in record_strategy(),
        ) {
            let config = TransformConfig::default();
            let first = apply_transform(transform.as_str(), &value, &config, Some(&record));
            let second = apply_transform(transform.as_str(), &value, &config, Some(&record));
            prop_assert!(first.is_some());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_trim_is_idempotent(text in "\\s{0,3}[a-zA-Z0-9 ]{0,20}\\s{0,3}") {
            let config = TransformConfig::default();
            let once = apply_transform("TRIM", &Value::String(text), &config, None);
            let twice = once.as_ref().and_then(|v| apply_transform("TRIM", v, &config, None));
            prop_assert_eq!(once, twice);
        }
    }
}
