//! Property-based tests for the evaluators and the transform registry
//!
//! These tests verify invariants that should hold for all inputs: the
//! evaluators never panic, unrecognized conditions are false, transforms are
//! referentially transparent and never mutate their inputs.

use pipeform_core::transform::{apply_coalesce, apply_default};
use pipeform_core::{
    apply_transform, evaluate_condition, evaluate_expression, get_nested_value,
    interpolate_template, TransformConfig, TransformPipeline, TransformRegistry,
};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for generating simple JSON values with controlled depth
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        (-1.0e4f64..1.0e4).prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ,]{0,20}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 12, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::hash_map("[a-c]", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn path_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-c0-2]", 1..4).prop_map(|parts| parts.join("."))
}

fn registry_type_strategy() -> impl Strategy<Value = &'static str> {
    let types: Vec<&'static str> = TransformRegistry::builtin()
        .types()
        .into_iter()
        .filter(|t| *t != "NOW")
        .collect();
    proptest::sample::select(types)
}

proptest! {
    #[test]
    fn prop_condition_never_panics(condition in ".{0,80}", value in json_value_strategy(), record in json_value_strategy()) {
        let _ = evaluate_condition(&condition, &value, Some(&record));
    }

    #[test]
    fn prop_non_value_conditions_without_grammar_are_false(
        condition in "[^v ][^?]{0,40}",
        value in json_value_strategy(),
    ) {
        prop_assume!(!condition.trim_start().starts_with("value"));
        prop_assume!(!condition.trim_start().starts_with("record."));
        prop_assert!(!evaluate_condition(&condition, &value, None));
    }

    #[test]
    fn prop_expression_never_panics(expression in ".{0,80}", value in json_value_strategy(), record in json_value_strategy()) {
        let _ = evaluate_expression(&expression, &value, Some(&record));
        let _ = evaluate_expression(&expression, &value, None);
    }

    #[test]
    fn prop_unrecognized_expression_returns_value(value in json_value_strategy()) {
        prop_assert_eq!(evaluate_expression("Math.random()", &value, None), value);
    }

    #[test]
    fn prop_path_resolution_never_panics(record in json_value_strategy(), path in path_strategy()) {
        let _ = get_nested_value(&record, &path);
    }

    #[test]
    fn prop_template_without_placeholders_is_identity(text in "[a-zA-Z0-9 .,]{0,40}", record in json_value_strategy()) {
        prop_assert_eq!(interpolate_template(&text, &record, &Value::Null), text);
    }

    #[test]
    fn prop_registry_transforms_are_referentially_transparent(
        transform_type in registry_type_strategy(),
        value in json_value_strategy(),
        record in json_value_strategy(),
    ) {
        let config = TransformConfig::default();
        let value_before = value.clone();
        let record_before = record.clone();

        let first = apply_transform(transform_type, &value, &config, Some(&record));
        let second = apply_transform(transform_type, &value, &config, Some(&record));

        prop_assert_eq!(first, second);
        prop_assert_eq!(value, value_before);
        prop_assert_eq!(record, record_before);
    }

    #[test]
    fn prop_trim_idempotent(text in "\\s{0,4}[a-z ]{0,20}\\s{0,4}") {
        let config = TransformConfig::default();
        let once = apply_transform("TRIM", &json!(text), &config, None).unwrap();
        let twice = apply_transform("TRIM", &once, &config, None).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_present_values_survive_default_and_coalesce(value in json_value_strategy()) {
        prop_assume!(!value.is_null() && value != json!(""));
        let config = TransformConfig {
            default_value: Some(json!("fallback")),
            fields: Some(vec!["a".to_string()]),
            ..Default::default()
        };
        prop_assert_eq!(apply_default(&value, &config, None), value.clone());
        prop_assert_eq!(apply_coalesce(&value, &config, Some(&json!({"a": 1}))), value);
    }

    #[test]
    fn prop_empty_pipeline_is_identity(record in json_value_strategy()) {
        let output = TransformPipeline::new().apply(&record).unwrap();
        prop_assert_eq!(output, record);
    }
}
