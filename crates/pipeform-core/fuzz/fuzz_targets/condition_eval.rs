//! Fuzzing target for condition evaluation
//!
//! Conditions come from user-authored pipeline definitions. Evaluation must
//! return a boolean for any input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pipeform_core::evaluate_condition;
use serde_json::{json, Value};

fuzz_target!(|data: &[u8]| {
    let condition = String::from_utf8_lossy(data);

    let values = [
        Value::Null,
        json!(true),
        json!(0),
        json!(-12.5),
        json!(""),
        json!("Hello World"),
        json!([1, "two", null]),
        json!({"nested": {"deep": 1}}),
    ];
    let record = json!({"a": {"b": 5}, "s": "text", "n": null, "items": [1, 2]});

    for value in &values {
        let _ = evaluate_condition(&condition, value, Some(&record));
        let _ = evaluate_condition(&condition, value, None);
    }
});
