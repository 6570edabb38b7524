//! Fuzzing target for expression evaluation
//!
//! The first byte selects the input value, the rest is the expression.
//! Evaluation must never panic, whatever the expression looks like.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pipeform_core::{evaluate_expression, interpolate_template};
use serde_json::{json, Value};

fuzz_target!(|data: &[u8]| {
    let Some((selector, rest)) = data.split_first() else {
        return;
    };
    let expression = String::from_utf8_lossy(rest);

    let value = match selector % 6 {
        0 => Value::Null,
        1 => json!(42),
        2 => json!(0.1),
        3 => json!("  Mixed Case  "),
        4 => json!(["a", "b", "c"]),
        _ => json!({"k": "v"}),
    };
    let record = json!({"name": "Widget", "price": 9.99, "tags": ["x", "y"]});

    let _ = evaluate_expression(&expression, &value, Some(&record));
    let _ = evaluate_expression(&expression, &value, None);
    let _ = interpolate_template(&expression, &record, &value);
});
