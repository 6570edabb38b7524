//! Fuzzing target for registry dispatch with arbitrary configuration
//!
//! Input is split into a transform identifier, a JSON configuration and a
//! JSON value. Any transform must accept any configuration and value.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pipeform_core::{apply_transform, TransformConfig, TransformRegistry};
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Some((selector, rest)) = data.split_first() else {
        return;
    };
    let types = TransformRegistry::builtin().types();
    let transform_type = types[*selector as usize % types.len()];

    let text = String::from_utf8_lossy(rest);
    let mut parts = text.splitn(2, '\u{1F}');
    let config_text = parts.next().unwrap_or_default();
    let value_text = parts.next().unwrap_or("null");

    let config: TransformConfig = serde_json::from_str(config_text).unwrap_or_default();
    let value: Value = serde_json::from_str(value_text).unwrap_or(Value::Null);

    let _ = apply_transform(transform_type, &value, &config, None);
});
