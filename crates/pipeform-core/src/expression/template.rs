//! Template interpolation
//!
//! Replaces every `${...}` token in a single pass. `${value}` renders the
//! current value; any other token is a dot path into the record. Missing and
//! null values render as the empty string. Substituted text is not scanned
//! again.

use crate::value::{get_nested_value, to_display_string};
use regex::Captures;
use serde_json::Value;

static_regex!(placeholder_regex, r"\$\{([^}]*)\}");

/// Interpolate `${...}` placeholders from `record` and `current_value`.
pub fn interpolate_template(template: &str, record: &Value, current_value: &Value) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            let path = caps[1].trim();
            if path == "value" {
                to_display_string(current_value)
            } else {
                to_display_string(&get_nested_value(record, path))
            }
        })
        .into_owned()
}
