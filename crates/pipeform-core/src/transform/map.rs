//! Static value mapping
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use super::types::TransformConfig;
use crate::value::to_js_string;
use serde_json::{Map, Value};

/// `MAP`: replace the value through the `values` table.
///
/// Keys are matched against the string form of the value, case-insensitively
/// unless `caseSensitive` is `true`. A miss yields `defaultValue`, or the
/// value itself when no default is configured.
pub fn apply_map(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let Some(table) = &config.values else {
        return value.clone();
    };
    if value.is_null() {
        return value.clone();
    }

    let key = to_js_string(value);
    let case_sensitive = config.case_sensitive == Some(true);

    match lookup_static(table, &key, case_sensitive) {
        Some(mapped) => mapped.clone(),
        None => match &config.default_value {
            Some(default) if !default.is_null() => default.clone(),
            _ => value.clone(),
        },
    }
}

/// Find `key` in `table`. When several keys fold to the same lowercase form,
/// the last one in table order wins.
pub(crate) fn lookup_static<'a>(
    table: &'a Map<String, Value>,
    key: &str,
    case_sensitive: bool,
) -> Option<&'a Value> {
    if case_sensitive {
        return table.get(key);
    }

    let folded = key.to_lowercase();
    table
        .iter()
        .filter(|(candidate, _)| candidate.to_lowercase() == folded)
        .map(|(_, mapped)| mapped)
        .last()
}
