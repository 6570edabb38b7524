//! Array transforms
//!
//! Values that are not arrays pass through unchanged. `FILTER` and
//! `MAP_ARRAY` evaluate expressions and live with the record-aware transforms.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use super::types::TransformConfig;
use serde_json::Value;

fn pick(value: &Value, index: impl FnOnce(&[Value]) -> Option<usize>) -> Value {
    match value {
        Value::Array(items) => index(items)
            .and_then(|i| items.get(i))
            .cloned()
            .unwrap_or(Value::Null),
        other => other.clone(),
    }
}

pub fn first(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    pick(value, |_| Some(0))
}

pub fn last(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    pick(value, |items| items.len().checked_sub(1))
}

/// Item at `index` (default 0); negative indices count from the end.
pub fn nth(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let index = config.index.unwrap_or(0);
    pick(value, |items| {
        if index >= 0 {
            usize::try_from(index).ok()
        } else {
            let back = usize::try_from(index.unsigned_abs()).ok()?;
            items.len().checked_sub(back)
        }
    })
}

/// Flatten nested arrays `depth` levels deep (default 1).
pub fn flatten(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    match value {
        Value::Array(items) => {
            let mut flat = Vec::with_capacity(items.len());
            flatten_into(items, config.depth.unwrap_or(1), &mut flat);
            Value::Array(flat)
        }
        other => other.clone(),
    }
}

fn flatten_into(items: &[Value], depth: usize, out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::Array(nested) if depth > 0 => flatten_into(nested, depth - 1, out),
            other => out.push(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(index: i64) -> TransformConfig {
        TransformConfig {
            index: Some(index),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_and_last() {
        let none = TransformConfig::default();
        assert_eq!(first(&json!([1, 2, 3]), &none, None), json!(1));
        assert_eq!(last(&json!([1, 2, 3]), &none, None), json!(3));
        assert_eq!(first(&json!([]), &none, None), Value::Null);
        assert_eq!(last(&json!([]), &none, None), Value::Null);
        assert_eq!(first(&json!("abc"), &none, None), json!("abc"));
    }

    #[test]
    fn test_nth() {
        let items = json!(["a", "b", "c"]);
        assert_eq!(nth(&items, &at(1), None), json!("b"));
        assert_eq!(nth(&items, &at(-1), None), json!("c"));
        assert_eq!(nth(&items, &at(-3), None), json!("a"));
        assert_eq!(nth(&items, &at(-4), None), Value::Null);
        assert_eq!(nth(&items, &at(3), None), Value::Null);
        assert_eq!(nth(&items, &at(i64::MIN), None), Value::Null);
        assert_eq!(nth(&items, &TransformConfig::default(), None), json!("a"));
    }

    #[test]
    fn test_flatten_depth() {
        let nested = json!([1, [2, [3, [4]]], 5]);
        assert_eq!(flatten(&nested, &TransformConfig::default(), None), json!([1, 2, [3, [4]], 5]));

        let deep = TransformConfig {
            depth: Some(10),
            ..Default::default()
        };
        assert_eq!(flatten(&nested, &deep, None), json!([1, 2, 3, 4, 5]));

        let zero = TransformConfig {
            depth: Some(0),
            ..Default::default()
        };
        assert_eq!(flatten(&nested, &zero, None), nested);
    }
}
