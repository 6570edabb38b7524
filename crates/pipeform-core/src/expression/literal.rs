//! Literal coercion
//!
//! Right-hand sides of comparisons and the branches of a ternary are plain
//! literals. `null`/`undefined` become null, `true`/`false` booleans, decimal
//! numerals numbers, quoted text a string without its quotes; anything else
//! is kept as the raw (trimmed) string.

use crate::value::number_value;
use serde_json::Value;

static_regex!(numeric_literal_regex, r"^-?\d+(\.\d+)?$");

/// Coerce literal text into a value.
pub fn parse_literal(raw: &str) -> Value {
    let text = raw.trim();
    match text {
        "null" | "undefined" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if numeric_literal_regex().is_match(text) {
        if let Ok(n) = text.parse::<f64>() {
            return number_value(n);
        }
    }

    if let Some(inner) = strip_quotes(text) {
        return Value::String(inner.to_string());
    }

    Value::String(text.to_string())
}

/// Strip one pair of matching single or double quotes.
pub(crate) fn strip_quotes(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return Some(&text[1..text.len() - 1]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keyword_literals() {
        assert_eq!(parse_literal("null"), Value::Null);
        assert_eq!(parse_literal("undefined"), Value::Null);
        assert_eq!(parse_literal(" true "), json!(true));
        assert_eq!(parse_literal("false"), json!(false));
    }

    #[test]
    fn test_numeric_literals() {
        assert_eq!(parse_literal("42"), json!(42));
        assert_eq!(parse_literal("-3.5"), json!(-3.5));
        // Not a decimal numeral, kept verbatim
        assert_eq!(parse_literal("1e3"), json!("1e3"));
        assert_eq!(parse_literal(".5"), json!(".5"));
    }

    #[test]
    fn test_quoted_literals() {
        assert_eq!(parse_literal("'gold'"), json!("gold"));
        assert_eq!(parse_literal("\"silver\""), json!("silver"));
        assert_eq!(parse_literal("'42'"), json!("42"));
        assert_eq!(parse_literal("''"), json!(""));
        assert_eq!(parse_literal("'mismatched\""), json!("'mismatched\""));
    }

    #[test]
    fn test_raw_literals() {
        assert_eq!(parse_literal("in stock"), json!("in stock"));
        assert_eq!(parse_literal("'"), json!("'"));
    }
}
