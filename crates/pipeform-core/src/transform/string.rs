//! String transforms
//!
//! Every transform here acts on string values and passes anything else through
//! untouched, except `PAD` (string form of any non-null value), `JOIN`
//! (arrays), `CONCAT` (record fields) and `TEMPLATE` (the configured template).
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use super::types::{PadPosition, TransformConfig};
use crate::expression::interpolate_template;
use crate::value::{get_nested_value, to_display_string, to_js_string, NULL};
use regex::{Regex, RegexBuilder};
use serde_json::Value;

static_regex!(html_tag_regex, r"<[^>]*>");

/// Longest result `PAD` will build
const MAX_PAD_LENGTH: usize = 1 << 20;

/// Apply `f` when the value is a string, otherwise pass it through.
fn map_str(value: &Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(s)),
        other => other.clone(),
    }
}

pub fn trim(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    map_str(value, |s| s.trim().to_string())
}

pub fn lowercase(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    map_str(value, str::to_lowercase)
}

pub fn uppercase(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    map_str(value, str::to_uppercase)
}

/// Lowercase, collapse every run of non-alphanumerics into `separator`.
pub fn slugify(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let separator = config.separator.as_deref().unwrap_or("-");
    map_str(value, |s| {
        s.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    })
}

/// Cut to `maxLength` characters, `suffix` included.
pub fn truncate(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let Some(max_length) = config.max_length else {
        return value.clone();
    };
    let suffix = config.suffix.as_deref().unwrap_or("");
    map_str(value, |s| {
        if s.chars().count() <= max_length {
            return s.to_string();
        }
        let keep = max_length.saturating_sub(suffix.chars().count());
        let mut truncated: String = s.chars().take(keep).collect();
        truncated.push_str(suffix);
        truncated
    })
}

pub fn pad(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    let text = to_js_string(value);
    let Some(target) = config.pad_length else {
        return Value::String(text);
    };
    let pad_char = config.pad_char.as_deref().unwrap_or(" ");

    let current = text.chars().count();
    if current >= target || pad_char.is_empty() || target > MAX_PAD_LENGTH {
        return Value::String(text);
    }

    let filler: String = pad_char.chars().cycle().take(target - current).collect();
    let padded = match config.pad_position.unwrap_or_default() {
        PadPosition::Start => filler + &text,
        PadPosition::End => text + &filler,
    };
    Value::String(padded)
}

/// Replace every occurrence of `search` with `replacement`.
pub fn replace(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let search = match config.search.as_deref() {
        Some(search) if !search.is_empty() => search,
        _ => return value.clone(),
    };
    let replacement = config.replacement.as_deref().unwrap_or("");
    map_str(value, |s| s.replace(search, replacement))
}

/// Compile `pattern` honouring the `i`, `m` and `s` flags.
fn compile_pattern(config: &TransformConfig) -> Option<Regex> {
    let pattern = config.pattern.as_deref()?;
    let flags = config.flags.as_deref().unwrap_or("");
    match RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
    {
        Ok(regex) => Some(regex),
        Err(err) => {
            log::debug!("Invalid pattern '{}': {}", pattern, err);
            None
        }
    }
}

/// Regex replacement; without the `g` flag only the first match is replaced.
pub fn regex_replace(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let Value::String(text) = value else {
        return value.clone();
    };
    let Some(regex) = compile_pattern(config) else {
        return value.clone();
    };
    let replacement = config.replacement.as_deref().unwrap_or("");
    let global = config.flags.as_deref().is_some_and(|flags| flags.contains('g'));

    let replaced = if global {
        regex.replace_all(text, replacement)
    } else {
        regex.replace(text, replacement)
    };
    Value::String(replaced.into_owned())
}

/// Capture `group` (default 0) of the first match, or `null`.
pub fn regex_extract(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let Value::String(text) = value else {
        return value.clone();
    };
    let Some(regex) = compile_pattern(config) else {
        return value.clone();
    };
    let group = config.group.unwrap_or(0);
    regex
        .captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| Value::String(m.as_str().to_string()))
        .unwrap_or(Value::Null)
}

pub fn split(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let Value::String(text) = value else {
        return value.clone();
    };
    let delimiter = config.delimiter.as_deref().unwrap_or(",");
    let parts = if delimiter.is_empty() {
        text.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        text.split(delimiter)
            .map(|part| Value::String(part.trim().to_string()))
            .collect()
    };
    Value::Array(parts)
}

pub fn join(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let Value::Array(items) = value else {
        return value.clone();
    };
    let delimiter = config.delimiter.as_deref().unwrap_or(",");
    Value::String(
        items
            .iter()
            .map(to_display_string)
            .collect::<Vec<_>>()
            .join(delimiter),
    )
}

/// Join the record's `fields` with `separator`, skipping nulls.
pub fn concat(value: &Value, config: &TransformConfig, record: Option<&Value>) -> Value {
    let Some(fields) = &config.fields else {
        return value.clone();
    };
    let separator = config.separator.as_deref().unwrap_or("");
    let record = record.unwrap_or(&NULL);
    Value::String(
        fields
            .iter()
            .map(|field| get_nested_value(record, field))
            .filter(|part| !part.is_null())
            .map(|part| to_js_string(&part))
            .collect::<Vec<_>>()
            .join(separator),
    )
}

pub fn template(value: &Value, config: &TransformConfig, record: Option<&Value>) -> Value {
    match &config.template {
        Some(template) => Value::String(interpolate_template(
            template,
            record.unwrap_or(&NULL),
            value,
        )),
        None => value.clone(),
    }
}

pub fn strip_html(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    map_str(value, |s| html_tag_regex().replace_all(s, "").into_owned())
}

pub fn escape_html(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    map_str(value, |s| {
        let mut escaped = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                other => escaped.push(other),
            }
        }
        escaped
    })
}

/// Uppercase the first character, lowercase the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Capitalize each whitespace-separated word; whitespace is preserved.
pub fn title_case(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    map_str(value, |s| {
        let mut result = String::with_capacity(s.len());
        let mut word = String::new();
        for c in s.chars() {
            if c.is_whitespace() {
                result.push_str(&capitalize(&word));
                word.clear();
                result.push(c);
            } else {
                word.push(c);
            }
        }
        result.push_str(&capitalize(&word));
        result
    })
}

pub fn sentence_case(value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    map_str(value, capitalize)
}
