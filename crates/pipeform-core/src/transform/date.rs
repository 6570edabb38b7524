//! Date transforms
//!
//! Dates travel as ISO-8601 UTC strings with millisecond precision
//! (`2024-01-02T03:04:05.000Z`). Numbers are read as epoch milliseconds.
//! Format strings use date-fns tokens (`yyyy-MM-dd HH:mm`) and are translated
//! to chrono's strftime syntax.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use super::types::TransformConfig;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::fmt::Write;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Render an instant in the canonical ISO form.
pub fn to_iso_string(instant: &DateTime<Utc>) -> String {
    instant.format(ISO_FORMAT).to_string()
}

/// Translate date-fns tokens into a chrono format string.
///
/// Runs of the same letter form one token; text inside single quotes is
/// literal and `''` is an escaped quote. Unknown letters are kept literally.
pub fn translate_format(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    break;
                }
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while chars.get(i + run) == Some(&c) {
            run += 1;
        }

        match chrono_directive(c, run) {
            Some(directive) => out.push_str(directive),
            None => (0..run).for_each(|_| push_literal(&mut out, c)),
        }
        i += run;
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

fn chrono_directive(letter: char, run: usize) -> Option<&'static str> {
    let directive = match (letter, run) {
        ('y', 2) => "%y",
        ('y', _) => "%Y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', _) => "%B",
        ('d', 1) => "%-d",
        ('d', _) => "%d",
        ('H', 1) => "%-H",
        ('H', _) => "%H",
        ('h', 1) => "%-I",
        ('h', _) => "%I",
        ('m', 1) => "%-M",
        ('m', _) => "%M",
        ('s', 1) => "%-S",
        ('s', _) => "%S",
        ('S', _) => "%3f",
        ('a', _) => "%p",
        ('E', 4) => "%A",
        ('E', _) => "%a",
        ('X', _) | ('x', _) => "%:z",
        _ => return None,
    };
    Some(directive)
}

/// Read an instant from a value.
///
/// With `input_format` the string must match it (date-only formats resolve
/// to midnight UTC). Without it RFC 3339, common ISO variants, plain dates and
/// RFC 2822 are accepted.
pub fn parse_instant(value: &Value, input_format: Option<&str>) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::String(s) => {
            let text = s.trim();
            match input_format {
                Some(format) => parse_with_format(text, &translate_format(format)),
                None => parse_auto(text),
            }
        }
        _ => None,
    }
}

fn parse_with_format(text: &str, format: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_str(text, format) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_auto(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Some(midnight.and_utc());
    }
    DateTime::parse_from_rfc2822(text)
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}

/// `PARSE_DATE`: ISO string, or `null` when the value is not a date.
pub fn parse_date(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    parse_instant(value, config.input_format.as_deref())
        .map(|instant| Value::String(to_iso_string(&instant)))
        .unwrap_or(Value::Null)
}

/// `FORMAT_DATE`: render with `format` (or `outputFormat`), ISO by default.
/// Unparseable values pass through.
pub fn format_date(value: &Value, config: &TransformConfig, _record: Option<&Value>) -> Value {
    let Some(instant) = parse_instant(value, config.input_format.as_deref()) else {
        return value.clone();
    };
    let Some(format) = config.format.as_deref().or(config.output_format.as_deref()) else {
        return Value::String(to_iso_string(&instant));
    };

    let mut rendered = String::new();
    match write!(rendered, "{}", instant.format(&translate_format(format))) {
        Ok(()) => Value::String(rendered),
        Err(_) => {
            log::debug!("Date format '{}' could not be rendered", format);
            value.clone()
        }
    }
}

/// `NOW`: the current instant. The one transform whose output depends on
/// when it runs.
pub fn now(_value: &Value, _config: &TransformConfig, _record: Option<&Value>) -> Value {
    Value::String(to_iso_string(&Utc::now()))
}
