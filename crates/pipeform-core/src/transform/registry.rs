//! Transform dispatch
//!
//! Maps every synchronous built-in identifier to its handler. `LOOKUP` is a
//! built-in identifier but has no entry here: it needs an entity store and
//! runs through [`perform_lookup`](super::lookup::perform_lookup).
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use super::types::{TransformConfig, TransformFn, TransformType};
use super::{array, convert, date, map, number, record, string};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

impl TransformType {
    /// Synchronous handler for this transform, `None` for `LOOKUP`
    pub fn handler(self) -> Option<TransformFn> {
        let handler: TransformFn = match self {
            Self::Trim => string::trim,
            Self::Lowercase => string::lowercase,
            Self::Uppercase => string::uppercase,
            Self::Slugify => string::slugify,
            Self::Truncate => string::truncate,
            Self::Pad => string::pad,
            Self::Replace => string::replace,
            Self::RegexReplace => string::regex_replace,
            Self::RegexExtract => string::regex_extract,
            Self::Split => string::split,
            Self::Join => string::join,
            Self::Concat => string::concat,
            Self::Template => string::template,
            Self::StripHtml => string::strip_html,
            Self::EscapeHtml => string::escape_html,
            Self::TitleCase => string::title_case,
            Self::SentenceCase => string::sentence_case,
            Self::ParseNumber => number::parse_number,
            Self::ParseFloat => number::parse_float,
            Self::ParseInt => number::parse_int,
            Self::Round => number::round,
            Self::Floor => number::floor,
            Self::Ceil => number::ceil,
            Self::Abs => number::abs,
            Self::ToCents => number::to_cents,
            Self::FromCents => number::from_cents,
            Self::Math => number::math,
            Self::ParseDate => date::parse_date,
            Self::FormatDate => date::format_date,
            Self::Now => date::now,
            Self::ParseBoolean => convert::parse_boolean,
            Self::Negate => convert::negate,
            Self::ToString => convert::to_string,
            Self::ToNumber => convert::to_number,
            Self::ToBoolean => convert::to_boolean,
            Self::ToArray => convert::to_array,
            Self::ToJson => convert::to_json,
            Self::ParseJson => convert::parse_json,
            Self::Map => map::apply_map,
            Self::Lookup => return None,
            Self::IfElse => record::apply_if_else,
            Self::Coalesce => record::apply_coalesce,
            Self::Default => record::apply_default,
            Self::First => array::first,
            Self::Last => array::last,
            Self::Nth => array::nth,
            Self::Filter => record::apply_filter,
            Self::MapArray => record::apply_map_array,
            Self::Flatten => array::flatten,
            Self::Expression => record::apply_expression,
        };
        Some(handler)
    }
}

/// Registry of synchronous transforms keyed by wire identifier
#[derive(Debug, Clone)]
pub struct TransformRegistry {
    handlers: HashMap<&'static str, TransformFn>,
}

impl TransformRegistry {
    /// The shared registry of built-in transforms
    pub fn builtin() -> &'static TransformRegistry {
        static REGISTRY: OnceLock<TransformRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let handlers = TransformType::ALL
                .iter()
                .filter_map(|t| t.handler().map(|handler| (t.as_str(), handler)))
                .collect();
            TransformRegistry { handlers }
        })
    }

    pub fn get(&self, transform_type: &str) -> Option<TransformFn> {
        self.handlers.get(transform_type).copied()
    }

    pub fn contains(&self, transform_type: &str) -> bool {
        self.handlers.contains_key(transform_type)
    }

    /// Run the transform registered under `transform_type`, `None` if there is none.
    pub fn apply(
        &self,
        transform_type: &str,
        value: &Value,
        config: &TransformConfig,
        record: Option<&Value>,
    ) -> Option<Value> {
        self.get(transform_type)
            .map(|handler| handler(value, config, record))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered identifiers, sorted
    pub fn types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.handlers.keys().copied().collect();
        types.sort_unstable();
        types
    }
}

/// Whether `transform_type` names a built-in transform, `LOOKUP` included.
pub fn is_built_in_transform(transform_type: &str) -> bool {
    TransformRegistry::builtin().contains(transform_type)
        || transform_type == TransformType::Lookup.as_str()
}

/// Run a built-in synchronous transform by identifier.
///
/// Returns `None` for identifiers the registry does not hold, `LOOKUP`
/// included; the caller decides whether that is a custom transform or an error.
pub fn apply_transform(
    transform_type: &str,
    value: &Value,
    config: &TransformConfig,
    record: Option<&Value>,
) -> Option<Value> {
    TransformRegistry::builtin().apply(transform_type, value, config, record)
}
