//! Core types for the transform system
//!
//! This module defines the transform identifiers used on the wire, the
//! configuration structure every transform reads from, and the handler
//! signature shared by all synchronous transforms.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A synchronous transform: `(value, config, record) -> value`.
pub type TransformFn = fn(&Value, &TransformConfig, Option<&Value>) -> Value;

/// Built-in transform identifiers.
///
/// The serialized names are the case-sensitive strings pipeline definitions
/// use, e.g. `REGEX_REPLACE` or `MAP_ARRAY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformType {
    // String
    Trim,
    Lowercase,
    Uppercase,
    Slugify,
    Truncate,
    Pad,
    Replace,
    RegexReplace,
    RegexExtract,
    Split,
    Join,
    Concat,
    Template,
    StripHtml,
    EscapeHtml,
    TitleCase,
    SentenceCase,
    // Number
    ParseNumber,
    ParseFloat,
    ParseInt,
    Round,
    Floor,
    Ceil,
    Abs,
    ToCents,
    FromCents,
    Math,
    // Date
    ParseDate,
    FormatDate,
    Now,
    // Boolean
    ParseBoolean,
    Negate,
    // Type conversion
    ToString,
    ToNumber,
    ToBoolean,
    ToArray,
    ToJson,
    ParseJson,
    // Lookup and mapping
    Map,
    Lookup,
    // Conditional
    IfElse,
    Coalesce,
    Default,
    // Array
    First,
    Last,
    Nth,
    Filter,
    MapArray,
    Flatten,
    // Expression
    Expression,
}

impl TransformType {
    /// Every built-in identifier, `LOOKUP` included.
    pub const ALL: [TransformType; 50] = [
        Self::Trim,
        Self::Lowercase,
        Self::Uppercase,
        Self::Slugify,
        Self::Truncate,
        Self::Pad,
        Self::Replace,
        Self::RegexReplace,
        Self::RegexExtract,
        Self::Split,
        Self::Join,
        Self::Concat,
        Self::Template,
        Self::StripHtml,
        Self::EscapeHtml,
        Self::TitleCase,
        Self::SentenceCase,
        Self::ParseNumber,
        Self::ParseFloat,
        Self::ParseInt,
        Self::Round,
        Self::Floor,
        Self::Ceil,
        Self::Abs,
        Self::ToCents,
        Self::FromCents,
        Self::Math,
        Self::ParseDate,
        Self::FormatDate,
        Self::Now,
        Self::ParseBoolean,
        Self::Negate,
        Self::ToString,
        Self::ToNumber,
        Self::ToBoolean,
        Self::ToArray,
        Self::ToJson,
        Self::ParseJson,
        Self::Map,
        Self::Lookup,
        Self::IfElse,
        Self::Coalesce,
        Self::Default,
        Self::First,
        Self::Last,
        Self::Nth,
        Self::Filter,
        Self::MapArray,
        Self::Flatten,
        Self::Expression,
    ];

    /// Wire-format identifier
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trim => "TRIM",
            Self::Lowercase => "LOWERCASE",
            Self::Uppercase => "UPPERCASE",
            Self::Slugify => "SLUGIFY",
            Self::Truncate => "TRUNCATE",
            Self::Pad => "PAD",
            Self::Replace => "REPLACE",
            Self::RegexReplace => "REGEX_REPLACE",
            Self::RegexExtract => "REGEX_EXTRACT",
            Self::Split => "SPLIT",
            Self::Join => "JOIN",
            Self::Concat => "CONCAT",
            Self::Template => "TEMPLATE",
            Self::StripHtml => "STRIP_HTML",
            Self::EscapeHtml => "ESCAPE_HTML",
            Self::TitleCase => "TITLE_CASE",
            Self::SentenceCase => "SENTENCE_CASE",
            Self::ParseNumber => "PARSE_NUMBER",
            Self::ParseFloat => "PARSE_FLOAT",
            Self::ParseInt => "PARSE_INT",
            Self::Round => "ROUND",
            Self::Floor => "FLOOR",
            Self::Ceil => "CEIL",
            Self::Abs => "ABS",
            Self::ToCents => "TO_CENTS",
            Self::FromCents => "FROM_CENTS",
            Self::Math => "MATH",
            Self::ParseDate => "PARSE_DATE",
            Self::FormatDate => "FORMAT_DATE",
            Self::Now => "NOW",
            Self::ParseBoolean => "PARSE_BOOLEAN",
            Self::Negate => "NEGATE",
            Self::ToString => "TO_STRING",
            Self::ToNumber => "TO_NUMBER",
            Self::ToBoolean => "TO_BOOLEAN",
            Self::ToArray => "TO_ARRAY",
            Self::ToJson => "TO_JSON",
            Self::ParseJson => "PARSE_JSON",
            Self::Map => "MAP",
            Self::Lookup => "LOOKUP",
            Self::IfElse => "IF_ELSE",
            Self::Coalesce => "COALESCE",
            Self::Default => "DEFAULT",
            Self::First => "FIRST",
            Self::Last => "LAST",
            Self::Nth => "NTH",
            Self::Filter => "FILTER",
            Self::MapArray => "MAP_ARRAY",
            Self::Flatten => "FLATTEN",
            Self::Expression => "EXPRESSION",
        }
    }

    /// Whether the transform performs I/O and must go through the async path
    pub fn is_async(self) -> bool {
        matches!(self, Self::Lookup)
    }

    /// Registry category the transform is listed under
    pub fn category(self) -> &'static str {
        match self {
            Self::Trim
            | Self::Lowercase
            | Self::Uppercase
            | Self::Slugify
            | Self::Truncate
            | Self::Pad
            | Self::Replace
            | Self::RegexReplace
            | Self::RegexExtract
            | Self::Split
            | Self::Join
            | Self::Concat
            | Self::Template
            | Self::StripHtml
            | Self::EscapeHtml
            | Self::TitleCase
            | Self::SentenceCase => "string",
            Self::ParseNumber
            | Self::ParseFloat
            | Self::ParseInt
            | Self::Round
            | Self::Floor
            | Self::Ceil
            | Self::Abs
            | Self::ToCents
            | Self::FromCents
            | Self::Math => "number",
            Self::ParseDate | Self::FormatDate | Self::Now => "date",
            Self::ParseBoolean | Self::Negate => "boolean",
            Self::ToString
            | Self::ToNumber
            | Self::ToBoolean
            | Self::ToArray
            | Self::ToJson
            | Self::ParseJson => "conversion",
            Self::Map | Self::Lookup => "lookup",
            Self::IfElse | Self::Coalesce | Self::Default => "conditional",
            Self::First
            | Self::Last
            | Self::Nth
            | Self::Filter
            | Self::MapArray
            | Self::Flatten => "array",
            Self::Expression => "expression",
        }
    }
}

impl fmt::Display for TransformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for identifiers that are not built in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTransformType(pub String);

impl fmt::Display for UnknownTransformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a built-in transform type", self.0)
    }
}

impl std::error::Error for UnknownTransformType {}

impl FromStr for TransformType {
    type Err = UnknownTransformType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTransformType(s.to_string()))
    }
}

/// How a `LOOKUP` resolves values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupType {
    /// Resolve through the entity store
    Entity,
    /// Resolve through the `values` table
    Static,
}

/// Side used by `PAD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadPosition {
    #[default]
    Start,
    End,
}

/// Operation applied by `MATH`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

/// Per-step transform configuration.
///
/// Every field is optional and each transform reads only the fields it
/// documents; unused fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformConfig {
    // Conditional and expression transforms
    pub condition: Option<String>,
    pub expression: Option<String>,
    pub then_value: Option<Value>,
    pub else_value: Option<Value>,
    pub fields: Option<Vec<String>>,
    pub default_value: Option<Value>,

    // Mapping and lookup
    pub values: Option<Map<String, Value>>,
    pub case_sensitive: Option<bool>,
    pub lookup_type: Option<LookupType>,
    pub entity_type: Option<String>,
    pub from_field: Option<String>,
    pub to_field: Option<String>,

    // String transforms
    pub max_length: Option<usize>,
    pub suffix: Option<String>,
    pub pad_length: Option<usize>,
    pub pad_char: Option<String>,
    pub pad_position: Option<PadPosition>,
    pub search: Option<String>,
    pub replacement: Option<String>,
    pub pattern: Option<String>,
    pub flags: Option<String>,
    pub group: Option<usize>,
    pub delimiter: Option<String>,
    pub separator: Option<String>,
    pub template: Option<String>,

    // Number transforms
    pub decimals: Option<u32>,
    pub decimal_separator: Option<String>,
    pub thousands_separator: Option<String>,
    pub operation: Option<MathOperation>,
    pub operand: Option<f64>,

    // Date transforms
    pub format: Option<String>,
    pub input_format: Option<String>,
    pub output_format: Option<String>,

    // Boolean transforms
    pub true_values: Option<Vec<String>>,
    pub false_values: Option<Vec<String>>,

    // Array and JSON transforms
    pub index: Option<i64>,
    pub depth: Option<usize>,
    pub pretty: Option<bool>,
}

impl TransformConfig {
    /// `defaultValue`, treating an explicit `null` as absent
    pub(crate) fn default_or_null(&self) -> Value {
        self.default_value.clone().unwrap_or(Value::Null)
    }
}
