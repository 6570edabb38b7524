//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output in
//! various formats (JSON, YAML, human-readable), with specialized rendering
//! for evaluation results, transformed records and the transform catalogue.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{self, IsTerminal, Write};
use tracing::{debug, trace};

/// Outcome of a single `eval` or `transform` invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// What was evaluated: `condition`, `expression` or a transform identifier
    pub kind: String,
    /// The condition or expression text, absent for transforms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub input: Value,
    pub result: Value,
}

/// One row of the transform catalogue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformListing {
    pub name: String,
    pub category: String,
    #[serde(rename = "async")]
    pub is_async: bool,
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format an evaluation report
    fn format_evaluation(&self, report: &EvaluationReport) -> Result<String>;

    /// Format the transform catalogue
    fn format_transform_list(&self, listings: &[TransformListing]) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_evaluation(&self, report: &EvaluationReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_evaluation_human(report)),
            _ => self.format(report),
        }
    }

    fn format_transform_list(&self, listings: &[TransformListing]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_transform_list_human(listings)),
            _ => self.format(&listings),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, progress: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: progress && !quiet && io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            show_progress: false,
            quiet: false,
            writer,
        }
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if tracing::enabled!(tracing::Level::TRACE) {
            let value_json = serde_json::to_value(value)?;
            trace!("Outputting data: {}", redaction::redacted_json(&value_json));
        }

        let formatted = self.format.format(value)?;
        self.writeln(formatted.trim_end())
    }

    /// Write an evaluation report
    pub fn evaluation(&mut self, report: &EvaluationReport) -> Result<()> {
        let formatted = self.format.format_evaluation(report)?;
        self.writeln(formatted.trim_end())
    }

    /// Write the transform catalogue
    pub fn transform_list(&mut self, listings: &[TransformListing]) -> Result<()> {
        let formatted = self.format.format_transform_list(listings)?;
        self.writeln(formatted.trim_end())
    }

    /// Create a progress bar for long operations
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        Some(pb)
    }
}

/// Helper function to create a progress bar style
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Format an evaluation report for human reading
fn format_evaluation_human(report: &EvaluationReport) -> String {
    let mut output = String::new();

    match &report.source {
        Some(source) => output.push_str(&format!("{} {}\n", report.kind, source)),
        None => output.push_str(&format!("transform {}\n", report.kind)),
    }
    output.push_str(&format!("  input:  {}\n", format_value_compact(&report.input)));
    output.push_str(&format!("  result: {}\n", format_value_compact(&report.result)));

    output
}

/// Format the transform catalogue grouped by category
fn format_transform_list_human(listings: &[TransformListing]) -> String {
    let mut by_category: BTreeMap<&str, Vec<&TransformListing>> = BTreeMap::new();
    for listing in listings {
        by_category
            .entry(listing.category.as_str())
            .or_default()
            .push(listing);
    }

    let mut output = format!("{} built-in transforms\n", listings.len());
    for (category, items) in by_category {
        let names: Vec<String> = items
            .iter()
            .map(|item| {
                if item.is_async {
                    format!("{} (async)", item.name)
                } else {
                    item.name.clone()
                }
            })
            .collect();
        output.push_str(&format!("\n{}:\n  {}\n", category, names.join(", ")));
    }

    output
}

/// Format a JSON value in a compact, human-readable way
pub fn format_value_compact(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            if arr.len() <= 3 {
                format!(
                    "[{}]",
                    arr.iter()
                        .map(format_value_compact)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            } else {
                format!("[{} items]", arr.len())
            }
        }
        Value::Object(obj) => {
            if obj.len() <= 2 {
                let items: Vec<String> = obj
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, format_value_compact(v)))
                    .collect();
                format!("{{{}}}", items.join(", "))
            } else {
                format!("{{{} fields}}", obj.len())
            }
        }
    }
}
