//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (TOML/YAML/JSON)
//! - Environment variables (see [`crate::logging`])
//! - Command-line arguments
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Entity lookup settings
    pub lookup: LookupConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, json-pretty, yaml)
    pub format: String,

    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,

    /// Include timestamps
    pub timestamps: bool,
}

/// Entity lookup configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Entity fixtures used when `apply` is not given `--entities`
    pub entities: Option<PathBuf>,

    /// Channel token passed to the entity store
    pub channel_token: Option<String>,

    /// Language code passed to the entity store
    pub language_code: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
            progress: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: None,
            timestamps: true,
        }
    }
}

/// Supported configuration file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
    Toml,
}

impl FileFormat {
    /// Detect the format from a path's extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Json,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
        }
    }
}

/// Read and deserialize a JSON, YAML or TOML file
pub fn read_structured<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let format = FileFormat::from_path(path);
    let invalid = |message: String| Error::InvalidFormat {
        path: path.to_path_buf(),
        expected: format.name().to_string(),
        message,
    };

    match format {
        FileFormat::Json => serde_json::from_str(&content).map_err(|e| invalid(e.to_string())),
        FileFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string())),
        FileFormat::Toml => toml::from_str(&content).map_err(|e| invalid(e.to_string())),
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        read_structured(path).map_err(|e| match e {
            Error::FileNotFound { path } => {
                Error::config(format!("configuration file {} does not exist", path.display()))
            }
            other => other,
        })
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                // Runs before the subscriber is installed
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        for name in ["pipeform.toml", "pipeform.yaml", "pipeform.json"] {
            paths.push(PathBuf::from(name));
        }

        if let Some(config_dir) = dirs::config_dir() {
            let pipeform_dir = config_dir.join("pipeform");
            for name in ["config.toml", "config.yaml", "config.json"] {
                paths.push(pipeform_dir.join(name));
            }
        }

        paths
    }

    /// The configured output format, if it names a known format
    pub fn output_format(&self) -> Result<OutputFormat> {
        self.output
            .format
            .parse()
            .map_err(|_| Error::config(format!("unknown output format '{}'", self.output.format)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.format, "human");
        assert_eq!(config.output_format().unwrap(), OutputFormat::Human);
        assert!(config.lookup.entities.is_none());
    }

    #[test]
    fn test_load_toml_config() {
        let file = write_temp(
            ".toml",
            r#"
[output]
format = "json-pretty"

[lookup]
entities = "fixtures/entities.json"
channel_token = "eu-store"
"#,
        );

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.output_format().unwrap(), OutputFormat::JsonPretty);
        assert!(config.output.color);
        assert_eq!(
            config.lookup.entities,
            Some(PathBuf::from("fixtures/entities.json"))
        );
        assert_eq!(config.lookup.channel_token.as_deref(), Some("eu-store"));
    }

    #[test]
    fn test_load_yaml_config() {
        let file = write_temp(".yaml", "logging:\n  level: debug\n  format: json\n");

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_load_json_config() {
        let file = write_temp(".json", r#"{"output": {"format": "yaml", "progress": false}}"#);

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.output_format().unwrap(), OutputFormat::Yaml);
        assert!(!config.output.progress);
    }

    #[test]
    fn test_invalid_config_reports_format() {
        let file = write_temp(".toml", "output = [");

        match Config::from_file(file.path()) {
            Err(Error::InvalidFormat { expected, .. }) => assert_eq!(expected, "TOML"),
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let result = Config::load_with_file(Some(Path::new("/nonexistent/pipeform.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_output_format() {
        let mut config = Config::default();
        config.output.format = "xml".to_string();
        assert!(matches!(config.output_format(), Err(Error::Config(_))));
    }
}
