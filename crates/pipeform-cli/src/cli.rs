//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Pipeform CLI - Record-level transforms for data-integration pipelines
///
/// Apply field-transform pipelines to records, evaluate conditions and
/// expressions, and try out individual transforms from the command line.
#[derive(Parser, Debug)]
#[command(
    name = "pipeform",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "PIPEFORM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply a transform pipeline to one or more records
    Apply(ApplyArgs),

    /// Evaluate a condition or an expression
    Eval(EvalArgs),

    /// Apply a single built-in transform to a value
    Transform(TransformArgs),

    /// List the built-in transform identifiers
    List,

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the apply command
#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Path to the pipeline definition (JSON, YAML or TOML)
    #[arg(value_name = "PIPELINE")]
    pub pipeline: PathBuf,

    /// Records file holding one object or an array of objects
    #[arg(short, long, value_name = "RECORDS")]
    pub input: PathBuf,

    /// Entity fixtures used to resolve LOOKUP steps
    #[arg(short, long, value_name = "FILE")]
    pub entities: Option<PathBuf>,

    /// Channel token passed through to entity lookups
    #[arg(long)]
    pub channel_token: Option<String>,

    /// Write the transformed records to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the eval command
#[derive(Parser, Debug)]
pub struct EvalArgs {
    #[command(subcommand)]
    pub target: EvalTarget,
}

/// What to evaluate
#[derive(Subcommand, Debug)]
pub enum EvalTarget {
    /// Evaluate a boolean condition such as `value > 5`
    Condition(EvalInput),

    /// Evaluate a value-producing expression such as `value.toUpperCase()`
    Expression(EvalInput),
}

/// Source text and bindings for the eval subcommands
#[derive(Parser, Debug)]
pub struct EvalInput {
    /// The condition or expression text
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Current value as JSON (bare text is taken as a string)
    #[arg(long, value_name = "JSON")]
    pub value: Option<String>,

    /// Record as JSON
    #[arg(long, value_name = "JSON")]
    pub record: Option<String>,
}

/// Arguments for the transform command
#[derive(Parser, Debug)]
pub struct TransformArgs {
    /// Transform identifier, e.g. TRIM or PARSE_NUMBER
    #[arg(value_name = "TYPE")]
    pub transform_type: String,

    /// Input value as JSON (bare text is taken as a string)
    #[arg(long, value_name = "JSON")]
    pub value: Option<String>,

    /// Transform configuration as a JSON object
    #[arg(long = "options", value_name = "JSON")]
    pub options: Option<String>,

    /// Record as JSON
    #[arg(long, value_name = "JSON")]
    pub record: Option<String>,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
