//! Pipeform CLI - apply record-level transforms from the command line
//!
//! This is the main entry point for the Pipeform CLI application, providing
//! commands for applying transform pipelines to records, evaluating
//! conditions and expressions, and exploring the built-in transforms.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e, cli.use_color()),
    };

    let use_color = cli.use_color() && config.output.color;
    control::set_override(use_color);

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli, &config, use_color).await {
        Ok(()) => process::exit(0),
        Err(e) => exit_with(&e, use_color),
    }
}

fn exit_with(e: &error::Error, use_color: bool) -> ! {
    eprintln!("{}", error::format_error(e, use_color));

    if e.should_show_help() {
        eprintln!("\nFor more information, try '--help'");
    }

    process::exit(e.exit_code());
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
async fn run(cli: Cli, config: &Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = match cli.output {
        Some(format) => format,
        None => config.output_format()?,
    };
    let mut output = OutputWriter::new(format, use_color, cli.quiet, config.output.progress);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Apply(args) => handlers::handle_apply(args, config, &mut output).await,
        Commands::Eval(args) => handlers::handle_eval(args, &mut output),
        Commands::Transform(args) => handlers::handle_transform(args, &mut output),
        Commands::List => handlers::handle_list(&mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    logging_config.merge_with_file(&config.logging, verbosity);
    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["pipeform", "list"]);
        assert_eq!(cli.verbosity_level(), 0);

        let cli = Cli::parse_from(["pipeform", "-vv", "transform", "TRIM", "--value", " a "]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["pipeform", "--quiet", "list"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[tokio::test]
    async fn test_run_uses_configured_output_format() {
        let mut config = Config::default();
        config.output.format = "xml".to_string();

        let cli = Cli::parse_from(["pipeform", "list"]);
        let err = run(cli, &config, false).await.unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
