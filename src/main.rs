// unl2csv - Informix UNL to CSV Migration Tool
// Copyright (c) 2025 unl2csv Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use unl2csv::cli::{load_app_config, Cli, Commands};
use unl2csv::config::{AppConfig, LoggingConfig};
use unl2csv::domain::Result;
use unl2csv::logging::init_logging;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Configuration errors are reported by the command; logging still needs a setup
    let config = load_app_config(cli.config.as_deref());
    let (log_level, logging_config) = match &config {
        Ok(config) => (
            cli.log_level
                .clone()
                .unwrap_or_else(|| config.application.log_level.clone()),
            config.logging.clone(),
        ),
        Err(_) => (
            cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
            LoggingConfig::default(),
        ),
    };
    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(e.exit_code());
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "unl2csv - Informix UNL to CSV Migration Tool"
    );

    let exit_code = match execute_command(&cli, config) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
fn execute_command(cli: &Cli, config: Result<AppConfig>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Convert(args) => with_config(config, |c| args.execute(c)),
        Commands::Inspect(args) => with_config(config, |c| args.execute(c)),
        Commands::ValidateConfig(args) => args.execute(cli.config.as_deref(), config),
        Commands::Init(args) => args.execute(),
    }
}

fn with_config(
    config: Result<AppConfig>,
    command: impl FnOnce(AppConfig) -> anyhow::Result<i32>,
) -> anyhow::Result<i32> {
    match config {
        Ok(config) => command(config),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("Configuration error: {e}");
            Ok(e.exit_code())
        }
    }
}
