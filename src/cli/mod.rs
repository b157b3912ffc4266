//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for unl2csv using clap.

pub mod commands;

use crate::config::{default_config, load_config, AppConfig};
use crate::domain::Result;
use clap::{Parser, Subcommand};

/// unl2csv - Informix UNL to CSV migration tool
#[derive(Parser, Debug)]
#[command(name = "unl2csv")]
#[command(version, about, long_about = None)]
#[command(author = "unl2csv Contributors")]
pub struct Cli {
    /// Path to configuration file; built-in defaults are used when absent
    #[arg(short, long, env = "UNL2CSV_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "UNL2CSV_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert every table of a dbexport manifest to CSV and write the load script
    Convert(commands::convert::ConvertArgs),

    /// Show the tables, data files and declared columns of a manifest
    Inspect(commands::inspect::InspectArgs),

    /// Validate configuration file and table catalog
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Loads the configuration file, or the defaults when no path is given
pub fn load_app_config(path: Option<&str>) -> Result<AppConfig> {
    match path {
        Some(path) => load_config(path),
        None => default_config(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parse_convert() {
        let cli = Cli::parse_from([
            "unl2csv",
            "convert",
            "--input",
            "export/orveus.sql",
            "--output",
            "csv",
        ]);
        assert!(cli.config.is_none());
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.input, PathBuf::from("export/orveus.sql"));
                assert_eq!(args.output, PathBuf::from("csv"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_convert_requires_paths() {
        assert!(Cli::try_parse_from(["unl2csv", "convert", "--input", "a.sql"]).is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["unl2csv", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["unl2csv", "--log-level", "debug", "init"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_inspect_json() {
        let cli = Cli::parse_from(["unl2csv", "inspect", "-i", "orveus.sql", "--json"]);
        match cli.command {
            Commands::Inspect(args) => assert!(args.json),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["unl2csv", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_load_app_config_missing_file() {
        let err = load_app_config(Some("/nonexistent/unl2csv.toml")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
