//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the unl2csv configuration file and the table catalog it points to.

use crate::config::AppConfig;
use crate::core::catalog::SchemaRegistry;
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// `config` is the already attempted load of `config_path`.
    pub fn execute(&self, config_path: Option<&str>, config: Result<AppConfig>) -> anyhow::Result<i32> {
        let source = config_path.unwrap_or("<built-in defaults>");
        tracing::info!(config_path = %source, "Validating configuration");

        println!("🔍 Validating configuration: {source}");
        println!();

        let config = match config {
            Ok(c) => {
                println!("✅ Configuration loaded and valid");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        let registry = match SchemaRegistry::from_config(&config) {
            Ok(registry) => {
                println!("✅ Table catalog loaded");
                registry
            }
            Err(e) => {
                println!("❌ Failed to load table catalog");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Code Page: {}", config.source.code_page);
        println!("  Delimiter: {}", config.source.delimiter);
        println!("  Data Directory Suffix: {}", config.source.data_dir_suffix);
        println!("  Output Encoding: {:?}", config.output.encoding);
        println!("  Load Script: {}", config.output.load_script_name);
        println!("  Bulk Load Directory: {}", config.output.bulk_load_dir);
        println!(
            "  Post-Load Template: {}",
            config
                .output
                .post_load_template
                .as_deref()
                .unwrap_or("<built-in>")
        );
        println!(
            "  Catalog File: {}",
            config.catalog.path.as_deref().unwrap_or("<none>")
        );
        println!("  Inline Tables: {}", config.tables.len());
        println!("  Catalog Tables: {}", registry.len());
        println!();
        Ok(0)
    }
}
