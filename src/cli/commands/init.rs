//! Init command implementation
//!
//! This module implements the `init` command for generating a starter
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "unl2csv.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing unl2csv configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} to match your export", self.output);
                println!("  2. Point [catalog] path at your table catalog, or add [tables.<name>] blocks");
                println!("  3. Validate configuration: unl2csv -c {} validate-config", self.output);
                println!("  4. Check the manifest: unl2csv -c {} inspect -i <database>.sql", self.output);
                println!(
                    "  5. Convert: unl2csv -c {} convert -i <database>.sql -o <output dir>",
                    self.output
                );
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate the starter configuration
    fn generate_config() -> String {
        r#"# unl2csv Configuration File
# Informix dbexport (UNL) to CSV migration for SQL Server bulk loads
#
# Every setting is optional; the values below are the defaults.
# Values may reference environment variables as ${VAR_NAME}, and any key can
# be overridden with UNL2CSV_<SECTION>_<KEY>, e.g. UNL2CSV_SOURCE_CODE_PAGE.

# ============================================================================
# Application Configuration
# ============================================================================
[application]
# Log level: trace | debug | info | warn | error
log_level = "info"

# ============================================================================
# Source (UNL data files)
# ============================================================================
[source]
# Code page of the export: cp437 | cp850 | cp858
code_page = "cp850"

# Field delimiter; a "delimiter" in the manifest's DATABASE line takes precedence
delimiter = "|"

# Data files are read from <manifest dir>/<database><suffix>/
data_dir_suffix = ".exp"

# ============================================================================
# Output
# ============================================================================
[output]
# CSV encoding, always written with a byte order mark: utf-16be | utf-16le
encoding = "utf-16be"

# Load script written into the output directory
load_script_name = "import.mssql.sql"

# Directory the database server reads the CSV files from
bulk_load_dir = "/var/opt/mssql/backups/init/"

# SQL appended after the BULK INSERT statements (built-in script if unset)
# post_load_template = "templates/post_load.mssql.sql"

# ============================================================================
# Table Catalog
# ============================================================================
[catalog]
# Per-table rules; relative paths are resolved against this file
# path = "catalogs/orveus.toml"

# Inline entries replace catalog entries of the same table:
#
# [tables.person]
# target_schema = "informix"
# column_order = ["pe_id", "pe_name", "deleted"]
# formatters = { pe_geburt = "date" }
# defaults = { deleted = { constant = "" } }

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Write JSON log files in addition to console output
local_enabled = false

# Local log directory
local_path = "logs"

# Log rotation: daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
