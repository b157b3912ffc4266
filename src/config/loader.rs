//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{AppConfig, OutputEncoding};
use crate::core::unl::CodePage;
use crate::domain::errors::MigrationError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into AppConfig
/// 4. Applies environment variable overrides (UNL2CSV_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use unl2csv::config::loader::load_config;
///
/// let config = load_config("unl2csv.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MigrationError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MigrationError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut config = parse_config(&contents)?;
    resolve_relative_paths(&mut config, path.parent().unwrap_or_else(|| Path::new(".")));
    Ok(config)
}

/// Builds the configuration used when no file is given: defaults plus
/// environment overrides.
pub fn default_config() -> Result<AppConfig> {
    let mut config = AppConfig::default();
    apply_env_overrides(&mut config)?;
    config
        .validate()
        .map_err(|e| MigrationError::Configuration(format!("Configuration validation failed: {e}")))?;
    Ok(config)
}

/// Parses configuration text, applying substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: AppConfig = toml::from_str(&contents)
        .map_err(|e| MigrationError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config
        .validate()
        .map_err(|e| MigrationError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Catalog and template paths are relative to the configuration file
fn resolve_relative_paths(config: &mut AppConfig, base: &Path) {
    let resolve = |value: &mut String| {
        if Path::new(value.as_str()).is_relative() {
            *value = base.join(value.as_str()).to_string_lossy().to_string();
        }
    };
    if let Some(path) = config.catalog.path.as_mut() {
        resolve(path);
    }
    if let Some(path) = config.output.post_load_template.as_mut() {
        resolve(path);
    }
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| MigrationError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MigrationError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using UNL2CSV_* prefix
///
/// Environment variables follow the pattern: UNL2CSV_<SECTION>_<KEY>
/// For example: UNL2CSV_SOURCE_CODE_PAGE, UNL2CSV_OUTPUT_BULK_LOAD_DIR
fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    if let Ok(val) = std::env::var("UNL2CSV_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Source overrides
    if let Ok(val) = std::env::var("UNL2CSV_SOURCE_CODE_PAGE") {
        config.source.code_page = CodePage::from_str(&val)?;
    }
    if let Ok(val) = std::env::var("UNL2CSV_SOURCE_DELIMITER") {
        let mut chars = val.chars();
        match (chars.next(), chars.next()) {
            (Some(delimiter), None) => config.source.delimiter = delimiter,
            _ => {
                return Err(MigrationError::Configuration(format!(
                    "UNL2CSV_SOURCE_DELIMITER must be a single character, got '{val}'"
                )))
            }
        }
    }
    if let Ok(val) = std::env::var("UNL2CSV_SOURCE_DATA_DIR_SUFFIX") {
        config.source.data_dir_suffix = val;
    }

    // Output overrides
    if let Ok(val) = std::env::var("UNL2CSV_OUTPUT_ENCODING") {
        config.output.encoding = match val.to_lowercase().as_str() {
            "utf-16be" => OutputEncoding::Utf16Be,
            "utf-16le" => OutputEncoding::Utf16Le,
            _ => {
                return Err(MigrationError::Configuration(format!(
                    "Invalid UNL2CSV_OUTPUT_ENCODING '{val}'. Must be one of: utf-16be, utf-16le"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("UNL2CSV_OUTPUT_LOAD_SCRIPT_NAME") {
        config.output.load_script_name = val;
    }
    if let Ok(val) = std::env::var("UNL2CSV_OUTPUT_BULK_LOAD_DIR") {
        config.output.bulk_load_dir = val;
    }
    if let Ok(val) = std::env::var("UNL2CSV_OUTPUT_POST_LOAD_TEMPLATE") {
        config.output.post_load_template = Some(val);
    }

    // Catalog overrides
    if let Ok(val) = std::env::var("UNL2CSV_CATALOG_PATH") {
        config.catalog.path = Some(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("UNL2CSV_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("UNL2CSV_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
