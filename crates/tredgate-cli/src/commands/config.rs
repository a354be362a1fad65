//! Config command - View and manage Tredgate configuration
//!
//! Provides the `tredgate config` CLI command which:
//! 1. Shows the current configuration (YAML or JSON)
//! 2. Sets individual configuration values via dot-notation keys
//! 3. Validates the configuration file and reports errors

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;
use tredgate_core::{
    config::{Config, StorageBackend},
    domain::PaymentFormula,
};

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "decision.max_auto_approve_amount")
        key: String,
        /// New value
        value: String,
    },
    /// Validate configuration file
    Validate,
}

impl ConfigCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(config_path, format),
            ConfigCommand::Set { key, value } => execute_set(config_path, key, value, format),
            ConfigCommand::Validate => execute_validate(config_path, format),
        }
    }
}

fn execute_show(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let config = Config::load_or_default(config_path);

    info!(config_path = %config_path.display(), "Showing configuration");

    if format.is_json() {
        let json =
            serde_json::to_value(&config).context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
    } else {
        formatter.success(&format!("Configuration ({})", config_path.display()));
        formatter.info("");

        let yaml =
            serde_yaml::to_string(&config).context("Failed to serialize configuration to YAML")?;

        for line in yaml.lines() {
            formatter.info(line);
        }
    }

    Ok(())
}

fn execute_set(config_path: &Path, key: &str, value: &str, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let mut config = Config::load_or_default(config_path);

    info!(key = %key, value = %value, "Setting configuration value");

    if let Err(e) = apply_config_value(&mut config, key, value) {
        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": false,
                "key": key,
                "value": value,
                "error": e.to_string(),
            }));
        } else {
            formatter.error(&format!("Failed to set '{}': {}", key, e));
            formatter.info("");
            formatter.info("Supported keys:");
            formatter.info("  storage.backend                        - sqlite|memory");
            formatter.info("  storage.database_path                  - SQLite database file");
            formatter.info("  decision.max_auto_approve_amount       - Largest auto-approved amount");
            formatter.info("  decision.max_auto_approve_term_months  - Longest auto-approved term");
            formatter.info("  payment.formula                        - amortized|flat");
            formatter.info("  logging.level                          - trace|debug|info|warn|error");
        }
        return Ok(());
    }

    // Validate the new config before saving
    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": false,
                "key": key,
                "value": value,
                "errors": messages,
            }));
        } else {
            formatter.error(&format!(
                "Invalid value for '{}': {}",
                key,
                messages.join("; ")
            ));
        }
        return Ok(());
    }

    config
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    if format.is_json() {
        formatter.print_json(&serde_json::json!({
            "success": true,
            "key": key,
            "value": value,
            "config_path": config_path.display().to_string(),
        }));
    } else {
        formatter.success(&format!("Set {} = {}", key, value));
        formatter.info(&format!("Saved to {}", config_path.display()));
    }

    Ok(())
}

fn execute_validate(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);

    // Load explicitly so parse errors are reported instead of defaulted
    let config = match Config::load(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            let message = if config_path.exists() {
                format!("Failed to parse configuration: {}", e)
            } else {
                "Configuration file not found. Using defaults.".to_string()
            };

            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": false,
                    "config_path": config_path.display().to_string(),
                    "errors": [message],
                }));
            } else if config_path.exists() {
                formatter.error(&message);
                formatter.info(&format!("File: {}", config_path.display()));
            } else {
                formatter.info(&format!(
                    "Configuration file not found at {}",
                    config_path.display()
                ));
                formatter.info("Using default configuration. Run 'tredgate config set <key> <value>' to create one.");
            }
            return Ok(());
        }
    };

    info!(config_path = %config_path.display(), "Validating configuration");

    let errors = config.validate();

    if format.is_json() {
        let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": config_path.display().to_string(),
            "errors": error_strings,
        }));
    } else if errors.is_empty() {
        formatter.success("Configuration is valid");
        formatter.info(&format!("File: {}", config_path.display()));
    } else {
        formatter.error(&format!(
            "Configuration has {} error{}:",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        ));
        formatter.info(&format!("File: {}", config_path.display()));
        formatter.info("");
        for error in &errors {
            formatter.info(&format!("  {} - {}", error.field, error.message));
        }
    }

    Ok(())
}

/// Apply a dot-notation key/value pair to a Config struct
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "storage.backend" => {
            config.storage.backend = match value.to_ascii_lowercase().as_str() {
                "sqlite" => StorageBackend::Sqlite,
                "memory" => StorageBackend::Memory,
                other => anyhow::bail!("Unknown backend '{}'; expected sqlite or memory", other),
            };
        }
        "storage.database_path" => {
            config.storage.database_path = PathBuf::from(value);
        }
        "decision.max_auto_approve_amount" => {
            config.decision.max_auto_approve_amount = value
                .parse::<f64>()
                .context("Expected a number for decision.max_auto_approve_amount")?;
        }
        "decision.max_auto_approve_term_months" => {
            config.decision.max_auto_approve_term_months = value
                .parse::<u32>()
                .context("Expected a positive integer for decision.max_auto_approve_term_months")?;
        }
        "payment.formula" => {
            config.payment.formula = value.parse::<PaymentFormula>()?;
        }
        "logging.level" => {
            config.logging.level = value.to_ascii_lowercase();
        }
        _ => anyhow::bail!("Unknown configuration key '{}'", key),
    }
    Ok(())
}
