//! Configuration module for Tredgate.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::decision::{
    DecisionRule, DEFAULT_MAX_AUTO_APPROVE_AMOUNT, DEFAULT_MAX_AUTO_APPROVE_TERM_MONTHS,
};
use crate::domain::PaymentFormula;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for Tredgate.
///
/// Missing sections fall back to their defaults, so a file may set only the
/// values it cares about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub decision: DecisionConfig,
    pub payment: PaymentConfig,
    pub logging: LoggingConfig,
}

/// Which key-value backend holds the loan and audit collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// SQLite database file at `storage.database_path`.
    Sqlite,
    /// Process-local map; nothing survives the process.
    Memory,
}

/// Persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Path to the SQLite database file.
    pub database_path: PathBuf,
}

/// Auto-decision thresholds. Both limits are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub max_auto_approve_amount: f64,
    pub max_auto_approve_term_months: u32,
}

/// Monthly payment display settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// `amortized` or `flat`.
    pub formula: PaymentFormula,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Loading and saving
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Using default configuration");
                Self::default()
            }
        }
    }

    /// Write the configuration as YAML to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/tredgate/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("tredgate")
            .join("config.yaml")
    }

    /// The auto-decision rule described by the `decision` section.
    pub fn decision_rule(&self) -> DecisionRule {
        DecisionRule::new(
            self.decision.max_auto_approve_amount,
            self.decision.max_auto_approve_term_months,
        )
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("tredgate");
        Self {
            backend: StorageBackend::Sqlite,
            database_path: data_dir.join("tredgate.db"),
        }
    }
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            max_auto_approve_amount: DEFAULT_MAX_AUTO_APPROVE_AMOUNT,
            max_auto_approve_term_months: DEFAULT_MAX_AUTO_APPROVE_TERM_MONTHS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"decision.max_auto_approve_amount"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- storage ---
        if self.storage.backend == StorageBackend::Sqlite
            && self.storage.database_path.as_os_str().is_empty()
        {
            errors.push(ValidationError {
                field: "storage.database_path".into(),
                message: "must not be empty when backend is sqlite".into(),
            });
        }

        // --- decision ---
        let max_amount = self.decision.max_auto_approve_amount;
        if !max_amount.is_finite() || max_amount <= 0.0 {
            errors.push(ValidationError {
                field: "decision.max_auto_approve_amount".into(),
                message: "must be a finite number greater than 0".into(),
            });
        }
        if self.decision.max_auto_approve_term_months == 0 {
            errors.push(ValidationError {
                field: "decision.max_auto_approve_term_months".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust
/// use tredgate_core::config::{ConfigBuilder, StorageBackend};
///
/// let config = ConfigBuilder::new()
///     .storage_backend(StorageBackend::Memory)
///     .decision_max_amount(50_000.0)
///     .logging_level("debug")
///     .build();
/// assert!(config.validate().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- storage ---

    pub fn storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage.backend = backend;
        self
    }

    pub fn storage_database_path(mut self, path: PathBuf) -> Self {
        self.config.storage.database_path = path;
        self
    }

    // --- decision ---

    pub fn decision_max_amount(mut self, amount: f64) -> Self {
        self.config.decision.max_auto_approve_amount = amount;
        self
    }

    pub fn decision_max_term_months(mut self, months: u32) -> Self {
        self.config.decision.max_auto_approve_term_months = months;
        self
    }

    // --- payment ---

    pub fn payment_formula(mut self, formula: PaymentFormula) -> Self {
        self.config.payment.formula = formula;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // -- Defaults --

    #[test]
    fn default_config_has_sensible_values() {
        let cfg = Config::default();
        assert_eq!(cfg.storage.backend, StorageBackend::Sqlite);
        assert!(cfg.storage.database_path.ends_with("tredgate/tredgate.db"));
        assert_eq!(cfg.decision.max_auto_approve_amount, 100_000.0);
        assert_eq!(cfg.decision.max_auto_approve_term_months, 60);
        assert_eq!(cfg.payment.formula, PaymentFormula::Amortized);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn default_config_passes_validation() {
        let errors = Config::default().validate();
        assert!(errors.is_empty(), "unexpected validation errors: {errors:?}");
    }

    #[test]
    fn default_decision_rule_matches_domain_default() {
        assert_eq!(Config::default().decision_rule(), DecisionRule::default());
    }

    // -- Loading --

    #[test]
    fn load_from_yaml_file() {
        let yaml = r#"
storage:
  backend: memory
  database_path: /tmp/tredgate-test.db
decision:
  max_auto_approve_amount: 75000.0
  max_auto_approve_term_months: 48
payment:
  formula: flat
logging:
  level: debug
"#;
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.storage.database_path, PathBuf::from("/tmp/tredgate-test.db"));
        assert_eq!(cfg.decision_rule(), DecisionRule::new(75_000.0, 48));
        assert_eq!(cfg.payment.formula, PaymentFormula::Flat);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn load_partial_yaml_keeps_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"logging:\n  level: warn\n").unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.logging.level, "warn");
        assert_eq!(cfg.decision, DecisionConfig::default());
        assert_eq!(cfg.storage.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn load_or_default_returns_default_on_missing_file() {
        let cfg = Config::load_or_default(Path::new("/nonexistent/config.yaml"));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_returns_error_on_invalid_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"not: [valid: yaml: {{{").unwrap();
        tmp.flush().unwrap();

        assert!(Config::load(tmp.path()).is_err());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let cfg = ConfigBuilder::new()
            .storage_backend(StorageBackend::Memory)
            .payment_formula(PaymentFormula::Flat)
            .build();

        cfg.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), cfg);
    }

    // -- Validation --

    #[test]
    fn validate_catches_bad_decision_limits() {
        let cfg = ConfigBuilder::new()
            .decision_max_amount(0.0)
            .decision_max_term_months(0)
            .build();
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"decision.max_auto_approve_amount".to_string()));
        assert!(fields.contains(&"decision.max_auto_approve_term_months".to_string()));
    }

    #[test]
    fn validate_catches_unknown_log_level() {
        let cfg = ConfigBuilder::new().logging_level("verbose").build();
        let errors = cfg.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "logging.level");
        assert!(errors[0].to_string().contains("verbose"));
    }

    #[test]
    fn validate_catches_empty_database_path() {
        let cfg = ConfigBuilder::new()
            .storage_database_path(PathBuf::new())
            .build();
        assert!(cfg
            .validate()
            .iter()
            .any(|e| e.field == "storage.database_path"));

        let memory = ConfigBuilder::new()
            .storage_backend(StorageBackend::Memory)
            .storage_database_path(PathBuf::new())
            .build();
        assert!(memory.validate().is_empty());
    }

    #[test]
    fn build_validated_reports_errors() {
        let result = ConfigBuilder::new().logging_level("loud").build_validated();
        assert!(result.is_err());
        assert!(ConfigBuilder::new().build_validated().is_ok());
    }
}
