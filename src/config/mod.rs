//! Configuration management for asr-export
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration files (TOML format)
//! - Environment variables
//! - Command-line arguments (applied by the CLI layer)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::access::Role;
use crate::error::{ConfigError, Result};
use crate::export::{DEFAULT_FILENAME_PREFIX, ExportContext, ExportFormat};
use crate::extract::DEFAULT_DATE_FORMAT;
use crate::filter::DEFAULT_HIGH_VALUE_THRESHOLD;
use crate::formatter::TableStyle;

/// Prefix shared by all environment overrides
pub const ENV_PREFIX: &str = "ASR_EXPORT_";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,

    /// Filter configuration
    #[serde(default)]
    pub filter: FilterConfig,

    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Access configuration
    #[serde(default)]
    pub access: AccessConfig,
}

/// Export naming and formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Filename prefix, followed by `-YYYY-MM-DD.<ext>`
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,

    /// chrono format for the Date column
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Format used when none is given on the command line
    #[serde(default)]
    pub default_format: ExportFormat,

    /// Directory artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// Filter presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Amount at or above which a document is "High Value"
    #[serde(default = "default_high_value_threshold")]
    pub high_value_threshold: f64,
}

/// Terminal output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Enable colored output
    #[serde(default = "default_color_output")]
    pub color_output: bool,

    /// Wrap table cells wider than this
    #[serde(default = "default_max_column_width")]
    pub max_column_width: usize,

    /// Pretty-print JSON written to stdout
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,

    /// Border style for `list` tables (modern, ascii, markdown)
    #[serde(default)]
    pub table_style: TableStyle,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Access configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Role the CLI acts as
    #[serde(default = "default_role")]
    pub role: Role,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_filename_prefix() -> String {
    DEFAULT_FILENAME_PREFIX.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_high_value_threshold() -> f64 {
    DEFAULT_HIGH_VALUE_THRESHOLD
}

fn default_color_output() -> bool {
    true
}

fn default_max_column_width() -> usize {
    40
}

fn default_pretty_json() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

fn default_role() -> Role {
    Role::Admin
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename_prefix: default_filename_prefix(),
            date_format: default_date_format(),
            default_format: ExportFormat::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            high_value_threshold: default_high_value_threshold(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: default_color_output(),
            max_column_width: default_max_column_width(),
            pretty_json: default_pretty_json(),
            table_style: TableStyle::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            role: default_role(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.display().to_string())
            } else {
                ConfigError::InvalidFormat(format!("{}: {}", path.display(), e))
            }
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Load from an explicit path, or the default path if it exists
    ///
    /// An explicit path must exist. A missing default file means defaults.
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default_path = Self::default_path();
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    debug!(
                        "No config file at {}, using defaults",
                        default_path.display()
                    );
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from file and environment, with environment winning
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Load from file, then apply overrides from `lookup` instead of the process environment
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load_from_file(path)?;
        config.apply_env_with(lookup)?;
        Ok(config)
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Recognized keys (after the `ASR_EXPORT_` prefix): `HIGH_VALUE_THRESHOLD`,
    /// `OUTPUT_DIR`, `LOG_LEVEL`, `ROLE`.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(value) = var("HIGH_VALUE_THRESHOLD") {
            self.filter.high_value_threshold =
                value.trim().parse().map_err(|_| invalid("filter.high_value_threshold", &value))?;
        }
        if let Some(value) = var("OUTPUT_DIR") {
            self.export.output_dir = PathBuf::from(value);
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.logging.level =
                LogLevel::parse(&value).ok_or_else(|| invalid("logging.level", &value))?;
        }
        if let Some(value) = var("ROLE") {
            self.access.role = value.parse()?;
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".asr-export")
            .join("config.toml")
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Save configuration to a file
    ///
    /// # Arguments
    /// * `path` - Path where to save the configuration
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, the first problem otherwise
    pub fn validate(&self) -> Result<()> {
        match self.clone().reset_invalid().into_iter().next() {
            Some(problem) => Err(problem.into()),
            None => Ok(()),
        }
    }

    /// Reset each invalid value to its default, leaving the rest untouched
    ///
    /// The acting role is never touched here, so a bad threshold or date
    /// format cannot widen what the configured role is allowed to do.
    ///
    /// # Returns
    /// * `Vec<ConfigError>` - One entry per value that was reset
    pub fn reset_invalid(&mut self) -> Vec<ConfigError> {
        let mut problems = Vec::new();

        let threshold = self.filter.high_value_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            problems.push(invalid(
                "filter.high_value_threshold",
                &threshold.to_string(),
            ));
            self.filter.high_value_threshold = default_high_value_threshold();
        }

        let prefix = &self.export.filename_prefix;
        if prefix.trim().is_empty() || prefix.contains(['/', '\\']) {
            problems.push(invalid("export.filename_prefix", prefix));
            self.export.filename_prefix = default_filename_prefix();
        }

        if !is_valid_date_format(&self.export.date_format) {
            problems.push(invalid("export.date_format", &self.export.date_format));
            self.export.date_format = default_date_format();
        }

        if self.display.max_column_width == 0 {
            problems.push(invalid("display.max_column_width", "0"));
            self.display.max_column_width = default_max_column_width();
        }

        problems
    }

    /// Export context for a run today, using this configuration
    pub fn export_context(&self) -> ExportContext {
        ExportContext::today()
            .with_filename_prefix(self.export.filename_prefix.clone())
            .with_date_format(self.export.date_format.clone())
    }
}

impl LogLevel {
    /// Parse a level name, case-insensitive
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Whether chrono can render with `format`
fn is_valid_date_format(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

fn invalid(field: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AsrError;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.export.filename_prefix, "asr-documents-export");
        assert_eq!(config.export.date_format, "%-m/%-d/%Y");
        assert_eq!(config.export.default_format, ExportFormat::Csv);
        assert_eq!(config.filter.high_value_threshold, 10_000.0);
        assert_eq!(config.access.role, Role::Admin);
        assert!(config.display.color_output);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml_str(
            r#"
            [filter]
            high_value_threshold = 2500.0

            [export]
            default_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.filter.high_value_threshold, 2500.0);
        assert_eq!(config.export.default_format, ExportFormat::Json);
        assert_eq!(config.export.filename_prefix, "asr-documents-export");
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[filter\nhigh_value_threshold = ").unwrap_err();
        assert!(matches!(
            err,
            AsrError::Config(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(
            err,
            AsrError::Config(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.filter.high_value_threshold = 750.0;
        config.access.role = Role::Accountant;
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ASR_EXPORT_HIGH_VALUE_THRESHOLD", "5000"),
            ("ASR_EXPORT_OUTPUT_DIR", "/tmp/exports"),
            ("ASR_EXPORT_LOG_LEVEL", "DEBUG"),
            ("ASR_EXPORT_ROLE", "viewer"),
        ]);
        let mut config = Config::default();
        config
            .apply_env_with(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.filter.high_value_threshold, 5000.0);
        assert_eq!(config.export.output_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.access.role, Role::Viewer);
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = Config::default();
        let env = |k: &str| (k == "ASR_EXPORT_HIGH_VALUE_THRESHOLD").then(|| "lots".to_string());
        let err = config.apply_env_with(env).unwrap_err();
        assert!(matches!(
            err,
            AsrError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.filter.high_value_threshold = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.export.filename_prefix = "exports/docs".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.export.date_format = "%Q".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.export.date_format = "%d.%m.%Y".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reset_invalid_keeps_valid_values_and_role() {
        let mut config = Config::from_toml_str(
            r#"
            [access]
            role = "viewer"

            [filter]
            high_value_threshold = -1.0

            [export]
            date_format = "%Q"
            output_dir = "/srv/exports"
            "#,
        )
        .unwrap();

        let problems = config.reset_invalid();

        assert_eq!(problems.len(), 2);
        assert_eq!(config.access.role, Role::Viewer);
        assert_eq!(
            config.filter.high_value_threshold,
            DEFAULT_HIGH_VALUE_THRESHOLD
        );
        assert_eq!(config.export.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(config.export.output_dir, PathBuf::from("/srv/exports"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reset_invalid_on_valid_config_is_noop() {
        let mut config = Config::default();
        config.display.table_style = TableStyle::Markdown;
        let before = config.clone();

        assert!(config.reset_invalid().is_empty());
        assert_eq!(config, before);
    }

    #[test]
    fn test_table_style_from_toml() {
        let config = Config::from_toml_str("[display]\ntable_style = \"markdown\"\n").unwrap();
        assert_eq!(config.display.table_style, TableStyle::Markdown);
        assert_eq!(Config::default().display.table_style, TableStyle::Modern);
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("Trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
        assert_eq!(LogLevel::Info.to_tracing_level(), tracing::Level::INFO);
    }
}
