//! Command-line interface for asr-export
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Translating filter flags into [`FilterCriteria`]

pub mod commands;
pub mod completion;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::error::{AsrError, InputError, Result};
use crate::export::ExportFormat;
use crate::filter::{FilterCriteria, QuickFilter};
use crate::model::PaymentStatus;

/// Document export and filter tool for the ASR back office
#[derive(Parser, Debug)]
#[command(
    name = "asr-export",
    version,
    about = "Filter processed documents and export them as CSV or JSON",
    long_about = "Reads a document listing (a JSON array or a {\"data\": [...]} response body),
applies search and quick filters, and writes a dated CSV or JSON export."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Quiet mode (no summary lines)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for asr-export
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export matching documents to a file
    Export(ExportArgs),

    /// Show matching documents as a table
    List(ListArgs),

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type
        #[arg(value_name = "SHELL")]
        shell: clap_complete::Shell,
    },

    /// Show version information
    Version,
}

/// Flags shared by `export` and `list`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// JSON file holding the document listing
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: PathBuf,

    /// Free-text search over filename, vendor and GL account code
    #[arg(short = 's', long = "query", value_name = "TEXT")]
    pub query: Option<String>,

    /// Quick filter (all, manual-review, unpaid, high-value)
    #[arg(long, value_name = "NAME")]
    pub quick_filter: Option<String>,

    /// Only documents with this processing status
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,

    /// Only documents with this payment status
    #[arg(long, value_name = "STATUS")]
    pub payment_status: Option<String>,

    /// Minimum amount (inclusive)
    #[arg(long, value_name = "AMOUNT")]
    pub min_amount: Option<f64>,

    /// Maximum amount (inclusive)
    #[arg(long, value_name = "AMOUNT")]
    pub max_amount: Option<f64>,

    /// Earliest creation date, YYYY-MM-DD (inclusive)
    #[arg(long = "from", value_name = "DATE")]
    pub date_from: Option<String>,

    /// Latest creation date, YYYY-MM-DD (inclusive)
    #[arg(long = "to", value_name = "DATE")]
    pub date_to: Option<String>,
}

/// Arguments for `export`
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output format (csv, json)
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Directory to write the export into
    #[arg(short = 'o', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Print the export to stdout instead of writing a file
    #[arg(long, conflicts_with = "out_dir")]
    pub stdout: bool,
}

/// Arguments for `list`
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Only print the per-quick-filter counts
    #[arg(long)]
    pub counts: bool,
}

impl FilterArgs {
    /// Build filter criteria, taking the High Value threshold from config
    pub fn to_criteria(&self, config: &Config) -> Result<FilterCriteria> {
        let quick_filter = match &self.quick_filter {
            Some(name) => name.parse::<QuickFilter>()?,
            None => QuickFilter::All,
        };

        let mut criteria = FilterCriteria::new()
            .with_quick_filter(quick_filter)
            .with_high_value_threshold(config.filter.high_value_threshold)
            .with_amount_range(self.min_amount, self.max_amount)
            .with_date_range(
                parse_date_arg(self.date_from.as_deref())?,
                parse_date_arg(self.date_to.as_deref())?,
            );

        if let Some(query) = &self.query {
            criteria = criteria.with_query(query.clone());
        }
        if let Some(status) = &self.status {
            criteria = criteria.with_status(status.clone());
        }
        if let Some(payment_status) = &self.payment_status {
            criteria = criteria.with_payment_status(PaymentStatus::parse(payment_status));
        }

        Ok(criteria)
    }
}

/// Parse an optional `YYYY-MM-DD` argument
pub fn parse_date_arg(value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d")
                .map_err(|_| AsrError::from(InputError::InvalidDate(v.to_string())))
        })
        .transpose()
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,

    /// Invalid values that were reset to their defaults
    config_warning: Option<String>,
}

impl CliInterface {
    /// Create a new CLI interface
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Build from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        Self::from_args_with_env(args, |key| std::env::var(key).ok())
    }

    /// Build from parsed arguments, reading `ASR_EXPORT_*` overrides through `lookup`
    pub fn from_args_with_env<F>(args: CliArgs, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config, config_warning) = Self::load_config(&args, lookup)?;
        Ok(Self {
            args,
            config,
            config_warning,
        })
    }

    /// Load configuration from file and environment, then apply arguments
    ///
    /// Invalid values fall back to their defaults one by one; everything
    /// else, the acting role included, is kept as configured.
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    /// * `lookup` - Environment variable lookup
    ///
    /// # Returns
    /// * `Result<(Config, Option<String>)>` - Configuration and any validation warning
    fn load_config<F>(args: &CliArgs, lookup: F) -> Result<(Config, Option<String>)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::load_with(args.config_file.as_deref(), lookup)?;

        // Logging is not up yet; the caller reports the warning
        let problems = config.reset_invalid();
        let warning = (!problems.is_empty()).then(|| {
            problems
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        });

        Self::apply_args_to_config(&mut config, args);

        Ok((config, warning))
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        if args.no_color {
            config.display.color_output = false;
        }

        if let Commands::Export(export) = &args.command
            && let Some(dir) = &export.out_dir
        {
            config.export.output_dir = dir.clone();
        }
    }

    /// Resolve the export format: flag, then configured default
    pub fn export_format(&self, requested: Option<&str>) -> Result<ExportFormat> {
        match requested {
            Some(name) => name.parse(),
            None => Ok(self.config.export.default_format),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Path of the configuration file in effect
    pub fn config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
    }

    /// Validation warning recorded while loading
    pub fn config_warning(&self) -> Option<&str> {
        self.config_warning.as_deref()
    }

    /// Print unless `--quiet`
    pub fn say(&self, message: impl AsRef<str>) {
        if !self.args.quiet {
            println!("{}", message.as_ref());
        }
    }
}
