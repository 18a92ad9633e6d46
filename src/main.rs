//! asr-export
//!
//! Command-line front end for the document export engine: load a document
//! listing, narrow it with search and quick filters, and write a dated CSV
//! or JSON export.
//!
//! # Usage
//!
//! ```bash
//! # Export unpaid invoices as CSV into ./exports
//! asr-export export -i documents.json --query invoice --quick-filter unpaid -o exports
//!
//! # Browse what a filter would select
//! asr-export list -i documents.json --quick-filter high-value
//! ```

use tracing::{Level, debug, warn};
use tracing_subscriber::EnvFilter;

use asr_export::cli::{CliInterface, Commands, commands};
use asr_export::error::Result;

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Dispatch the subcommand
///
/// # Returns
/// * `Result<()>` - Success or error
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if let Some(warning) = cli.config_warning() {
        warn!(
            "Invalid values in {} reset to defaults: {}",
            cli.config_path().display(),
            warning
        );
    }
    debug!("Effective role: {}", cli.config().access.role);

    match &cli.args().command {
        Commands::Export(args) => commands::run_export(&cli, args).await,
        Commands::List(args) => commands::run_list(&cli, args).await,
        Commands::Config { show, validate } => commands::run_config(&cli, *show, *validate),
        Commands::Completion { shell } => commands::run_completion(*shell),
        Commands::Version => {
            commands::run_version();
            Ok(())
        }
    }
}

/// Initialize logging system based on verbosity level
///
/// `RUST_LOG`, when set, takes over from the flags and config.
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    // Logs go to stderr so exports printed with --stdout stay clean
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
