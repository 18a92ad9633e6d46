//! Subcommand handlers
//!
//! Each handler receives the [`CliInterface`] explicitly; nothing is read
//! from global state besides the environment consulted at config load.

use std::path::Path;

use tracing::debug;

use super::completion::generate_completion;
use super::{CliInterface, ExportArgs, ListArgs};
use crate::access::{Action, Resource, User, has_permission};
use crate::config::Config;
use crate::error::{ExportError, InputError, Result};
use crate::export::{ArtifactSink, DirectorySink, ExportContext, ExportFormat, export};
use crate::extract::{extract_all, extract_all_json};
use crate::filter::{count_by_quick_filter, filter};
use crate::formatter::{JsonEncoder, TableFormatter};
use crate::model::{DocumentRecord, unwrap_records};

/// Read and decode a record file
pub async fn load_records(path: &Path) -> Result<Vec<DocumentRecord>> {
    let body = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| InputError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    let records = unwrap_records(&body)?;
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Fail unless the configured role may do `action` on `resource`
fn require(cli: &CliInterface, resource: Resource, action: Action) -> Result<()> {
    let user = User::new(cli.config().access.role);
    if has_permission(&user, resource, action) {
        Ok(())
    } else {
        Err(ExportError::PermissionDenied {
            role: user.role.to_string(),
            action: format!("{action} {resource}"),
        }
        .into())
    }
}

/// `export`: filter, encode, then write a file or print
pub async fn run_export(cli: &CliInterface, args: &ExportArgs) -> Result<()> {
    require(cli, Resource::Exports, Action::Export)?;

    let format = cli.export_format(args.format.as_deref())?;
    let criteria = args.filter.to_criteria(cli.config())?;
    let records = load_records(&args.filter.input).await?;
    let matched = filter(&records, &criteria);
    debug!("{} of {} records matched", matched.len(), records.len());

    let ctx = cli.config().export_context();

    if args.stdout {
        println!("{}", render_stdout(cli.config(), &matched, format, &ctx));
        return Ok(());
    }

    let artifact = export(&matched, format, &ctx);
    let sink = DirectorySink::new(cli.config().export.output_dir.clone());
    let path = sink.deliver(&artifact).await?;

    cli.say(format!(
        "Exported {} of {} documents to {}",
        artifact.row_count,
        records.len(),
        path.display()
    ));
    Ok(())
}

/// Export body printed by `export --stdout`
///
/// CSV is the artifact text as-is. JSON follows `[display]`: pretty (and
/// colored on a terminal) or a single compact line.
pub fn render_stdout(
    config: &Config,
    matched: &[&DocumentRecord],
    format: ExportFormat,
    ctx: &ExportContext,
) -> String {
    let settings = &config.display;
    match format {
        ExportFormat::Csv => export(matched, format, ctx).as_text().to_string(),
        ExportFormat::Json => {
            let rows = extract_all_json(matched, &ctx.extract);
            if settings.pretty_json {
                JsonEncoder::new(settings.color_output).encode(&rows)
            } else {
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            }
        }
    }
}

/// `list`: table of matching rows plus quick-filter counts
pub async fn run_list(cli: &CliInterface, args: &ListArgs) -> Result<()> {
    require(cli, Resource::Documents, Action::Read)?;

    let records = load_records(&args.filter.input).await?;
    print!("{}", render_list(cli, args, &records)?);
    Ok(())
}

/// Text printed by `list`
///
/// With `--counts` only the quick-filter table. Otherwise the matching rows,
/// followed by a summary line and the counts unless `--quiet`.
pub fn render_list(
    cli: &CliInterface,
    args: &ListArgs,
    records: &[DocumentRecord],
) -> Result<String> {
    let config = cli.config();
    let criteria = args.filter.to_criteria(config)?;

    let formatter = TableFormatter::with_colors(config.display.color_output)
        .with_style(config.display.table_style)
        .with_max_column_width(config.display.max_column_width);

    let counts = count_by_quick_filter(records, config.filter.high_value_threshold);
    if args.counts {
        return Ok(format!("{}\n", formatter.format_counts(&counts)));
    }

    let matched = filter(records, &criteria);
    let rows = extract_all(&matched, &config.export_context().extract);

    let mut out = format!("{}\n", formatter.format_rows(&rows));
    if !cli.args().quiet {
        let (shown, total) = (matched.len(), records.len());
        out.push_str(&format!("{} of {} documents\n", shown, total));
        out.push_str(&format!("{}\n", formatter.format_counts(&counts)));
    }
    Ok(out)
}

/// `config`: show and/or validate
pub fn run_config(cli: &CliInterface, show: bool, validate: bool) -> Result<()> {
    if validate {
        match cli.config_warning() {
            Some(warning) => println!(
                "Configuration at {} has invalid values: {}",
                cli.config_path().display(),
                warning
            ),
            None => println!("Configuration is valid"),
        }
    }

    if show || !validate {
        println!("# {}", cli.config_path().display());
        print!("{}", cli.config().to_toml_string()?);
    }
    Ok(())
}

/// `completion`: write a completion script to stdout
pub fn run_completion(shell: clap_complete::Shell) -> Result<()> {
    print!("{}", generate_completion(shell)?);
    Ok(())
}

/// `version`
pub fn run_version() {
    println!("asr-export {}", crate::VERSION);
}
