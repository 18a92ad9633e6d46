//! Export orchestration
//!
//! Ties extraction and encoding together and names the result:
//!
//! 1. **extract**: each record becomes one row, defaults filled in
//! 2. **encode**: rows become CSV or JSON text
//! 3. **package**: text, MIME type and a dated filename form an [`ExportArtifact`]
//!
//! Packaging is pure. Getting the bytes somewhere (a file, a download) is the
//! job of an [`ArtifactSink`](sink::ArtifactSink).
//!
//! # Example
//!
//! ```
//! use asr_export::export::{ExportContext, export_csv};
//! use asr_export::model::DocumentRecord;
//! use chrono::NaiveDate;
//!
//! let ctx = ExportContext::on(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
//! let records: Vec<DocumentRecord> = Vec::new();
//! let artifact = export_csv(&records, &ctx);
//! assert_eq!(artifact.filename, "asr-documents-export-2026-01-15.csv");
//! assert_eq!(artifact.row_count, 0);
//! ```

pub mod sink;

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AsrError, InputError};
use crate::extract::{CSV_HEADERS, ExtractOptions, extract_all, extract_all_json};
use crate::formatter::{encode_csv, encode_json};
use crate::model::DocumentRecord;

pub use sink::{ArtifactSink, DirectorySink};

/// Default artifact filename prefix
pub const DEFAULT_FILENAME_PREFIX: &str = "asr-documents-export";

/// Export formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8;",
            ExportFormat::Json => "application/json;charset=utf-8;",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = AsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(InputError::UnknownFormat(s.to_string()).into()),
        }
    }
}

/// Everything an export needs besides the records
///
/// Passed explicitly so the invocation date is fixed per call and testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportContext {
    /// Invocation date, used only for the filename
    pub date: NaiveDate,

    /// Filename prefix before the date
    pub filename_prefix: String,

    /// Extraction settings
    pub extract: ExtractOptions,
}

impl ExportContext {
    /// Context for an export run on `date` with default naming
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date,
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
            extract: ExtractOptions::default(),
        }
    }

    /// Context dated with the local calendar date
    pub fn today() -> Self {
        Self::on(Local::now().date_naive())
    }

    pub fn with_filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filename_prefix = prefix.into();
        self
    }

    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.extract.date_format = date_format.into();
        self
    }

    /// `<prefix>-YYYY-MM-DD.<ext>`
    pub fn filename(&self, format: ExportFormat) -> String {
        format!(
            "{}-{}.{}",
            self.filename_prefix,
            self.date.format("%Y-%m-%d"),
            format.extension()
        )
    }
}

/// A named, typed export payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    /// Number of records exported (header excluded)
    pub row_count: usize,
}

impl ExportArtifact {
    /// Payload as text; artifacts are always UTF-8
    pub fn as_text(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

/// Export records as CSV
pub fn export_csv<R: AsRef<DocumentRecord>>(records: &[R], ctx: &ExportContext) -> ExportArtifact {
    let records: Vec<&DocumentRecord> = records.iter().map(AsRef::as_ref).collect();
    let rows = extract_all(&records, &ctx.extract);
    let text = encode_csv(&rows, &CSV_HEADERS);
    package(ExportFormat::Csv, text, rows.len(), ctx)
}

/// Export records as pretty-printed JSON
pub fn export_json<R: AsRef<DocumentRecord>>(records: &[R], ctx: &ExportContext) -> ExportArtifact {
    let records: Vec<&DocumentRecord> = records.iter().map(AsRef::as_ref).collect();
    let rows = extract_all_json(&records, &ctx.extract);
    let text = encode_json(&rows);
    package(ExportFormat::Json, text, rows.len(), ctx)
}

/// Export in the given format
pub fn export<R: AsRef<DocumentRecord>>(
    records: &[R],
    format: ExportFormat,
    ctx: &ExportContext,
) -> ExportArtifact {
    match format {
        ExportFormat::Csv => export_csv(records, ctx),
        ExportFormat::Json => export_json(records, ctx),
    }
}

fn package(
    format: ExportFormat,
    text: String,
    row_count: usize,
    ctx: &ExportContext,
) -> ExportArtifact {
    let filename = ctx.filename(format);
    debug!("Packaged {} bytes as {}", text.len(), filename);
    info!("Exported {} documents ({})", row_count, format);

    ExportArtifact {
        filename,
        content_type: format.content_type(),
        format,
        bytes: text.into_bytes(),
        row_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, PaymentStatus};

    fn ctx() -> ExportContext {
        ExportContext::on(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
    }

    fn sample() -> Vec<DocumentRecord> {
        vec![
            DocumentRecord {
                id: Some("1".into()),
                filename: Some("invoice.pdf".into()),
                created_at: Some("2026-01-02T12:00:00Z".into()),
                classification: Some(Classification {
                    vendor_name: Some("ACME, Inc.".into()),
                    amount: Some(1250.5),
                    payment_status: Some(PaymentStatus::Unpaid),
                    ..Default::default()
                }),
                ..Default::default()
            },
            DocumentRecord::default(),
        ]
    }

    #[test]
    fn test_filenames() {
        assert_eq!(
            ctx().filename(ExportFormat::Csv),
            "asr-documents-export-2026-01-15.csv"
        );
        assert_eq!(
            ctx().filename(ExportFormat::Json),
            "asr-documents-export-2026-01-15.json"
        );
        let custom = ctx().with_filename_prefix("q1-docs");
        assert_eq!(custom.filename(ExportFormat::Csv), "q1-docs-2026-01-15.csv");
    }

    #[test]
    fn test_export_csv_artifact() {
        let artifact = export_csv(&sample(), &ctx());
        assert_eq!(artifact.content_type, "text/csv;charset=utf-8;");
        assert_eq!(artifact.format, ExportFormat::Csv);
        assert_eq!(artifact.row_count, 2);

        let lines: Vec<&str> = artifact.as_text().split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "invoice.pdf,\"ACME, Inc.\",1250.5,unpaid,,,,0,1/2/2026"
        );
        assert_eq!(lines[2], ",,0,,,,,0,");
    }

    #[test]
    fn test_export_json_artifact() {
        let artifact = export_json(&sample(), &ctx());
        assert_eq!(artifact.content_type, "application/json;charset=utf-8;");
        assert_eq!(artifact.filename, "asr-documents-export-2026-01-15.json");

        let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[0]["vendor"], "ACME, Inc.");
        assert_eq!(value[1]["amount"], 0);
    }

    #[test]
    fn test_export_empty() {
        let none: &[DocumentRecord] = &[];
        assert_eq!(export_json(none, &ctx()).as_text(), "[]");
        let csv = export_csv(none, &ctx());
        assert_eq!(csv.as_text().lines().count(), 1);
        assert_eq!(csv.row_count, 0);
    }

    #[test]
    fn test_export_accepts_filtered_borrows() {
        let records = sample();
        let subset: Vec<&DocumentRecord> = records.iter().take(1).collect();
        let artifact = export(&subset, ExportFormat::Csv, &ctx());
        assert_eq!(artifact.row_count, 1);
    }

    #[test]
    fn test_custom_date_format() {
        let artifact = export_csv(&sample(), &ctx().with_date_format("%Y/%m/%d"));
        assert!(artifact.as_text().contains(",2026/01/02"));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
