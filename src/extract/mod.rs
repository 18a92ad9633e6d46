//! Flattening of document records into export rows
//!
//! Every record maps to exactly one row, and no field can make the mapping
//! fail: absent text becomes `""`, absent numbers become `0`.
//!
//! Two row shapes exist:
//! - [`ExportRow`] for CSV, columns in [`CSV_HEADERS`] order
//! - [`JsonExportRow`] for JSON, snake_case keys plus `id`, `status`, `tenant_id`

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::model::DocumentRecord;

/// CSV header row, in column order
pub const CSV_HEADERS: [&str; 9] = [
    "Document Name",
    "Vendor",
    "Amount",
    "Payment Status",
    "GL Account Code",
    "Expense Category",
    "Destination",
    "Confidence",
    "Date",
];

/// en-US short date, e.g. `1/15/2026`
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Knobs for extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// chrono format string used for the Date column
    pub date_format: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// A single cell value, kept typed until encoding
#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Text(String),
    Number(f64),
}

impl ExportValue {
    /// String form used by the CSV encoder before its escaping check
    pub fn to_cell(&self) -> String {
        match self {
            ExportValue::Text(s) => s.clone(),
            ExportValue::Number(n) => format_number(*n),
        }
    }
}

/// Flattened CSV row
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub document_name: String,
    pub vendor: String,
    pub amount: f64,
    pub payment_status: String,
    pub gl_account_code: String,
    pub expense_category: String,
    pub destination: String,
    pub confidence: f64,
    pub date: String,
}

impl ExportRow {
    /// Cells in [`CSV_HEADERS`] order
    pub fn values(&self) -> [ExportValue; 9] {
        [
            ExportValue::Text(self.document_name.clone()),
            ExportValue::Text(self.vendor.clone()),
            ExportValue::Number(self.amount),
            ExportValue::Text(self.payment_status.clone()),
            ExportValue::Text(self.gl_account_code.clone()),
            ExportValue::Text(self.expense_category.clone()),
            ExportValue::Text(self.destination.clone()),
            ExportValue::Number(self.confidence),
            ExportValue::Text(self.date.clone()),
        ]
    }
}

/// Flattened JSON row; field order is the serialized key order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonExportRow {
    pub id: String,
    pub document_name: String,
    pub vendor: String,
    #[serde(serialize_with = "serialize_number")]
    pub amount: f64,
    pub payment_status: String,
    pub gl_account_code: String,
    pub expense_category: String,
    pub destination: String,
    #[serde(serialize_with = "serialize_number")]
    pub confidence: f64,
    pub date: String,
    pub status: String,
    pub tenant_id: String,
}

/// Build the CSV row for one record
pub fn extract(record: &DocumentRecord, options: &ExtractOptions) -> ExportRow {
    let c = record.classification.as_ref();
    let text = |value: Option<&String>| value.cloned().unwrap_or_default();

    ExportRow {
        document_name: record.display_name().to_string(),
        vendor: text(c.and_then(|c| c.vendor_name.as_ref())),
        amount: c.and_then(|c| c.amount).unwrap_or(0.0),
        payment_status: c
            .and_then(|c| c.payment_status)
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        gl_account_code: text(c.and_then(|c| c.gl_account_code.as_ref())),
        expense_category: text(c.and_then(|c| c.expense_category.as_ref())),
        destination: text(c.and_then(|c| c.routing_destination.as_ref())),
        confidence: c.and_then(|c| c.category_confidence).unwrap_or(0.0),
        date: record
            .created_at
            .as_deref()
            .map(|raw| format_created_at(raw, &options.date_format))
            .unwrap_or_default(),
    }
}

/// Build the JSON row for one record
pub fn extract_json(record: &DocumentRecord, options: &ExtractOptions) -> JsonExportRow {
    let row = extract(record, options);
    JsonExportRow {
        id: record.id.clone().unwrap_or_default(),
        document_name: row.document_name,
        vendor: row.vendor,
        amount: row.amount,
        payment_status: row.payment_status,
        gl_account_code: row.gl_account_code,
        expense_category: row.expense_category,
        destination: row.destination,
        confidence: row.confidence,
        date: row.date,
        status: record.status.clone().unwrap_or_default(),
        tenant_id: record.tenant_id.clone().unwrap_or_default(),
    }
}

pub fn extract_all(records: &[&DocumentRecord], options: &ExtractOptions) -> Vec<ExportRow> {
    records.iter().map(|r| extract(r, options)).collect()
}

pub fn extract_all_json(
    records: &[&DocumentRecord],
    options: &ExtractOptions,
) -> Vec<JsonExportRow> {
    records.iter().map(|r| extract_json(r, options)).collect()
}

/// Parse the calendar date out of a `created_at` value
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (or space separated)
/// timestamp, or a bare `YYYY-MM-DD`. The date is the one written in the
/// string; no timezone conversion happens.
pub fn parse_created_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Render `created_at` for the Date column; unparseable input passes through
pub fn format_created_at(raw: &str, date_format: &str) -> String {
    match parse_created_date(raw) {
        Some(date) => format_date(date, date_format),
        None => raw.to_string(),
    }
}

/// Format a date, falling back to ISO form if the format string is unusable
pub fn format_date(date: NaiveDate, date_format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(date_format)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

/// Render a number the way a spreadsheet user expects to read it back
///
/// Integral values print without a fractional part (`0`, `100`), others use
/// the shortest round-tripping form (`1250.5`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // covers -0.0
        return "0".to_string();
    }
    value.to_string()
}

fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
