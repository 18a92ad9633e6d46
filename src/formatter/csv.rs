//! CSV encoding for export rows
//!
//! Produces a header line followed by one line per row, joined with `\n`
//! and without a trailing newline. A cell is quoted only when it contains a
//! comma, a double quote or a newline; embedded quotes are doubled.

use tracing::debug;

use crate::extract::{ExportRow, ExportValue};

/// Encoder for the document CSV layout
pub struct CsvEncoder<'a> {
    /// Column headers, emitted verbatim as the first line
    headers: &'a [&'a str],
}

impl<'a> CsvEncoder<'a> {
    /// Create an encoder for the given header row
    pub fn new(headers: &'a [&'a str]) -> Self {
        Self { headers }
    }

    /// Encode all rows
    ///
    /// # Arguments
    /// * `rows` - Rows to encode, in output order
    ///
    /// # Returns
    /// * `String` - CSV text; a header-only line when `rows` is empty
    pub fn encode(&self, rows: &[ExportRow]) -> String {
        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(self.headers.join(","));

        for row in rows {
            lines.push(Self::encode_row(&row.values()));
        }

        debug!(
            "Encoded {} rows as CSV ({} columns)",
            rows.len(),
            self.headers.len()
        );
        lines.join("\n")
    }

    /// Encode one row of typed cells
    fn encode_row(values: &[ExportValue]) -> String {
        values
            .iter()
            .map(|value| Self::escape_csv_value(&value.to_cell()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Escape a CSV value if necessary
    ///
    /// # Arguments
    /// * `value` - Value to escape
    ///
    /// # Returns
    /// * `String` - Escaped value
    pub fn escape_csv_value(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

/// Encode rows under `headers`
pub fn encode_csv(rows: &[ExportRow], headers: &[&str]) -> String {
    CsvEncoder::new(headers).encode(rows)
}
