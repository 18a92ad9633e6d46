//! Table formatting for export rows using tabled
//!
//! Used by the `list` command to preview what an export would contain:
//! - Same columns, same order as the CSV header
//! - Long values wrapped to a configurable column width
//! - Optional colored header

use serde::{Deserialize, Serialize};
use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Color, Modify, Style,
        object::{Columns, Rows},
        width::Width,
    },
};

use crate::extract::{CSV_HEADERS, ExportRow, ExportValue};
use crate::filter::QuickFilterCounts;

/// Maximum width for a single column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 40;

/// Table formatter for export rows
pub struct TableFormatter {
    /// Maximum column width
    max_column_width: usize,

    /// Table style
    style: TableStyle,

    /// Enable colored output
    use_colors: bool,
}

/// Available table styles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    /// Modern style with box-drawing characters
    #[default]
    Modern,
    /// ASCII style with basic characters
    Ascii,
    /// Markdown style
    Markdown,
}

impl TableFormatter {
    /// Create a new table formatter with default settings
    pub fn new() -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            style: TableStyle::default(),
            use_colors: false,
        }
    }

    /// Create a new table formatter with color support
    ///
    /// # Arguments
    /// * `use_colors` - Enable colored output
    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Set the table style
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Set maximum column width
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width.max(1);
        self
    }

    /// Format rows as a table
    ///
    /// # Arguments
    /// * `rows` - Rows to display
    ///
    /// # Returns
    /// * `String` - Rendered table, or an empty-state line
    pub fn format_rows(&self, rows: &[ExportRow]) -> String {
        if rows.is_empty() {
            return "(no matching documents)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(CSV_HEADERS);

        for row in rows {
            let cells: Vec<String> = row.values().iter().map(ExportValue::to_cell).collect();
            builder.push_record(cells);
        }

        let mut table = builder.build();
        self.finish(&mut table, CSV_HEADERS.len());
        table.to_string()
    }

    /// Format the per-preset document counts
    pub fn format_counts(&self, counts: &QuickFilterCounts) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Quick Filter", "Documents"]);
        for (filter, count) in counts.entries() {
            builder.push_record([filter.label().to_string(), count.to_string()]);
        }

        let mut table = builder.build();
        self.finish(&mut table, 2);
        table.to_string()
    }

    fn finish(&self, table: &mut Table, columns: usize) {
        self.apply_style(table);

        // Wrap long values instead of truncating them
        for i in 0..columns {
            let wrap = Width::wrap(self.max_column_width);
            table.with(Modify::new(Columns::new(i..=i)).with(wrap));
        }

        table.with(Modify::new(Rows::first()).with(Alignment::center()));

        if self.use_colors {
            table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
        }
    }

    fn apply_style(&self, table: &mut Table) {
        match self.style {
            TableStyle::Modern => table.with(Style::modern()),
            TableStyle::Ascii => table.with(Style::ascii()),
            TableStyle::Markdown => table.with(Style::markdown()),
        };
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::QuickFilter;

    fn row(name: &str) -> ExportRow {
        ExportRow {
            document_name: name.to_string(),
            vendor: "Globex".to_string(),
            amount: 42.0,
            payment_status: "paid".to_string(),
            gl_account_code: "6100".to_string(),
            expense_category: String::new(),
            destination: String::new(),
            confidence: 75.5,
            date: "1/15/2026".to_string(),
        }
    }

    #[test]
    fn test_format_empty_rows() {
        let formatter = TableFormatter::new();
        assert_eq!(formatter.format_rows(&[]), "(no matching documents)");
    }

    #[test]
    fn test_format_rows_contains_headers_and_values() {
        let formatter = TableFormatter::new().with_style(TableStyle::Ascii);
        let output = formatter.format_rows(&[row("a.pdf"), row("b.pdf")]);
        assert!(output.contains("Document Name"));
        assert!(output.contains("GL Account Code"));
        assert!(output.contains("a.pdf"));
        assert!(output.contains("b.pdf"));
        assert!(output.contains("75.5"));
        assert!(output.contains('+'));
    }

    #[test]
    fn test_with_max_column_width_floor() {
        let formatter = TableFormatter::new().with_max_column_width(0);
        assert_eq!(formatter.max_column_width, 1);
    }

    #[test]
    fn test_format_counts() {
        let counts = QuickFilterCounts {
            all: 3,
            manual_review: 1,
            unpaid: 2,
            high_value: 0,
        };
        let output = TableFormatter::new().format_counts(&counts);
        assert!(output.contains(QuickFilter::ManualReview.label()));
        assert!(output.contains("Documents"));
    }

    #[test]
    fn test_markdown_style() {
        let output = TableFormatter::new()
            .with_style(TableStyle::Markdown)
            .format_rows(&[row("a.pdf")]);
        let first_line = output.lines().next().unwrap();
        assert!(first_line.starts_with('|'));
        assert!(first_line.contains("Document Name"));
        assert!(output.lines().nth(1).unwrap().contains("---"));
    }
}
