//! JSON encoding for export rows
//!
//! Rows are written as a single pretty-printed array with 2-space
//! indentation. Key order follows the field order of [`JsonExportRow`].
//! Colored output is only for terminal display, never for artifacts.

use colored_json::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::extract::JsonExportRow;

/// JSON encoder with optional terminal coloring
pub struct JsonEncoder {
    /// Enable colored output (terminal display only)
    use_colors: bool,
}

impl JsonEncoder {
    /// Create a new JSON encoder
    ///
    /// # Arguments
    /// * `use_colors` - Enable colored output
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Encode rows as a pretty-printed JSON array
    ///
    /// # Returns
    /// * `String` - `[]` for no rows, otherwise one object per row
    pub fn encode(&self, rows: &[JsonExportRow]) -> String {
        let json = to_pretty_string(rows);
        debug!("Encoded {} rows as JSON", rows.len());

        if self.use_colors {
            json.to_colored_json_auto().unwrap_or(json)
        } else {
            json
        }
    }
}

/// Serialize with 2-space indentation
fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> String {
    // Rows hold only strings and finite-or-null numbers; this cannot fail
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        debug!("JSON serialization failed: {}", e);
        String::from("[]")
    })
}

/// Encode rows as the JSON artifact body
pub fn encode_json(rows: &[JsonExportRow]) -> String {
    JsonEncoder::new(false).encode(rows)
}
