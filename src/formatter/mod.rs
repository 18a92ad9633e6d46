//! Text encoders for export rows
//!
//! This module turns extracted rows into text:
//! - CSV with minimal quoting (`csv`)
//! - Pretty-printed JSON arrays (`json`)
//! - Terminal tables for previews (`table`)

pub mod csv;
pub mod json;
pub mod table;

pub use csv::{CsvEncoder, encode_csv};
pub use json::{JsonEncoder, encode_json};
pub use table::{TableFormatter, TableStyle};
