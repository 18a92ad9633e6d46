//! Document export and tabular filter engine
//!
//! Turns processed document records (AI-classified invoices and receipts)
//! into flat CSV or JSON exports, and selects which records to export with a
//! free-text search and single-click quick filters.
//!
//! # Modules
//!
//! - `model`: Document records and response-envelope handling
//! - `extract`: Record to export-row flattening
//! - `formatter`: CSV, JSON and terminal table encoders
//! - `filter`: Search, quick filters and per-filter counts
//! - `export`: Artifact packaging, file naming and delivery
//! - `access`: Role-based permission checks
//! - `config`: Configuration management
//! - `cli`: Command-line interface and argument parsing
//! - `error`: Error types and handling
//!
//! # Example
//!
//! ```
//! use asr_export::export::{ExportContext, ExportFormat, export};
//! use asr_export::filter::{FilterCriteria, QuickFilter, filter};
//! use asr_export::model::unwrap_records;
//! use chrono::NaiveDate;
//!
//! let body = r#"{"data": [
//!     {"id": "1", "filename": "invoice.pdf",
//!      "classification": {"vendor_name": "ACME", "amount": 250, "payment_status": "unpaid"}},
//!     {"id": "2", "filename": "receipt.pdf",
//!      "classification": {"payment_status": "paid"}}
//! ]}"#;
//! let records = unwrap_records(body).unwrap();
//!
//! let criteria = FilterCriteria::new().with_quick_filter(QuickFilter::Unpaid);
//! let matched = filter(&records, &criteria);
//!
//! let ctx = ExportContext::on(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
//! let artifact = export(&matched, ExportFormat::Csv, &ctx);
//! assert_eq!(artifact.filename, "asr-documents-export-2026-01-15.csv");
//! assert_eq!(artifact.row_count, 1);
//! ```

pub mod access;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod filter;
pub mod formatter;
pub mod model;

// Re-export commonly used types
pub use config::Config;
pub use error::{AsrError, Result};
pub use export::{ExportArtifact, ExportContext, ExportFormat, export};
pub use filter::{FilterCriteria, QuickFilter, filter};
pub use model::DocumentRecord;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
