//! Error handling for asr-export.
//!
//! Extraction, encoding and filtering are infallible by construction; every
//! missing field has a default. Errors only surface at the edges:
//! - loading and validating configuration
//! - reading record files and parsing command-line values
//! - delivering an artifact to its destination
//!
//! # Example
//!
//! ```rust,no_run
//! use asr_export::error::{InputError, Result};
//!
//! fn parse_format(name: &str) -> Result<()> {
//!     Err(InputError::UnknownFormat(name.to_string()).into())
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{AsrError, ConfigError, ExportError, InputError, Result};
