use std::{fmt, io};

/// Crate-wide `Result` type using [`AsrError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, AsrError>;

/// Top-level error type for asr-export operations.
///
/// The pure core (extraction, encoding, filtering) never produces one of
/// these. They come from the edges: configuration, input files and
/// artifact delivery.
#[derive(Debug)]
pub enum AsrError {
    /// Configuration errors.
    Config(ConfigError),

    /// Input decoding errors.
    Input(InputError),

    /// Export and delivery errors.
    Export(ExportError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Errors raised while reading records or parsing user-supplied arguments.
#[derive(Debug)]
pub enum InputError {
    /// Input file could not be read.
    Unreadable { path: String, reason: String },

    /// Input is not valid JSON or does not match the record shape.
    InvalidJson(String),

    /// JSON parsed, but is neither a record array nor a `data` envelope.
    UnexpectedShape(String),

    /// Unknown quick filter name.
    UnknownQuickFilter(String),

    /// Unknown export format name.
    UnknownFormat(String),

    /// Date argument not in `YYYY-MM-DD` form.
    InvalidDate(String),
}

/// Export and delivery errors.
#[derive(Debug)]
pub enum ExportError {
    /// Destination directory does not exist.
    DirectoryNotFound(String),

    /// Writing the artifact failed.
    WriteFailed { path: String, reason: String },

    /// The acting role may not export.
    PermissionDenied { role: String, action: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for AsrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsrError::Config(e) => write!(f, "Configuration error: {e}"),
            AsrError::Input(e) => write!(f, "Input error: {e}"),
            AsrError::Export(e) => write!(f, "Export error: {e}"),
            AsrError::Io(e) => write!(f, "I/O error: {e}"),
            AsrError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Unreadable { path, reason } => {
                write!(f, "Cannot read '{path}': {reason}")
            }
            InputError::InvalidJson(msg) => write!(f, "Invalid JSON: {msg}"),
            InputError::UnexpectedShape(found) => write!(
                f,
                "Expected a record array or {{\"data\": [...]}}, found {found}"
            ),
            InputError::UnknownQuickFilter(name) => write!(
                f,
                "Unknown quick filter '{name}' (expected all, manual-review, unpaid, high-value)"
            ),
            InputError::UnknownFormat(name) => {
                write!(f, "Unknown export format '{name}' (expected csv or json)")
            }
            InputError::InvalidDate(value) => {
                write!(f, "Invalid date '{value}' (expected YYYY-MM-DD)")
            }
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::DirectoryNotFound(dir) => write!(f, "Directory does not exist: {dir}"),
            ExportError::WriteFailed { path, reason } => {
                write!(f, "Failed to write '{path}': {reason}")
            }
            ExportError::PermissionDenied { role, action } => {
                write!(f, "Role '{role}' is not allowed to {action}")
            }
        }
    }
}

impl std::error::Error for AsrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AsrError::Io(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for ConfigError {}
impl std::error::Error for InputError {}
impl std::error::Error for ExportError {}

/* ========================= Conversions to AsrError ========================= */

impl From<io::Error> for AsrError {
    fn from(err: io::Error) -> Self {
        AsrError::Io(err)
    }
}

impl From<ConfigError> for AsrError {
    fn from(err: ConfigError) -> Self {
        AsrError::Config(err)
    }
}

impl From<InputError> for AsrError {
    fn from(err: InputError) -> Self {
        AsrError::Input(err)
    }
}

impl From<ExportError> for AsrError {
    fn from(err: ExportError) -> Self {
        AsrError::Export(err)
    }
}

impl From<serde_json::Error> for AsrError {
    fn from(err: serde_json::Error) -> Self {
        AsrError::Input(InputError::InvalidJson(err.to_string()))
    }
}

impl From<toml::de::Error> for AsrError {
    fn from(err: toml::de::Error) -> Self {
        AsrError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<String> for AsrError {
    fn from(msg: String) -> Self {
        AsrError::Generic(msg)
    }
}

impl From<&str> for AsrError {
    fn from(msg: &str) -> Self {
        AsrError::Generic(msg.to_owned())
    }
}
