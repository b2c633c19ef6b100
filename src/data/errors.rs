//! Errors for dataset discovery and CSV loading.
use std::path::PathBuf;

/// Result alias for data-access paths.
pub type DataResult<T> = Result<T, DataError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// No dataset with this id is registered.
    NotFound { id: String },

    /// Filesystem failure (missing directory, unreadable file).
    Io { path: PathBuf, reason: String },

    /// The CSV reader rejected the file.
    Csv { path: PathBuf, reason: String },

    /// A required column is absent from the header.
    MissingColumn { path: PathBuf, column: &'static str },

    /// A timestamp cell matched none of the accepted formats.
    InvalidTimestamp { path: PathBuf, line: u64, value: String },
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::NotFound { id } => write!(f, "Dataset {id} not found"),
            DataError::Io { path, reason } => write!(f, "I/O error on {}: {reason}", path.display()),
            DataError::Csv { path, reason } => {
                write!(f, "CSV error in {}: {reason}", path.display())
            }
            DataError::MissingColumn { path, column } => {
                write!(f, "Column '{column}' missing from {}", path.display())
            }
            DataError::InvalidTimestamp { path, line, value } => {
                write!(f, "Unparseable timestamp '{value}' at {}:{line}", path.display())
            }
        }
    }
}
