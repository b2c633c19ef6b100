//! Errors for time-indexed series construction and alignment.
//!
//! ## Conventions
//! - **Indices are 0-based** positions into the series.
//! - Timestamps must be strictly increasing; duplicates are rejected here and
//!   removed upstream by the data layer.
use chrono::NaiveDateTime;

/// Result alias for series operations that may produce [`SeriesError`].
pub type SeriesResult<T> = Result<T, SeriesError>;

/// Validation and alignment failures for return, price and volatility series.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// Series has no observations.
    EmptySeries,

    /// Index and value vectors differ in length.
    LengthMismatch { index: usize, values: usize },

    /// Timestamp at `position` is not strictly after its predecessor.
    NonIncreasingIndex { position: usize, timestamp: NaiveDateTime },

    /// Closing price must be finite and strictly positive.
    InvalidClose { index: usize, value: f64 },

    /// Volatility must be finite and non-negative.
    InvalidVolatility { index: usize, value: f64 },

    /// Not enough observations for the requested operation.
    TooShort { needed: usize, actual: usize },

    /// Two series that must share an index do not.
    IndexMismatch { left: usize, right: usize },
}

impl std::error::Error for SeriesError {}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesError::EmptySeries => write!(f, "Input series is empty."),
            SeriesError::LengthMismatch { index, values } => {
                write!(f, "Index has {index} timestamps but {values} values were given.")
            }
            SeriesError::NonIncreasingIndex { position, timestamp } => {
                write!(f, "Timestamp {timestamp} at position {position} is not strictly increasing.")
            }
            SeriesError::InvalidClose { index, value } => {
                write!(f, "Close at index {index} must be finite and > 0; got: {value}")
            }
            SeriesError::InvalidVolatility { index, value } => {
                write!(f, "Volatility at index {index} must be finite and >= 0; got: {value}")
            }
            SeriesError::TooShort { needed, actual } => {
                write!(f, "Series too short: need at least {needed} points, got {actual}.")
            }
            SeriesError::IndexMismatch { left, right } => {
                write!(
                    f,
                    "Series are not aligned: left has {left} points, right has {right} points or different timestamps."
                )
            }
        }
    }
}
