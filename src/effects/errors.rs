//! Errors for threshold, detector and calibration routines.
//!
//! ## Conventions
//! - Detectors never re-align series; mismatched indices are reported as
//!   [`EffectError::Alignment`].
//! - Numeric degeneracies (no triggers, zero volatility, undefined
//!   correlation) are guarded in the computations and are *not* errors.
use crate::{optimization::errors::OptError, series::SeriesError, volatility::EstimationError};

/// Result alias for effect-detection paths.
pub type EffectResult<T> = Result<T, EffectError>;

#[derive(Debug, Clone, PartialEq)]
pub enum EffectError {
    /// Series that must share an index do not.
    Alignment { left: usize, right: usize },

    /// A parameter is outside its accepted range.
    InvalidParameter { name: &'static str, value: f64, reason: String },

    /// Volatility had to be estimated and the estimator failed.
    Estimation(EstimationError),

    /// The calibrator's search failed.
    Calibration { status: String },
}

impl std::error::Error for EffectError {}

impl std::fmt::Display for EffectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectError::Alignment { left, right } => {
                write!(f, "Series are not aligned ({left} vs {right} points or different timestamps).")
            }
            EffectError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid {name} = {value}: {reason}")
            }
            EffectError::Estimation(err) => write!(f, "Volatility estimation failed: {err}"),
            EffectError::Calibration { status } => write!(f, "Lambda calibration failed: {status}"),
        }
    }
}

impl From<EstimationError> for EffectError {
    fn from(err: EstimationError) -> Self {
        EffectError::Estimation(err)
    }
}

impl From<SeriesError> for EffectError {
    fn from(err: SeriesError) -> Self {
        match err {
            SeriesError::IndexMismatch { left, right } => EffectError::Alignment { left, right },
            SeriesError::LengthMismatch { index, values } => {
                EffectError::Alignment { left: index, right: values }
            }
            other => EffectError::InvalidParameter {
                name: "series",
                value: f64::NAN,
                reason: other.to_string(),
            },
        }
    }
}

impl From<OptError> for EffectError {
    fn from(err: OptError) -> Self {
        EffectError::Calibration { status: err.to_string() }
    }
}
