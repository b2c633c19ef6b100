//! Crate-level error type returned by the analysis engine.
//!
//! Module errors convert with `From`, so engine code propagates with `?`:
//!
//! | source                         | variant                         |
//! |--------------------------------|---------------------------------|
//! | `DataError::NotFound`          | [`AnalysisError::DataNotFound`] |
//! | other `DataError`              | [`AnalysisError::Data`]         |
//! | `SeriesError::IndexMismatch`   | [`AnalysisError::Alignment`]    |
//! | `SeriesError` too few points   | [`AnalysisError::DateRange`]    |
//! | other `SeriesError`            | [`AnalysisError::InvalidSeries`]|
//! | `EstimationError`              | [`AnalysisError::Estimation`]   |
//! | `EffectError`                  | matching variant                |
//! | `ConfigError`                  | [`AnalysisError::Config`]       |
use crate::{
    config::ConfigError,
    data::DataError,
    effects::EffectError,
    series::SeriesError,
    volatility::EstimationError,
};

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// No dataset with this id.
    DataNotFound { id: String },

    /// Two series that must share an index do not.
    Alignment { left: usize, right: usize },

    /// Too few usable points in the requested window.
    DateRange { id: String, reason: String },

    /// Stored prices or timestamps cannot form a series.
    InvalidSeries { id: String, source: SeriesError },

    /// Volatility estimation failed.
    Estimation(EstimationError),

    /// A parameter is outside its accepted range.
    InvalidParameter { name: String, reason: String },

    /// Calibration search failed.
    Calibration { status: String },

    /// Loading a dataset failed.
    Data(DataError),

    /// Configuration could not be loaded or is inconsistent.
    Config(ConfigError),
}

impl std::error::Error for AnalysisError {}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::DataNotFound { id } => write!(f, "Dataset {id} not found"),
            AnalysisError::Alignment { left, right } => {
                write!(f, "Series are not aligned ({left} vs {right} points).")
            }
            AnalysisError::DateRange { id, reason } => {
                write!(f, "No usable data for {id} in the requested range: {reason}")
            }
            AnalysisError::InvalidSeries { id, source } => {
                write!(f, "Dataset {id} holds invalid data: {source}")
            }
            AnalysisError::Estimation(err) => write!(f, "{err}"),
            AnalysisError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter {name}: {reason}")
            }
            AnalysisError::Calibration { status } => write!(f, "Calibration failed: {status}"),
            AnalysisError::Data(err) => write!(f, "{err}"),
            AnalysisError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl From<DataError> for AnalysisError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound { id } => AnalysisError::DataNotFound { id },
            other => AnalysisError::Data(other),
        }
    }
}

impl From<EstimationError> for AnalysisError {
    fn from(err: EstimationError) -> Self {
        AnalysisError::Estimation(err)
    }
}

impl AnalysisError {
    /// Attach the dataset id to a series failure.
    pub fn from_series(id: &str, err: SeriesError) -> Self {
        match err {
            SeriesError::IndexMismatch { left, right } => AnalysisError::Alignment { left, right },
            SeriesError::EmptySeries | SeriesError::TooShort { .. } => {
                AnalysisError::DateRange { id: id.to_string(), reason: err.to_string() }
            }
            source => AnalysisError::InvalidSeries { id: id.to_string(), source },
        }
    }
}

impl From<SeriesError> for AnalysisError {
    fn from(err: SeriesError) -> Self {
        AnalysisError::from_series("", err)
    }
}

impl From<EffectError> for AnalysisError {
    fn from(err: EffectError) -> Self {
        match err {
            EffectError::Alignment { left, right } => AnalysisError::Alignment { left, right },
            EffectError::InvalidParameter { name, value, reason } => {
                AnalysisError::InvalidParameter {
                    name: name.to_string(),
                    reason: format!("{value}: {reason}"),
                }
            }
            EffectError::Estimation(e) => AnalysisError::Estimation(e),
            EffectError::Calibration { status } => AnalysisError::Calibration { status },
        }
    }
}

impl From<ConfigError> for AnalysisError {
    fn from(err: ConfigError) -> Self {
        AnalysisError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Series failures land in the variant that describes them: bad stored
    // values are data problems, too few points is a range problem.
    //
    // Expect
    // ------
    // - `InvalidClose` becomes `InvalidSeries` carrying the id and source.
    // - `TooShort` becomes `DateRange`.
    // - `IndexMismatch` becomes `Alignment`.
    fn series_errors_map_by_cause() {
        // Arrange
        let bad_close = SeriesError::InvalidClose { index: 3, value: 0.0 };

        // Act
        let invalid = AnalysisError::from_series("AAA", bad_close.clone());
        let short = AnalysisError::from_series("AAA", SeriesError::TooShort { needed: 2, actual: 1 });
        let mismatch = AnalysisError::from(SeriesError::IndexMismatch { left: 4, right: 5 });

        // Assert
        assert_eq!(
            invalid,
            AnalysisError::InvalidSeries { id: "AAA".to_string(), source: bad_close }
        );
        assert!(invalid.to_string().contains("AAA"));
        assert!(matches!(short, AnalysisError::DateRange { ref id, .. } if id == "AAA"));
        assert_eq!(mismatch, AnalysisError::Alignment { left: 4, right: 5 });
    }
}
