//! Errors for volatility estimation (GARCH fitting) and stochastic-volatility
//! simulation.
//!
//! Three error types live here:
//! - [`EstimationError`]: the GARCH(1,1) fit could not produce a series.
//! - [`ParamError`]: a GARCH parameter set or optimizer vector is invalid.
//!   Converts into [`OptError`] so it can surface from a likelihood.
//! - [`SimulationError`]: Heston parameters or step size are invalid.
//!
//! ## Conventions
//! - **Indices are 0-based** positions into the return series.
//! - Optimizer failures are normalized to
//!   [`EstimationError::OptimizationFailed`] with a human-readable status.
use crate::optimization::errors::OptError;

/// Result alias for estimation paths.
pub type EstimationResult<T> = Result<T, EstimationError>;

/// Result alias for GARCH parameter construction.
pub type ParamResult<T> = Result<T, ParamError>;

/// Result alias for Heston simulation.
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Failure to fit a conditional-volatility model to a return series.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimationError {
    /// Fewer observations than the fit can support.
    TooShort { needed: usize, actual: usize },

    /// A return is NaN/±inf.
    NonFiniteReturn { index: usize, value: f64 },

    /// All returns are identical; there is no variance to model.
    ZeroVariance,

    /// Optimizer failed (after the fallback line search); human-readable reason.
    OptimizationFailed { status: String },

    /// The fit did not finish before its wall-clock deadline.
    DeadlineExceeded { timeout_ms: u128 },
}

impl std::error::Error for EstimationError {}

impl std::fmt::Display for EstimationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimationError::TooShort { needed, actual } => {
                write!(f, "Return series too short for GARCH(1,1): need {needed}, got {actual}.")
            }
            EstimationError::NonFiniteReturn { index, value } => {
                write!(f, "Return at index {index} is non-finite: {value}")
            }
            EstimationError::ZeroVariance => {
                write!(f, "Return series has zero variance.")
            }
            EstimationError::OptimizationFailed { status } => {
                write!(f, "GARCH optimization failed: {status}")
            }
            EstimationError::DeadlineExceeded { timeout_ms } => {
                write!(f, "GARCH fit exceeded its deadline of {timeout_ms} ms.")
            }
        }
    }
}

impl From<OptError> for EstimationError {
    fn from(err: OptError) -> Self {
        EstimationError::OptimizationFailed { status: err.to_string() }
    }
}

/// Invalid GARCH(1,1) parameters or optimizer vector.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// `α + β` is not strictly below one.
    StationarityViolated { coeff_sum: f64 },

    /// Optimizer vector has the wrong length.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// ω must be finite and > 0.
    InvalidOmega { value: f64 },

    /// α, β must be finite and >= 0 (μ must be finite).
    InvalidCoefficient { name: &'static str, value: f64 },

    /// Optimizer vector entry is NaN/±inf.
    InvalidThetaInput { index: usize, value: f64 },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::StationarityViolated { coeff_sum } => {
                write!(f, "Model not stationary: alpha + beta is {coeff_sum}, which is >= 1")
            }
            ParamError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            ParamError::InvalidOmega { value } => {
                write!(f, "Invalid omega parameter: {value}, must be finite and > 0")
            }
            ParamError::InvalidCoefficient { name, value } => {
                write!(f, "Invalid {name} coefficient: {value}")
            }
            ParamError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
        }
    }
}

/// Invalid Heston parameters or time step.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A Heston parameter is outside its domain.
    InvalidHestonParam { name: &'static str, value: f64, reason: &'static str },

    /// Time step must be finite and > 0.
    InvalidTimeStep { dt: f64 },

    /// Current volatility must be finite and >= 0.
    InvalidSigma { value: f64 },
}

impl std::error::Error for SimulationError {}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::InvalidHestonParam { name, value, reason } => {
                write!(f, "Invalid Heston parameter {name} = {value}: {reason}")
            }
            SimulationError::InvalidTimeStep { dt } => {
                write!(f, "Time step must be finite and > 0; got: {dt}")
            }
            SimulationError::InvalidSigma { value } => {
                write!(f, "Volatility must be finite and >= 0; got: {value}")
            }
        }
    }
}
