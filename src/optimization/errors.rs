//! Optimizer error surface.
//!
//! Every failure inside [`crate::optimization`] is reported as an
//! [`OptError`]: bad solver options, malformed gradients or costs, a missing
//! or non-finite solution, a GARCH parameter problem raised from inside a
//! likelihood, or a failure reported by argmin itself. Errors raised by a
//! cost function travel through argmin as `argmin::core::Error` and are
//! recovered intact by the `From<Error>` conversion.
use argmin::core::{ArgminError, Error};

use crate::volatility::errors::ParamError;

pub type OptResult<T> = Result<T, OptError>;

/// Which argmin error class a [`OptError::Backend`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    InvalidParameter,
    NotImplemented,
    NotInitialized,
    ConditionViolated,
    PotentialBug,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Objective evaluation ----
    /// The likelihood has no analytic gradient; use finite differences.
    GradientNotImplemented,

    /// A vector (θ or a gradient) has the wrong length.
    DimensionMismatch { what: &'static str, expected: usize, found: usize },

    InvalidGradient { index: usize, value: f64, reason: &'static str },

    NonFiniteCost { value: f64 },

    // ---- Solver options ----
    InvalidTolGrad { tol: f64, reason: &'static str },
    InvalidTolCost { tol: f64, reason: &'static str },
    InvalidMaxIter { max_iter: usize, reason: &'static str },
    NoTolerancesProvided,
    InvalidLineSearch { name: String, reason: &'static str },
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    /// Scalar search interval must be finite with `lower < upper`.
    InvalidBounds { lower: f64, upper: f64 },
    InitialGuessOutOfBounds { x0: f64, lower: f64, upper: f64 },

    // ---- Solution ----
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },
    MissingThetaHat,

    // ---- Wrapped ----
    /// GARCH parameter mapping failed inside a likelihood.
    Param(ParamError),

    /// argmin reported a failure of its own.
    Backend { kind: BackendKind, text: String },
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptError::GradientNotImplemented => write!(f, "No analytic gradient available"),
            OptError::DimensionMismatch { what, expected, found } => {
                write!(f, "{what} has length {found}, expected {expected}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient entry {index} ({value}): {reason}")
            }
            OptError::NonFiniteCost { value } => write!(f, "Objective returned {value}"),

            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost-change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid iteration cap {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => write!(f, "No stopping tolerance configured"),
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Unknown line search '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }
            OptError::InvalidBounds { lower, upper } => {
                write!(f, "Search interval [{lower}, {upper}] must be finite with lower < upper")
            }
            OptError::InitialGuessOutOfBounds { x0, lower, upper } => {
                write!(f, "Starting point {x0} is outside [{lower}, {upper}]")
            }

            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Solution entry {index} ({value}): {reason}")
            }
            OptError::MissingThetaHat => write!(f, "Solver finished without a solution"),

            OptError::Param(err) => write!(f, "{err}"),
            OptError::Backend { kind, text } => write!(f, "argmin {kind:?}: {text}"),
        }
    }
}

impl From<Error> for OptError {
    fn from(err: Error) -> Self {
        if let Some(inner) = err.downcast_ref::<OptError>() {
            return inner.clone();
        }
        match err.downcast::<ArgminError>() {
            Ok(argmin_err) => {
                let (kind, text) = match argmin_err {
                    ArgminError::InvalidParameter { text } => (BackendKind::InvalidParameter, text),
                    ArgminError::NotImplemented { text } => (BackendKind::NotImplemented, text),
                    ArgminError::NotInitialized { text } => (BackendKind::NotInitialized, text),
                    ArgminError::ConditionViolated { text } => {
                        (BackendKind::ConditionViolated, text)
                    }
                    ArgminError::PotentialBug { text } => (BackendKind::PotentialBug, text),
                    other => (BackendKind::Other, other.to_string()),
                };
                OptError::Backend { kind, text }
            }
            Err(other) => OptError::Backend { kind: BackendKind::Other, text: other.to_string() },
        }
    }
}

impl From<ParamError> for OptError {
    fn from(err: ParamError) -> Self {
        OptError::Param(err)
    }
}
