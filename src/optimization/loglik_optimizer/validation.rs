//! Finiteness and shape checks shared by the optimizer.
//!
//! Each check reports the first offending entry as an [`OptError`], so a
//! failed GARCH fit names the coordinate that went bad.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta},
};

fn first_non_finite(values: &Theta) -> Option<(usize, f64)> {
    values.iter().copied().enumerate().find(|(_, v)| !v.is_finite())
}

fn tolerance_problem(tol: f64) -> Option<&'static str> {
    if !tol.is_finite() {
        Some("tolerance must be finite")
    } else if tol <= 0.0 {
        Some("tolerance must be positive")
    } else {
        None
    }
}

/// `None` disables the gradient-norm stopping rule.
///
/// # Errors
/// [`OptError::InvalidTolGrad`] for a non-finite or non-positive value.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| tolerance_problem(t).map(|reason| (t, reason))) {
        Some((tol, reason)) => Err(OptError::InvalidTolGrad { tol, reason }),
        None => Ok(()),
    }
}

/// `None` disables the cost-change stopping rule.
///
/// # Errors
/// [`OptError::InvalidTolCost`] for a non-finite or non-positive value.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| tolerance_problem(t).map(|reason| (t, reason))) {
        Some((tol, reason)) => Err(OptError::InvalidTolCost { tol, reason }),
        None => Ok(()),
    }
}

/// # Errors
/// - [`OptError::DimensionMismatch`] unless `grad.len() == dim`.
/// - [`OptError::InvalidGradient`] for the first non-finite entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::DimensionMismatch { what: "gradient", expected: dim, found: grad.len() });
    }
    match first_non_finite(grad) {
        Some((index, value)) => {
            Err(OptError::InvalidGradient { index, value, reason: "gradient must be finite" })
        }
        None => Ok(()),
    }
}

/// Unwrap the solver's best point.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] when the solver produced none.
/// - [`OptError::InvalidThetaHat`] for the first non-finite entry.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    match first_non_finite(&theta) {
        Some((index, value)) => {
            Err(OptError::InvalidThetaHat { index, value, reason: "estimate must be finite" })
        }
        None => Ok(theta),
    }
}

/// # Errors
/// [`OptError::NonFiniteCost`] for `NaN` or `±∞`.
pub fn validate_value(value: f64) -> OptResult<()> {
    if value.is_finite() { Ok(()) } else { Err(OptError::NonFiniteCost { value }) }
}
