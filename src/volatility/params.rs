//! GARCH(1,1) parameterization and its optimizer-space mapping.
//!
//! ## Model
//! `ε_t = r_t − μ`, `σ²_t = ω + α ε²_{t−1} + β σ²_{t−1}`.
//!
//! ## Mapping conventions
//! Optimizer vector `θ = (θ_μ, θ_ω, θ_α, θ_β)`:
//! - `μ = θ_μ` (identity),
//! - `ω = softplus(θ_ω)` so `ω > 0`,
//! - `(α, β, slack) = (1 − margin)·softmax(θ_α, θ_β, 0)` so every iterate
//!   satisfies `α + β < 1`.
//!
//! ## Invariants validated by [`GarchParams::new`]
//! - `μ` finite, `ω > 0`, `α ≥ 0`, `β ≥ 0`
//! - `α + β < 1`
use crate::{
    optimization::{
        loglik_optimizer::Theta,
        numerical_stability::{safe_softmax, safe_softmax_inv, safe_softplus, safe_softplus_inv},
    },
    volatility::errors::{ParamError, ParamResult},
};
use ndarray::Array1;
use serde::Serialize;

/// Number of free parameters in the GARCH(1,1) optimizer vector.
pub const GARCH_THETA_LEN: usize = 4;

/// Validated GARCH(1,1) parameters with a constant mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GarchParams {
    pub mu: f64,
    pub omega: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl GarchParams {
    /// # Errors
    /// - [`ParamError::InvalidCoefficient`] for a non-finite `μ` or a negative
    ///   or non-finite `α`/`β`.
    /// - [`ParamError::InvalidOmega`] for `ω ≤ 0` or non-finite.
    /// - [`ParamError::StationarityViolated`] when `α + β ≥ 1`.
    pub fn new(mu: f64, omega: f64, alpha: f64, beta: f64) -> ParamResult<Self> {
        if !mu.is_finite() {
            return Err(ParamError::InvalidCoefficient { name: "mu", value: mu });
        }
        if !(omega.is_finite() && omega > 0.0) {
            return Err(ParamError::InvalidOmega { value: omega });
        }
        for (name, value) in [("alpha", alpha), ("beta", beta)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ParamError::InvalidCoefficient { name, value });
            }
        }
        if alpha + beta >= 1.0 {
            return Err(ParamError::StationarityViolated { coeff_sum: alpha + beta });
        }
        Ok(Self { mu, omega, alpha, beta })
    }

    /// Map an unconstrained optimizer vector to model space.
    ///
    /// # Errors
    /// - [`ParamError::ThetaLengthMismatch`] unless `θ.len() == 4`.
    /// - [`ParamError::InvalidThetaInput`] for a non-finite entry.
    pub fn from_theta(theta: &Theta) -> ParamResult<Self> {
        validate_theta(theta)?;
        let weights = safe_softmax(&[theta[2], theta[3]]);
        Ok(Self { mu: theta[0], omega: safe_softplus(theta[1]), alpha: weights[0], beta: weights[1] })
    }

    /// Inverse of [`GarchParams::from_theta`] (up to the `LOGIT_EPS` floor).
    pub fn to_theta(&self) -> Theta {
        let logits = safe_softmax_inv(&[self.alpha, self.beta]);
        Array1::from(vec![self.mu, safe_softplus_inv(self.omega), logits[0], logits[1]])
    }

    /// `α + β`.
    pub fn persistence(&self) -> f64 {
        self.alpha + self.beta
    }

    /// Long-run variance `ω / (1 − α − β)`.
    pub fn unconditional_variance(&self) -> f64 {
        self.omega / (1.0 - self.persistence())
    }

    /// Parameters for returns multiplied by `scale`: `μ·s`, `ω·s²`; α and β
    /// are scale-free.
    pub fn rescaled(&self, scale: f64) -> Self {
        Self { mu: self.mu * scale, omega: self.omega * scale * scale, ..*self }
    }
}

/// Check length and finiteness of an optimizer vector.
pub fn validate_theta(theta: &Theta) -> ParamResult<()> {
    if theta.len() != GARCH_THETA_LEN {
        return Err(ParamError::ThetaLengthMismatch {
            expected: GARCH_THETA_LEN,
            actual: theta.len(),
        });
    }
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ParamError::InvalidThetaInput { index, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The constructor enforces positivity and stationarity.
    fn new_validates_domain() {
        assert!(GarchParams::new(0.0, 0.1, 0.1, 0.8).is_ok());
        assert_eq!(
            GarchParams::new(0.0, 0.0, 0.1, 0.8),
            Err(ParamError::InvalidOmega { value: 0.0 })
        );
        assert!(matches!(
            GarchParams::new(0.0, 0.1, -0.1, 0.8),
            Err(ParamError::InvalidCoefficient { name: "alpha", .. })
        ));
        assert!(matches!(
            GarchParams::new(0.0, 0.1, 0.3, 0.75),
            Err(ParamError::StationarityViolated { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Model → θ → model recovers the parameters, and any finite θ lands in
    // the stationary region.
    //
    // Given
    // -----
    // - (μ, ω, α, β) = (0.01, 0.2, 0.1, 0.85); θ = (0, 50, 30, 30).
    //
    // Expect
    // ------
    // - Round trip within 1e-9; extreme θ still gives α + β < 1 and ω > 0.
    fn theta_round_trip_and_stationarity() {
        // Arrange
        let params = GarchParams::new(0.01, 0.2, 0.1, 0.85).expect("valid");

        // Act
        let back = GarchParams::from_theta(&params.to_theta()).expect("valid theta");
        let extreme = GarchParams::from_theta(&array![0.0, 50.0, 30.0, 30.0]).expect("finite");

        // Assert
        assert_relative_eq!(back.mu, params.mu, epsilon = 1e-12);
        assert_relative_eq!(back.omega, params.omega, epsilon = 1e-9);
        assert_relative_eq!(back.alpha, params.alpha, epsilon = 1e-9);
        assert_relative_eq!(back.beta, params.beta, epsilon = 1e-9);
        assert!(extreme.persistence() < 1.0);
        assert!(extreme.omega > 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Rescaling multiplies μ by s and ω by s², leaving α, β untouched.
    fn rescaled_scales_mean_and_intercept() {
        let p = GarchParams::new(0.5, 0.1, 0.05, 0.9).expect("valid").rescaled(0.02);
        assert_relative_eq!(p.mu, 0.01, epsilon = 1e-15);
        assert_relative_eq!(p.omega, 0.1 * 4e-4, epsilon = 1e-15);
        assert_eq!((p.alpha, p.beta), (0.05, 0.9));
    }

    #[test]
    // Purpose
    // -------
    // Wrong-length and non-finite optimizer vectors are rejected.
    fn validate_theta_rejects_bad_vectors() {
        assert_eq!(
            validate_theta(&array![0.0, 1.0]),
            Err(ParamError::ThetaLengthMismatch { expected: 4, actual: 2 })
        );
        assert!(matches!(
            validate_theta(&array![0.0, f64::NAN, 0.0, 0.0]),
            Err(ParamError::InvalidThetaInput { index: 1, .. })
        ));
    }
}
