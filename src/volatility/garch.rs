//! GARCH(1,1) with constant mean: analytic log-likelihood and gradient.
//!
//! This module wires a Gaussian GARCH(1,1) to the `LogLikelihood` trait.
//! Optimizer parameters `θ` are mapped to `(μ, ω, α, β)` through
//! [`GarchParams::from_theta`], the conditional variance recursion is run
//! once per evaluation, and the gradient is propagated through the same
//! recursion.
//!
//! Key ideas:
//! - Pre-sample values `ε²_{−1}` and `σ²_{−1}` both equal the backcast
//!   `b(μ) = Σ w_i (r_i − μ)²`, with weights `∝ 0.94^i` over the first
//!   `min(75, n)` points.
//! - Each step floors `σ²_t` at `variance_floor`; the derivative of a
//!   floored step is zero.
//! - The gradient accumulates `∂ℓ/∂(μ, ω, α, β)` via variance sensitivities,
//!   then maps to θ-space with the logistic (softplus derivative) and the
//!   scaled-softmax JVP.
use crate::{
    optimization::{
        errors::OptResult,
        loglik_optimizer::{Grad, LogLikelihood, Theta},
        numerical_stability::{safe_logistic, safe_softmax, safe_softmax_deriv},
    },
    volatility::{
        errors::{EstimationError, EstimationResult},
        params::{GarchParams, validate_theta},
    },
};
use ndarray::Array1;

/// `ln(2π)`.
const LN_2PI: f64 = 1.837_877_066_409_345_5;

/// Decay of the exponentially weighted pre-sample backcast.
pub const BACKCAST_DECAY: f64 = 0.94;

/// Maximum number of leading observations in the backcast.
pub const BACKCAST_WINDOW: usize = 75;

/// Default floor for the conditional variance.
pub const DEFAULT_VARIANCE_FLOOR: f64 = 1e-12;

/// Return data prepared for GARCH evaluation.
///
/// Holds the (already rescaled) returns and the normalized backcast weights.
#[derive(Debug, Clone, PartialEq)]
pub struct GarchData {
    pub returns: Array1<f64>,
    pub weights: Array1<f64>,
}

impl GarchData {
    /// # Errors
    /// - [`EstimationError::TooShort`] for an empty series.
    /// - [`EstimationError::NonFiniteReturn`] at the first NaN/±inf.
    pub fn new(returns: Array1<f64>) -> EstimationResult<Self> {
        if returns.is_empty() {
            return Err(EstimationError::TooShort { needed: 1, actual: 0 });
        }
        if let Some((index, &value)) = returns.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(EstimationError::NonFiniteReturn { index, value });
        }
        let m = returns.len().min(BACKCAST_WINDOW);
        let raw: Array1<f64> = (0..m).map(|i| BACKCAST_DECAY.powi(i as i32)).collect();
        let weights = &raw / raw.sum();
        Ok(Self { returns, weights })
    }

    /// `b(μ)` and `db/dμ`.
    fn backcast(&self, mu: f64) -> (f64, f64) {
        self.weights.iter().zip(self.returns.iter()).fold((0.0, 0.0), |(b, db), (w, r)| {
            let e = r - mu;
            (b + w * e * e, db - 2.0 * w * e)
        })
    }
}

/// Gaussian GARCH(1,1) log-likelihood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Garch11 {
    pub variance_floor: f64,
}

impl Default for Garch11 {
    fn default() -> Self {
        Self { variance_floor: DEFAULT_VARIANCE_FLOOR }
    }
}

impl Garch11 {
    /// Conditional variances `σ²_t` for every observation.
    pub fn conditional_variance(&self, params: &GarchParams, data: &GarchData) -> Array1<f64> {
        let (b, _) = data.backcast(params.mu);
        let mut eps2_prev = b;
        let mut s2_prev = b;
        data.returns
            .iter()
            .map(|&r| {
                let s2 = (params.omega + params.alpha * eps2_prev + params.beta * s2_prev)
                    .max(self.variance_floor);
                let e = r - params.mu;
                eps2_prev = e * e;
                s2_prev = s2;
                s2
            })
            .collect()
    }
}

impl LogLikelihood for Garch11 {
    type Data = GarchData;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let params = GarchParams::from_theta(theta)?;
        let sigma2 = self.conditional_variance(&params, data);
        Ok(sigma2
            .iter()
            .zip(data.returns.iter())
            .map(|(&s2, &r)| {
                let e = r - params.mu;
                -0.5 * (LN_2PI + s2.ln() + e * e / s2)
            })
            .sum())
    }

    fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
        validate_theta(theta)?;
        Ok(())
    }

    /// Analytic `∇ℓ(θ)`.
    ///
    /// Sensitivities `d_t = ∂σ²_t/∂(μ, ω, α, β)` follow
    /// `d_t = (α·∂ε²_{t−1}/∂μ, 1, ε²_{t−1}, σ²_{t−1}) + β·d_{t−1}`, started
    /// from `d_{−1} = (db/dμ, 0, 0, 0)` with `∂ε²_{−1}/∂μ = db/dμ`.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let params = GarchParams::from_theta(theta)?;
        let (b, db) = data.backcast(params.mu);
        let (mu, omega, alpha, beta) = (params.mu, params.omega, params.alpha, params.beta);

        let mut eps2_prev = b;
        let mut deps2_prev = db;
        let mut s2_prev = b;
        let mut d_prev = [db, 0.0, 0.0, 0.0];
        let mut g = [0.0_f64; 4];

        for &r in data.returns.iter() {
            let raw = omega + alpha * eps2_prev + beta * s2_prev;
            let floored = raw < self.variance_floor;
            let s2 = if floored { self.variance_floor } else { raw };
            let d = if floored {
                [0.0; 4]
            } else {
                [
                    alpha * deps2_prev + beta * d_prev[0],
                    1.0 + beta * d_prev[1],
                    eps2_prev + beta * d_prev[2],
                    s2_prev + beta * d_prev[3],
                ]
            };

            let e = r - mu;
            let dl_ds2 = -0.5 * (1.0 / s2 - e * e / (s2 * s2));
            for k in 0..4 {
                g[k] += dl_ds2 * d[k];
            }
            g[0] += e / s2;

            eps2_prev = e * e;
            deps2_prev = -2.0 * e;
            s2_prev = s2;
            d_prev = d;
        }

        let weights = safe_softmax(&[theta[2], theta[3]]);
        let coeff_grad = safe_softmax_deriv(&weights, &[g[2], g[3]]);
        Ok(Array1::from(vec![
            g[0],
            g[1] * safe_logistic(theta[1]),
            coeff_grad[0],
            coeff_grad[1],
        ]))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError, loglik_optimizer::finite_diff::fd_gradient,
        numerical_stability::safe_softplus_inv,
    };
    use crate::volatility::errors::ParamError;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use rand_distr::StandardNormal;

    /// Simulate `n` GARCH(1,1) returns from a seeded generator.
    pub(crate) fn simulate_garch(params: &GarchParams, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut s2 = params.unconditional_variance();
        let mut eps_prev = 0.0;
        (0..n)
            .map(|_| {
                s2 = params.omega + params.alpha * eps_prev * eps_prev + params.beta * s2;
                let z: f64 = rng.sample(StandardNormal);
                eps_prev = s2.sqrt() * z;
                params.mu + eps_prev
            })
            .collect()
    }

    #[test]
    // Purpose
    // -------
    // Backcast weights are normalized and limited to the leading window.
    fn backcast_weights_are_normalized() {
        let data = GarchData::new(Array1::from_elem(200, 0.1)).expect("finite data");
        assert_eq!(data.weights.len(), BACKCAST_WINDOW);
        assert_relative_eq!(data.weights.sum(), 1.0, epsilon = 1e-12);
        assert!(data.weights[0] > data.weights[1]);

        let short = GarchData::new(array![0.1, 0.2, 0.3]).expect("finite data");
        assert_eq!(short.weights.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Non-finite input is rejected with its position.
    fn garch_data_rejects_non_finite() {
        assert_eq!(
            GarchData::new(array![0.1, f64::INFINITY]),
            Err(EstimationError::NonFiniteReturn { index: 1, value: f64::INFINITY })
        );
    }

    #[test]
    // Purpose
    // -------
    // With α = β → 0 the variance is ω everywhere and the log-likelihood is
    // the i.i.d. Gaussian one.
    //
    // Given
    // -----
    // - Returns (1, -1, 0.5), μ = 0, ω = 2, α = β ≈ 0 (very negative logits).
    //
    // Expect
    // ------
    // - ℓ = Σ −½(ln 2π + ln 2 + r²/2).
    fn value_matches_iid_gaussian_limit() {
        // Arrange
        let data = GarchData::new(array![1.0, -1.0, 0.5]).expect("data");
        let theta = array![0.0, safe_softplus_inv(2.0), -60.0, -60.0];

        // Act
        let ll = Garch11::default().value(&theta, &data).expect("value");

        // Assert
        let expected: f64 = [1.0_f64, -1.0, 0.5]
            .iter()
            .map(|r| -0.5 * (LN_2PI + 2.0_f64.ln() + r * r / 2.0))
            .sum();
        assert_relative_eq!(ll, expected, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // The analytic gradient agrees with central finite differences of the
    // log-likelihood.
    //
    // Given
    // -----
    // - 300 simulated GARCH returns (seed 7), θ away from the optimum.
    //
    // Expect
    // ------
    // - Each component matches within 1e-4 relative.
    fn analytic_gradient_matches_finite_differences() {
        // Arrange
        let truth = GarchParams::new(0.05, 0.1, 0.1, 0.8).expect("valid");
        let data = GarchData::new(Array1::from(simulate_garch(&truth, 300, 7))).expect("data");
        let model = Garch11::default();
        let theta = array![0.02, 0.3, -1.2, 1.1];

        // Act
        let analytic = model.grad(&theta, &data).expect("grad");
        let numeric = fd_gradient(&theta, |t| model.value(t, &data)).expect("fd grad");

        // Assert
        for k in 0..4 {
            assert_relative_eq!(analytic[k], numeric[k], max_relative = 1e-4, epsilon = 1e-5);
        }
    }

    #[test]
    // Purpose
    // -------
    // A malformed θ surfaces as the optimizer's length error.
    fn check_rejects_wrong_length() {
        let data = GarchData::new(array![0.1, 0.2]).expect("data");
        let err = Garch11::default().check(&array![0.0, 0.0], &data).unwrap_err();
        assert_eq!(err, OptError::Param(ParamError::ThetaLengthMismatch { expected: 4, actual: 2 }));
    }
}
