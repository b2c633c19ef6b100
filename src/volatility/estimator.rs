//! Volatility estimation seam and the GARCH(1,1) estimator behind it.
//!
//! Purpose
//! -------
//! Turn a [`ReturnSeries`] into a [`VolatilitySeries`] on the same index.
//! Detectors and the orchestrator depend only on the
//! [`VolatilityEstimator`] trait; [`GarchEstimator`] is the production
//! implementation.
//!
//! Key behaviors
//! -------------
//! - Input checks: at least `min_observations` points, all finite, non-zero
//!   sample variance.
//! - The fit runs on returns divided by their sample standard deviation;
//!   fitted volatilities are multiplied back, and reported parameters are
//!   rescaled to the original units.
//! - If the configured line search fails, the fit is retried once with the
//!   other one (logged at `warn`). A run stopped by the wall-clock deadline
//!   is not retried and fails with `DeadlineExceeded`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Output volatilities are `sqrt(σ²_t)`, finite and non-negative, with
//!   the input index.
//! - Estimators are `Send + Sync`; the batch runner shares one across
//!   threads.
use crate::{
    optimization::{
        errors::OptError,
        loglik_optimizer::{MLEOptions, OptimOutcome, maximize},
    },
    series::{ReturnSeries, VolatilitySeries},
    volatility::{
        errors::{EstimationError, EstimationResult},
        garch::{DEFAULT_VARIANCE_FLOOR, Garch11, GarchData},
        params::GarchParams,
    },
};
use ndarray::Array1;
use tracing::{debug, warn};

/// Below ~30 points the GARCH(1,1) likelihood is too flat to identify α, β.
pub const DEFAULT_MIN_OBSERVATIONS: usize = 30;

/// Produce a volatility series from returns.
pub trait VolatilityEstimator: Send + Sync {
    /// # Errors
    /// Any [`EstimationError`] describing why no series could be produced.
    fn estimate(&self, returns: &ReturnSeries) -> EstimationResult<VolatilitySeries>;
}

/// Configuration for [`GarchEstimator`].
///
/// - `min_observations`: shortest accepted series.
/// - `mle`: optimizer tolerances, line search and optional deadline. The
///   deadline applies to each attempt.
/// - `variance_floor`: lower bound on `σ²_t` in standardized units.
#[derive(Debug, Clone, PartialEq)]
pub struct GarchOptions {
    pub min_observations: usize,
    pub mle: MLEOptions,
    pub variance_floor: f64,
}

impl Default for GarchOptions {
    fn default() -> Self {
        Self {
            min_observations: DEFAULT_MIN_OBSERVATIONS,
            mle: MLEOptions::default(),
            variance_floor: DEFAULT_VARIANCE_FLOOR,
        }
    }
}

/// Result of a successful GARCH(1,1) fit.
#[derive(Debug, Clone, PartialEq)]
pub struct GarchFit {
    /// Parameters in the units of the input returns.
    pub params: GarchParams,
    pub volatility: VolatilitySeries,
    /// Log-likelihood at the optimum (standardized returns).
    pub loglik: f64,
    pub outcome: OptimOutcome,
}

/// Gaussian GARCH(1,1) estimator fitted by maximum likelihood.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GarchEstimator {
    pub options: GarchOptions,
}

impl GarchEstimator {
    pub fn new(options: GarchOptions) -> Self {
        Self { options }
    }

    /// Fit the model and keep the diagnostics.
    ///
    /// # Errors
    /// - [`EstimationError::TooShort`], [`EstimationError::NonFiniteReturn`],
    ///   [`EstimationError::ZeroVariance`] for unusable input.
    /// - [`EstimationError::OptimizationFailed`] when both line searches fail.
    /// - [`EstimationError::DeadlineExceeded`] when the deadline elapses.
    pub fn fit(&self, returns: &ReturnSeries) -> EstimationResult<GarchFit> {
        let values = returns.values();
        let n = values.len();
        if n < self.options.min_observations {
            return Err(EstimationError::TooShort { needed: self.options.min_observations, actual: n });
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(EstimationError::NonFiniteReturn { index, value });
        }
        let mean = values.sum() / n as f64;
        let scale = values.std(1.0);
        if !(scale > 8.0 * f64::EPSILON * mean.abs()) {
            return Err(EstimationError::ZeroVariance);
        }

        let data = GarchData::new(values.mapv(|r| r / scale))?;
        let model = Garch11 { variance_floor: self.options.variance_floor };
        let theta0 = GarchParams { mu: mean / scale, omega: 0.1, alpha: 0.1, beta: 0.8 }.to_theta();

        let outcome = self.maximize_with_fallback(&model, theta0, &data)?;
        if outcome.timed_out {
            let timeout_ms = self.options.mle.timeout.map(|d| d.as_millis()).unwrap_or_default();
            return Err(EstimationError::DeadlineExceeded { timeout_ms });
        }

        let fitted = GarchParams::from_theta(&outcome.theta_hat).map_err(OptError::from)?;
        let sigma: Array1<f64> =
            model.conditional_variance(&fitted, &data).mapv(|s2| s2.sqrt() * scale);
        let volatility = VolatilitySeries::new(returns.index().to_vec(), sigma)
            .map_err(|e| EstimationError::OptimizationFailed { status: e.to_string() })?;
        debug!(
            n,
            alpha = fitted.alpha,
            beta = fitted.beta,
            iterations = outcome.iterations,
            status = %outcome.status,
            "GARCH(1,1) fitted"
        );

        Ok(GarchFit { params: fitted.rescaled(scale), volatility, loglik: outcome.value, outcome })
    }

    fn maximize_with_fallback(
        &self, model: &Garch11, theta0: Array1<f64>, data: &GarchData,
    ) -> EstimationResult<OptimOutcome> {
        let primary = &self.options.mle;
        match maximize(model, theta0.clone(), data, primary) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                let fallback =
                    MLEOptions { line_searcher: primary.line_searcher.other(), ..primary.clone() };
                warn!(
                    error = %err,
                    primary = ?primary.line_searcher,
                    fallback = ?fallback.line_searcher,
                    "GARCH fit failed, retrying with the other line search"
                );
                Ok(maximize(model, theta0, data, &fallback)?)
            }
        }
    }
}

impl VolatilityEstimator for GarchEstimator {
    fn estimate(&self, returns: &ReturnSeries) -> EstimationResult<VolatilitySeries> {
        Ok(self.fit(returns)?.volatility)
    }
}
