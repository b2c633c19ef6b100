//! Lambda calibration: choose `λ` so the heat-wave effect ratio hits a
//! target.
//!
//! Minimizes `|effect_ratio(λ) − target|` over a bounded interval with
//! [`minimize_bounded`]. The objective is a ratio of integer counts, so it
//! is piecewise constant in `λ`; the search starts at the initial guess and
//! keeps it unless Brent finds a strictly better value.
//!
//! Each trial evaluates a fresh `ThresholdParams` copy. The caller's
//! parameters are never touched; the chosen `λ` is returned in the outcome.
use crate::{
    effects::{
        errors::{EffectError, EffectResult},
        heat_wave::heat_wave_counts,
        params::{DEFAULT_LAMBDA, LambdaBounds, ThresholdParams},
        threshold::require_aligned,
    },
    optimization::{BoundedOptions, OptResult, minimize_bounded},
    series::{ReturnSeries, VolatilitySeries},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_TARGET_RATIO: f64 = 0.1;
pub const DEFAULT_CALIBRATION_TOL: f64 = 1e-4;
pub const DEFAULT_CALIBRATION_MAX_ITER: u64 = 100;

/// Search budget for [`calibrate_lambda`].
///
/// `tolerance` is used both as the location tolerance of the search and as
/// the objective level at which the initial guess is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOptions {
    pub initial_lambda: f64,
    pub bounds: LambdaBounds,
    pub tolerance: f64,
    pub max_iter: u64,
    pub timeout_ms: Option<u64>,
}

impl Default for CalibrationOptions {
    fn default() -> Self {
        Self {
            initial_lambda: DEFAULT_LAMBDA,
            bounds: LambdaBounds::default(),
            tolerance: DEFAULT_CALIBRATION_TOL,
            max_iter: DEFAULT_CALIBRATION_MAX_ITER,
            timeout_ms: None,
        }
    }
}

impl CalibrationOptions {
    fn bounded(&self) -> BoundedOptions {
        BoundedOptions {
            x_tol: self.tolerance,
            accept_below: self.tolerance,
            max_iter: self.max_iter,
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationOutcome {
    pub lambda: f64,
    pub target_ratio: f64,
    pub effect_ratio: f64,
    pub objective: f64,
    pub iterations: u64,
    pub converged: bool,
    pub status: String,
}

/// Calibrate `λ` for the heat-wave effect on `returns`.
///
/// # Errors
/// - [`EffectError::InvalidParameter`] for a target outside `[0, 1]`.
/// - [`EffectError::Alignment`] when the volatility index differs.
/// - [`EffectError::Calibration`] for invalid search options or a failed
///   search.
pub fn calibrate_lambda(
    returns: &ReturnSeries, volatilities: &VolatilitySeries, target_ratio: f64,
    params: ThresholdParams, opts: &CalibrationOptions,
) -> EffectResult<CalibrationOutcome> {
    if !(0.0..=1.0).contains(&target_ratio) {
        return Err(EffectError::InvalidParameter {
            name: "target_ratio",
            value: target_ratio,
            reason: "must lie in [0, 1]".to_string(),
        });
    }
    require_aligned(returns, volatilities)?;

    let prev = returns.price_path().previous();
    let ratio_at = |lambda: f64| {
        heat_wave_counts(returns.values(), &prev, volatilities.values(), &params.with_lambda(lambda))
            .effect_ratio
    };
    let objective = |lambda: f64| -> OptResult<f64> {
        let value = (ratio_at(lambda) - target_ratio).abs();
        debug!(lambda, value, "calibration trial");
        Ok(value)
    };

    let out = minimize_bounded(
        objective,
        opts.initial_lambda,
        opts.bounds.lower,
        opts.bounds.upper,
        &opts.bounded(),
    )?;
    if out.timed_out {
        return Err(EffectError::Calibration { status: out.status });
    }

    let outcome = CalibrationOutcome {
        lambda: out.x,
        target_ratio,
        effect_ratio: ratio_at(out.x),
        objective: out.value,
        iterations: out.iterations,
        converged: out.converged,
        status: out.status,
    };
    info!(
        lambda = outcome.lambda,
        effect_ratio = outcome.effect_ratio,
        iterations = outcome.iterations,
        "lambda calibrated"
    );
    Ok(outcome)
}
