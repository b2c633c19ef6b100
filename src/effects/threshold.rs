//! Volatility-scaled thresholds and the per-period trigger test.
//!
//! ```text
//! threshold_t = λ · σ_t · p_{t−1}
//! trigger_t   = |r_t · p_{t−1}| > threshold_t
//! ```
//!
//! `p_{t−1}` is the compounded price path from [`PricePath::previous`]. The
//! first period has no observed previous price, so it never triggers; its
//! threshold is still reported against the base level 1.0. The comparison
//! is strict: a change exactly at the threshold does not trigger, and with
//! `σ_t = 0` any non-zero change after the first period does.
use crate::{
    effects::{
        errors::{EffectError, EffectResult},
        params::ThresholdParams,
    },
    series::{PricePath, ReturnSeries, VolatilitySeries, ensure_aligned},
};
use ndarray::Array1;

/// `λ · σ · p_prev`.
pub fn threshold(price_prev: f64, sigma: f64, params: &ThresholdParams) -> f64 {
    params.lambda * sigma * price_prev
}

/// Flags, thresholds and absolute price changes for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerSeries {
    pub flags: Vec<bool>,
    pub thresholds: Array1<f64>,
    pub changes: Array1<f64>,
}

impl TriggerSeries {
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }
}

/// Evaluate the trigger test at every period.
///
/// # Errors
/// [`EffectError::Alignment`] unless `returns`, `prices` and `volatilities`
/// share one index.
pub fn triggers(
    returns: &ReturnSeries, prices: &PricePath, volatilities: &VolatilitySeries,
    params: &ThresholdParams,
) -> EffectResult<TriggerSeries> {
    ensure_aligned(returns.index(), prices.index())?;
    ensure_aligned(returns.index(), volatilities.index())?;
    let prev = prices.previous();
    Ok(evaluate(returns.values(), &prev, volatilities.values(), params))
}

/// Trigger test on arrays already known to be aligned. Position 0 is never
/// flagged.
pub(crate) fn evaluate(
    returns: &Array1<f64>, price_prev: &Array1<f64>, sigma: &Array1<f64>,
    params: &ThresholdParams,
) -> TriggerSeries {
    let n = returns.len();
    let mut flags = Vec::with_capacity(n);
    let mut thresholds = Array1::zeros(n);
    let mut changes = Array1::zeros(n);
    for t in 0..n {
        let thr = threshold(price_prev[t], sigma[t], params);
        let change = (returns[t] * price_prev[t]).abs();
        thresholds[t] = thr;
        changes[t] = change;
        flags.push(t > 0 && change > thr);
    }
    TriggerSeries { flags, thresholds, changes }
}

/// Reject series pairs whose indices differ.
pub(crate) fn require_aligned(
    returns: &ReturnSeries, volatilities: &VolatilitySeries,
) -> EffectResult<()> {
    ensure_aligned(returns.index(), volatilities.index()).map_err(EffectError::from)
}
