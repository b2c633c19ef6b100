//! Heat-wave detector: same-sign persistence of a single series.
//!
//! A period is an *effect day* when it triggers and its return has the same
//! strict sign as the previous period's (`r_t · r_{t−1} > 0`). The first
//! period has no predecessor and is never an effect day.
//!
//! ```text
//! effect_ratio = effect_days / total_triggers   (0 when nothing triggers)
//! ```
use crate::{
    effects::{
        clusters::{ClusterOptions, VolatilityCluster, volatility_clusters},
        errors::EffectResult,
        params::ThresholdParams,
        stats::{effect_ratio, mean, sample_std},
        threshold::{TriggerSeries, evaluate, require_aligned},
    },
    series::{ReturnSeries, VolatilitySeries},
    volatility::VolatilityEstimator,
};
use ndarray::Array1;
use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatWaveResult {
    pub effect_days: usize,
    pub total_triggers: usize,
    pub effect_ratio: f64,
    pub mean_threshold: f64,
    pub threshold_std: f64,
    pub volatility_clusters: Vec<VolatilityCluster>,
}

/// Trigger and effect counts without the descriptive extras.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HeatWaveCounts {
    pub effect_days: usize,
    pub total_triggers: usize,
    pub effect_ratio: f64,
}

/// Detect the heat-wave effect on `returns`.
///
/// When `volatilities` is `None` they are estimated from `returns` with
/// `estimator`.
///
/// # Errors
/// - [`EffectError::Alignment`](crate::effects::EffectError::Alignment) when
///   supplied volatilities do not share the return index.
/// - [`EffectError::Estimation`](crate::effects::EffectError::Estimation)
///   when estimation is needed and fails.
pub fn detect_heat_wave<E: VolatilityEstimator + ?Sized>(
    returns: &ReturnSeries, volatilities: Option<&VolatilitySeries>, params: ThresholdParams,
    clusters: &ClusterOptions, estimator: &E,
) -> EffectResult<HeatWaveResult> {
    let vols = match volatilities {
        Some(v) => Cow::Borrowed(v),
        None => Cow::Owned(estimator.estimate(returns)?),
    };
    heat_wave_with_volatility(returns, &vols, params, clusters)
}

/// [`detect_heat_wave`] with volatilities already in hand.
///
/// # Errors
/// [`EffectError::Alignment`](crate::effects::EffectError::Alignment) on an
/// index mismatch.
pub fn heat_wave_with_volatility(
    returns: &ReturnSeries, volatilities: &VolatilitySeries, params: ThresholdParams,
    clusters: &ClusterOptions,
) -> EffectResult<HeatWaveResult> {
    require_aligned(returns, volatilities)?;
    let prev = returns.price_path().previous();
    let trig = evaluate(returns.values(), &prev, volatilities.values(), &params);
    let counts = count_effects(returns.values(), &trig);
    let thresholds = trig.thresholds.to_vec();

    Ok(HeatWaveResult {
        effect_days: counts.effect_days,
        total_triggers: counts.total_triggers,
        effect_ratio: counts.effect_ratio,
        mean_threshold: mean(&thresholds),
        threshold_std: sample_std(&thresholds),
        volatility_clusters: volatility_clusters(volatilities, clusters),
    })
}

/// Counts on arrays already known to be aligned; `price_prev` from
/// [`PricePath::previous`](crate::series::PricePath::previous).
pub(crate) fn heat_wave_counts(
    returns: &Array1<f64>, price_prev: &Array1<f64>, sigma: &Array1<f64>,
    params: &ThresholdParams,
) -> HeatWaveCounts {
    let trig = evaluate(returns, price_prev, sigma, params);
    count_effects(returns, &trig)
}

fn count_effects(returns: &Array1<f64>, trig: &TriggerSeries) -> HeatWaveCounts {
    let total_triggers = trig.count();
    let effect_days = (1..trig.len())
        .filter(|&t| trig.flags[t] && returns[t] * returns[t - 1] > 0.0)
        .count();
    HeatWaveCounts {
        effect_days,
        total_triggers,
        effect_ratio: effect_ratio(effect_days, total_triggers),
    }
}
