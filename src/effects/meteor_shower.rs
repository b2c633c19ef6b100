//! Meteor-shower detector: simultaneous same-sign large moves in two assets.
//!
//! Both series must already share one index. Each asset gets its own
//! trigger series; a period counts toward `total_triggers` only when *both*
//! trigger, and is an effect day when additionally `r1_t · r2_t > 0`.
use crate::{
    effects::{
        errors::EffectResult,
        lead_lag::{LeadLag, lead_lag_values},
        params::ThresholdParams,
        stats::{correlation_p_value, effect_ratio, mean, pearson},
        threshold::{evaluate, require_aligned},
    },
    series::{ReturnSeries, VolatilitySeries, ensure_aligned},
    volatility::VolatilityEstimator,
};
use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeteorShowerResult {
    pub effect_days: usize,
    pub total_triggers: usize,
    pub effect_ratio: f64,
    pub mean_threshold1: f64,
    pub mean_threshold2: f64,
    pub correlation: Option<f64>,
    pub correlation_p_value: Option<f64>,
    pub lead_lag: LeadLag,
}

/// Detect the meteor-shower effect between `r1` and `r2`.
///
/// Missing volatilities are estimated independently per asset.
///
/// # Errors
/// - [`EffectError::Alignment`](crate::effects::EffectError::Alignment) when
///   the returns, or a supplied volatility series, differ in index.
/// - [`EffectError::Estimation`](crate::effects::EffectError::Estimation)
///   when an estimate fails.
pub fn detect_meteor_shower<E: VolatilityEstimator + ?Sized>(
    r1: &ReturnSeries, r2: &ReturnSeries, v1: Option<&VolatilitySeries>,
    v2: Option<&VolatilitySeries>, params: ThresholdParams, max_lag: usize, estimator: &E,
) -> EffectResult<MeteorShowerResult> {
    ensure_aligned(r1.index(), r2.index())?;
    let v1 = match v1 {
        Some(v) => Cow::Borrowed(v),
        None => Cow::Owned(estimator.estimate(r1)?),
    };
    let v2 = match v2 {
        Some(v) => Cow::Borrowed(v),
        None => Cow::Owned(estimator.estimate(r2)?),
    };
    meteor_shower_with_volatility(r1, r2, &v1, &v2, params, max_lag)
}

/// [`detect_meteor_shower`] with both volatility series in hand.
///
/// # Errors
/// [`EffectError::Alignment`](crate::effects::EffectError::Alignment) on any
/// index mismatch.
pub fn meteor_shower_with_volatility(
    r1: &ReturnSeries, r2: &ReturnSeries, v1: &VolatilitySeries, v2: &VolatilitySeries,
    params: ThresholdParams, max_lag: usize,
) -> EffectResult<MeteorShowerResult> {
    ensure_aligned(r1.index(), r2.index())?;
    require_aligned(r1, v1)?;
    require_aligned(r2, v2)?;

    let t1 = evaluate(r1.values(), &r1.price_path().previous(), v1.values(), &params);
    let t2 = evaluate(r2.values(), &r2.price_path().previous(), v2.values(), &params);

    let (a, b) = (r1.values(), r2.values());
    let (mut total_triggers, mut effect_days) = (0, 0);
    for t in 0..a.len() {
        if t1.flags[t] && t2.flags[t] {
            total_triggers += 1;
            if a[t] * b[t] > 0.0 {
                effect_days += 1;
            }
        }
    }

    let a = a.to_vec();
    let b = b.to_vec();
    let correlation = pearson(&a, &b);
    Ok(MeteorShowerResult {
        effect_days,
        total_triggers,
        effect_ratio: effect_ratio(effect_days, total_triggers),
        mean_threshold1: mean(&t1.thresholds.to_vec()),
        mean_threshold2: mean(&t2.thresholds.to_vec()),
        correlation,
        correlation_p_value: correlation.and_then(|r| correlation_p_value(r, a.len())),
        lead_lag: lead_lag_values(&a, &b, max_lag),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        effects::{EffectError, lead_lag::DEFAULT_MAX_LAG, test_support::FixedVolatility},
        series::test_support::daily_index,
    };
    use approx::assert_relative_eq;
    use ndarray::Array1;

    fn series(values: &[f64]) -> ReturnSeries {
        ReturnSeries::new(daily_index(values.len()), Array1::from(values.to_vec())).expect("ok")
    }

    #[test]
    // Purpose
    // -------
    // Total triggers are the AND of the two trigger series, not the union.
    //
    // Given
    // -----
    // - A has a single large move on day 3, B a single large move on day 5.
    //
    // Expect
    // ------
    // - total_triggers = 0, effect_days = 0, ratio = 0.
    fn triggers_on_different_days_do_not_count() {
        // Arrange
        let mut a = vec![0.0001; 8];
        let mut b = vec![0.0001; 8];
        a[3] = 0.08;
        b[5] = 0.08;

        // Act
        let out = detect_meteor_shower(
            &series(&a),
            &series(&b),
            None,
            None,
            ThresholdParams::default(),
            DEFAULT_MAX_LAG,
            &FixedVolatility(0.01),
        )
        .expect("detects");

        // Assert
        assert_eq!(out.total_triggers, 0);
        assert_eq!(out.effect_days, 0);
        assert_eq!(out.effect_ratio, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Co-triggers count toward the total; only same-sign ones are effects.
    //
    // Given
    // -----
    // - Both assets move 5% on days 2 and 4; on day 4 B moves down.
    //
    // Expect
    // ------
    // - total_triggers = 2, effect_days = 1, ratio = 0.5.
    fn same_sign_filter_applies_to_co_triggers() {
        let mut a = vec![0.0001; 8];
        let mut b = vec![0.0001; 8];
        a[2] = 0.05;
        b[2] = 0.05;
        a[4] = 0.05;
        b[4] = -0.05;
        let vols = VolatilitySeries::constant(daily_index(8), 0.01).expect("ok");

        let out = meteor_shower_with_volatility(
            &series(&a),
            &series(&b),
            &vols,
            &vols,
            ThresholdParams::default(),
            DEFAULT_MAX_LAG,
        )
        .expect("detects");

        assert_eq!(out.total_triggers, 2);
        assert_eq!(out.effect_days, 1);
        assert_relative_eq!(out.effect_ratio, 0.5, epsilon = 1e-12);
        assert!(out.correlation.is_some());
        assert_relative_eq!(
            out.lead_lag[&0].expect("defined"),
            out.correlation.expect("defined"),
            epsilon = 1e-12
        );
    }

    #[test]
    // Purpose
    // -------
    // A joint large move on the first period is not a co-trigger.
    //
    // Given
    // -----
    // - Both assets move 8% on day 0 and barely afterwards; σ = 0.01, λ = 2.
    //
    // Expect
    // ------
    // - total_triggers = 0, effect_days = 0.
    fn first_period_is_not_a_co_trigger() {
        let mut a = vec![0.0001; 6];
        a[0] = 0.08;
        let b = a.clone();
        let vols = VolatilitySeries::constant(daily_index(6), 0.01).expect("ok");

        let out = meteor_shower_with_volatility(
            &series(&a),
            &series(&b),
            &vols,
            &vols,
            ThresholdParams::default(),
            DEFAULT_MAX_LAG,
        )
        .expect("detects");

        assert_eq!(out.total_triggers, 0);
        assert_eq!(out.effect_days, 0);
    }

    #[test]
    // Purpose
    // -------
    // Return series on different indices are rejected before any estimate.
    fn misaligned_returns_are_rejected() {
        let a = series(&[0.01, 0.02, 0.03]);
        let b = series(&[0.01, 0.02]);
        let err = detect_meteor_shower(
            &a,
            &b,
            None,
            None,
            ThresholdParams::default(),
            DEFAULT_MAX_LAG,
            &FixedVolatility(0.01),
        )
        .expect_err("misaligned");
        assert!(matches!(err, EffectError::Alignment { .. }));
    }
}
