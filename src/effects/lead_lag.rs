//! Lead-lag and rolling correlation between two aligned return series.
//!
//! For a lag `ℓ` the pairs are
//!
//! ```text
//! ℓ < 0 :  (r1[t], r2[t − |ℓ|])   r2 leads
//! ℓ ≥ 0 :  (r1[t − ℓ], r2[t])     r1 leads
//! ```
//!
//! Positions the shift pushes outside the series are excluded, so each lag
//! correlates `n − |ℓ|` pairs. A lag with fewer than two pairs or a zero
//! variance maps to `None`.
use crate::{
    effects::{
        errors::EffectResult,
        params::WindowBounds,
        stats::pearson,
    },
    series::{ReturnSeries, ensure_aligned},
};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_MAX_LAG: usize = 5;

/// Correlation per lag, ordered from `−max_lag` to `max_lag`.
pub type LeadLag = BTreeMap<i32, Option<f64>>;

/// # Errors
/// [`EffectError::Alignment`](crate::effects::EffectError::Alignment) when
/// the two series do not share an index.
pub fn lead_lag(r1: &ReturnSeries, r2: &ReturnSeries, max_lag: usize) -> EffectResult<LeadLag> {
    ensure_aligned(r1.index(), r2.index())?;
    let a = r1.values().to_vec();
    let b = r2.values().to_vec();
    Ok(lead_lag_values(&a, &b, max_lag))
}

pub(crate) fn lead_lag_values(a: &[f64], b: &[f64], max_lag: usize) -> LeadLag {
    let n = a.len().min(b.len());
    let max_lag = max_lag.min(i32::MAX as usize) as i32;
    (-max_lag..=max_lag)
        .map(|lag| {
            let k = lag.unsigned_abs() as usize;
            let corr = if k >= n {
                None
            } else if lag < 0 {
                pearson(&a[k..n], &b[..n - k])
            } else {
                pearson(&a[..n - k], &b[k..n])
            };
            (lag, corr)
        })
        .collect()
}

/// Trailing-window correlation; the first value sits at position
/// `window − 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingCorrelation {
    pub window: usize,
    pub index: Vec<NaiveDateTime>,
    pub values: Vec<Option<f64>>,
}

/// # Errors
/// - [`EffectError::InvalidParameter`](crate::effects::EffectError::InvalidParameter)
///   when `window` is outside `bounds`.
/// - [`EffectError::Alignment`](crate::effects::EffectError::Alignment) on
///   differing indices.
pub fn rolling_correlation(
    r1: &ReturnSeries, r2: &ReturnSeries, window: usize, bounds: &WindowBounds,
) -> EffectResult<RollingCorrelation> {
    let window = bounds.check(window)?;
    ensure_aligned(r1.index(), r2.index())?;
    let a = r1.values().to_vec();
    let b = r2.values().to_vec();
    let n = a.len();
    if window > n {
        return Ok(RollingCorrelation { window, index: Vec::new(), values: Vec::new() });
    }
    let values = (window - 1..n).map(|t| pearson(&a[t + 1 - window..=t], &b[t + 1 - window..=t]));
    Ok(RollingCorrelation {
        window,
        index: r1.index()[window - 1..].to_vec(),
        values: values.collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{effects::EffectError, series::test_support::daily_index};
    use approx::assert_relative_eq;
    use ndarray::Array1;

    fn series(values: &[f64]) -> ReturnSeries {
        ReturnSeries::new(daily_index(values.len()), Array1::from(values.to_vec())).expect("ok")
    }

    #[test]
    // Purpose
    // -------
    // Lag 0 equals the ordinary Pearson correlation and every lag in
    // `[−max_lag, max_lag]` is present.
    fn lag_zero_is_pearson() {
        // Arrange
        let a = [0.01, -0.02, 0.03, 0.005, -0.01, 0.02, -0.015, 0.0];
        let b = [0.02, -0.01, 0.01, 0.0, -0.03, 0.01, -0.005, 0.01];

        // Act
        let map = lead_lag(&series(&a), &series(&b), DEFAULT_MAX_LAG).expect("aligned");

        // Assert
        assert_eq!(map.len(), 2 * DEFAULT_MAX_LAG + 1);
        assert_eq!(map.keys().next().copied(), Some(-5));
        assert_relative_eq!(
            map[&0].expect("defined"),
            pearson(&a, &b).expect("defined"),
            epsilon = 1e-12
        );
    }

    #[test]
    // Purpose
    // -------
    // A series that copies the other one period later shows perfect
    // correlation at the matching lag.
    //
    // Given
    // -----
    // - b[t] = a[t − 1] (a leads by one).
    //
    // Expect
    // ------
    // - Correlation at lag +1 is 1.
    fn leading_series_peaks_at_its_lag() {
        let a = [0.01, -0.02, 0.03, 0.005, -0.01, 0.02, -0.015, 0.004, 0.012];
        let mut b = vec![0.0];
        b.extend_from_slice(&a[..a.len() - 1]);
        let map = lead_lag(&series(&a), &series(&b), 2).expect("aligned");
        assert_relative_eq!(map[&1].expect("defined"), 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Lags that leave fewer than two pairs are `None`.
    fn short_series_gives_none_at_wide_lags() {
        let map = lead_lag(&series(&[0.01, 0.02, -0.01]), &series(&[0.0, 0.01, 0.02]), 3)
            .expect("aligned");
        assert_eq!(map[&2], None);
        assert_eq!(map[&-3], None);
        assert!(map[&1].is_some());
    }

    #[test]
    // Purpose
    // -------
    // Rolling correlation starts at `window − 1` and validates the window.
    fn rolling_correlation_shape_and_bounds() {
        let a = [0.01, -0.02, 0.03, 0.005, -0.01, 0.02];
        let b = [0.02, -0.01, 0.01, 0.0, -0.03, 0.01];
        let bounds = WindowBounds { min: 3, max: 10 };
        let out = rolling_correlation(&series(&a), &series(&b), 4, &bounds).expect("ok");
        assert_eq!(out.values.len(), 3);
        assert_eq!(out.index[0], daily_index(6)[3]);
        assert_relative_eq!(
            out.values[0].expect("defined"),
            pearson(&a[..4], &b[..4]).expect("defined"),
            epsilon = 1e-12
        );

        let err = rolling_correlation(&series(&a), &series(&b), 2, &bounds).expect_err("small");
        assert!(matches!(err, EffectError::InvalidParameter { name: "window", .. }));
    }
}
