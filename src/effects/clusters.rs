//! Volatility clusters: maximal runs where `σ_t > mean(σ) + k · std(σ)`.
//!
//! A cluster opens at the first period above the cut and closes at the first
//! period back at or below it. The closing period is the cluster's `end`
//! and is not part of it: `mean_volatility` averages `σ` over
//! `[start, end)`, and `duration_days` is the calendar distance
//! `end − start`.
//!
//! A run still open at the last period is dropped unless
//! [`ClusterOptions::close_open_at_end`] is set, in which case it is closed
//! at the last timestamp (inclusive) and flagged `open_at_end`.
use crate::{
    effects::stats::{mean, sample_std},
    series::VolatilitySeries,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CLUSTER_K: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterOptions {
    pub k: f64,
    pub close_open_at_end: bool,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self { k: DEFAULT_CLUSTER_K, close_open_at_end: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityCluster {
    pub start_index: usize,
    pub end_index: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_days: i64,
    pub mean_volatility: f64,
    pub open_at_end: bool,
}

/// Scan `volatilities` for high-volatility runs.
pub fn volatility_clusters(
    volatilities: &VolatilitySeries, options: &ClusterOptions,
) -> Vec<VolatilityCluster> {
    let sigma = volatilities.values().to_vec();
    let index = volatilities.index();
    if sigma.is_empty() {
        return Vec::new();
    }
    let cut = mean(&sigma) + options.k * sample_std(&sigma);

    let mut clusters = Vec::new();
    let mut open: Option<usize> = None;
    for (t, &s) in sigma.iter().enumerate() {
        match (open, s > cut) {
            (None, true) => open = Some(t),
            (Some(start), false) => {
                clusters.push(build(index, &sigma, start, t, false));
                open = None;
            }
            _ => {}
        }
    }
    if let (Some(start), true) = (open, options.close_open_at_end) {
        clusters.push(build(index, &sigma, start, sigma.len() - 1, true));
    }
    clusters
}

fn build(
    index: &[NaiveDateTime], sigma: &[f64], start: usize, end: usize, open_at_end: bool,
) -> VolatilityCluster {
    // Closed clusters exclude the closing period; a forced close includes
    // the last period.
    let span = if open_at_end { &sigma[start..=end] } else { &sigma[start..end] };
    VolatilityCluster {
        start_index: start,
        end_index: end,
        start: index[start],
        end: index[end],
        duration_days: (index[end] - index[start]).num_days(),
        mean_volatility: mean(span),
        open_at_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::test_support::daily_index;
    use approx::assert_relative_eq;
    use ndarray::Array1;

    fn vols(values: Vec<f64>) -> VolatilitySeries {
        VolatilitySeries::new(daily_index(values.len()), Array1::from(values)).expect("valid")
    }

    #[test]
    // Purpose
    // -------
    // A single spike run becomes one cluster with `[start, end)` semantics.
    //
    // Given
    // -----
    // - 20 periods at 0.01 with periods 10..13 at 0.10; k = 2.
    //
    // Expect
    // ------
    // - One cluster from index 10 to 13, 3 days long, mean volatility 0.10.
    fn single_run_is_one_cluster() {
        // Arrange
        let mut v = vec![0.01; 20];
        for s in v.iter_mut().take(13).skip(10) {
            *s = 0.10;
        }

        // Act
        let out = volatility_clusters(&vols(v), &ClusterOptions::default());

        // Assert
        assert_eq!(out.len(), 1);
        let c = &out[0];
        assert_eq!((c.start_index, c.end_index), (10, 13));
        assert_eq!(c.duration_days, 3);
        assert_relative_eq!(c.mean_volatility, 0.10, epsilon = 1e-12);
        assert!(!c.open_at_end);
        assert!(c.start < c.end);
    }

    #[test]
    // Purpose
    // -------
    // A run open at the last period is dropped by default and closed at the
    // last timestamp when requested.
    fn open_run_at_end_is_opt_in() {
        let mut v = vec![0.01; 20];
        for s in v.iter_mut().skip(17) {
            *s = 0.10;
        }
        let series = vols(v);

        assert!(volatility_clusters(&series, &ClusterOptions::default()).is_empty());

        let opts = ClusterOptions { close_open_at_end: true, ..ClusterOptions::default() };
        let out = volatility_clusters(&series, &opts);
        assert_eq!(out.len(), 1);
        assert_eq!((out[0].start_index, out[0].end_index), (17, 19));
        assert!(out[0].open_at_end);
        assert_relative_eq!(out[0].mean_volatility, 0.10, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Flat and empty series have no clusters.
    fn flat_and_empty_have_no_clusters() {
        assert!(volatility_clusters(&vols(vec![0.02; 30]), &ClusterOptions::default()).is_empty());
        assert!(volatility_clusters(&vols(Vec::new()), &ClusterOptions::default()).is_empty());
    }
}
