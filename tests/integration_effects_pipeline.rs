//! Integration tests for the CSV → GARCH → effect-detection pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path a CLI run takes: a data directory of CSV
//!   files, an engine built from configuration, a real GARCH(1,1) fit per
//!   dataset and the heat-wave / meteor-shower reports on top.
//! - Use simulated GARCH prices so the fitted volatilities are realistic
//!   rather than constant.
//!
//! Coverage
//! --------
//! - `analysis::AnalysisEngine`: `from_config`, `analyze_single`,
//!   `analyze_pair` (with rolling correlation), `analyze_batch`,
//!   `calibrate`, `dataset_summary`.
//! - `data::DataService` directory scanning.
//! - JSON serialization of reports and `report::to_flat_map`.
//!
//! Exclusions
//! ----------
//! - Numerical details of thresholds, clusters and lead-lag maps are pinned
//!   by unit tests next to the code.
use chrono::NaiveDate;
use market_effects::{
    AnalysisConfig, AnalysisEngine, AnalysisError, AnalysisParams, BatchMode,
    data::DataService, report::to_flat_map, volatility::GarchEstimator,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;
use std::{fmt::Write as _, path::Path};
use tempfile::TempDir;

/// Purpose
/// -------
/// Simulate `n` GARCH(1,1) returns with ω = 1e-5, α = 0.1, β = 0.85.
///
/// Returns
/// -------
/// - Returns with unconditional volatility near 1.4% per period.
fn garch_returns(n: usize, rng: &mut StdRng) -> Vec<f64> {
    let (omega, alpha, beta): (f64, f64, f64) = (1e-5, 0.1, 0.85);
    let mut var: f64 = omega / (1.0 - alpha - beta);
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let z: f64 = rng.sample(StandardNormal);
        let r = var.sqrt() * z;
        out.push(r);
        var = omega + alpha * r * r + beta * var;
    }
    out
}

/// Write a CSV of closes compounded from `returns`, one row per calendar
/// day starting 2023-01-01.
fn write_prices(dir: &Path, symbol: &str, returns: &[f64]) {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date");
    let mut body = String::from("timestamp,open,high,low,close,volume\n");
    let mut close = 100.0_f64;
    for (i, r) in std::iter::once(&0.0).chain(returns.iter()).enumerate() {
        close *= 1.0 + r;
        let day = start + chrono::Duration::days(i as i64);
        writeln!(body, "{day},{close},{},{},{close},1000", close * 1.01, close * 0.99)
            .expect("format row");
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), body).expect("write csv");
}

/// Purpose
/// -------
/// Three datasets of 400 returns: `AAA` and `BBB` share a common shock
/// (correlated), `CCC` is independent.
fn fixture() -> (TempDir, AnalysisEngine<DataService, GarchEstimator>) {
    let dir = TempDir::new().expect("tempdir");
    let mut rng = StdRng::seed_from_u64(7);
    let a = garch_returns(400, &mut rng);
    let noise = garch_returns(400, &mut rng);
    let b: Vec<f64> = a.iter().zip(noise.iter()).map(|(x, e)| 0.7 * x + 0.5 * e).collect();
    let c = garch_returns(400, &mut rng);
    write_prices(dir.path(), "AAA", &a);
    write_prices(dir.path(), "BBB", &b);
    write_prices(dir.path(), "CCC", &c);

    let mut config = AnalysisConfig::default();
    config.data.directory = dir.path().display().to_string();
    let engine = AnalysisEngine::from_config(config).expect("engine");
    (dir, engine)
}

#[test]
// Purpose
// -------
// A single-asset run over a full dataset produces a consistent report.
//
// Given
// -----
// - 401 closes of simulated GARCH prices, default λ = 2.
//
// Expect
// ------
// - 400 data points, effect_days ≤ total_triggers, ratio in [0, 1].
// - Metadata carries the dataset id and the default parameters.
// - The JSON record is flat at the top level.
fn heat_wave_end_to_end() {
    // Arrange
    let (_dir, engine) = fixture();

    // Act
    let report = engine.analyze_single("AAA", &AnalysisParams::default()).expect("analysis");

    // Assert
    assert_eq!(report.data_points, 400);
    assert_eq!(report.dataset, "AAA");
    assert!(report.result.effect_days <= report.result.total_triggers);
    assert!((0.0..=1.0).contains(&report.result.effect_ratio));
    assert!(report.result.mean_threshold > 0.0);
    assert_eq!(report.parameters.lambda, 2.0);
    assert_eq!(report.start_date, NaiveDate::from_ymd_opt(2023, 1, 2).expect("date"));

    let json = serde_json::to_value(&report).expect("serializes");
    assert!(json.get("effect_ratio").is_some());
    assert!(json.get("volatility_clusters").is_some());
    assert_eq!(json["parameters"]["min_effect_size"], serde_json::json!(0.02));
}

#[test]
// Purpose
// -------
// Correlated assets show a significant positive correlation; the rolling
// window and lead-lag map are present.
fn meteor_shower_end_to_end() {
    let (_dir, engine) = fixture();
    let request = AnalysisParams { window: Some(30), ..AnalysisParams::default() };

    let report = engine.analyze_pair("AAA", "BBB", &request).expect("pair");

    let corr = report.result.correlation.expect("defined correlation");
    assert!(corr > 0.5, "correlation {corr}");
    assert!(report.result.correlation_p_value.expect("defined p-value") < 0.01);
    assert_eq!(report.result.lead_lag.len(), 11);
    assert!(report.result.effect_days <= report.result.total_triggers);
    let rolling = report.rolling_correlation.as_ref().expect("window requested");
    assert_eq!(rolling.values.len(), 400 - 30 + 1);

    let flat = to_flat_map(&report).expect("flattens");
    assert!(flat.contains_key("datasets.asset1"));
    assert!(flat.contains_key("lead_lag.0"));
}

#[test]
// Purpose
// -------
// Batch `both` covers every asset and every unordered pair; date filters
// and λ overrides flow through.
fn batch_and_filters() {
    let (_dir, engine) = fixture();
    let ids: Vec<String> = engine.available_datasets();
    assert_eq!(ids, vec!["AAA", "BBB", "CCC"]);

    let request = AnalysisParams {
        start_date: NaiveDate::from_ymd_opt(2023, 3, 1),
        end_date: NaiveDate::from_ymd_opt(2023, 12, 31),
        lambda: Some(1.5),
        ..AnalysisParams::default()
    };
    let batch = engine.analyze_batch(&ids, BatchMode::Both, &request).expect("batch");

    assert_eq!(batch.heat_wave.len(), 3);
    assert_eq!(
        batch.meteor_shower.keys().cloned().collect::<Vec<_>>(),
        vec!["AAA_vs_BBB", "AAA_vs_CCC", "BBB_vs_CCC"]
    );
    // 2023-03-01..2023-12-31 holds 306 closes, hence 305 returns.
    assert!(batch.heat_wave.values().all(|r| r.data_points == 305));
    assert!(batch.heat_wave.values().all(|r| r.parameters.lambda == 1.5));
    assert_eq!(batch.summary.time_period.start, NaiveDate::from_ymd_opt(2023, 3, 2));
    assert_eq!(batch.summary.time_period.end, NaiveDate::from_ymd_opt(2023, 12, 31));
}

#[test]
// Purpose
// -------
// Calibration stays within the configured bounds, and error paths surface
// as typed `AnalysisError`s.
fn calibration_and_errors() {
    let (_dir, engine) = fixture();

    let report = engine.calibrate("CCC", Some(0.3), &AnalysisParams::default()).expect("calibrates");
    assert!((1.0..=3.0).contains(&report.outcome.lambda));
    assert!((0.0..=1.0).contains(&report.outcome.effect_ratio));
    assert_eq!(report.dataset, "CCC");

    let summary = engine.dataset_summary("AAA").expect("summary");
    assert_eq!(summary.total_rows, 401);

    assert!(matches!(
        engine.analyze_single("XYZ", &AnalysisParams::default()),
        Err(AnalysisError::DataNotFound { .. })
    ));
    let too_short = AnalysisParams {
        start_date: NaiveDate::from_ymd_opt(2023, 1, 1),
        end_date: NaiveDate::from_ymd_opt(2023, 1, 10),
        ..AnalysisParams::default()
    };
    assert!(matches!(
        engine.analyze_single("AAA", &too_short),
        Err(AnalysisError::Estimation(_))
    ));
}
