//! analysis — orchestration of data loading, estimation and detection.
//!
//! Purpose
//! -------
//! Answer dataset-level questions ("is there a heat wave in BTC?", "do BTC
//! and ETH show meteor showers?") by wiring the data layer, the volatility
//! estimator and the effect detectors together and attaching metadata.
//!
//! Key behaviors
//! -------------
//! - [`AnalysisEngine::prepare`]: rows → date filter → returns → volatility.
//! - [`AnalysisEngine::analyze_single`] / [`AnalysisEngine::analyze_pair`]:
//!   one report each, pairs on the inner join of timestamps.
//! - [`AnalysisEngine::analyze_batch`]: all singles and/or all unordered
//!   pairs, in parallel with rayon.
//! - [`AnalysisEngine::calibrate`]: λ calibration on one dataset.
//!
//! Invariants & assumptions
//! ------------------------
//! - The engine is read-only after construction; every request works on its
//!   own `ThresholdParams` value.
//! - Date filters are inclusive and compare calendar dates.
//!
//! Testing notes
//! -------------
//! - Unit tests use an in-memory `DatasetAccess` and a constant-volatility
//!   estimator; the end-to-end CSV + GARCH path is covered in `tests/`.

pub mod engine;
pub mod types;

pub use self::engine::AnalysisEngine;
pub use self::types::{
    AnalysisParams, BatchMode, BatchResult, BatchSummary, CalibrationReport, DatePeriod,
    PairAnalysis, PairDatasets, ParametersUsed, PreparedSeries, SingleAssetAnalysis,
};
