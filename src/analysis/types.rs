//! Request and report types for the analysis engine.
//!
//! Reports flatten the detector result into the top level and add the
//! metadata block (`dataset`, dates, `data_points`, `parameters`), so the
//! JSON a caller sees is one flat record per analysis.
use crate::{
    effects::{CalibrationOutcome, HeatWaveResult, MeteorShowerResult, RollingCorrelation},
    errors::AnalysisError,
    series::{ReturnSeries, VolatilitySeries},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, str::FromStr};

/// Per-request options. `lambda` overrides the engine default for this
/// request only. Pair analyses add a rolling correlation when `rolling` is
/// set or a `window` is given; without a `window` the configured default
/// window applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub lambda: Option<f64>,
    pub window: Option<usize>,
    #[serde(default)]
    pub rolling: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    HeatWave,
    MeteorShower,
    Both,
}

impl BatchMode {
    pub fn runs_heat_wave(self) -> bool {
        matches!(self, BatchMode::HeatWave | BatchMode::Both)
    }

    pub fn runs_meteor_shower(self) -> bool {
        matches!(self, BatchMode::MeteorShower | BatchMode::Both)
    }
}

impl FromStr for BatchMode {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "heat_wave" => Ok(BatchMode::HeatWave),
            "meteor_shower" => Ok(BatchMode::MeteorShower),
            "both" => Ok(BatchMode::Both),
            _ => Err(AnalysisError::InvalidParameter {
                name: "analysis_type".to_string(),
                reason: format!("'{s}' is not one of heat_wave, meteor_shower, both"),
            }),
        }
    }
}

/// Returns and their estimated volatilities on one index.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeries {
    pub returns: ReturnSeries,
    pub volatilities: VolatilitySeries,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParametersUsed {
    pub lambda: f64,
    pub min_effect_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleAssetAnalysis {
    #[serde(flatten)]
    pub result: HeatWaveResult,
    pub dataset: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub data_points: usize,
    pub parameters: ParametersUsed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairDatasets {
    pub asset1: String,
    pub asset2: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairAnalysis {
    #[serde(flatten)]
    pub result: MeteorShowerResult,
    pub datasets: PairDatasets,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub data_points: usize,
    pub parameters: ParametersUsed,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rolling_correlation: Option<RollingCorrelation>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DatePeriod {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_assets: usize,
    pub time_period: DatePeriod,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub heat_wave: BTreeMap<String, SingleAssetAnalysis>,
    pub meteor_shower: BTreeMap<String, PairAnalysis>,
    pub summary: BatchSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationReport {
    #[serde(flatten)]
    pub outcome: CalibrationOutcome,
    pub dataset: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub data_points: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Mode names parse case-insensitively with `-` or `_`.
    fn batch_mode_parses() {
        assert_eq!("heat_wave".parse::<BatchMode>(), Ok(BatchMode::HeatWave));
        assert_eq!("Meteor-Shower".parse::<BatchMode>(), Ok(BatchMode::MeteorShower));
        assert_eq!("BOTH".parse::<BatchMode>(), Ok(BatchMode::Both));
        assert!("all".parse::<BatchMode>().is_err());
        assert!(BatchMode::Both.runs_heat_wave() && BatchMode::Both.runs_meteor_shower());
        assert!(!BatchMode::HeatWave.runs_meteor_shower());
    }
}
