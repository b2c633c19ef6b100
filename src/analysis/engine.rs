//! The analysis engine: datasets in, effect reports out.
//!
//! [`AnalysisEngine`] owns a [`DatasetAccess`], a [`VolatilityEstimator`],
//! the [`AnalysisConfig`] and the default [`ThresholdParams`]. Requests never
//! mutate engine state: a λ override is validated and applied to a copy of
//! the defaults for that request only, which is what lets batch analyses run
//! on rayon workers against a shared `&self`.
use crate::{
    analysis::types::{
        AnalysisParams, BatchMode, BatchResult, BatchSummary, CalibrationReport, DatePeriod,
        PairAnalysis, PairDatasets, ParametersUsed, PreparedSeries, SingleAssetAnalysis,
    },
    config::AnalysisConfig,
    data::{DataService, DatasetAccess, DatasetSummary, clean_rows},
    effects::{
        ThresholdParams, calibrate_lambda, heat_wave_with_volatility,
        meteor_shower_with_volatility, rolling_correlation,
    },
    errors::{AnalysisError, AnalysisResult},
    series::{ReturnSeries, common_positions},
    volatility::{GarchEstimator, VolatilityEstimator},
};
use chrono::{NaiveDate, NaiveDateTime};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub struct AnalysisEngine<D, E> {
    data: D,
    estimator: E,
    config: AnalysisConfig,
    params: ThresholdParams,
}

impl AnalysisEngine<DataService, GarchEstimator> {
    /// Engine over the configured data directory with a GARCH(1,1)
    /// estimator.
    ///
    /// # Errors
    /// Configuration validation failures and data-directory I/O errors.
    pub fn from_config(config: AnalysisConfig) -> AnalysisResult<Self> {
        config.validate()?;
        let data = DataService::new(&config.data.directory)?;
        let estimator = GarchEstimator::new(config.garch_options()?);
        Ok(Self::new(data, estimator, config))
    }
}

impl<D: DatasetAccess, E: VolatilityEstimator> AnalysisEngine<D, E> {
    pub fn new(data: D, estimator: E, config: AnalysisConfig) -> Self {
        let params = config.threshold_params();
        Self { data, estimator, config, params }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn default_params(&self) -> ThresholdParams {
        self.params
    }

    pub fn available_datasets(&self) -> Vec<String> {
        self.data.available_datasets()
    }

    /// # Errors
    /// [`AnalysisError::DataNotFound`] or a loading error.
    pub fn dataset_summary(&self, id: &str) -> AnalysisResult<DatasetSummary> {
        Ok(self.data.dataset_summary(id)?)
    }

    /// Load `id`, restrict it to `[start, end]` by calendar date, and derive
    /// returns and volatilities.
    ///
    /// # Errors
    /// - [`AnalysisError::DataNotFound`] for an unknown id.
    /// - [`AnalysisError::InvalidParameter`] when `start > end`.
    /// - [`AnalysisError::DateRange`] with fewer than two closes in range.
    /// - [`AnalysisError::InvalidSeries`] for a non-positive close.
    /// - [`AnalysisError::Estimation`] when the estimator fails.
    pub fn prepare(
        &self, id: &str, start: Option<NaiveDate>, end: Option<NaiveDate>,
    ) -> AnalysisResult<PreparedSeries> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AnalysisError::InvalidParameter {
                    name: "start_date".to_string(),
                    reason: format!("{s} is after end_date {e}"),
                });
            }
        }
        let rows = clean_rows(self.data.read_dataset(id)?);
        let in_range = |ts: &NaiveDateTime| {
            let day = ts.date();
            start.map_or(true, |s| day >= s) && end.map_or(true, |e| day <= e)
        };
        let (index, closes): (Vec<NaiveDateTime>, Vec<f64>) = rows
            .iter()
            .filter(|r| in_range(&r.timestamp))
            .map(|r| (r.timestamp, r.close))
            .unzip();
        if closes.len() < 2 {
            return Err(AnalysisError::DateRange {
                id: id.to_string(),
                reason: format!("{} closing prices, need at least 2", closes.len()),
            });
        }
        let returns = ReturnSeries::from_closes(&index, &closes)
            .map_err(|e| AnalysisError::from_series(id, e))?;
        debug!(dataset = id, points = returns.len(), "estimating volatility");
        let volatilities = self.estimator.estimate(&returns)?;
        Ok(PreparedSeries { returns, volatilities })
    }

    /// Heat-wave analysis of one dataset.
    ///
    /// # Errors
    /// As [`AnalysisEngine::prepare`], plus
    /// [`AnalysisError::InvalidParameter`] for a λ outside the configured
    /// bounds.
    pub fn analyze_single(
        &self, id: &str, request: &AnalysisParams,
    ) -> AnalysisResult<SingleAssetAnalysis> {
        let params = self.resolve_params(request)?;
        let prepared = self.prepare(id, request.start_date, request.end_date)?;
        self.single_from_prepared(id, &prepared, params)
    }

    /// Meteor-shower analysis of two datasets on their shared timestamps.
    ///
    /// # Errors
    /// As [`AnalysisEngine::analyze_single`], plus
    /// [`AnalysisError::DateRange`] when the datasets share no timestamps and
    /// [`AnalysisError::InvalidParameter`] for a window outside the
    /// configured bounds.
    pub fn analyze_pair(
        &self, id1: &str, id2: &str, request: &AnalysisParams,
    ) -> AnalysisResult<PairAnalysis> {
        let params = self.resolve_params(request)?;
        let p1 = self.prepare(id1, request.start_date, request.end_date)?;
        let p2 = self.prepare(id2, request.start_date, request.end_date)?;
        self.pair_from_prepared((id1, &p1), (id2, &p2), params, self.rolling_window(request))
    }

    /// Run `mode` over `ids`.
    ///
    /// Every dataset is prepared once, in parallel; single and pair
    /// analyses then run in parallel on the prepared series. Pairs are the
    /// unordered combinations in input order, keyed `"{a}_vs_{b}"`. The
    /// first failure aborts the batch.
    ///
    /// # Errors
    /// Any error of the underlying analyses.
    pub fn analyze_batch(
        &self, ids: &[String], mode: BatchMode, request: &AnalysisParams,
    ) -> AnalysisResult<BatchResult> {
        let params = self.resolve_params(request)?;
        let window = self.rolling_window(request);
        let mut unique: Vec<&str> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id.as_str()) {
                unique.push(id);
            }
        }
        info!(assets = unique.len(), ?mode, lambda = params.lambda, "batch analysis");

        let prepared: BTreeMap<String, PreparedSeries> = unique
            .par_iter()
            .map(|&id| -> AnalysisResult<(String, PreparedSeries)> {
                Ok((id.to_string(), self.prepare(id, request.start_date, request.end_date)?))
            })
            .collect::<AnalysisResult<_>>()?;
        let lookup = |id: &str| {
            prepared.get(id).ok_or_else(|| AnalysisError::DataNotFound { id: id.to_string() })
        };

        let heat_wave: BTreeMap<String, SingleAssetAnalysis> = if mode.runs_heat_wave() {
            unique
                .par_iter()
                .map(|&id| -> AnalysisResult<(String, SingleAssetAnalysis)> {
                    Ok((id.to_string(), self.single_from_prepared(id, lookup(id)?, params)?))
                })
                .collect::<AnalysisResult<_>>()?
        } else {
            BTreeMap::new()
        };

        let meteor_shower: BTreeMap<String, PairAnalysis> = if mode.runs_meteor_shower() {
            let pairs: Vec<(&str, &str)> = unique
                .iter()
                .enumerate()
                .flat_map(|(i, &a)| unique[i + 1..].iter().map(move |&b| (a, b)))
                .collect();
            pairs
                .par_iter()
                .map(|&(a, b)| -> AnalysisResult<(String, PairAnalysis)> {
                    let report = self.pair_from_prepared(
                        (a, lookup(a)?),
                        (b, lookup(b)?),
                        params,
                        window,
                    )?;
                    Ok((format!("{a}_vs_{b}"), report))
                })
                .collect::<AnalysisResult<_>>()?
        } else {
            BTreeMap::new()
        };

        let time_period = DatePeriod {
            start: heat_wave.values().map(|r| r.start_date).min(),
            end: heat_wave.values().map(|r| r.end_date).max(),
        };
        Ok(BatchResult {
            heat_wave,
            meteor_shower,
            summary: BatchSummary { total_assets: ids.len(), time_period },
        })
    }

    /// Calibrate λ on one dataset toward `target` (configured default when
    /// `None`).
    ///
    /// # Errors
    /// As [`AnalysisEngine::prepare`], plus calibration failures.
    pub fn calibrate(
        &self, id: &str, target: Option<f64>, request: &AnalysisParams,
    ) -> AnalysisResult<CalibrationReport> {
        let params = self.resolve_params(request)?;
        let prepared = self.prepare(id, request.start_date, request.end_date)?;
        let target = target.unwrap_or(self.config.calibration.target_ratio);
        let mut opts = self.config.calibration_options();
        opts.initial_lambda = params.lambda;
        let outcome =
            calibrate_lambda(&prepared.returns, &prepared.volatilities, target, params, &opts)?;
        let (start_date, end_date) = date_span(&prepared.returns)?;
        Ok(CalibrationReport {
            outcome,
            dataset: id.to_string(),
            start_date,
            end_date,
            data_points: prepared.returns.len(),
        })
    }

    fn resolve_params(&self, request: &AnalysisParams) -> AnalysisResult<ThresholdParams> {
        match request.lambda {
            Some(lambda) => {
                let lambda = self.config.lambda_bounds().check(lambda)?;
                Ok(self.params.with_lambda(lambda))
            }
            None => Ok(self.params),
        }
    }

    /// Rolling-correlation window for a pair request, if one is wanted.
    fn rolling_window(&self, request: &AnalysisParams) -> Option<usize> {
        match (request.window, request.rolling) {
            (Some(w), _) => Some(w),
            (None, true) => Some(self.config.correlation.default_window_size),
            (None, false) => None,
        }
    }

    fn single_from_prepared(
        &self, id: &str, prepared: &PreparedSeries, params: ThresholdParams,
    ) -> AnalysisResult<SingleAssetAnalysis> {
        let result = heat_wave_with_volatility(
            &prepared.returns,
            &prepared.volatilities,
            params,
            &self.config.cluster_options(),
        )?;
        let (start_date, end_date) = date_span(&prepared.returns)?;
        info!(
            dataset = id,
            effect_days = result.effect_days,
            total_triggers = result.total_triggers,
            "heat-wave analysis done"
        );
        Ok(SingleAssetAnalysis {
            result,
            dataset: id.to_string(),
            start_date,
            end_date,
            data_points: prepared.returns.len(),
            parameters: used(params),
        })
    }

    fn pair_from_prepared(
        &self, (id1, p1): (&str, &PreparedSeries), (id2, p2): (&str, &PreparedSeries),
        params: ThresholdParams, window: Option<usize>,
    ) -> AnalysisResult<PairAnalysis> {
        let (pos1, pos2) = common_positions(p1.returns.index(), p2.returns.index());
        if pos1.len() < 2 {
            return Err(AnalysisError::DateRange {
                id: format!("{id1}_vs_{id2}"),
                reason: format!("{} shared timestamps, need at least 2", pos1.len()),
            });
        }
        let r1 = p1.returns.select(&pos1);
        let r2 = p2.returns.select(&pos2);
        let v1 = p1.volatilities.select(&pos1);
        let v2 = p2.volatilities.select(&pos2);

        let result = meteor_shower_with_volatility(
            &r1,
            &r2,
            &v1,
            &v2,
            params,
            self.config.correlation.max_lag,
        )?;
        let rolling = window
            .map(|w| rolling_correlation(&r1, &r2, w, &self.config.window_bounds()))
            .transpose()?;
        let (start_date, end_date) = date_span(&r1)?;
        info!(
            asset1 = id1,
            asset2 = id2,
            shared = r1.len(),
            effect_days = result.effect_days,
            "meteor-shower analysis done"
        );
        Ok(PairAnalysis {
            result,
            datasets: PairDatasets { asset1: id1.to_string(), asset2: id2.to_string() },
            start_date,
            end_date,
            data_points: r1.len(),
            parameters: used(params),
            rolling_correlation: rolling,
        })
    }
}

fn used(params: ThresholdParams) -> ParametersUsed {
    ParametersUsed { lambda: params.lambda, min_effect_size: params.min_effect_size }
}

fn date_span(returns: &ReturnSeries) -> AnalysisResult<(NaiveDate, NaiveDate)> {
    match (returns.first_timestamp(), returns.last_timestamp()) {
        (Some(first), Some(last)) => Ok((first.date(), last.date())),
        _ => Err(AnalysisError::DateRange { id: String::new(), reason: "empty series".to_string() }),
    }
}
