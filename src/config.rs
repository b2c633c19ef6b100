//! config — analysis configuration loaded from JSON with environment
//! overrides.
//!
//! Purpose
//! -------
//! Collect every tunable of the analysis in one serde document: correlation
//! window bounds, threshold sensitivity, GARCH and calibrator budgets and the
//! data directory. Every field has a default, so a partial (or empty) file
//! is valid.
//!
//! Key behaviors
//! -------------
//! - [`AnalysisConfig::load`] reads JSON; missing fields take defaults.
//! - [`AnalysisConfig::apply_env_overrides`] honours `DEFAULT_WINDOW_SIZE`,
//!   `DATA_DIR` and `DEFAULT_LAMBDA`.
//! - [`AnalysisConfig::validate`] enforces
//!   `min_window ≤ default_window ≤ max_window` and
//!   `lambda_lower ≤ default_lambda ≤ lambda_upper`.
//! - `correlation.default_window_size` is the rolling-correlation window a
//!   pair analysis uses when one is requested without a size.
//! - Accessors convert sections into the option types the engine consumes.
//!
//! Downstream usage
//! ----------------
//! - The CLI loads a file (or defaults), applies overrides, validates, and
//!   hands the result to `AnalysisEngine::new`.
use crate::{
    effects::{CalibrationOptions, ClusterOptions, LambdaBounds, ThresholdParams, WindowBounds},
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    volatility::{GarchOptions, estimator::DEFAULT_MIN_OBSERVATIONS},
};
use serde::{Deserialize, Serialize};
use std::{path::Path, str::FromStr, time::Duration};
use tracing::info;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Io { path: String, reason: String },
    Parse { path: String, reason: String },
    InvalidEnv { var: &'static str, value: String },
    Invalid { field: &'static str, reason: String },
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, reason } => write!(f, "Cannot read config {path}: {reason}"),
            ConfigError::Parse { path, reason } => write!(f, "Invalid config {path}: {reason}"),
            ConfigError::InvalidEnv { var, value } => {
                write!(f, "Environment variable {var} has invalid value '{value}'")
            }
            ConfigError::Invalid { field, reason } => write!(f, "Invalid configuration ({field}): {reason}"),
        }
    }
}

fn default_min_window() -> usize {
    5
}

fn default_max_window() -> usize {
    500
}

fn default_window() -> usize {
    30
}

fn default_lambda() -> f64 {
    crate::effects::params::DEFAULT_LAMBDA
}

fn default_lambda_lower() -> f64 {
    crate::effects::params::DEFAULT_LAMBDA_LOWER
}

fn default_lambda_upper() -> f64 {
    crate::effects::params::DEFAULT_LAMBDA_UPPER
}

fn default_min_effect_size() -> f64 {
    crate::effects::params::DEFAULT_MIN_EFFECT_SIZE
}

fn default_cluster_k() -> f64 {
    crate::effects::clusters::DEFAULT_CLUSTER_K
}

fn default_max_lag() -> usize {
    crate::effects::DEFAULT_MAX_LAG
}

fn default_min_observations() -> usize {
    DEFAULT_MIN_OBSERVATIONS
}

fn default_tol_grad() -> f64 {
    1e-6
}

fn default_max_iter() -> usize {
    300
}

fn default_line_search() -> String {
    "MoreThuente".to_string()
}

fn default_target_ratio() -> f64 {
    crate::effects::DEFAULT_TARGET_RATIO
}

fn default_calibration_tol() -> f64 {
    crate::effects::calibration::DEFAULT_CALIBRATION_TOL
}

fn default_calibration_max_iter() -> u64 {
    crate::effects::calibration::DEFAULT_CALIBRATION_MAX_ITER
}

fn default_data_dir() -> String {
    "data".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    #[serde(default = "default_min_window")]
    pub min_window_size: usize,
    #[serde(default = "default_max_window")]
    pub max_window_size: usize,
    /// Rolling-correlation window when a request names none.
    #[serde(default = "default_window")]
    pub default_window_size: usize,
    #[serde(default = "default_max_lag")]
    pub max_lag: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            min_window_size: default_min_window(),
            max_window_size: default_max_window(),
            default_window_size: default_window(),
            max_lag: default_max_lag(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_lambda")]
    pub default_lambda: f64,
    #[serde(default = "default_lambda_lower")]
    pub lambda_lower: f64,
    #[serde(default = "default_lambda_upper")]
    pub lambda_upper: f64,
    #[serde(default = "default_min_effect_size")]
    pub min_effect_size: f64,
    #[serde(default = "default_cluster_k")]
    pub cluster_k: f64,
    /// Report a volatility cluster still open at the last period.
    #[serde(default)]
    pub close_open_clusters: bool,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            default_lambda: default_lambda(),
            lambda_lower: default_lambda_lower(),
            lambda_upper: default_lambda_upper(),
            min_effect_size: default_min_effect_size(),
            cluster_k: default_cluster_k(),
            close_open_clusters: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationConfig {
    #[serde(default = "default_min_observations")]
    pub min_observations: usize,
    #[serde(default = "default_tol_grad")]
    pub tol_grad: f64,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_line_search")]
    pub line_search: String,
    #[serde(default)]
    pub lbfgs_mem: Option<usize>,
    /// Per-attempt wall-clock deadline for the MLE.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            min_observations: default_min_observations(),
            tol_grad: default_tol_grad(),
            max_iter: default_max_iter(),
            line_search: default_line_search(),
            lbfgs_mem: None,
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    #[serde(default = "default_target_ratio")]
    pub target_ratio: f64,
    #[serde(default = "default_calibration_tol")]
    pub tolerance: f64,
    #[serde(default = "default_calibration_max_iter")]
    pub max_iter: u64,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            target_ratio: default_target_ratio(),
            tolerance: default_calibration_tol(),
            max_iter: default_calibration_max_iter(),
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub directory: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { directory: default_data_dir() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub correlation: CorrelationConfig,
    #[serde(default)]
    pub threshold: ThresholdConfig,
    #[serde(default)]
    pub estimation: EstimationConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub data: DataConfig,
}

impl AnalysisConfig {
    /// Read a JSON config file.
    ///
    /// # Errors
    /// [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let shown = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io { path: shown.clone(), reason: e.to_string() })?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| ConfigError::Parse { path: shown.clone(), reason: e.to_string() })?;
        info!(path = %shown, "loaded analysis config");
        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    /// [`ConfigError::InvalidEnv`] for a value that does not parse.
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// # Errors
    /// As [`AnalysisConfig::apply_env_overrides`].
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DEFAULT_WINDOW_SIZE") {
            self.correlation.default_window_size = parse_env("DEFAULT_WINDOW_SIZE", &v)?;
        }
        if let Some(v) = lookup("DEFAULT_LAMBDA") {
            self.threshold.default_lambda = parse_env("DEFAULT_LAMBDA", &v)?;
        }
        if let Some(v) = lookup("DATA_DIR") {
            self.data.directory = v;
        }
        Ok(())
    }

    /// # Errors
    /// [`ConfigError::Invalid`] naming the first violated constraint.
    pub fn validate(&self) -> ConfigResult<()> {
        let c = &self.correlation;
        if !(c.min_window_size <= c.default_window_size && c.default_window_size <= c.max_window_size)
        {
            return Err(ConfigError::Invalid {
                field: "correlation.default_window_size",
                reason: format!(
                    "{} must lie in [{}, {}]",
                    c.default_window_size, c.min_window_size, c.max_window_size
                ),
            });
        }
        let t = &self.threshold;
        if !(t.lambda_lower > 0.0 && t.lambda_lower < t.lambda_upper) {
            return Err(ConfigError::Invalid {
                field: "threshold.lambda_lower",
                reason: format!("need 0 < {} < {}", t.lambda_lower, t.lambda_upper),
            });
        }
        if !(t.lambda_lower <= t.default_lambda && t.default_lambda <= t.lambda_upper) {
            return Err(ConfigError::Invalid {
                field: "threshold.default_lambda",
                reason: format!(
                    "{} must lie in [{}, {}]",
                    t.default_lambda, t.lambda_lower, t.lambda_upper
                ),
            });
        }
        if !(0.0..=1.0).contains(&t.min_effect_size) {
            return Err(ConfigError::Invalid {
                field: "threshold.min_effect_size",
                reason: format!("{} must lie in [0, 1]", t.min_effect_size),
            });
        }
        if !(0.0..=1.0).contains(&self.calibration.target_ratio) {
            return Err(ConfigError::Invalid {
                field: "calibration.target_ratio",
                reason: format!("{} must lie in [0, 1]", self.calibration.target_ratio),
            });
        }
        self.garch_options().map(|_| ())
    }

    pub fn threshold_params(&self) -> ThresholdParams {
        ThresholdParams {
            lambda: self.threshold.default_lambda,
            min_effect_size: self.threshold.min_effect_size,
        }
    }

    pub fn lambda_bounds(&self) -> LambdaBounds {
        LambdaBounds { lower: self.threshold.lambda_lower, upper: self.threshold.lambda_upper }
    }

    pub fn window_bounds(&self) -> WindowBounds {
        WindowBounds { min: self.correlation.min_window_size, max: self.correlation.max_window_size }
    }

    pub fn cluster_options(&self) -> ClusterOptions {
        ClusterOptions {
            k: self.threshold.cluster_k,
            close_open_at_end: self.threshold.close_open_clusters,
        }
    }

    pub fn calibration_options(&self) -> CalibrationOptions {
        CalibrationOptions {
            initial_lambda: self.threshold.default_lambda,
            bounds: self.lambda_bounds(),
            tolerance: self.calibration.tolerance,
            max_iter: self.calibration.max_iter,
            timeout_ms: self.calibration.timeout_ms,
        }
    }

    /// # Errors
    /// [`ConfigError::Invalid`] for an unknown line search or invalid
    /// optimizer tolerances.
    pub fn garch_options(&self) -> ConfigResult<GarchOptions> {
        let e = &self.estimation;
        let invalid = |err: crate::optimization::OptError| ConfigError::Invalid {
            field: "estimation",
            reason: err.to_string(),
        };
        let line_searcher = LineSearcher::from_str(&e.line_search).map_err(invalid)?;
        let tols = Tolerances::new(Some(e.tol_grad), None, Some(e.max_iter)).map_err(invalid)?;
        let mle = MLEOptions::new(tols, line_searcher, e.lbfgs_mem)
            .map_err(invalid)?
            .with_timeout(e.timeout_ms.map(Duration::from_millis));
        Ok(GarchOptions { min_observations: e.min_observations, mle, ..GarchOptions::default() })
    }
}

fn parse_env<T: FromStr>(var: &'static str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv { var, value: value.to_string() })
}
