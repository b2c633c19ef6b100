//! effects — threshold triggers, effect detectors and λ calibration.
//!
//! Purpose
//! -------
//! Turn aligned return and volatility series into effect statistics. A
//! period *triggers* when its absolute price change exceeds a
//! volatility-scaled threshold; detectors then count the triggers that also
//! satisfy a sign condition.
//!
//! Key behaviors
//! -------------
//! - [`threshold`]: `λ · σ_t · p_{t−1}` and the strict trigger test.
//! - [`heat_wave`]: same-sign persistence within one series, plus
//!   [`clusters`] of elevated volatility.
//! - [`meteor_shower`]: co-triggers across two series with same-sign
//!   returns, Pearson correlation with a p-value and the [`lead_lag`] map.
//! - [`calibration`]: bounded search for the λ that hits a target ratio.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs must already share an index; detectors fail with
//!   [`EffectError::Alignment`] rather than re-aligning.
//! - `effect_days ≤ total_triggers` and `effect_ratio ∈ [0, 1]`; a zero
//!   trigger count yields a ratio of 0.
//! - [`ThresholdParams`] is passed by value and never mutated.
//!
//! Conventions
//! -----------
//! - Detectors that may need volatility take an `Option<&VolatilitySeries>`
//!   and a [`VolatilityEstimator`](crate::volatility::VolatilityEstimator);
//!   `*_with_volatility` variants skip estimation.
//!
//! Testing notes
//! -------------
//! - Hand-computed scenarios pin the trigger arithmetic; property checks
//!   cover ratio bounds, AND semantics, lag-0 equality and calibration
//!   recovery.

pub mod calibration;
pub mod clusters;
pub mod errors;
pub mod heat_wave;
pub mod lead_lag;
pub mod meteor_shower;
pub mod params;
pub mod stats;
pub mod threshold;

pub use self::calibration::{
    CalibrationOptions, CalibrationOutcome, DEFAULT_TARGET_RATIO, calibrate_lambda,
};
pub use self::clusters::{ClusterOptions, VolatilityCluster, volatility_clusters};
pub use self::errors::{EffectError, EffectResult};
pub use self::heat_wave::{HeatWaveResult, detect_heat_wave, heat_wave_with_volatility};
pub use self::lead_lag::{
    DEFAULT_MAX_LAG, LeadLag, RollingCorrelation, lead_lag, rolling_correlation,
};
pub use self::meteor_shower::{
    MeteorShowerResult, detect_meteor_shower, meteor_shower_with_volatility,
};
pub use self::params::{LambdaBounds, ThresholdParams, WindowBounds};
pub use self::threshold::{TriggerSeries, threshold, triggers};
