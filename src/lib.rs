//! market_effects — return-clustering effect detection on price series.
//!
//! Purpose
//! -------
//! Detect two volatility-scaled clustering effects in asset returns:
//! the single-asset *heat wave* (large moves followed by same-sign moves)
//! and the cross-asset *meteor shower* (simultaneous same-sign large moves
//! in two assets). Volatility comes from a GARCH(1,1) model fitted by
//! maximum likelihood; thresholds scale with it and with the price level.
//!
//! Key behaviors
//! -------------
//! - [`series`]: validated return, price-path and volatility containers.
//! - [`volatility`]: GARCH(1,1) estimation and Heston-style simulation.
//! - [`effects`]: thresholds, detectors, clusters, lead-lag and λ
//!   calibration.
//! - [`data`] / [`config`]: CSV datasets and JSON configuration.
//! - [`analysis`]: the engine that ties them together, including parallel
//!   batch analysis.
//! - [`optimization`]: the argmin-backed L-BFGS MLE driver and bounded
//!   scalar search used by estimation and calibration.
//!
//! Invariants & assumptions
//! ------------------------
//! - Detectors require inputs on one shared index; only the engine aligns.
//! - Parameter objects are small `Copy` values passed by value.
//!
//! Conventions
//! -----------
//! - Returns are simple fractional returns; the price path starts at 1.0.
//! - Timestamps are naive UTC `chrono::NaiveDateTime`.
//! - Each module has its own error enum; [`errors::AnalysisError`] collects
//!   them at the engine boundary.
//!
//! Downstream usage
//! ----------------
//! - Library users typically build an [`analysis::AnalysisEngine`] from an
//!   [`config::AnalysisConfig`]; the `market-effects` binary does exactly
//!   that and prints JSON.

pub mod analysis;
pub mod config;
pub mod data;
pub mod effects;
pub mod errors;
pub mod optimization;
pub mod report;
pub mod series;
pub mod volatility;

pub use crate::analysis::{AnalysisEngine, AnalysisParams, BatchMode};
pub use crate::config::AnalysisConfig;
pub use crate::errors::{AnalysisError, AnalysisResult};
