//! volatility — conditional-volatility estimation and simulation.
//!
//! Purpose
//! -------
//! Supply the per-period volatility every threshold is scaled by. Estimation
//! fits a Gaussian GARCH(1,1) by maximum likelihood through the crate's
//! argmin-backed optimizer; simulation advances a Heston-style volatility
//! one Euler step at a time.
//!
//! Key behaviors
//! -------------
//! - [`VolatilityEstimator`] is the seam detectors and the orchestrator
//!   depend on; [`GarchEstimator`] implements it.
//! - [`garch::Garch11`] implements `LogLikelihood` with an analytic
//!   gradient; [`params::GarchParams`] maps to and from optimizer space.
//! - [`heston`] exposes `simulate_step` with an injected RNG.
//!
//! Invariants & assumptions
//! ------------------------
//! - Estimated and simulated volatilities are never negative.
//! - Fitted GARCH parameters satisfy `ω > 0`, `α, β ≥ 0`, `α + β < 1`.
//!
//! Testing notes
//! -------------
//! - Gradient checked against finite differences; fits checked on seeded
//!   simulated GARCH paths; simulation checked for non-negativity under
//!   extreme shocks.

pub mod errors;
pub mod estimator;
pub mod garch;
pub mod heston;
pub mod params;

pub use self::errors::{EstimationError, EstimationResult, ParamError, SimulationError};
pub use self::estimator::{GarchEstimator, GarchFit, GarchOptions, VolatilityEstimator};
pub use self::heston::{DEFAULT_DT, HestonParams, simulate_path, simulate_step, step_with_shock};
pub use self::params::GarchParams;
