//! optimization — MLE driver, bounded scalar search, stable transforms and
//! the shared optimizer error surface.
//!
//! Purpose
//! -------
//! Give the model layers a single place to fit parameters: the GARCH(1,1)
//! estimator maximizes a log-likelihood through [`loglik_optimizer`], and
//! the λ calibrator searches an interval through [`bounded`]. Both report
//! failures as [`errors::OptError`].
//!
//! Key behaviors
//! -------------
//! - [`loglik_optimizer`]: argmin L-BFGS with More–Thuente or Hager–Zhang
//!   line search, analytic or finite-difference gradients, iteration and
//!   wall-clock budgets.
//! - [`bounded`]: argmin Brent search on `[lower, upper]` that tolerates
//!   piecewise-constant objectives.
//! - [`numerical_stability`]: softplus/softmax maps keeping GARCH
//!   parameters positive and stationary for every unconstrained θ.
//!
//! Conventions
//! -----------
//! - Solvers maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`; outcomes report
//!   `ℓ`.
//! - Raw argmin errors never cross this module boundary; they are mapped
//!   into `OptError`.
//! - Nothing here logs; callers decide what to report.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests on toy objectives; the GARCH
//!   estimator tests exercise the full stack on simulated returns.

pub mod bounded;
pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub use self::bounded::{BoundedOptions, BoundedOutcome, minimize_bounded};
pub use self::errors::{OptError, OptResult};
