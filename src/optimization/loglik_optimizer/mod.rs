//! loglik_optimizer — argmin-backed maximum-likelihood driver.
//!
//! Purpose
//! -------
//! Maximize a log-likelihood `ℓ(θ)` with L-BFGS. Models implement
//! [`LogLikelihood`] and call [`maximize`]; this layer owns the sign flip to
//! a cost, solver construction, finite-difference fallbacks, deadlines and
//! outcome validation.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] exposes `c(θ) = -ℓ(θ)` to Argmin and flips
//!   analytic gradients; without one it differences the cost through
//!   [`finite_diff::fd_gradient`].
//! - [`solver`] builds L-BFGS for the [`traits::LineSearcher`] chosen in
//!   [`MLEOptions`], applies the start point, iteration cap and optional
//!   wall-clock deadline, and normalizes the final state into an
//!   [`OptimOutcome`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Models return `ℓ(θ)` and `∇ℓ(θ)`, never the cost.
//! - Invalid inputs are reported as [`OptError`] values, never panics.
//! - [`Theta`] lives in an unconstrained space; any mapping to constrained
//!   model parameters happens in the model layer.
//!
//! Downstream usage
//! ----------------
//! - The GARCH(1,1) likelihood in `volatility::garch` is the primary
//!   consumer; it supplies an analytic gradient.
//!
//! Testing notes
//! -------------
//! - Unit tests cover sign conventions ([`adapter`]), solver wiring
//!   ([`solver`]), finite differences ([`finite_diff`]), validation
//!   ([`validation`]) and configuration ([`traits`]); [`api`] runs full
//!   solves on concave toy likelihoods.
//!
//! [`OptError`]: crate::optimization::errors::OptError

pub mod adapter;
pub mod api;
pub mod finite_diff;
pub mod solver;
pub mod traits;
pub mod validation;

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::solver::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};
