//! numerical_stability — guarded transforms between optimizer space and
//! GARCH parameter space.
//!
//! Purpose
//! -------
//! Keep the GARCH(1,1) fit unconstrained: the optimizer moves freely in
//! `θ ∈ ℝ⁴` and these maps land every iterate on a valid parameter set
//! (`ω > 0`, `α, β ≥ 0`, `α + β < 1`).
//!
//! Key behaviors
//! -------------
//! - `safe_softplus` maps `θ_ω` to `ω > 0`; `safe_logistic` is its
//!   derivative for the chain rule.
//! - `safe_softmax` maps `(θ_α, θ_β)` plus a zero-logit slack to
//!   `(α, β, slack)` summing to `1 − STATIONARITY_MARGIN`;
//!   `safe_softmax_deriv` is the matching Jacobian–vector product and
//!   `safe_softmax_inv` recovers logits from coefficients for start points.
//!
//! Conventions
//! -----------
//! - Pure functions on `f64` and `ndarray` values; no logging, no I/O.
//! - Inputs are assumed finite; domain checks live in the model layer.
//!
//! Testing notes
//! -------------
//! - [`transformations`] checks the maps against naïve formulas, tail
//!   behavior, mass conservation and a finite-difference JVP.

pub mod transformations;

pub use self::transformations::{
    LOGIT_EPS, STATIONARITY_MARGIN, safe_logistic, safe_softmax, safe_softmax_deriv,
    safe_softmax_inv, safe_softplus, safe_softplus_inv,
};
