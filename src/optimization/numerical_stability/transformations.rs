//! Numerically stable parameter transforms.
//!
//! Provides guarded versions of nonlinear maps that overflow or lose
//! precision in naïve form, using an explicit `x > 20.0` cutoff to keep
//! `f64` arithmetic well-conditioned.
//!
//! # Provided items
//! - [`STATIONARITY_MARGIN`]: buffer enforcing `α + β < 1` strictly.
//! - [`LOGIT_EPS`]: floor used when mapping coefficients back to logits.
//! - [`safe_softplus`] / [`safe_softplus_inv`]: ℝ ↔ (0, ∞).
//! - [`safe_logistic`]: derivative of softplus, ℝ → (0, 1).
//! - [`safe_softmax`] / [`safe_softmax_inv`]: logits ↔ coefficients that
//!   sum (together with an implicit slack) to `1 − STATIONARITY_MARGIN`.
//! - [`safe_softmax_deriv`]: Jacobian–vector product through
//!   [`safe_softmax`].
use ndarray::Array1;

/// Safety margin for strict stationarity.
///
/// A GARCH(1,1) recursion is covariance-stationary iff `α + β < 1`. The
/// softmax map below gives `α + β + slack = 1 − STATIONARITY_MARGIN`, so every
/// θ the optimizer can visit is strictly inside the stationary region.
pub const STATIONARITY_MARGIN: f64 = 1e-6;

/// Smallest coefficient (or slack) accepted by [`safe_softmax_inv`].
pub const LOGIT_EPS: f64 = 1e-12;

/// Numerically stable softplus `ln(1 + exp(x))`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Inverse of softplus on `(0, ∞)`: `ln(exp(x) − 1)`.
///
/// `x` must be finite and strictly positive.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Logistic `1 / (1 + exp(−x))`, evaluated on the side that cannot overflow.
///
/// This is `d softplus(x) / dx`, used to chain gradients through `ω`.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Map logits to coefficients with an implicit zero-logit slack term.
///
/// Returns `w` of length `logits.len() + 1` where
/// `w = (1 − STATIONARITY_MARGIN) · softmax([logits, 0])`; the last entry is
/// the slack. Uses a max-shift so large logits do not overflow.
pub fn safe_softmax(logits: &[f64]) -> Array1<f64> {
    let scale = 1.0 - STATIONARITY_MARGIN;
    let max = logits.iter().copied().fold(0.0_f64, f64::max);
    let mut w: Array1<f64> =
        logits.iter().map(|&z| (z - max).exp()).chain(std::iter::once((-max).exp())).collect();
    let total = w.sum();
    w.mapv_inplace(|e| scale * e / total);
    w
}

/// Logits that [`safe_softmax`] maps back to `coeffs`.
///
/// `slack = 1 − STATIONARITY_MARGIN − Σ coeffs`; both the coefficients and
/// the slack are floored at [`LOGIT_EPS`] so borderline inputs still give
/// finite logits.
pub fn safe_softmax_inv(coeffs: &[f64]) -> Array1<f64> {
    let scale = 1.0 - STATIONARITY_MARGIN;
    let slack = (scale - coeffs.iter().sum::<f64>()).max(LOGIT_EPS);
    coeffs.iter().map(|&c| (c.max(LOGIT_EPS) / slack).ln()).collect()
}

/// Pull a coefficient-space gradient back to logit space.
///
/// With `w = safe_softmax(logits)` (slack last) and `g = ∂ℓ/∂w` for the
/// non-slack entries, returns
/// `∂ℓ/∂logit_j = w_j · (g_j − Σ_i w_i g_i / s)` where
/// `s = 1 − STATIONARITY_MARGIN`. The slack carries no direct gradient.
pub fn safe_softmax_deriv(weights: &Array1<f64>, grad_coeffs: &[f64]) -> Array1<f64> {
    let scale = 1.0 - STATIONARITY_MARGIN;
    let inner: f64 = grad_coeffs.iter().zip(weights.iter()).map(|(g, w)| g * w).sum::<f64>() / scale;
    grad_coeffs.iter().zip(weights.iter()).map(|(&g, &w)| w * (g - inner)).collect()
}
