//! Heston-style stochastic volatility: one Euler step of σ.
//!
//! ```text
//! σ_{t+1} = max(0, σ_t + κ(θ − σ_t²)·dt + η·σ_t·ε·√dt),   ε ~ N(0, 1)
//! ```
//!
//! The random draw comes from a caller-supplied [`rand::Rng`] so paths are
//! reproducible under a seeded generator. [`step_with_shock`] is the
//! deterministic core used when the shock is already known.
//!
//! ρ is carried for completeness (it couples return and volatility shocks in
//! a joint simulation) but does not enter the single-factor σ step.
use crate::volatility::errors::{SimulationError, SimulationResult};
use ndarray::Array1;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::Serialize;

/// One trading day as a fraction of a year.
pub const DEFAULT_DT: f64 = 1.0 / 252.0;

/// Validated Heston parameters.
///
/// - `kappa`: mean-reversion rate, `> 0`
/// - `theta`: long-run variance, `> 0`
/// - `eta`: volatility of volatility, `>= 0`
/// - `rho`: return/volatility shock correlation, in `[-1, 1]`
/// - `v0`: initial variance, `>= 0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HestonParams {
    pub kappa: f64,
    pub theta: f64,
    pub eta: f64,
    pub rho: f64,
    pub v0: f64,
}

impl Default for HestonParams {
    fn default() -> Self {
        Self { kappa: 2.0, theta: 0.04, eta: 0.3, rho: -0.7, v0: 0.04 }
    }
}

impl HestonParams {
    /// # Errors
    /// [`SimulationError::InvalidHestonParam`] naming the first field outside
    /// its domain (non-finite values are always rejected).
    pub fn new(kappa: f64, theta: f64, eta: f64, rho: f64, v0: f64) -> SimulationResult<Self> {
        let checks: [(&'static str, f64, bool, &'static str); 5] = [
            ("kappa", kappa, kappa > 0.0, "must be > 0"),
            ("theta", theta, theta > 0.0, "must be > 0"),
            ("eta", eta, eta >= 0.0, "must be >= 0"),
            ("rho", rho, (-1.0..=1.0).contains(&rho), "must lie in [-1, 1]"),
            ("v0", v0, v0 >= 0.0, "must be >= 0"),
        ];
        for (name, value, ok, reason) in checks {
            if !value.is_finite() || !ok {
                return Err(SimulationError::InvalidHestonParam { name, value, reason });
            }
        }
        Ok(Self { kappa, theta, eta, rho, v0 })
    }

    /// Starting volatility `sqrt(v0)`.
    pub fn initial_sigma(&self) -> f64 {
        self.v0.sqrt()
    }
}

fn validate_step(sigma_t: f64, dt: f64) -> SimulationResult<()> {
    if !(sigma_t.is_finite() && sigma_t >= 0.0) {
        return Err(SimulationError::InvalidSigma { value: sigma_t });
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SimulationError::InvalidTimeStep { dt });
    }
    Ok(())
}

/// Deterministic Euler step for a given standard-normal `shock`.
///
/// # Errors
/// - [`SimulationError::InvalidSigma`] for negative or non-finite `sigma_t`.
/// - [`SimulationError::InvalidTimeStep`] for `dt <= 0` or non-finite.
pub fn step_with_shock(
    sigma_t: f64, dt: f64, params: &HestonParams, shock: f64,
) -> SimulationResult<f64> {
    validate_step(sigma_t, dt)?;
    let drift = params.kappa * (params.theta - sigma_t * sigma_t) * dt;
    let diffusion = params.eta * sigma_t * shock * dt.sqrt();
    let next = sigma_t + drift + diffusion;
    // NaN (e.g. from an infinite shock) also floors to zero.
    Ok(if next > 0.0 { next } else { 0.0 })
}

/// One Euler step with `ε` drawn from `rng`.
///
/// # Errors
/// As [`step_with_shock`].
pub fn simulate_step<R: Rng + ?Sized>(
    sigma_t: f64, dt: f64, params: &HestonParams, rng: &mut R,
) -> SimulationResult<f64> {
    let shock: f64 = rng.sample(StandardNormal);
    step_with_shock(sigma_t, dt, params, shock)
}

/// `steps` successive draws starting from `sigma0` (not included).
///
/// # Errors
/// As [`step_with_shock`], for the initial state.
pub fn simulate_path<R: Rng + ?Sized>(
    sigma0: f64, steps: usize, dt: f64, params: &HestonParams, rng: &mut R,
) -> SimulationResult<Array1<f64>> {
    let mut sigma = sigma0;
    let mut path = Array1::zeros(steps);
    for slot in path.iter_mut() {
        sigma = simulate_step(sigma, dt, params, rng)?;
        *slot = sigma;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    // Purpose
    // -------
    // The step is clamped at zero for any input, including σ = 0 and huge
    // negative shocks.
    //
    // Given
    // -----
    // - σ ∈ {0, 0.2, 1.5}, shocks ∈ {−1e6, −10, 0, 10, −∞}.
    //
    // Expect
    // ------
    // - Every result is finite and >= 0.
    fn step_never_negative() {
        let params = HestonParams::default();
        for &sigma in &[0.0, 0.2, 1.5] {
            for &shock in &[-1e6, -10.0, 0.0, 10.0, f64::NEG_INFINITY] {
                let next = step_with_shock(sigma, DEFAULT_DT, &params, shock).expect("valid step");
                assert!(next >= 0.0 && next.is_finite(), "sigma={sigma} shock={shock} -> {next}");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The deterministic step matches the Euler formula by hand.
    //
    // Given
    // -----
    // - σ = 0.2, dt = 1/252, κ = 2, θ = 0.04, η = 0.3, ε = 0.5.
    //
    // Expect
    // ------
    // - σ' = 0.2 + 2(0.04 − 0.04)·dt + 0.3·0.2·0.5·√dt.
    fn step_matches_formula() {
        let params = HestonParams::default();
        let next = step_with_shock(0.2, DEFAULT_DT, &params, 0.5).expect("valid step");
        let expected = 0.2 + 0.3 * 0.2 * 0.5 * DEFAULT_DT.sqrt();
        assert_relative_eq!(next, expected, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Seeded generators give reproducible, non-negative paths.
    fn seeded_paths_are_reproducible_and_non_negative() {
        let params = HestonParams::default();
        let a = simulate_path(0.2, 500, DEFAULT_DT, &params, &mut StdRng::seed_from_u64(42))
            .expect("path");
        let b = simulate_path(0.2, 500, DEFAULT_DT, &params, &mut StdRng::seed_from_u64(42))
            .expect("path");
        assert_eq!(a, b);
        assert!(a.iter().all(|&s| s >= 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Invalid parameters and step inputs are rejected by name.
    fn invalid_inputs_are_rejected() {
        assert!(matches!(
            HestonParams::new(0.0, 0.04, 0.3, -0.7, 0.04),
            Err(SimulationError::InvalidHestonParam { name: "kappa", .. })
        ));
        assert!(matches!(
            HestonParams::new(2.0, 0.04, 0.3, -1.5, 0.04),
            Err(SimulationError::InvalidHestonParam { name: "rho", .. })
        ));
        let params = HestonParams::default();
        assert_eq!(
            step_with_shock(-0.1, DEFAULT_DT, &params, 0.0),
            Err(SimulationError::InvalidSigma { value: -0.1 })
        );
        assert_eq!(
            step_with_shock(0.1, 0.0, &params, 0.0),
            Err(SimulationError::InvalidTimeStep { dt: 0.0 })
        );
    }
}
