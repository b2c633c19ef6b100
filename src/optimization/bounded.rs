//! bounded — derivative-free minimization of a scalar function on an
//! interval.
//!
//! Purpose
//! -------
//! Search `[lower, upper]` for the minimizer of a scalar objective that may
//! be non-smooth or piecewise constant (e.g. a ratio of integer counts).
//! Backed by Argmin's `BrentOpt` (golden section with parabolic steps).
//!
//! Key behaviors
//! -------------
//! - The objective is evaluated at a caller-supplied start `x0` first; if
//!   that value is already at or below `opts.accept_below` the search stops
//!   there without running Brent.
//! - Otherwise Brent runs under an iteration cap, an absolute
//!   x-tolerance and an optional wall-clock deadline.
//! - The returned point is the better of `x0` and Brent's best; ties keep
//!   `x0`, so flat objectives do not drift away from the start.
//!
//! Invariants & assumptions
//! ------------------------
//! - `lower < upper`, both finite, and `lower ≤ x0 ≤ upper`.
//! - Objective errors abort the search and are returned unchanged.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::traits::describe_termination,
};
use argmin::{
    core::{CostFunction, Error, Executor, State, TerminationStatus},
    solver::brent::BrentOpt,
};
use std::time::Duration;

/// Budget for [`minimize_bounded`].
///
/// - `x_tol`: absolute tolerance on the minimizer location.
/// - `accept_below`: objective level at which `x0` is accepted outright.
/// - `max_iter`: Brent iteration cap.
/// - `timeout`: optional wall-clock deadline for the Brent run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedOptions {
    pub x_tol: f64,
    pub accept_below: f64,
    pub max_iter: u64,
    pub timeout: Option<Duration>,
}

impl Default for BoundedOptions {
    fn default() -> Self {
        Self { x_tol: 1e-4, accept_below: 1e-6, max_iter: 100, timeout: None }
    }
}

/// Result of a bounded scalar search.
///
/// `iterations` is 0 when `x0` was accepted without running Brent.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedOutcome {
    pub x: f64,
    pub value: f64,
    pub iterations: u64,
    pub converged: bool,
    pub timed_out: bool,
    pub status: String,
}

struct ScalarProblem<G> {
    func: G,
}

impl<G> CostFunction for ScalarProblem<G>
where
    G: Fn(f64) -> OptResult<f64>,
{
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &f64) -> Result<f64, Error> {
        let value = (self.func)(*x)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value }.into());
        }
        Ok(value)
    }
}

/// Minimize `func` over `[lower, upper]` starting from `x0`.
///
/// # Errors
/// - [`OptError::InvalidBounds`] for non-finite or inverted bounds.
/// - [`OptError::InitialGuessOutOfBounds`] when `x0` lies outside them.
/// - [`OptError::InvalidTolCost`] for a non-positive `x_tol`,
///   [`OptError::InvalidMaxIter`] for a zero iteration cap.
/// - Any error raised by `func`, or `NonFiniteCost` for a non-finite value.
pub fn minimize_bounded<G>(
    func: G, x0: f64, lower: f64, upper: f64, opts: &BoundedOptions,
) -> OptResult<BoundedOutcome>
where
    G: Fn(f64) -> OptResult<f64>,
{
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        return Err(OptError::InvalidBounds { lower, upper });
    }
    if !(x0 >= lower && x0 <= upper) {
        return Err(OptError::InitialGuessOutOfBounds { x0, lower, upper });
    }
    if !(opts.x_tol.is_finite() && opts.x_tol > 0.0) {
        return Err(OptError::InvalidTolCost {
            tol: opts.x_tol,
            reason: "Location tolerance must be finite and positive.",
        });
    }
    if opts.max_iter == 0 {
        return Err(OptError::InvalidMaxIter {
            max_iter: 0,
            reason: "Maximum iterations must be greater than zero.",
        });
    }

    let problem = ScalarProblem { func };
    let f0 = problem.cost(&x0)?;
    if f0 <= opts.accept_below {
        return Ok(BoundedOutcome {
            x: x0,
            value: f0,
            iterations: 0,
            converged: true,
            timed_out: false,
            status: "Initial guess accepted".to_string(),
        });
    }

    let solver = BrentOpt::new(lower, upper).set_tolerance(f64::EPSILON.sqrt(), opts.x_tol);
    let mut executor =
        Executor::new(problem, solver).configure(|state| state.max_iters(opts.max_iter));
    if let Some(deadline) = opts.timeout {
        executor = executor.timeout(deadline);
    }
    let result = executor.run()?;
    let state = result.state();
    let iterations = state.get_iter();
    let termination: TerminationStatus = state.get_termination_status().clone();
    let (converged, timed_out, status) = describe_termination(&termination);

    let (x, value) = match state.get_best_param() {
        Some(&xb) if state.get_best_cost() < f0 => (xb, state.get_best_cost()),
        _ => (x0, f0),
    };
    Ok(BoundedOutcome { x, value, iterations, converged, timed_out, status })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Brent locates the minimum of a smooth parabola inside the interval.
    //
    // Given
    // -----
    // - f(x) = (x − 2.7)², interval [1, 3], start 2.0.
    //
    // Expect
    // ------
    // - x ≈ 2.7 within the location tolerance; converged.
    fn minimize_bounded_finds_parabola_vertex() {
        // Arrange
        let opts = BoundedOptions { x_tol: 1e-6, ..BoundedOptions::default() };

        // Act
        let out = minimize_bounded(|x| Ok((x - 2.7).powi(2)), 2.0, 1.0, 3.0, &opts)
            .expect("search succeeds");

        // Assert
        assert_relative_eq!(out.x, 2.7, epsilon = 1e-4);
        assert!(out.converged);
        assert!(out.iterations > 0);
    }

    #[test]
    // Purpose
    // -------
    // A start point that already meets `accept_below` is returned untouched,
    // and a flat objective never moves away from it.
    fn minimize_bounded_keeps_start_on_flat_or_accepted_objective() {
        let opts = BoundedOptions::default();

        let accepted = minimize_bounded(|_| Ok(0.0), 2.0, 1.0, 3.0, &opts).expect("ok");
        assert_eq!(accepted.x, 2.0);
        assert_eq!(accepted.iterations, 0);

        let flat = minimize_bounded(|_| Ok(0.5), 2.0, 1.0, 3.0, &opts).expect("ok");
        assert_eq!(flat.x, 2.0);
        assert_eq!(flat.value, 0.5);
    }

    #[test]
    // Purpose
    // -------
    // Invalid intervals and out-of-range starts are rejected before any
    // evaluation.
    fn minimize_bounded_validates_inputs() {
        let opts = BoundedOptions::default();
        assert!(matches!(
            minimize_bounded(|x| Ok(x), 0.0, 3.0, 1.0, &opts),
            Err(OptError::InvalidBounds { .. })
        ));
        assert!(matches!(
            minimize_bounded(|x| Ok(x), 5.0, 1.0, 3.0, &opts),
            Err(OptError::InitialGuessOutOfBounds { .. })
        ));
    }
}
