//! loglik_optimizer::finite_diff — finite-difference gradients for models
//! without an analytic derivative.
//!
//! The `finitediff` routines take a closure returning a bare `f64`, so a
//! fallible objective cannot use `?` inside them. [`fd_gradient`] captures
//! the first error raised by the objective in a side cell, returns `NaN` to
//! the differencing routine, and turns the captured error back into an
//! [`OptError`] afterwards.
//!
//! Central differences are tried first. If the objective failed at one of
//! the probe points, or the central gradient is non-finite, a single
//! forward-difference retry is made (forward probes stay on one side of
//! `θ`, which helps next to a domain boundary).
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, validation::validate_grad},
};
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Finite-difference gradient of a fallible scalar objective at `theta`.
///
/// # Errors
/// - The first error raised by `func` on the forward-difference retry.
/// - [`OptError::InvalidGradient`] when both schemes yield non-finite entries.
pub fn fd_gradient<G>(theta: &Theta, func: G) -> OptResult<Grad>
where
    G: Fn(&Theta) -> OptResult<f64>,
{
    let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
    let capture = |x: &Theta| -> f64 {
        match func(x) {
            Ok(v) => v,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };

    let central = theta.central_diff(&capture);
    if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }

    closure_err.replace(None);
    let forward = theta.forward_diff(&capture);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&forward, theta.len())?;
    Ok(forward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The central scheme recovers the gradient of a smooth quadratic.
    //
    // Given
    // -----
    // - f(θ) = θ₀² + 3θ₁ at θ = (1, -2).
    //
    // Expect
    // ------
    // - ∇f ≈ (2, 3).
    fn fd_gradient_matches_quadratic() {
        // Arrange
        let theta = array![1.0, -2.0];

        // Act
        let grad = fd_gradient(&theta, |x| Ok(x[0] * x[0] + 3.0 * x[1])).expect("gradient");

        // Assert
        assert_relative_eq!(grad[0], 2.0, epsilon = 1e-5);
        assert_relative_eq!(grad[1], 3.0, epsilon = 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // An objective that always fails surfaces its own error instead of a
    // NaN-filled gradient.
    fn fd_gradient_propagates_objective_error() {
        let theta = array![0.5];
        let result = fd_gradient(&theta, |_| Err(OptError::NonFiniteCost { value: f64::NAN }));
        assert!(matches!(result, Err(OptError::NonFiniteCost { .. })));
    }

    #[test]
    // Purpose
    // -------
    // A function that only fails below its domain boundary still gets a
    // usable forward gradient right at the boundary.
    //
    // Given
    // -----
    // - f(θ) = θ² for θ ≥ 0 and an error otherwise, evaluated at θ = 0.
    //
    // Expect
    // ------
    // - The central probe at -h fails, the forward retry succeeds with a
    //   gradient close to zero.
    fn fd_gradient_falls_back_to_forward_near_boundary() {
        let theta = array![0.0];
        let grad = fd_gradient(&theta, |x| {
            if x[0] < 0.0 {
                Err(OptError::NonFiniteCost { value: f64::NAN })
            } else {
                Ok(x[0] * x[0])
            }
        })
        .expect("forward gradient");
        assert!(grad[0].abs() < 1e-6);
    }
}
