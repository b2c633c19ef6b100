//! Threshold sensitivity and window bounds.
//!
//! [`ThresholdParams`] is a small `Copy` value. Every detection call takes it
//! by value, so concurrent analyses each work on their own snapshot and the
//! calibrator can try candidate λ values without touching the caller's copy.
use crate::effects::errors::{EffectError, EffectResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LAMBDA: f64 = 2.0;
pub const DEFAULT_MIN_EFFECT_SIZE: f64 = 0.02;
pub const DEFAULT_LAMBDA_LOWER: f64 = 1.0;
pub const DEFAULT_LAMBDA_UPPER: f64 = 3.0;

/// Sensitivity multiplier `λ` and the minimum-effect-size floor.
///
/// `min_effect_size` is carried through to result metadata; detection itself
/// depends only on `λ`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdParams {
    pub lambda: f64,
    pub min_effect_size: f64,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self { lambda: DEFAULT_LAMBDA, min_effect_size: DEFAULT_MIN_EFFECT_SIZE }
    }
}

impl ThresholdParams {
    /// # Errors
    /// [`EffectError::InvalidParameter`] for a non-finite or negative `λ`, or
    /// a `min_effect_size` outside `[0, 1]`.
    pub fn new(lambda: f64, min_effect_size: f64) -> EffectResult<Self> {
        if !(lambda.is_finite() && lambda >= 0.0) {
            return Err(EffectError::InvalidParameter {
                name: "lambda",
                value: lambda,
                reason: "must be finite and >= 0".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&min_effect_size) {
            return Err(EffectError::InvalidParameter {
                name: "min_effect_size",
                value: min_effect_size,
                reason: "must lie in [0, 1]".to_string(),
            });
        }
        Ok(Self { lambda, min_effect_size })
    }

    /// Copy with a different `λ`.
    pub fn with_lambda(self, lambda: f64) -> Self {
        Self { lambda, ..self }
    }
}

/// Accepted range for a caller-supplied `λ`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LambdaBounds {
    pub lower: f64,
    pub upper: f64,
}

impl Default for LambdaBounds {
    fn default() -> Self {
        Self { lower: DEFAULT_LAMBDA_LOWER, upper: DEFAULT_LAMBDA_UPPER }
    }
}

impl LambdaBounds {
    /// # Errors
    /// [`EffectError::InvalidParameter`] when `λ` is outside `[lower, upper]`.
    pub fn check(&self, lambda: f64) -> EffectResult<f64> {
        if lambda.is_finite() && lambda >= self.lower && lambda <= self.upper {
            Ok(lambda)
        } else {
            Err(EffectError::InvalidParameter {
                name: "lambda",
                value: lambda,
                reason: format!("must lie in [{}, {}]", self.lower, self.upper),
            })
        }
    }
}

/// Accepted range for rolling-correlation windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub min: usize,
    pub max: usize,
}

impl WindowBounds {
    /// # Errors
    /// [`EffectError::InvalidParameter`] when `window` is outside `[min, max]`.
    pub fn check(&self, window: usize) -> EffectResult<usize> {
        if (self.min..=self.max).contains(&window) {
            Ok(window)
        } else {
            Err(EffectError::InvalidParameter {
                name: "window",
                value: window as f64,
                reason: format!("must lie in [{}, {}]", self.min, self.max),
            })
        }
    }
}
