//! Small descriptive statistics with explicit degenerate-case handling.
//!
//! - [`mean`] is 0 for an empty slice.
//! - [`sample_std`] uses `n − 1` and is 0 with fewer than two points.
//! - [`pearson`] is `None` with fewer than two pairs, a zero variance, or a
//!   non-finite result.
//! - [`effect_ratio`] is 0 when the denominator is 0.
//! - [`correlation_p_value`] is the two-sided Student-t test of zero
//!   correlation with `n − 2` degrees of freedom.
use statrs::distribution::{ContinuousCDF, StudentsT};

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() { 0.0 } else { values.iter().sum::<f64>() / values.len() as f64 }
}

pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
}

pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let (mx, my) = (mean(x), mean(y));
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y.iter()) {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    r.is_finite().then_some(r)
}

/// `effect / total`, or 0 when nothing triggered.
pub fn effect_ratio(effect_days: usize, total_triggers: usize) -> f64 {
    if total_triggers == 0 { 0.0 } else { effect_days as f64 / total_triggers as f64 }
}

pub fn correlation_p_value(r: f64, n: usize) -> Option<f64> {
    if n <= 2 || !r.is_finite() {
        return None;
    }
    if r.abs() >= 1.0 {
        return Some(0.0);
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Degenerate inputs hit their guards instead of producing NaN.
    fn degenerate_inputs_are_guarded() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(sample_std(&[3.0]), 0.0);
        assert_eq!(pearson(&[1.0], &[2.0]), None);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(correlation_p_value(0.5, 2), None);
        assert_eq!(effect_ratio(0, 0), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Known values: sample std of (2, 4, 4, 4, 5, 5, 7, 9) and perfect
    // linear correlation.
    fn known_values() {
        assert_relative_eq!(
            sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]),
            (32.0_f64 / 7.0).sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            pearson(&[1.0, 2.0, 3.0], &[-2.0, -4.0, -6.0]).expect("defined"),
            -1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    // Purpose
    // -------
    // The p-value is 1 at r = 0, small for a strong correlation on many
    // points and symmetric in the sign of r.
    fn p_value_behaves() {
        assert_relative_eq!(correlation_p_value(0.0, 50).expect("defined"), 1.0, epsilon = 1e-12);
        assert!(correlation_p_value(0.8, 50).expect("defined") < 1e-6);
        assert_relative_eq!(
            correlation_p_value(0.3, 30).expect("defined"),
            correlation_p_value(-0.3, 30).expect("defined"),
            epsilon = 1e-12
        );
    }
}
