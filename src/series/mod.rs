//! series — validated time-indexed containers shared by every detector.
//!
//! Purpose
//! -------
//! Give returns, price paths and volatilities one representation: an
//! `ndarray::Array1<f64>` of values on a strictly increasing
//! `chrono::NaiveDateTime` index. Construction validates; downstream code
//! relies on the invariants instead of re-checking.
//!
//! Key behaviors
//! -------------
//! - [`ReturnSeries`] from closes (first point dropped) or raw values.
//! - [`PricePath`] compounded from a base level of 1.0, with `p_{t−1}`
//!   exposed for the trigger engine.
//! - [`VolatilitySeries`] enforces finite, non-negative values.
//! - [`align`] provides the strict equality check used by detectors and the
//!   inner join used by the orchestrator.
//!
//! Invariants & assumptions
//! ------------------------
//! - Index and values always have equal length.
//! - Timestamps are strictly increasing (no duplicates).
//!
//! Testing notes
//! -------------
//! - Unit tests cover validation failures, close-to-return conversion, the
//!   price-path round trip and the inner join.

pub mod align;
pub mod errors;
pub mod returns;
pub mod volatility;

pub use self::align::{common_positions, ensure_aligned};
pub use self::errors::{SeriesError, SeriesResult};
pub use self::returns::{PRICE_BASE, PricePath, ReturnSeries};
pub use self::volatility::VolatilitySeries;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};

    /// `n` consecutive calendar days starting 2024-01-01 at midnight.
    pub(crate) fn daily_index(n: usize) -> Vec<NaiveDateTime> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid start date");
        (0..n).map(|i| start + chrono::Duration::days(i as i64)).collect()
    }
}
