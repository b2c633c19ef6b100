//! Return series and the normalized price path derived from them.
//!
//! Purpose
//! -------
//! Hold per-period fractional returns on a strictly increasing timestamp
//! index, and rebuild the cumulative price path the trigger engine measures
//! dollar moves against.
//!
//! Key behaviors
//! -------------
//! - [`ReturnSeries::from_closes`] computes `r_t = close_t / close_{t−1} − 1`
//!   and drops the first observation.
//! - [`PricePath::from_returns`] compounds `p_t = p_{t−1} · (1 + r_t)` from
//!   a base level of `1.0` placed *before* the first return, so the path
//!   has the same index as the returns.
//! - [`PricePath::previous`] exposes `p_{t−1}` per index with the base level
//!   at position 0.
//!
//! Invariants & assumptions
//! ------------------------
//! - Index and values have equal length and the index is strictly
//!   increasing.
//! - Return values are stored as given; finiteness is checked by the
//!   consumers that need it (the volatility estimator rejects non-finite
//!   input).
use crate::series::errors::{SeriesError, SeriesResult};
use chrono::NaiveDateTime;
use ndarray::Array1;

/// Level of the price path before the first return.
pub const PRICE_BASE: f64 = 1.0;

/// Check that `index` is strictly increasing and matches `len`.
pub(crate) fn validate_index(index: &[NaiveDateTime], len: usize) -> SeriesResult<()> {
    if index.len() != len {
        return Err(SeriesError::LengthMismatch { index: index.len(), values: len });
    }
    for (position, pair) in index.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(SeriesError::NonIncreasingIndex {
                position: position + 1,
                timestamp: pair[1],
            });
        }
    }
    Ok(())
}

/// Fractional returns on a strictly increasing timestamp index.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    index: Vec<NaiveDateTime>,
    values: Array1<f64>,
}

impl ReturnSeries {
    /// Build a series from an index and matching values.
    ///
    /// # Errors
    /// - [`SeriesError::LengthMismatch`] when lengths differ.
    /// - [`SeriesError::NonIncreasingIndex`] on a repeated or decreasing
    ///   timestamp.
    pub fn new(index: Vec<NaiveDateTime>, values: Array1<f64>) -> SeriesResult<Self> {
        validate_index(&index, values.len())?;
        Ok(Self { index, values })
    }

    /// Returns from closing prices; the first timestamp is dropped.
    ///
    /// # Errors
    /// - [`SeriesError::TooShort`] with fewer than two closes.
    /// - [`SeriesError::InvalidClose`] for a non-finite or non-positive
    ///   close.
    /// - Index errors as in [`ReturnSeries::new`].
    pub fn from_closes(index: &[NaiveDateTime], closes: &[f64]) -> SeriesResult<Self> {
        if closes.len() < 2 {
            return Err(SeriesError::TooShort { needed: 2, actual: closes.len() });
        }
        validate_index(index, closes.len())?;
        if let Some((i, &c)) = closes.iter().enumerate().find(|(_, c)| !(c.is_finite() && **c > 0.0))
        {
            return Err(SeriesError::InvalidClose { index: i, value: c });
        }
        let values: Array1<f64> = closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
        Ok(Self { index: index[1..].to_vec(), values })
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.index.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.index.last().copied()
    }

    /// Sub-series at the given (increasing) positions.
    pub fn select(&self, positions: &[usize]) -> Self {
        Self {
            index: positions.iter().map(|&p| self.index[p]).collect(),
            values: positions.iter().map(|&p| self.values[p]).collect(),
        }
    }

    /// Normalized cumulative price path on the same index.
    pub fn price_path(&self) -> PricePath {
        PricePath::from_returns(self)
    }
}

/// Cumulative price path compounded from [`PRICE_BASE`].
#[derive(Debug, Clone, PartialEq)]
pub struct PricePath {
    index: Vec<NaiveDateTime>,
    values: Array1<f64>,
}

impl PricePath {
    pub fn from_returns(returns: &ReturnSeries) -> Self {
        let mut level = PRICE_BASE;
        let values = returns
            .values()
            .iter()
            .map(|r| {
                level *= 1.0 + r;
                level
            })
            .collect();
        Self { index: returns.index().to_vec(), values }
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `p_{t−1}` for every index; position 0 holds [`PRICE_BASE`].
    pub fn previous(&self) -> Array1<f64> {
        std::iter::once(PRICE_BASE)
            .chain(self.values.iter().take(self.values.len().saturating_sub(1)).copied())
            .take(self.values.len())
            .collect()
    }

    /// Recover the returns that generated this path.
    pub fn to_returns(&self) -> ReturnSeries {
        let values = self.values.iter().zip(self.previous().iter()).map(|(p, q)| p / q - 1.0).collect();
        ReturnSeries { index: self.index.clone(), values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::test_support::daily_index;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Returns are simple ratios of consecutive closes with the first
    // timestamp dropped.
    //
    // Given
    // -----
    // - Closes (100, 110, 99) on three consecutive days.
    //
    // Expect
    // ------
    // - Returns (0.10, -0.10) indexed by days 2 and 3.
    fn from_closes_drops_first_observation() {
        // Arrange
        let index = daily_index(3);

        // Act
        let r = ReturnSeries::from_closes(&index, &[100.0, 110.0, 99.0]).expect("valid closes");

        // Assert
        assert_eq!(r.len(), 2);
        assert_eq!(r.index(), &index[1..]);
        assert_relative_eq!(r.values()[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(r.values()[1], -0.10, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Construction rejects malformed inputs with the matching variant.
    fn constructors_reject_invalid_input() {
        let index = daily_index(3);
        assert!(matches!(
            ReturnSeries::from_closes(&index[..1], &[1.0]),
            Err(SeriesError::TooShort { needed: 2, actual: 1 })
        ));
        assert!(matches!(
            ReturnSeries::from_closes(&index, &[1.0, 0.0, 2.0]),
            Err(SeriesError::InvalidClose { index: 1, .. })
        ));
        let reversed: Vec<_> = index.iter().rev().copied().collect();
        assert!(matches!(
            ReturnSeries::new(reversed, array![0.1, 0.2, 0.3]),
            Err(SeriesError::NonIncreasingIndex { position: 1, .. })
        ));
        assert!(matches!(
            ReturnSeries::new(index, array![0.1]),
            Err(SeriesError::LengthMismatch { index: 3, values: 1 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Compounding returns into a price path and differencing it back
    // recovers the original returns.
    //
    // Given
    // -----
    // - Returns (0.01, 0.02, -0.01, 0.015, 0.005).
    //
    // Expect
    // ------
    // - `previous()[0] == 1.0`, `p_0 = 1.01`, round trip within 1e-12.
    fn price_path_round_trip() {
        // Arrange
        let r = ReturnSeries::new(daily_index(5), array![0.01, 0.02, -0.01, 0.015, 0.005])
            .expect("valid series");

        // Act
        let path = r.price_path();
        let back = path.to_returns();

        // Assert
        assert_eq!(path.previous()[0], PRICE_BASE);
        assert_relative_eq!(path.values()[0], 1.01, epsilon = 1e-12);
        assert_relative_eq!(path.previous()[2], 1.01 * 1.02, epsilon = 1e-12);
        for (a, b) in back.values().iter().zip(r.values().iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
        assert_eq!(back.index(), r.index());
    }
}
