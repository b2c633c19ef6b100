//! Per-period volatility on a return index.
use crate::series::{
    errors::{SeriesError, SeriesResult},
    returns::validate_index,
};
use chrono::NaiveDateTime;
use ndarray::Array1;

/// Non-negative volatility estimates on a strictly increasing index.
///
/// Produced by a volatility estimator or supplied externally; either way
/// every value is finite and `>= 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilitySeries {
    index: Vec<NaiveDateTime>,
    values: Array1<f64>,
}

impl VolatilitySeries {
    /// # Errors
    /// - Index errors as for return series.
    /// - [`SeriesError::InvalidVolatility`] for a negative or non-finite value.
    pub fn new(index: Vec<NaiveDateTime>, values: Array1<f64>) -> SeriesResult<Self> {
        validate_index(&index, values.len())?;
        if let Some((i, &v)) = values.iter().enumerate().find(|(_, v)| !(v.is_finite() && **v >= 0.0))
        {
            return Err(SeriesError::InvalidVolatility { index: i, value: v });
        }
        Ok(Self { index, values })
    }

    /// Same value at every timestamp of `index`.
    pub fn constant(index: Vec<NaiveDateTime>, value: f64) -> SeriesResult<Self> {
        let values = Array1::from_elem(index.len(), value);
        Self::new(index, values)
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

    pub fn select(&self, positions: &[usize]) -> Self {
        Self {
            index: positions.iter().map(|&p| self.index[p]).collect(),
            values: positions.iter().map(|&p| self.values[p]).collect(),
        }
    }
}
