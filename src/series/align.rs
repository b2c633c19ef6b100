//! Index alignment between series.
//!
//! Detectors never re-align; they call [`ensure_aligned`] and fail fast. The
//! orchestrator is the only place that joins two assets, through
//! [`common_positions`] (inner join on timestamps).
use crate::series::errors::{SeriesError, SeriesResult};
use chrono::NaiveDateTime;

/// Fail unless both indices hold exactly the same timestamps.
pub fn ensure_aligned(left: &[NaiveDateTime], right: &[NaiveDateTime]) -> SeriesResult<()> {
    if left == right {
        Ok(())
    } else {
        Err(SeriesError::IndexMismatch { left: left.len(), right: right.len() })
    }
}

/// Positions of the timestamps present in both sorted indices.
///
/// Returns `(left_positions, right_positions)` of equal length, in index
/// order. A merge walk; both inputs must be strictly increasing.
pub fn common_positions(
    left: &[NaiveDateTime], right: &[NaiveDateTime],
) -> (Vec<usize>, Vec<usize>) {
    let (mut i, mut j) = (0, 0);
    let mut lp = Vec::new();
    let mut rp = Vec::new();
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                lp.push(i);
                rp.push(j);
                i += 1;
                j += 1;
            }
        }
    }
    (lp, rp)
}
