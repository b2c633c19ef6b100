//! OHLCV rows, dataset summaries and timestamp parsing.
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One bar of market data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvRow {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvRow {
    pub fn is_finite(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume].iter().all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Descriptive metadata for one dataset.
///
/// `price_range` spans the lowest `low` to the highest `high`. Ranges and
/// dates are `None` for an empty dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub symbol: String,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub total_rows: usize,
    pub price_range: Option<ValueRange>,
    pub volume_range: Option<ValueRange>,
}

impl DatasetSummary {
    pub fn from_rows(symbol: &str, rows: &[OhlcvRow]) -> Self {
        let range = |lo: fn(&OhlcvRow) -> f64, hi: fn(&OhlcvRow) -> f64| {
            (!rows.is_empty()).then(|| ValueRange {
                min: rows.iter().map(lo).fold(f64::INFINITY, f64::min),
                max: rows.iter().map(hi).fold(f64::NEG_INFINITY, f64::max),
            })
        };
        Self {
            symbol: symbol.to_string(),
            start_date: rows.iter().map(|r| r.timestamp).min(),
            end_date: rows.iter().map(|r| r.timestamp).max(),
            total_rows: rows.len(),
            price_range: range(|r| r.low, |r| r.high),
            volume_range: range(|r| r.volume, |r| r.volume),
        }
    }
}

/// Sort by timestamp, keep the first row of each timestamp and drop rows
/// with non-finite fields.
pub fn clean_rows(mut rows: Vec<OhlcvRow>) -> Vec<OhlcvRow> {
    rows.retain(OhlcvRow::is_finite);
    rows.sort_by_key(|r| r.timestamp);
    rows.dedup_by_key(|r| r.timestamp);
    rows
}

/// Parse a timestamp cell.
///
/// Accepted: RFC 3339 (offset converted to UTC), `%Y-%m-%d %H:%M:%S`,
/// `%Y-%m-%dT%H:%M:%S`, `%Y-%m-%d` (midnight) and integer epoch
/// milliseconds.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    s.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.naive_utc())
}
