//! Tabular market-data sources.
//!
//! [`TabularSource`] is the loading capability: implementors supply
//! [`TabularSource::load`] and get [`TabularSource::summary`] for free.
//! [`CsvAsset`] reads a headed CSV file with (case-insensitive) columns
//! `timestamp, open, high, low, close, volume`; extra columns are ignored.
//!
//! Rows with an empty or non-numeric price/volume cell are dropped along
//! with non-finite ones; an unparseable timestamp is an error.
use crate::data::{
    errors::{DataError, DataResult},
    types::{DatasetSummary, OhlcvRow, clean_rows, parse_timestamp},
};
use csv::{ReaderBuilder, StringRecord};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub trait TabularSource {
    fn symbol(&self) -> &str;

    /// Cleaned rows, sorted by timestamp without duplicates.
    fn load(&self) -> DataResult<Vec<OhlcvRow>>;

    fn summary(&self) -> DataResult<DatasetSummary> {
        let rows = self.load()?;
        Ok(DatasetSummary::from_rows(self.symbol(), &rows))
    }
}

const COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// A CSV file whose stem is the asset symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvAsset {
    symbol: String,
    path: PathBuf,
}

impl CsvAsset {
    /// Symbol taken from the file stem (`data/BTC.csv` → `BTC`).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let symbol = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { symbol, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn column_positions(&self, header: &StringRecord) -> DataResult<[usize; 6]> {
        let mut positions = [0usize; 6];
        for (slot, column) in positions.iter_mut().zip(COLUMNS) {
            *slot = header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(column))
                .ok_or_else(|| DataError::MissingColumn { path: self.path.clone(), column })?;
        }
        Ok(positions)
    }
}

impl TabularSource for CsvAsset {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn load(&self) -> DataResult<Vec<OhlcvRow>> {
        let csv_err = |e: csv::Error| DataError::Csv { path: self.path.clone(), reason: e.to_string() };
        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| {
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    DataError::Io { path: self.path.clone(), reason: e.to_string() }
                } else {
                    csv_err(e)
                }
            })?;
        let header = reader.headers().map_err(csv_err)?.clone();
        let [ts, open, high, low, close, volume] = self.column_positions(&header)?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let line = record.position().map_or(0, |p| p.line());
            let raw_ts = record.get(ts).unwrap_or_default();
            let timestamp = parse_timestamp(raw_ts).ok_or_else(|| DataError::InvalidTimestamp {
                path: self.path.clone(),
                line,
                value: raw_ts.to_string(),
            })?;
            let num = |i: usize| record.get(i).and_then(|v| v.parse::<f64>().ok());
            match (num(open), num(high), num(low), num(close), num(volume)) {
                (Some(open), Some(high), Some(low), Some(close), Some(volume)) => {
                    rows.push(OhlcvRow { timestamp, open, high, low, close, volume })
                }
                _ => skipped += 1,
            }
        }

        let parsed = rows.len();
        let rows = clean_rows(rows);
        if skipped > 0 || rows.len() < parsed {
            warn!(
                symbol = %self.symbol,
                skipped,
                dropped = parsed - rows.len(),
                "discarded incomplete or duplicate rows"
            );
        }
        debug!(symbol = %self.symbol, rows = rows.len(), "loaded csv dataset");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_csv(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).expect("create csv");
        f.write_all(body.as_bytes()).expect("write csv");
        path
    }

    #[test]
    // Purpose
    // -------
    // Loading sorts, drops duplicates and incomplete rows, and ignores
    // extra columns.
    //
    // Given
    // -----
    // - Rows out of order, one repeated timestamp, one empty close, an extra
    //   `turnover` column and upper-case headers.
    //
    // Expect
    // ------
    // - Three rows in ascending order; the first duplicate wins.
    fn load_cleans_rows() {
        // Arrange
        let dir = tempdir().expect("tempdir");
        let path = write_csv(
            dir.path(),
            "ETH.csv",
            "Timestamp,Open,High,Low,Close,Volume,Turnover\n\
             2024-01-03,3,4,2,3.5,10,1\n\
             2024-01-01,1,2,0.5,1.5,10,1\n\
             2024-01-02,2,3,1,2.5,10,1\n\
             2024-01-02,9,9,9,9,9,9\n\
             2024-01-04,4,5,3,,10,1\n",
        );

        // Act
        let asset = CsvAsset::new(&path);
        let rows = asset.load().expect("loads");

        // Assert
        assert_eq!(asset.symbol(), "ETH");
        assert_eq!(rows.iter().map(|r| r.close).collect::<Vec<_>>(), vec![1.5, 2.5, 3.5]);
    }

    #[test]
    // Purpose
    // -------
    // Missing columns, bad timestamps and missing files are typed errors.
    fn load_reports_typed_errors() {
        let dir = tempdir().expect("tempdir");
        let no_close = write_csv(dir.path(), "A.csv", "timestamp,open,high,low,volume\n");
        assert!(matches!(
            CsvAsset::new(no_close).load(),
            Err(DataError::MissingColumn { column: "close", .. })
        ));

        let bad_ts =
            write_csv(dir.path(), "B.csv", "timestamp,open,high,low,close,volume\nsoon,1,1,1,1,1\n");
        assert!(matches!(CsvAsset::new(bad_ts).load(), Err(DataError::InvalidTimestamp { .. })));

        assert!(matches!(
            CsvAsset::new(dir.path().join("missing.csv")).load(),
            Err(DataError::Io { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The derived summary reflects the cleaned rows.
    fn summary_uses_cleaned_rows() {
        let dir = tempdir().expect("tempdir");
        let path = write_csv(
            dir.path(),
            "SOL.csv",
            "timestamp,open,high,low,close,volume\n\
             2024-01-01,1,2,0.5,1.5,100\n\
             2024-01-02,2,3,1,2.5,300\n",
        );
        let summary = CsvAsset::new(path).summary().expect("summary");
        assert_eq!(summary.symbol, "SOL");
        assert_eq!(summary.total_rows, 2);
        let volume = summary.volume_range.expect("non-empty");
        assert_eq!((volume.min, volume.max), (100.0, 300.0));
    }
}
