//! data — OHLCV datasets on disk.
//!
//! Purpose
//! -------
//! Discover and load market data for the analysis engine. Each dataset is a
//! headed CSV file; its file stem is the dataset id and symbol.
//!
//! Key behaviors
//! -------------
//! - [`DatasetAccess`]: the read interface the engine depends on.
//! - [`DataService`]: directory-backed [`DatasetAccess`].
//! - [`TabularSource`] / [`CsvAsset`]: load one file and derive a
//!   [`DatasetSummary`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Loaded rows are sorted by timestamp, unique per timestamp and have
//!   finite fields.
//! - Timestamps are naive UTC; offsets in RFC 3339 input are converted.

pub mod errors;
pub mod service;
pub mod source;
pub mod types;

pub use self::errors::{DataError, DataResult};
pub use self::service::{DataService, DatasetAccess};
pub use self::source::{CsvAsset, TabularSource};
pub use self::types::{DatasetSummary, OhlcvRow, ValueRange, clean_rows, parse_timestamp};
