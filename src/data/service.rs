//! Dataset registry backed by a directory of CSV files.
//!
//! [`DatasetAccess`] is the seam the analysis engine reads through; it is
//! `Send + Sync` so batch analyses can share one instance across rayon
//! workers. [`DataService`] registers every `*.csv` file in a directory
//! under its file stem.
use crate::data::{
    errors::{DataError, DataResult},
    source::{CsvAsset, TabularSource},
    types::{DatasetSummary, OhlcvRow},
};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tracing::info;

pub trait DatasetAccess: Send + Sync {
    /// Cleaned rows for `id`.
    ///
    /// # Errors
    /// [`DataError::NotFound`] for an unknown id; loading errors otherwise.
    fn read_dataset(&self, id: &str) -> DataResult<Vec<OhlcvRow>>;

    /// Registered ids in ascending order.
    fn available_datasets(&self) -> Vec<String>;

    fn dataset_summary(&self, id: &str) -> DataResult<DatasetSummary> {
        let rows = self.read_dataset(id)?;
        Ok(DatasetSummary::from_rows(id, &rows))
    }
}

#[derive(Debug, Clone)]
pub struct DataService {
    directory: PathBuf,
    assets: BTreeMap<String, CsvAsset>,
}

impl DataService {
    /// Scan `directory` for `*.csv` files.
    ///
    /// # Errors
    /// [`DataError::Io`] when the directory cannot be read.
    pub fn new(directory: impl Into<PathBuf>) -> DataResult<Self> {
        let directory = directory.into();
        let assets = scan(&directory)?;
        info!(directory = %directory.display(), datasets = assets.len(), "registered datasets");
        Ok(Self { directory, assets })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Re-scan the directory, picking up added or removed files.
    ///
    /// # Errors
    /// As [`DataService::new`].
    pub fn refresh(&mut self) -> DataResult<()> {
        self.assets = scan(&self.directory)?;
        Ok(())
    }

    fn asset(&self, id: &str) -> DataResult<&CsvAsset> {
        self.assets.get(id).ok_or_else(|| DataError::NotFound { id: id.to_string() })
    }
}

fn scan(directory: &Path) -> DataResult<BTreeMap<String, CsvAsset>> {
    let io_err = |e: std::io::Error| DataError::Io { path: directory.to_path_buf(), reason: e.to_string() };
    let mut assets = BTreeMap::new();
    for entry in std::fs::read_dir(directory).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_csv = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            let asset = CsvAsset::new(path);
            assets.insert(asset.symbol().to_string(), asset);
        }
    }
    Ok(assets)
}

impl DatasetAccess for DataService {
    fn read_dataset(&self, id: &str) -> DataResult<Vec<OhlcvRow>> {
        self.asset(id)?.load()
    }

    fn available_datasets(&self) -> Vec<String> {
        self.assets.keys().cloned().collect()
    }

    fn dataset_summary(&self, id: &str) -> DataResult<DatasetSummary> {
        self.asset(id)?.summary()
    }
}
