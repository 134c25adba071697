//! Portfolio dataset read from a JSON file.

use super::{HoldingsRepository, PortfolioDataset, SnapshotRepository, TransactionRepository};
use crate::config::AnalyticsConfig;
use crate::timeframe::Timeframe;
use crate::types::{DailySnapshot, HoldingRecord, TransactionRecord};
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Repository backed by a `{ "snapshots": [...], "transactions": [...], "holdings": [...] }` file.
#[derive(Debug)]
pub struct JsonPortfolioStore {
    /// Path to the dataset JSON file
    path: PathBuf,
    /// Dataset as of the last load
    dataset: PortfolioDataset,
}

impl JsonPortfolioStore {
    /// Open the dataset at `path`. A missing file reads as an empty dataset.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let dataset = Self::load_from_path(&path)?;
        Ok(Self { path, dataset })
    }

    /// Open the dataset file named by the configuration.
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self> {
        Self::open(config.data_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dataset(&self) -> &PortfolioDataset {
        &self.dataset
    }

    /// Load a dataset from a specific path.
    fn load_from_path(path: &Path) -> Result<PortfolioDataset> {
        if !path.exists() {
            tracing::warn!("Dataset file {} not found, using empty dataset", path.display());
            return Ok(PortfolioDataset::default());
        }

        let content = fs::read_to_string(path)?;
        let data: serde_json::Value = serde_json::from_str(&content)?;

        // A bare array is a snapshot export
        let dataset = if data.is_array() {
            PortfolioDataset {
                snapshots: serde_json::from_value(data)?,
                ..Default::default()
            }
        } else {
            serde_json::from_value(data)?
        };

        tracing::debug!(
            "Loaded {} snapshots, {} transactions, {} holdings from {}",
            dataset.snapshots.len(),
            dataset.transactions.len(),
            dataset.holdings.len(),
            path.display()
        );
        Ok(dataset.sorted())
    }

    /// Reload the dataset from disk.
    pub fn reload(&mut self) -> Result<()> {
        self.dataset = Self::load_from_path(&self.path)?;
        Ok(())
    }
}

impl SnapshotRepository for JsonPortfolioStore {
    fn snapshots(&self, timeframe: &Timeframe) -> Result<Vec<DailySnapshot>> {
        Ok(self.dataset.snapshots_in(timeframe))
    }
}

impl TransactionRepository for JsonPortfolioStore {
    fn transactions(&self) -> Result<Vec<TransactionRecord>> {
        Ok(self.dataset.transactions.clone())
    }
}

impl HoldingsRepository for JsonPortfolioStore {
    fn holdings(&self) -> Result<Vec<HoldingRecord>> {
        Ok(self.dataset.holdings.clone())
    }
}
