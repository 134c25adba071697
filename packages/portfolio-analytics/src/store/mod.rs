//! Data sources for the analytics engine.
//!
//! The calculators take plain slices; these traits describe where a caller gets
//! them from. [`InMemoryPortfolio`] holds already-materialized data and
//! [`JsonPortfolioStore`] reads a dataset file.

mod json;

pub use json::JsonPortfolioStore;

use crate::timeframe::Timeframe;
use crate::types::{DailySnapshot, HoldingRecord, TransactionRecord};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Source of daily portfolio snapshots.
pub trait SnapshotRepository {
    /// Snapshots inside `timeframe`, ascending by date.
    fn snapshots(&self, timeframe: &Timeframe) -> Result<Vec<DailySnapshot>>;
}

/// Source of the transaction ledger.
pub trait TransactionRepository {
    /// All transactions; the engine filters by date itself.
    fn transactions(&self) -> Result<Vec<TransactionRecord>>;
}

/// Source of current holdings.
pub trait HoldingsRepository {
    fn holdings(&self) -> Result<Vec<HoldingRecord>>;
}

/// Snapshots, ledger and holdings of one portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PortfolioDataset {
    #[serde(default)]
    pub snapshots: Vec<DailySnapshot>,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub holdings: Vec<HoldingRecord>,
}

impl PortfolioDataset {
    /// Order snapshots by date. Rows with unparsable dates sort first.
    pub fn sorted(mut self) -> Self {
        self.snapshots.sort_by_key(|s| s.parsed_date());
        self
    }

    /// Snapshots inside `timeframe`; rows with unparsable dates only survive the
    /// unbounded window.
    pub fn snapshots_in(&self, timeframe: &Timeframe) -> Vec<DailySnapshot> {
        match timeframe {
            Timeframe::SinceInception => self.snapshots.clone(),
            Timeframe::Bounded { .. } => self
                .snapshots
                .iter()
                .filter(|s| s.parsed_date().is_some_and(|d| timeframe.contains(d)))
                .cloned()
                .collect(),
        }
    }
}

/// Repository over data already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPortfolio {
    dataset: PortfolioDataset,
}

impl InMemoryPortfolio {
    pub fn new(
        snapshots: Vec<DailySnapshot>,
        transactions: Vec<TransactionRecord>,
        holdings: Vec<HoldingRecord>,
    ) -> Self {
        Self::from_dataset(PortfolioDataset {
            snapshots,
            transactions,
            holdings,
        })
    }

    pub fn from_dataset(dataset: PortfolioDataset) -> Self {
        Self {
            dataset: dataset.sorted(),
        }
    }

    pub fn dataset(&self) -> &PortfolioDataset {
        &self.dataset
    }
}

impl SnapshotRepository for InMemoryPortfolio {
    fn snapshots(&self, timeframe: &Timeframe) -> Result<Vec<DailySnapshot>> {
        Ok(self.dataset.snapshots_in(timeframe))
    }
}

impl TransactionRepository for InMemoryPortfolio {
    fn transactions(&self) -> Result<Vec<TransactionRecord>> {
        Ok(self.dataset.transactions.clone())
    }
}

impl HoldingsRepository for InMemoryPortfolio {
    fn holdings(&self) -> Result<Vec<HoldingRecord>> {
        Ok(self.dataset.holdings.clone())
    }
}
