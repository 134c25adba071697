//! Portfolio Analytics - performance, risk and income analytics for a personal portfolio.
//!
//! This crate turns a series of daily portfolio snapshots, a transaction ledger and
//! the current holdings into structured reports:
//!
//! - **Portfolio metrics**: current state, period deltas, total return, volatility, income
//! - **Risk metrics**: Sharpe ratio, Sortino ratio, max drawdown
//! - **Returns**: ROI net of external cash flows, compounded time-weighted return
//! - **Beta**: sensitivity against a date-aligned benchmark return series
//!
//! Every calculator is a pure, synchronous function over borrowed slices. Divisions go
//! through [`analytics::safe_div`], which renders "no data" as `0` instead of `NaN`.
//!
//! # Example
//!
//! ```rust
//! use portfolio_analytics::{calculate_portfolio_metrics, DailySnapshot, Timeframe};
//!
//! let snapshots = vec![
//!     DailySnapshot::new("2024-01-01", 10_000.0, 8_000.0, 2_000.0, 7_500.0),
//!     DailySnapshot::new("2024-01-31", 11_000.0, 8_800.0, 2_200.0, 7_500.0),
//! ];
//!
//! let timeframe = Timeframe::bounded_by(&snapshots).unwrap_or(Timeframe::SinceInception);
//! let metrics = calculate_portfolio_metrics(&snapshots, timeframe, &[], &[]);
//! assert_eq!(metrics.period_total_change, 1_000.0);
//! ```

pub mod analytics;
pub mod config;
pub mod service;
pub mod store;
pub mod timeframe;
pub mod types;

// Re-export commonly used types
pub use config::AnalyticsConfig;
pub use timeframe::{Timeframe, TimeframePreset};
pub use types::{
    ApiResponse, DailySnapshot, DatedReturn, HoldingRecord, PortfolioMetrics, TransactionRecord,
    TransactionType,
};

// Re-export main functionality
pub use analytics::{
    beta, calculate_portfolio_metrics, calculate_portfolio_metrics_as_of,
    calculate_portfolio_metrics_from_json, compound_returns, max_drawdown, roi, safe_div,
    sharpe_ratio, sortino_ratio, time_weighted_return, try_beta, BetaEstimate, PortfolioReport,
    RiskSummary, ReturnSummary,
};
pub use service::AnalyticsService;
pub use store::{
    HoldingsRepository, InMemoryPortfolio, JsonPortfolioStore, PortfolioDataset,
    SnapshotRepository, TransactionRepository,
};

/// Error types for portfolio-analytics operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input type: {0}")]
    InputType(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Unsupported timeframe: {0}")]
    UnsupportedTimeframe(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for portfolio-analytics operations.
pub type Result<T> = std::result::Result<T, Error>;
