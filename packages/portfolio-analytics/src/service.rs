//! Analytics over repository-backed data.

use crate::analytics::{build_report, calculate_portfolio_metrics_as_of, PortfolioReport, ReportOptions};
use crate::config::AnalyticsConfig;
use crate::store::{HoldingsRepository, SnapshotRepository, TransactionRepository};
use crate::timeframe::{Timeframe, TimeframePreset};
use crate::types::{DatedReturn, PortfolioMetrics};
use crate::Result;
use chrono::{NaiveDate, Utc};

/// Fetches a window from the repositories and runs the calculators over it.
pub struct AnalyticsService<'a> {
    snapshots: &'a dyn SnapshotRepository,
    transactions: &'a dyn TransactionRepository,
    holdings: &'a dyn HoldingsRepository,
    config: AnalyticsConfig,
}

impl<'a> AnalyticsService<'a> {
    pub fn new(
        snapshots: &'a dyn SnapshotRepository,
        transactions: &'a dyn TransactionRepository,
        holdings: &'a dyn HoldingsRepository,
        config: AnalyticsConfig,
    ) -> Self {
        Self {
            snapshots,
            transactions,
            holdings,
            config,
        }
    }

    /// Use one repository for all three data series.
    pub fn from_repository<R>(repository: &'a R, config: AnalyticsConfig) -> Self
    where
        R: SnapshotRepository + TransactionRepository + HoldingsRepository,
    {
        Self::new(repository, repository, repository, config)
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Resolve a preset against today's UTC date.
    pub fn resolve(&self, preset: Option<TimeframePreset>) -> Timeframe {
        preset
            .unwrap_or(self.config.default_timeframe)
            .to_timeframe(Utc::now().date_naive())
    }

    /// Portfolio metrics for `timeframe`.
    pub fn metrics(&self, timeframe: Timeframe) -> Result<PortfolioMetrics> {
        self.metrics_as_of(timeframe, Utc::now().date_naive())
    }

    pub fn metrics_as_of(&self, timeframe: Timeframe, today: NaiveDate) -> Result<PortfolioMetrics> {
        let snapshots = self.snapshots.snapshots(&timeframe)?;
        let transactions = self.transactions.transactions()?;
        let holdings = self.holdings.holdings()?;

        tracing::debug!(
            "Calculating metrics for {} over {} snapshots",
            timeframe,
            snapshots.len()
        );
        Ok(calculate_portfolio_metrics_as_of(
            &snapshots,
            timeframe,
            &transactions,
            &holdings,
            today,
        ))
    }

    /// Full report for `timeframe`, with beta when a benchmark series is given.
    pub fn report(
        &self,
        timeframe: Timeframe,
        benchmark: Option<&[DatedReturn]>,
    ) -> Result<PortfolioReport> {
        self.report_as_of(timeframe, benchmark, Utc::now().date_naive())
    }

    pub fn report_as_of(
        &self,
        timeframe: Timeframe,
        benchmark: Option<&[DatedReturn]>,
        today: NaiveDate,
    ) -> Result<PortfolioReport> {
        let snapshots = self.snapshots.snapshots(&timeframe)?;
        let transactions = self.transactions.transactions()?;
        let holdings = self.holdings.holdings()?;

        if snapshots.is_empty() {
            tracing::warn!("No snapshots in {}, report will be empty", timeframe);
        }

        let report = build_report(
            &snapshots,
            timeframe,
            &transactions,
            &holdings,
            ReportOptions {
                risk_free_rate: self.config.risk_free_rate,
                benchmark,
                today,
            },
        );

        if let Some(estimate) = report.beta.filter(|b| !b.is_sufficient()) {
            tracing::warn!(
                "Beta needs at least two aligned returns, found {}",
                estimate.observations
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryPortfolio;
    use crate::types::{DailySnapshot, HoldingRecord, TransactionRecord, TransactionType};
    use crate::Error;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn repository() -> InMemoryPortfolio {
        InMemoryPortfolio::new(
            vec![
                DailySnapshot::new("2023-12-15", 9_000.0, 7_000.0, 2_000.0, 7_000.0),
                DailySnapshot::new("2024-01-01", 10_000.0, 8_000.0, 2_000.0, 7_500.0),
                DailySnapshot::new("2024-01-31", 11_000.0, 8_800.0, 2_200.0, 7_500.0),
            ],
            vec![TransactionRecord::new("d1", TransactionType::Dividend, "2024-01-15", 50.0)],
            vec![
                HoldingRecord::new("VTI", 6_600.0, 1.2),
                HoldingRecord::new("SCHD", 2_200.0, 3.6),
            ],
        )
    }

    struct FailingSnapshots;

    impl SnapshotRepository for FailingSnapshots {
        fn snapshots(&self, _timeframe: &Timeframe) -> Result<Vec<DailySnapshot>> {
            Err(Error::Io(std::io::Error::other("backend unavailable")))
        }
    }

    #[test]
    fn test_metrics_for_bounded_window() {
        let repo = repository();
        let service = AnalyticsService::from_repository(&repo, AnalyticsConfig::default());

        let window = Timeframe::bounded(date(2024, 1, 1), date(2024, 1, 31));
        let metrics = service.metrics_as_of(window, date(2024, 2, 1)).unwrap();

        assert_eq!(metrics.period_total_change, 1_000.0);
        assert_relative_eq!(metrics.period_total_return_percent, 10.625);
        assert_relative_eq!(metrics.current_dividend_yield, 1.8, epsilon = 1e-9);
        assert_eq!(metrics.current_year_dividends, 50.0);
    }

    #[test]
    fn test_metrics_since_inception_uses_full_history() {
        let repo = repository();
        let service = AnalyticsService::from_repository(&repo, AnalyticsConfig::default());

        let metrics = service.metrics(Timeframe::SinceInception).unwrap();
        assert_eq!(metrics.period_total_change, 2_000.0);
        assert_eq!(metrics.period_low_value, 9_000.0);
    }

    #[test]
    fn test_report_as_of() {
        let repo = repository();
        let service = AnalyticsService::from_repository(&repo, AnalyticsConfig::default());

        let window = Timeframe::bounded(date(2024, 1, 1), date(2024, 1, 31));
        let report = service.report_as_of(window, None, date(2024, 2, 1)).unwrap();

        assert_eq!(report.timeframe, window);
        assert_eq!(report.metrics.period_dividends_received, 50.0);
        assert_relative_eq!(report.returns.roi, 10.0, epsilon = 1e-9);
        assert_eq!(report.returns.days, 30);
        assert!(report.beta.is_none());
    }

    #[test]
    fn test_repository_errors_propagate() {
        let repo = repository();
        let failing = FailingSnapshots;
        let service = AnalyticsService::new(&failing, &repo, &repo, AnalyticsConfig::default());

        assert!(matches!(service.metrics(Timeframe::SinceInception), Err(Error::Io(_))));
        assert!(service.report(Timeframe::SinceInception, None).is_err());
    }

    #[test]
    fn test_resolve_uses_configured_default() {
        let repo = repository();
        let config = AnalyticsConfig {
            default_timeframe: TimeframePreset::All,
            ..Default::default()
        };
        let service = AnalyticsService::from_repository(&repo, config);

        assert_eq!(service.resolve(None), Timeframe::SinceInception);
        assert!(!service.resolve(Some(TimeframePreset::OneWeek)).is_since_inception());
    }
}
