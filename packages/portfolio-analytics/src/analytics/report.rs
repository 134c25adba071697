//! Combined performance, risk and income report.

use super::beta::{daily_returns, estimate_beta, BetaEstimate};
use super::math::TRADING_DAYS_PER_YEAR;
use super::metrics::calculate_portfolio_metrics_as_of;
use super::returns::{annualized_roi_for_window, roi_for_window};
use super::risk::{
    annualized_mean, annualized_volatility, downside_deviation, max_drawdown, sharpe_ratio,
    sortino_ratio,
};
use super::twr::{annualize_return, time_weighted_return};
use crate::timeframe::Timeframe;
use crate::types::{DailySnapshot, DatedReturn, HoldingRecord, PortfolioMetrics, TransactionRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Risk figures derived from the portfolio's daily returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    /// Number of daily returns the figures are based on
    pub observations: usize,
    /// Mean daily return scaled to a year, in percent
    pub annualized_return: f64,
    /// Annualized standard deviation of daily returns, in percent
    pub annualized_volatility: f64,
    /// Annualized downside deviation below zero, in percent
    pub downside_deviation: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    /// Largest peak-to-trough decline of total value, in percent
    pub max_drawdown: f64,
}

/// Return figures for the window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReturnSummary {
    /// Simple return net of deposits and withdrawals, in percent
    pub roi: f64,
    /// `roi` scaled to a 365-day year
    pub annualized_roi: f64,
    /// Cumulative time-weighted return, in percent
    pub time_weighted_return: f64,
    pub annualized_time_weighted_return: f64,
    /// Calendar days between the first and last snapshot
    pub days: i64,
}

/// Everything the engine knows about one window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioReport {
    pub timeframe: Timeframe,
    pub metrics: PortfolioMetrics,
    pub risk: RiskSummary,
    pub returns: ReturnSummary,
    /// Present only when a benchmark series was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<BetaEstimate>,
}

/// Inputs for [`build_report`] beyond the three data series.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions<'a> {
    /// Annual risk-free rate in percent
    pub risk_free_rate: f64,
    pub benchmark: Option<&'a [DatedReturn]>,
    pub today: NaiveDate,
}

/// Run every calculator over the same window.
pub fn build_report(
    snapshots: &[DailySnapshot],
    timeframe: Timeframe,
    transactions: &[TransactionRecord],
    holdings: &[HoldingRecord],
    options: ReportOptions<'_>,
) -> PortfolioReport {
    let metrics =
        calculate_portfolio_metrics_as_of(snapshots, timeframe, transactions, holdings, options.today);

    let portfolio_returns = daily_returns(snapshots);
    let beta = options
        .benchmark
        .map(|benchmark| estimate_beta(&portfolio_returns, benchmark));

    let daily: Vec<f64> = portfolio_returns.iter().map(|r| r.value).collect();

    PortfolioReport {
        timeframe,
        metrics,
        risk: risk_summary(snapshots, &daily, options.risk_free_rate),
        returns: return_summary(snapshots, transactions),
        beta,
    }
}

fn risk_summary(snapshots: &[DailySnapshot], daily: &[f64], risk_free_rate: f64) -> RiskSummary {
    let annualized_return = annualized_mean(daily, TRADING_DAYS_PER_YEAR);
    let volatility = annualized_volatility(daily, TRADING_DAYS_PER_YEAR);
    let downside = downside_deviation(daily, 0.0) * TRADING_DAYS_PER_YEAR.sqrt();
    let totals: Vec<f64> = snapshots.iter().map(|s| s.total_value()).collect();

    RiskSummary {
        observations: daily.len(),
        annualized_return,
        annualized_volatility: volatility,
        downside_deviation: downside,
        sharpe_ratio: sharpe_ratio(annualized_return, risk_free_rate, volatility),
        sortino_ratio: sortino_ratio(annualized_return, risk_free_rate, downside),
        max_drawdown: max_drawdown(&totals),
    }
}

fn return_summary(snapshots: &[DailySnapshot], transactions: &[TransactionRecord]) -> ReturnSummary {
    let window = Timeframe::bounded_by(snapshots);
    let (Some(Timeframe::Bounded { start, end }), true) = (window, snapshots.len() >= 2) else {
        return ReturnSummary::default();
    };

    let twr = time_weighted_return(snapshots, start, end);
    let days = (end - start).num_days();

    ReturnSummary {
        roi: roi_for_window(snapshots, transactions),
        annualized_roi: annualized_roi_for_window(snapshots, transactions),
        time_weighted_return: twr,
        annualized_time_weighted_return: annualize_return(twr, days),
        days,
    }
}
