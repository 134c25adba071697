//! Portfolio metrics over a window of daily snapshots.
//!
//! [`calculate_portfolio_metrics`] never fails: empty input, unparsable boundary
//! dates and non-finite arithmetic all degrade to [`PortfolioMetrics::zero`].

use super::math::{percent_changes, population_std_dev, safe_percentage, TRADING_DAYS_PER_YEAR};
use crate::timeframe::Timeframe;
use crate::types::{
    DailySnapshot, HoldingRecord, PortfolioMetrics, TransactionRecord, TransactionType,
};
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate, Utc};

/// Calculate portfolio metrics for the window covered by `snapshots`.
///
/// The first snapshot is the period start and the last is the current state.
/// `timeframe` only selects how total return is measured: against cost basis
/// for [`Timeframe::SinceInception`], against the window start otherwise.
/// Year-to-date dividends use the current UTC date.
pub fn calculate_portfolio_metrics(
    snapshots: &[DailySnapshot],
    timeframe: Timeframe,
    transactions: &[TransactionRecord],
    holdings: &[HoldingRecord],
) -> PortfolioMetrics {
    let today = Utc::now().date_naive();
    calculate_portfolio_metrics_as_of(snapshots, timeframe, transactions, holdings, today)
}

/// Same as [`calculate_portfolio_metrics`] with an explicit "today" for the
/// year-to-date dividend figure.
pub fn calculate_portfolio_metrics_as_of(
    snapshots: &[DailySnapshot],
    timeframe: Timeframe,
    transactions: &[TransactionRecord],
    holdings: &[HoldingRecord],
    today: NaiveDate,
) -> PortfolioMetrics {
    if snapshots.is_empty() {
        return PortfolioMetrics::zero();
    }

    match compute(snapshots, timeframe, transactions, holdings, today) {
        Ok(metrics) => metrics,
        Err(e) => {
            tracing::error!("Error calculating portfolio metrics: {}", e);
            PortfolioMetrics::zero()
        }
    }
}

/// Calculate portfolio metrics from an untyped snapshot payload.
///
/// Fails with [`Error::InputType`] when `snapshots` is not a JSON array. Rows that
/// do not match the snapshot schema degrade to the zero result like any other
/// data problem.
pub fn calculate_portfolio_metrics_from_json(
    snapshots: &serde_json::Value,
    timeframe: Timeframe,
    transactions: &[TransactionRecord],
    holdings: &[HoldingRecord],
) -> Result<PortfolioMetrics> {
    if !snapshots.is_array() {
        return Err(Error::InputType(
            "Daily snapshots must be an array".to_string(),
        ));
    }

    match serde_json::from_value::<Vec<DailySnapshot>>(snapshots.clone()) {
        Ok(rows) => Ok(calculate_portfolio_metrics(
            &rows,
            timeframe,
            transactions,
            holdings,
        )),
        Err(e) => {
            tracing::error!("Error calculating portfolio metrics: malformed snapshot: {}", e);
            Ok(PortfolioMetrics::zero())
        }
    }
}

fn compute(
    snapshots: &[DailySnapshot],
    timeframe: Timeframe,
    transactions: &[TransactionRecord],
    holdings: &[HoldingRecord],
    today: NaiveDate,
) -> Result<PortfolioMetrics> {
    let (first, last) = match (snapshots.first(), snapshots.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(PortfolioMetrics::zero()),
    };

    let start_date = first
        .parsed_date()
        .ok_or_else(|| Error::DataIntegrity(format!("Invalid start date: {:?}", first.date)))?;
    let end_date = last
        .parsed_date()
        .ok_or_else(|| Error::DataIntegrity(format!("Invalid end date: {:?}", last.date)))?;

    // Current state
    let current_total_value = last.total_value();
    let current_investment_value = last.investments();
    let current_cash_balance = last.cash();
    let current_cost_basis = last.cost();
    let current_cash_percentage = safe_percentage(current_cash_balance, current_total_value);
    let current_unrealized_pl = current_investment_value - current_cost_basis;

    // Period start, falling back to the current figure when absent
    let previous_total_value = or_current(first.total_portfolio_value, current_total_value);
    let previous_investment_value = or_current(first.investment_value, current_investment_value);
    let previous_cost_basis = or_current(first.cost_basis, current_cost_basis);
    let previous_unrealized_pl = previous_investment_value - previous_cost_basis;

    let period_total_change = current_total_value - previous_total_value;
    let period_total_change_percent = safe_percentage(period_total_change, previous_total_value);
    let period_investment_change = current_investment_value - previous_investment_value;
    let period_investment_change_percent =
        safe_percentage(period_investment_change, previous_investment_value);

    let (period_high_value, period_low_value) = snapshots.iter().map(|s| s.total_value()).fold(
        (f64::NEG_INFINITY, f64::INFINITY),
        |(high, low), v| (high.max(v), low.min(v)),
    );

    let period_dividends_received = period_dividends(transactions, start_date, end_date);
    let transaction_count = transactions
        .iter()
        .filter(|t| t.falls_within(start_date, end_date))
        .count();

    let (period_total_return, period_total_return_percent, period_unrealized_pl) = match timeframe
    {
        Timeframe::SinceInception => {
            let total_return = current_unrealized_pl + period_dividends_received;
            (
                total_return,
                safe_percentage(total_return, current_cost_basis),
                current_unrealized_pl,
            )
        }
        Timeframe::Bounded { .. } => {
            let total_return = period_investment_change + period_dividends_received;
            (
                total_return,
                safe_percentage(total_return, previous_investment_value),
                current_unrealized_pl - previous_unrealized_pl,
            )
        }
    };

    let metrics = PortfolioMetrics {
        current_total_value,
        current_investment_value,
        current_cash_balance,
        current_cash_percentage,
        current_cost_basis,
        current_unrealized_pl,
        period_total_change,
        period_total_change_percent,
        period_investment_change,
        period_investment_change_percent,
        period_unrealized_pl,
        period_total_return,
        period_total_return_percent,
        period_dividends_received,
        volatility: investment_volatility(snapshots),
        current_year_dividends: year_to_date_dividends(transactions, today),
        current_dividend_yield: weighted_dividend_yield(holdings),
        period_high_value,
        period_low_value,
        transaction_count,
    };

    ensure_finite(&metrics)?;
    Ok(metrics)
}

/// Treat absent, zero and non-finite period-start figures as "no anchor".
fn or_current(value: Option<f64>, current: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v != 0.0 => v,
        _ => current,
    }
}

fn ensure_finite(metrics: &PortfolioMetrics) -> Result<()> {
    let fields = [
        metrics.current_total_value,
        metrics.current_investment_value,
        metrics.current_cash_balance,
        metrics.current_cash_percentage,
        metrics.current_cost_basis,
        metrics.current_unrealized_pl,
        metrics.period_total_change,
        metrics.period_total_change_percent,
        metrics.period_investment_change,
        metrics.period_investment_change_percent,
        metrics.period_unrealized_pl,
        metrics.period_total_return,
        metrics.period_total_return_percent,
        metrics.period_dividends_received,
        metrics.volatility,
        metrics.current_year_dividends,
        metrics.current_dividend_yield,
        metrics.period_high_value,
        metrics.period_low_value,
    ];

    if fields.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::DataIntegrity(
            "Non-finite value in computed metrics".to_string(),
        ))
    }
}

/// Total dividends dated within `[start, end]`.
pub fn period_dividends(
    transactions: &[TransactionRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> f64 {
    transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Dividend && t.falls_within(start, end))
        .map(|t| t.gross_amount())
        .sum()
}

/// Dividends received in the calendar year of `today`.
pub fn year_to_date_dividends(transactions: &[TransactionRecord], today: NaiveDate) -> f64 {
    transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Dividend)
        .filter(|t| {
            t.parsed_date()
                .map(|d| d.year() == today.year())
                .unwrap_or(false)
        })
        .map(|t| t.gross_amount())
        .sum()
}

/// Market-value-weighted mean dividend yield of `holdings`, in percent.
pub fn weighted_dividend_yield(holdings: &[HoldingRecord]) -> f64 {
    let total_value: f64 = holdings.iter().map(|h| h.market_value()).sum();
    if holdings.is_empty() || total_value <= 0.0 {
        return 0.0;
    }

    holdings
        .iter()
        .map(|h| h.dividend_yield() * (h.market_value() / total_value))
        .sum()
}

/// Annualized volatility of day-over-day investment value changes, in percent.
pub fn investment_volatility(snapshots: &[DailySnapshot]) -> f64 {
    if snapshots.len() < 2 {
        return 0.0;
    }

    let values: Vec<f64> = snapshots.iter().map(|s| s.investments()).collect();
    population_std_dev(&percent_changes(&values)) * TRADING_DAYS_PER_YEAR.sqrt()
}
