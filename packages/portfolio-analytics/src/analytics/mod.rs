//! Portfolio analytics calculators.
//!
//! Provides the metrics orchestrator, risk metrics, ROI, time-weighted return and beta.
//! All of them share the [`safe_div`] policy.

mod beta;
mod math;
mod metrics;
mod report;
mod returns;
mod risk;
mod twr;

pub use beta::{
    align_returns, beta, daily_returns, estimate_beta, try_beta, BetaEstimate, MIN_ALIGNED_POINTS,
};
pub use math::{
    mean, percent_changes, population_std_dev, safe_div, safe_percentage, TRADING_DAYS_PER_YEAR,
};
pub use metrics::{
    calculate_portfolio_metrics, calculate_portfolio_metrics_as_of,
    calculate_portfolio_metrics_from_json, investment_volatility, period_dividends,
    weighted_dividend_yield, year_to_date_dividends,
};
pub use report::{build_report, PortfolioReport, ReportOptions, ReturnSummary, RiskSummary};
pub use returns::{
    annualized_roi, annualized_roi_for_window, net_external_cash_flow, roi, roi_for_window,
};
pub use risk::{
    annualized_mean, annualized_volatility, downside_deviation, max_drawdown, sharpe_ratio,
    sortino_ratio,
};
pub use twr::{
    annualize_return, compound_returns, sub_period_return, sub_period_returns,
    time_weighted_return, DAYS_PER_YEAR,
};
