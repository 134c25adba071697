//! Core data types for the portfolio analytics engine.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Read a nullable numeric column, treating absent and non-finite values as zero.
pub(crate) fn numeric(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parse a calendar date from the formats the upstream store emits.
///
/// Accepts plain dates (`2024-01-31`), RFC 3339 timestamps and naive
/// `YYYY-MM-DD HH:MM:SS` timestamps. Timestamps are truncated to their date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts.date());
        }
    }

    None
}

/// One row per calendar day describing the whole portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DailySnapshot {
    /// Snapshot date (`YYYY-MM-DD` or an RFC 3339 timestamp)
    pub date: String,
    /// Investments plus cash
    #[serde(default)]
    pub total_portfolio_value: Option<f64>,
    /// Market value of invested positions
    #[serde(default)]
    pub investment_value: Option<f64>,
    /// Uninvested cash
    #[serde(default)]
    pub cash_balance: Option<f64>,
    /// Original purchase cost of held positions
    #[serde(default)]
    pub cost_basis: Option<f64>,
    /// Dividend cash received on this day
    #[serde(default)]
    pub daily_dividend_cash: Option<f64>,
    /// Deposits minus withdrawals on this day
    #[serde(default)]
    pub net_cash_flow_today: Option<f64>,
    /// Precomputed sub-period return for this day, in percent
    #[serde(default)]
    pub daily_time_weighted_return_percent: Option<f64>,
}

impl DailySnapshot {
    /// Create a snapshot with the four balance-sheet figures set.
    pub fn new(
        date: &str,
        total_portfolio_value: f64,
        investment_value: f64,
        cash_balance: f64,
        cost_basis: f64,
    ) -> Self {
        Self {
            date: date.to_string(),
            total_portfolio_value: Some(total_portfolio_value),
            investment_value: Some(investment_value),
            cash_balance: Some(cash_balance),
            cost_basis: Some(cost_basis),
            ..Default::default()
        }
    }

    /// Set the precomputed daily time-weighted return (percent).
    pub fn with_daily_return(mut self, percent: f64) -> Self {
        self.daily_time_weighted_return_percent = Some(percent);
        self
    }

    /// Set the net external cash flow for the day.
    pub fn with_cash_flow(mut self, flow: f64) -> Self {
        self.net_cash_flow_today = Some(flow);
        self
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn total_value(&self) -> f64 {
        numeric(self.total_portfolio_value)
    }

    pub fn investments(&self) -> f64 {
        numeric(self.investment_value)
    }

    pub fn cash(&self) -> f64 {
        numeric(self.cash_balance)
    }

    pub fn cost(&self) -> f64 {
        numeric(self.cost_basis)
    }
}

/// Kind of ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
    Deposit,
    #[serde(alias = "withdrawal")]
    Withdraw,
    /// Any ledger type this engine does not interpret
    #[serde(other)]
    Other,
}

impl TransactionType {
    /// Whether the entry moves money across the portfolio boundary.
    pub fn is_external_flow(self) -> bool {
        matches!(self, TransactionType::Deposit | TransactionType::Withdraw)
    }
}

/// A single buy/sell/dividend/deposit/withdraw event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: String,
    pub transaction_type: TransactionType,
    /// Event date (`YYYY-MM-DD` or an RFC 3339 timestamp)
    pub transaction_date: String,
    #[serde(default)]
    pub shares: Option<f64>,
    #[serde(default)]
    pub price_per_share: Option<f64>,
    #[serde(default)]
    pub fee: Option<f64>,
    /// Cash amount of the event, computed upstream and trusted as-is
    #[serde(default)]
    pub gross_transaction_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker_id: Option<String>,
}

impl TransactionRecord {
    /// Create a ledger entry carrying only its type, date and gross amount.
    pub fn new(id: &str, transaction_type: TransactionType, date: &str, gross: f64) -> Self {
        Self {
            id: id.to_string(),
            transaction_type,
            transaction_date: date.to_string(),
            shares: None,
            price_per_share: None,
            fee: None,
            gross_transaction_amount: Some(gross),
            ticker_id: None,
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.transaction_date)
    }

    pub fn gross_amount(&self) -> f64 {
        numeric(self.gross_transaction_amount)
    }

    /// Whether the entry is dated within `[start, end]`, inclusive on both ends.
    pub fn falls_within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.parsed_date()
            .map(|date| date >= start && date <= end)
            .unwrap_or(false)
    }
}

/// Current position in a single ticker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HoldingRecord {
    pub ticker_id: String,
    pub symbol: String,
    #[serde(default)]
    pub shares: Option<f64>,
    /// Latest price times shares
    #[serde(default)]
    pub current_market_value: Option<f64>,
    #[serde(default)]
    pub average_cost_basis: Option<f64>,
    /// Trailing dividend yield of the security, in percent
    #[serde(default)]
    pub market_dividend_yield_percent: Option<f64>,
}

impl HoldingRecord {
    /// Create a holding with its market value and dividend yield set.
    pub fn new(symbol: &str, market_value: f64, dividend_yield_percent: f64) -> Self {
        Self {
            ticker_id: symbol.to_lowercase(),
            symbol: symbol.to_uppercase(),
            current_market_value: Some(market_value),
            market_dividend_yield_percent: Some(dividend_yield_percent),
            ..Default::default()
        }
    }

    pub fn market_value(&self) -> f64 {
        numeric(self.current_market_value)
    }

    pub fn dividend_yield(&self) -> f64 {
        numeric(self.market_dividend_yield_percent)
    }
}

/// A return observation keyed by date, used to align two series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DatedReturn {
    pub date: NaiveDate,
    /// Return for the day, in percent
    pub value: f64,
}

impl DatedReturn {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Performance, risk and income figures for one snapshot window.
///
/// Either every field is computed or the whole record is [`PortfolioMetrics::zero`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    /// Investments plus cash at the end of the window
    pub current_total_value: f64,
    pub current_investment_value: f64,
    pub current_cash_balance: f64,
    /// Share of the portfolio held in cash, in percent
    pub current_cash_percentage: f64,
    pub current_cost_basis: f64,
    pub current_unrealized_pl: f64,

    pub period_total_change: f64,
    pub period_total_change_percent: f64,
    /// Change in investment value (price appreciation and trades)
    pub period_investment_change: f64,
    pub period_investment_change_percent: f64,
    pub period_unrealized_pl: f64,

    /// Investment change plus dividends
    pub period_total_return: f64,
    pub period_total_return_percent: f64,
    pub period_dividends_received: f64,

    /// Annualized standard deviation of daily investment returns, in percent
    pub volatility: f64,
    pub current_year_dividends: f64,
    /// Value-weighted dividend yield of current holdings, in percent
    pub current_dividend_yield: f64,

    pub period_high_value: f64,
    pub period_low_value: f64,
    pub transaction_count: usize,
}

impl PortfolioMetrics {
    /// The canonical all-zero result.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// API response wrapper used by the command line interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl<T> From<crate::Result<T>> for ApiResponse<T> {
    fn from(result: crate::Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}
