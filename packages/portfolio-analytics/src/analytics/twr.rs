//! Time-weighted return.
//!
//! Day-level sub-period returns are computed upstream and stored on each
//! snapshot; this module chain-links them over an arbitrary window.

use super::math::safe_percentage;
use crate::types::{numeric, DailySnapshot};
use chrono::NaiveDate;

/// Days per year used to annualize calendar-day windows.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Return of a single sub-period in percent, with the external flow removed.
///
/// `(end - flow - start) / start * 100`; `0.0` when `start_value` is not positive.
pub fn sub_period_return(start_value: f64, end_value: f64, external_flow: f64) -> f64 {
    safe_percentage(end_value - external_flow - start_value, start_value)
}

/// Chain-link percent returns: `(prod(1 + r/100) - 1) * 100`.
pub fn compound_returns(percents: &[f64]) -> f64 {
    let growth = percents
        .iter()
        .fold(1.0, |acc, r| acc * (1.0 + r / 100.0));
    (growth - 1.0) * 100.0
}

/// Cumulative time-weighted return over `[start, end]`, in percent.
///
/// The first snapshot dated inside the window is the starting value, so `n`
/// snapshots link `n - 1` sub-periods. Each sub-period uses the later day's
/// `daily_time_weighted_return_percent` when present and otherwise falls back to
/// [`sub_period_return`] over the two closing values and the later day's net flow.
/// Snapshots with an unparsable date are skipped.
pub fn time_weighted_return(snapshots: &[DailySnapshot], start: NaiveDate, end: NaiveDate) -> f64 {
    let window: Vec<&DailySnapshot> = snapshots
        .iter()
        .filter(|s| {
            s.parsed_date()
                .map(|d| d >= start && d <= end)
                .unwrap_or(false)
        })
        .collect();

    let linked: Vec<f64> = window
        .windows(2)
        .map(|pair| linked_return(pair[0], pair[1]))
        .collect();

    compound_returns(&linked)
}

fn linked_return(previous: &DailySnapshot, current: &DailySnapshot) -> f64 {
    match current.daily_time_weighted_return_percent {
        Some(r) if r.is_finite() => r,
        _ => sub_period_return(
            previous.total_value(),
            current.total_value(),
            numeric(current.net_cash_flow_today),
        ),
    }
}

/// Sub-period returns recomputed from snapshot values and daily net cash flows.
///
/// Useful when the precomputed daily return is absent: the flow of the later day
/// is taken out of its closing value.
pub fn sub_period_returns(snapshots: &[DailySnapshot]) -> Vec<f64> {
    snapshots
        .windows(2)
        .map(|w| {
            sub_period_return(
                w[0].total_value(),
                w[1].total_value(),
                numeric(w[1].net_cash_flow_today),
            )
        })
        .collect()
}

/// Annualize a cumulative percent return earned over `days` calendar days.
///
/// Windows shorter than a day return `0.0`.
pub fn annualize_return(cumulative_percent: f64, days: i64) -> f64 {
    if days <= 0 {
        return 0.0;
    }

    let years = days as f64 / DAYS_PER_YEAR;
    let total_return = 1.0 + (cumulative_percent / 100.0);
    if total_return <= 0.0 {
        return -100.0;
    }

    (total_return.powf(1.0 / years) - 1.0) * 100.0
}
