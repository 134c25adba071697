//! Simple return on investment net of external cash flows.

use super::math::safe_percentage;
use super::twr::annualize_return;
use crate::types::{DailySnapshot, TransactionRecord, TransactionType};
use chrono::NaiveDate;

/// Return on investment in percent.
///
/// `(ending - beginning - net_external_cash_flow) / beginning * 100`, or `0.0` when
/// `beginning_value` is not positive.
pub fn roi(beginning_value: f64, ending_value: f64, net_external_cash_flow: f64) -> f64 {
    safe_percentage(
        ending_value - beginning_value - net_external_cash_flow,
        beginning_value,
    )
}

/// Deposits minus withdrawals dated within `[start, end]`.
///
/// Buys, sells and dividends move money inside the portfolio and are ignored.
/// Withdrawals count as outflows regardless of the sign they were recorded with.
pub fn net_external_cash_flow(
    transactions: &[TransactionRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> f64 {
    transactions
        .iter()
        .filter(|t| t.transaction_type.is_external_flow() && t.falls_within(start, end))
        .map(|t| match t.transaction_type {
            TransactionType::Withdraw => -t.gross_amount().abs(),
            _ => t.gross_amount().abs(),
        })
        .sum()
}

/// Return on investment scaled to a 365-day year, in percent.
///
/// `0.0` when `beginning_value` is not positive or the holding period is shorter
/// than a day.
pub fn annualized_roi(
    beginning_value: f64,
    ending_value: f64,
    net_external_cash_flow: f64,
    days: i64,
) -> f64 {
    if beginning_value <= 0.0 {
        return 0.0;
    }
    annualize_return(roi(beginning_value, ending_value, net_external_cash_flow), days)
}

/// ROI between the first and last snapshot's total value.
///
/// Flows dated on the first snapshot's day are assumed to be already reflected in
/// its value, so the flow window opens the day after. Returns `0.0` for fewer
/// than two snapshots or unparsable endpoint dates.
pub fn roi_for_window(snapshots: &[DailySnapshot], transactions: &[TransactionRecord]) -> f64 {
    window_inputs(snapshots, transactions)
        .map(|w| roi(w.beginning, w.ending, w.flows))
        .unwrap_or(0.0)
}

/// [`roi_for_window`] annualized over the calendar days between the endpoints.
pub fn annualized_roi_for_window(
    snapshots: &[DailySnapshot],
    transactions: &[TransactionRecord],
) -> f64 {
    window_inputs(snapshots, transactions)
        .map(|w| annualized_roi(w.beginning, w.ending, w.flows, w.days))
        .unwrap_or(0.0)
}

struct WindowInputs {
    beginning: f64,
    ending: f64,
    flows: f64,
    days: i64,
}

fn window_inputs(
    snapshots: &[DailySnapshot],
    transactions: &[TransactionRecord],
) -> Option<WindowInputs> {
    if snapshots.len() < 2 {
        return None;
    }
    let (first, last) = (snapshots.first()?, snapshots.last()?);
    let (start, end) = (first.parsed_date()?, last.parsed_date()?);

    let flow_start = start.succ_opt().unwrap_or(start);
    let flows = if flow_start <= end {
        net_external_cash_flow(transactions, flow_start, end)
    } else {
        0.0
    };

    Some(WindowInputs {
        beginning: first.total_value(),
        ending: last.total_value(),
        flows,
        days: (end - start).num_days(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_roi_without_flows() {
        assert_relative_eq!(roi(10_000.0, 11_500.0, 0.0), 15.0);
        assert_relative_eq!(roi(10_000.0, 9_000.0, 0.0), -10.0);
    }

    #[test]
    fn test_roi_nets_out_deposits() {
        // 2000 of the growth is new money
        assert_relative_eq!(roi(10_000.0, 13_000.0, 2_000.0), 10.0);
        // A withdrawal hides a gain
        assert_relative_eq!(roi(10_000.0, 9_500.0, -1_000.0), 5.0);
    }

    #[test]
    fn test_roi_zero_beginning() {
        assert_eq!(roi(0.0, 5_000.0, 5_000.0), 0.0);
        assert_eq!(roi(-10.0, 5_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_net_external_cash_flow() {
        let transactions = vec![
            TransactionRecord::new("1", TransactionType::Deposit, "2024-01-05", 1_000.0),
            TransactionRecord::new("2", TransactionType::Withdraw, "2024-01-20", 300.0),
            TransactionRecord::new("3", TransactionType::Withdraw, "2024-01-21", -200.0),
            TransactionRecord::new("4", TransactionType::Dividend, "2024-01-15", 50.0),
            TransactionRecord::new("5", TransactionType::Buy, "2024-01-16", 700.0),
            TransactionRecord::new("6", TransactionType::Deposit, "2024-02-01", 9_999.0),
        ];

        let flow = net_external_cash_flow(&transactions, date(2024, 1, 1), date(2024, 1, 31));
        assert_relative_eq!(flow, 500.0);
    }

    #[test]
    fn test_roi_for_window() {
        let snapshots = vec![
            DailySnapshot::new("2024-01-01", 10_000.0, 8_000.0, 2_000.0, 7_500.0),
            DailySnapshot::new("2024-01-31", 12_000.0, 9_000.0, 3_000.0, 8_000.0),
        ];
        let transactions = vec![
            // Already in the opening value
            TransactionRecord::new("1", TransactionType::Deposit, "2024-01-01", 2_000.0),
            TransactionRecord::new("2", TransactionType::Deposit, "2024-01-10", 1_000.0),
        ];

        assert_relative_eq!(roi_for_window(&snapshots, &transactions), 10.0);
        assert_eq!(roi_for_window(&snapshots[..1], &transactions), 0.0);
    }

    #[test]
    fn test_annualized_roi() {
        // 10% over 183 days on a 365-day year
        let expected = (1.1_f64.powf(365.0 / 183.0) - 1.0) * 100.0;
        assert_relative_eq!(annualized_roi(10_000.0, 11_000.0, 0.0, 183), expected, epsilon = 1e-9);
        // Deposits are netted out before annualizing
        assert_relative_eq!(annualized_roi(10_000.0, 13_000.0, 2_000.0, 365), 10.0, epsilon = 1e-9);

        assert_eq!(annualized_roi(0.0, 5_000.0, 0.0, 365), 0.0);
        assert_eq!(annualized_roi(10_000.0, 11_000.0, 0.0, 0), 0.0);
    }

    #[test]
    fn test_annualized_roi_for_window() {
        let snapshots = vec![
            DailySnapshot::new("2023-01-01", 10_000.0, 10_000.0, 0.0, 10_000.0),
            DailySnapshot::new("2024-01-01", 12_100.0, 12_100.0, 0.0, 10_000.0),
        ];
        let transactions = vec![TransactionRecord::new(
            "1",
            TransactionType::Deposit,
            "2023-06-01",
            1_000.0,
        )];

        // 365 days: annualized equals the plain ROI of 11%
        assert_relative_eq!(
            annualized_roi_for_window(&snapshots, &transactions),
            roi_for_window(&snapshots, &transactions),
            epsilon = 1e-9
        );
        assert_relative_eq!(roi_for_window(&snapshots, &transactions), 11.0, epsilon = 1e-9);
        assert_eq!(annualized_roi_for_window(&snapshots[..1], &transactions), 0.0);
    }
}
