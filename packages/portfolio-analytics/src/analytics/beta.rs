//! Portfolio beta against a benchmark.

use super::math::{mean, percent_changes, safe_div};
use crate::types::{numeric, DailySnapshot, DatedReturn};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum number of date-aligned observations for a beta estimate.
pub const MIN_ALIGNED_POINTS: usize = 2;

/// Beta together with the number of aligned observations behind it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BetaEstimate {
    pub beta: f64,
    pub observations: usize,
}

impl BetaEstimate {
    pub fn is_sufficient(&self) -> bool {
        self.observations >= MIN_ALIGNED_POINTS
    }
}

/// Pair up the two series on the dates they share, in date order.
///
/// When a series repeats a date, its last observation for that date wins.
pub fn align_returns(portfolio: &[DatedReturn], benchmark: &[DatedReturn]) -> Vec<(f64, f64)> {
    let benchmark_by_date: BTreeMap<_, _> = benchmark.iter().map(|r| (r.date, r.value)).collect();
    let portfolio_by_date: BTreeMap<_, _> = portfolio.iter().map(|r| (r.date, r.value)).collect();

    portfolio_by_date
        .into_iter()
        .filter_map(|(date, p)| benchmark_by_date.get(&date).map(|&b| (p, b)))
        .collect()
}

/// Estimate beta over the date-aligned intersection of both series.
///
/// `beta = cov(portfolio, benchmark) / var(benchmark)`. The estimate is `0.0` when
/// fewer than two dates align or the benchmark does not move.
pub fn estimate_beta(portfolio: &[DatedReturn], benchmark: &[DatedReturn]) -> BetaEstimate {
    let pairs = align_returns(portfolio, benchmark);
    let observations = pairs.len();
    if observations < MIN_ALIGNED_POINTS {
        return BetaEstimate {
            beta: 0.0,
            observations,
        };
    }

    let (p, b): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
    let (p_mean, b_mean) = (mean(&p), mean(&b));
    let n = observations as f64;

    let covariance = p
        .iter()
        .zip(&b)
        .map(|(pi, bi)| (pi - p_mean) * (bi - b_mean))
        .sum::<f64>()
        / n;
    let variance = b.iter().map(|bi| (bi - b_mean).powi(2)).sum::<f64>() / n;

    BetaEstimate {
        beta: safe_div(covariance, variance),
        observations,
    }
}

/// Portfolio beta; `0.0` when there is not enough aligned data.
pub fn beta(portfolio: &[DatedReturn], benchmark: &[DatedReturn]) -> f64 {
    estimate_beta(portfolio, benchmark).beta
}

/// Portfolio beta, reporting a short aligned window as [`Error::InsufficientData`].
pub fn try_beta(portfolio: &[DatedReturn], benchmark: &[DatedReturn]) -> Result<f64> {
    let estimate = estimate_beta(portfolio, benchmark);
    if !estimate.is_sufficient() {
        return Err(Error::InsufficientData(format!(
            "Need at least {} aligned returns for beta, found {}",
            MIN_ALIGNED_POINTS, estimate.observations
        )));
    }
    Ok(estimate.beta)
}

/// Dated daily returns of the portfolio, in percent.
///
/// Uses each snapshot's precomputed time-weighted return when present, otherwise
/// the change in investment value from the previous snapshot. The first snapshot
/// is the starting value of the series and yields no return, even when it carries
/// a precomputed one. Snapshots with unparsable dates are skipped.
pub fn daily_returns(snapshots: &[DailySnapshot]) -> Vec<DatedReturn> {
    let values: Vec<f64> = snapshots.iter().map(|s| s.investments()).collect();
    let changes = percent_changes(&values);

    snapshots
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(i, s)| {
            let date = s.parsed_date()?;
            let value = match s.daily_time_weighted_return_percent {
                Some(r) => numeric(Some(r)),
                None => changes[i - 1],
            };
            Some(DatedReturn::new(date, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> Vec<DatedReturn> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| DatedReturn::new(start + chrono::Duration::days(i as i64), v))
            .collect()
    }

    #[test]
    fn test_beta_of_scaled_series() {
        let benchmark = series(&[1.0, -2.0, 0.5, 3.0, -1.0]);
        let portfolio = series(&[2.0, -4.0, 1.0, 6.0, -2.0]);
        assert_relative_eq!(beta(&portfolio, &benchmark), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_beta_against_itself_is_one() {
        let benchmark = series(&[0.3, -0.1, 0.7, -0.4]);
        assert_relative_eq!(beta(&benchmark, &benchmark), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_beta_uses_date_intersection() {
        let benchmark = series(&[1.0, 2.0, 3.0]);
        // Portfolio only overlaps on the last two days, and has one extra day
        let mut portfolio = series(&[99.0, 4.0, 6.0, 50.0]);
        portfolio.remove(0);

        let estimate = estimate_beta(&portfolio, &benchmark);
        assert_eq!(estimate.observations, 2);
        assert_relative_eq!(estimate.beta, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_beta_insufficient_data() {
        let benchmark = series(&[1.0]);
        let portfolio = series(&[2.0]);

        assert_eq!(beta(&portfolio, &benchmark), 0.0);
        assert!(matches!(
            try_beta(&portfolio, &benchmark),
            Err(Error::InsufficientData(_))
        ));
        assert_eq!(beta(&[], &benchmark), 0.0);
    }

    #[test]
    fn test_beta_flat_benchmark() {
        let benchmark = series(&[0.5, 0.5, 0.5]);
        let portfolio = series(&[1.0, -1.0, 2.0]);

        assert_eq!(beta(&portfolio, &benchmark), 0.0);
        assert!(try_beta(&portfolio, &benchmark).is_ok());
    }

    #[test]
    fn test_daily_returns_prefers_precomputed() {
        let snapshots = vec![
            DailySnapshot::new("2024-01-01", 100.0, 100.0, 0.0, 100.0),
            DailySnapshot::new("2024-01-02", 110.0, 110.0, 0.0, 100.0),
            DailySnapshot::new("2024-01-03", 121.0, 121.0, 0.0, 100.0).with_daily_return(3.0),
            DailySnapshot::new("bad", 1.0, 1.0, 0.0, 1.0),
        ];

        let returns = daily_returns(&snapshots);
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0].value, 10.0, epsilon = 1e-9);
        assert_eq!(returns[1].value, 3.0);
    }

    #[test]
    fn test_daily_returns_skip_first_snapshot() {
        let snapshots = vec![
            DailySnapshot::new("2024-01-01", 100.0, 100.0, 0.0, 100.0).with_daily_return(5.0),
            DailySnapshot::new("2024-01-02", 110.0, 110.0, 0.0, 100.0).with_daily_return(10.0),
            DailySnapshot::new("2024-01-03", 121.0, 121.0, 0.0, 100.0).with_daily_return(10.0),
        ];

        let returns = daily_returns(&snapshots);
        assert_eq!(returns.len(), 2);
        assert_eq!(returns[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(returns.iter().all(|r| r.value == 10.0));
    }
}
