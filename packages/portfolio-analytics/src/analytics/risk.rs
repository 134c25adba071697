//! Portfolio risk metrics.
//!
//! Provides Sharpe ratio, Sortino ratio, max drawdown, downside deviation and
//! annualized volatility.

use super::math::{mean, population_std_dev, safe_div};

/// Calculate the Sharpe ratio from precomputed figures.
///
/// # Arguments
///
/// * `portfolio_return` - Portfolio return over the period
/// * `risk_free_rate` - Risk-free return over the same period, in the same units
/// * `std_dev` - Standard deviation of the portfolio's returns
///
/// # Returns
///
/// `(portfolio_return - risk_free_rate) / std_dev`, or `0.0` when `std_dev` is zero.
pub fn sharpe_ratio(portfolio_return: f64, risk_free_rate: f64, std_dev: f64) -> f64 {
    excess_over(portfolio_return, risk_free_rate, std_dev)
}

/// Calculate the Sortino ratio from precomputed figures.
///
/// Same shape as [`sharpe_ratio`] but divides by the downside deviation, so only
/// negative volatility is penalized. Returns `0.0` when `downside_std_dev` is zero.
pub fn sortino_ratio(portfolio_return: f64, risk_free_rate: f64, downside_std_dev: f64) -> f64 {
    excess_over(portfolio_return, risk_free_rate, downside_std_dev)
}

fn excess_over(portfolio_return: f64, risk_free_rate: f64, deviation: f64) -> f64 {
    if deviation == 0.0 {
        return 0.0;
    }
    (portfolio_return - risk_free_rate) / deviation
}

/// Calculate maximum drawdown from a series of portfolio values.
///
/// Returns the largest peak-to-trough decline in percent (e.g. `50.0` for a halving).
/// Series with fewer than two points have no drawdown. A non-positive peak
/// contributes no drawdown.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &value in values {
        if value > peak {
            peak = value;
        }
        let drawdown = safe_div(peak - value, peak);
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }

    max_dd * 100.0
}

/// Downside deviation of `returns` below `target`.
///
/// Root mean square of the shortfalls `min(r - target, 0)` taken over all
/// observations, so periods above target count as zero shortfall.
pub fn downside_deviation(returns: &[f64], target: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let shortfall = returns
        .iter()
        .map(|r| (r - target).min(0.0).powi(2))
        .sum::<f64>()
        / returns.len() as f64;

    shortfall.sqrt()
}

/// Annualized volatility of periodic returns.
///
/// Population standard deviation scaled by `sqrt(periods_per_year)`; the result
/// is in the same units as `returns`.
pub fn annualized_volatility(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.len() < 2 || periods_per_year <= 0.0 {
        return 0.0;
    }
    population_std_dev(returns) * periods_per_year.sqrt()
}

/// Mean of periodic returns, annualized by simple scaling.
pub fn annualized_mean(returns: &[f64], periods_per_year: f64) -> f64 {
    mean(returns) * periods_per_year
}
