//! Shared arithmetic conventions.

/// Trading days per year used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Divide `numerator` by `denominator`, returning `0.0` whenever the denominator is
/// not strictly positive or the quotient is not finite.
///
/// "No data" and "no change" both render as zero.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator.is_nan() || denominator <= 0.0 {
        return 0.0;
    }
    let quotient = numerator / denominator;
    if quotient.is_finite() {
        quotient
    } else {
        0.0
    }
}

/// `change` as a percentage of `base`, with the [`safe_div`] policy.
pub fn safe_percentage(change: f64, base: f64) -> f64 {
    safe_div(change, base) * 100.0
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`); `0.0` for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Percent change between each consecutive pair of values.
///
/// A non-positive previous value yields `0.0` for that step.
pub fn percent_changes(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| safe_percentage(w[1] - w[0], w[0]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_safe_div_non_positive_denominator() {
        for numerator in [-10.0, 0.0, 3.5, 1e300] {
            assert_eq!(safe_div(numerator, 0.0), 0.0);
            assert_eq!(safe_div(numerator, -0.0), 0.0);
            assert_eq!(safe_div(numerator, -2.0), 0.0);
            assert_eq!(safe_div(numerator, f64::NEG_INFINITY), 0.0);
        }
        assert_eq!(safe_div(1.0, f64::NAN), 0.0);
    }

    #[test]
    fn test_safe_div_regular() {
        assert_eq!(safe_div(10.0, 4.0), 2.5);
        assert_eq!(safe_div(-10.0, 4.0), -2.5);
        assert_eq!(safe_div(f64::NAN, 4.0), 0.0);
    }

    #[test]
    fn test_safe_percentage() {
        assert_eq!(safe_percentage(1_000.0, 10_000.0), 10.0);
        assert_eq!(safe_percentage(1_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_population_std_dev() {
        // mean 5, squared deviations sum 32 over 8 values
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(population_std_dev(&values), 2.0);
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(population_std_dev(&[3.0, 3.0, 3.0]), 0.0);
    }

    #[test]
    fn test_percent_changes() {
        let changes = percent_changes(&[100.0, 110.0, 99.0, 0.0, 50.0]);
        assert_eq!(changes.len(), 4);
        assert_relative_eq!(changes[0], 10.0);
        assert_relative_eq!(changes[1], -10.0);
        assert_relative_eq!(changes[2], -100.0);
        // Growth from zero is not measurable
        assert_eq!(changes[3], 0.0);
        assert!(percent_changes(&[1.0]).is_empty());
    }
}
