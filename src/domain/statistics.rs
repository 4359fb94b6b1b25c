//! Summary statistics over a portfolio return/value series.

use super::error::EvalError;
use super::returns::{anchored, PortfolioSeries, ReturnPoint, ValuePoint};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Sample mean and sample standard deviation (denominator `n - 1`).
///
/// Fails with `DegenerateSeries` on fewer than two observations or when the
/// deviation is zero relative to the mean.
fn mean_and_stddev(returns: &[f64]) -> Result<(f64, f64), EvalError> {
    let n = returns.len();
    if n < 2 {
        return Err(EvalError::DegenerateSeries { observations: n });
    }

    let mean = returns.iter().sum::<f64>() / n as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let stddev = variance.sqrt();

    // Constant returns can leave rounding noise far below any real volatility.
    if !(stddev > mean.abs() * 1e-12) {
        return Err(EvalError::DegenerateSeries { observations: n });
    }

    Ok((mean, stddev))
}

/// mean / sample stddev * sqrt(trading_days).
pub fn sharpe_ratio(returns: &[f64], trading_days: f64) -> Result<f64, EvalError> {
    let (mean, stddev) = mean_and_stddev(returns)?;
    Ok(mean / stddev * trading_days.sqrt())
}

/// Sample stddev * sqrt(trading_days).
pub fn annualized_volatility(returns: &[f64], trading_days: f64) -> Result<f64, EvalError> {
    let (_, stddev) = mean_and_stddev(returns)?;
    Ok(stddev * trading_days.sqrt())
}

/// Worst `value / running_peak - 1`. Zero for empty, single-point and
/// non-decreasing series; never positive.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &v in values {
        if v > peak {
            peak = v;
        }
        let dd = v / peak - 1.0;
        if dd < worst {
            worst = dd;
        }
    }
    worst
}

/// Longest run of consecutive points strictly below the running peak.
pub fn max_drawdown_duration(values: &[f64]) -> usize {
    let mut peak = f64::NEG_INFINITY;
    let mut current = 0usize;
    let mut longest = 0usize;
    for &v in values {
        if v >= peak {
            peak = v;
            current = 0;
        } else {
            current += 1;
            longest = longest.max(current);
        }
    }
    longest
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub observations: usize,
    pub final_value: f64,
    pub total_return: f64,
    /// `None` when the return series is degenerate.
    pub sharpe_ratio: Option<f64>,
    pub annualized_volatility: Option<f64>,
    pub max_drawdown: f64,
    pub max_drawdown_duration: usize,
}

impl Summary {
    pub fn compute(series: &PortfolioSeries, trading_days: f64) -> Self {
        Self::from_parts(&series.returns, &series.values, trading_days)
    }

    /// `values` is the compounded curve without its 1.0 start; drawdown is
    /// measured from that start.
    pub fn from_parts(returns: &[ReturnPoint], values: &[ValuePoint], trading_days: f64) -> Self {
        let r: Vec<f64> = returns.iter().map(|p| p.value).collect();
        let v = anchored(values);

        let sharpe_ratio = match sharpe_ratio(&r, trading_days) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!("risk-adjusted ratio unavailable: {e}");
                None
            }
        };

        let final_value = v.last().copied().unwrap_or(1.0);

        Summary {
            observations: r.len(),
            final_value,
            total_return: final_value - 1.0,
            sharpe_ratio,
            annualized_volatility: annualized_volatility(&r, trading_days).ok(),
            max_drawdown: max_drawdown(&v),
            max_drawdown_duration: max_drawdown_duration(&v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn value_points(values: &[f64]) -> Vec<ValuePoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| ValuePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                value,
            })
            .collect()
    }

    fn return_points(values: &[f64]) -> Vec<ReturnPoint> {
        value_points(values)
            .into_iter()
            .map(|p| ReturnPoint {
                date: p.date,
                value: p.value,
            })
            .collect()
    }

    #[test]
    fn sharpe_uses_sample_stddev() {
        let r = [0.01, -0.02, 0.03, 0.00];
        // mean = 0.005; squared deviations sum = 0.0013; / 3
        let expected = 0.005 / (0.0013_f64 / 3.0).sqrt() * 252.0_f64.sqrt();
        assert_abs_diff_eq!(
            sharpe_ratio(&r, TRADING_DAYS_PER_YEAR).unwrap(),
            expected,
            epsilon = 1e-9
        );
    }

    #[test]
    fn sharpe_negative_for_losing_series() {
        let r = [-0.01, -0.02, 0.005];
        assert!(sharpe_ratio(&r, TRADING_DAYS_PER_YEAR).unwrap() < 0.0);
    }

    #[test]
    fn sharpe_degenerate_on_short_series() {
        assert!(matches!(
            sharpe_ratio(&[], TRADING_DAYS_PER_YEAR),
            Err(EvalError::DegenerateSeries { observations: 0 })
        ));
        assert!(matches!(
            sharpe_ratio(&[0.01], TRADING_DAYS_PER_YEAR),
            Err(EvalError::DegenerateSeries { observations: 1 })
        ));
    }

    #[test]
    fn sharpe_degenerate_on_zero_variance() {
        assert!(matches!(
            sharpe_ratio(&[0.0, 0.0, 0.0], TRADING_DAYS_PER_YEAR),
            Err(EvalError::DegenerateSeries { observations: 3 })
        ));
        assert!(matches!(
            sharpe_ratio(&[0.001; 10], TRADING_DAYS_PER_YEAR),
            Err(EvalError::DegenerateSeries { .. })
        ));
    }

    #[test]
    fn volatility_scales_with_trading_days() {
        let r = [0.01, -0.01];
        // sample stddev = sqrt(0.0002) ; annualized by sqrt(252)
        let expected = 0.0002_f64.sqrt() * 252.0_f64.sqrt();
        assert_abs_diff_eq!(
            annualized_volatility(&r, TRADING_DAYS_PER_YEAR).unwrap(),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn drawdown_zero_for_increasing_series() {
        assert_eq!(max_drawdown(&[1.0, 1.01, 1.05, 1.2]), 0.0);
        assert_eq!(max_drawdown_duration(&[1.0, 1.01, 1.05, 1.2]), 0);
    }

    #[test]
    fn drawdown_from_peak() {
        assert_abs_diff_eq!(max_drawdown(&[1.0, 1.20, 0.90]), -0.25, epsilon = 1e-12);
    }

    #[test]
    fn drawdown_picks_worst_trough() {
        let v = [1.0, 1.10, 0.90, 0.95, 0.80, 1.0];
        assert_abs_diff_eq!(max_drawdown(&v), 0.80 / 1.10 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn drawdown_of_single_point_and_empty_is_zero() {
        assert_eq!(max_drawdown(&[0.9]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(max_drawdown_duration(&[]), 0);
    }

    #[test]
    fn drawdown_duration_counts_longest_underwater_run() {
        let v = [1.0, 1.1, 1.0, 0.9, 0.85, 0.95, 1.2, 1.1];
        assert_eq!(max_drawdown_duration(&v), 4);
    }

    #[test]
    fn summary_collects_all_figures() {
        let returns = return_points(&[0.10, -0.10, 0.05]);
        let values = value_points(&[1.10, 0.99, 1.0395]);
        let s = Summary::from_parts(&returns, &values, TRADING_DAYS_PER_YEAR);

        assert_eq!(s.observations, 3);
        assert_abs_diff_eq!(s.final_value, 1.0395, epsilon = 1e-12);
        assert_abs_diff_eq!(s.total_return, 0.0395, epsilon = 1e-12);
        assert!(s.sharpe_ratio.is_some());
        assert!(s.annualized_volatility.is_some());
        assert_abs_diff_eq!(s.max_drawdown, 0.99 / 1.10 - 1.0, epsilon = 1e-12);
        assert_eq!(s.max_drawdown_duration, 2);
    }

    #[test]
    fn summary_drawdown_counts_loss_from_start() {
        let returns = return_points(&[-0.10, 0.95 / 0.90 - 1.0]);
        let values = value_points(&[0.90, 0.95]);
        let s = Summary::from_parts(&returns, &values, TRADING_DAYS_PER_YEAR);
        assert_abs_diff_eq!(s.max_drawdown, -0.10, epsilon = 1e-12);
        assert_eq!(s.max_drawdown_duration, 2);
    }

    #[test]
    fn summary_of_one_loss() {
        let s = Summary::from_parts(
            &return_points(&[-0.5]),
            &value_points(&[0.5]),
            TRADING_DAYS_PER_YEAR,
        );
        assert_abs_diff_eq!(s.max_drawdown, -0.5, epsilon = 1e-12);
        assert_eq!(s.sharpe_ratio, None);
    }

    #[test]
    fn summary_of_empty_series_degrades() {
        let s = Summary::from_parts(&[], &[], TRADING_DAYS_PER_YEAR);
        assert_eq!(s.observations, 0);
        assert_eq!(s.final_value, 1.0);
        assert_eq!(s.total_return, 0.0);
        assert_eq!(s.sharpe_ratio, None);
        assert_eq!(s.annualized_volatility, None);
        assert_eq!(s.max_drawdown, 0.0);
    }
}
