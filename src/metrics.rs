//! Performance metrics
//!
//! Stateless functions over a return series or an equity curve. They are
//! regime-agnostic; the attribution layer applies them to partitions.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::backtest::BacktestResult;
use crate::features::TRADING_DAYS;

/// Standard deviations below this are treated as zero risk
pub const MIN_STD_DEV: f64 = 1e-8;

/// Annualized Sharpe ratio with an annual risk-free rate.
///
/// Returns 0 for fewer than 2 observations or a flat series.
pub fn sharpe(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let std_dev = returns.std_dev();
    if !std_dev.is_finite() || std_dev < MIN_STD_DEV {
        return 0.0;
    }

    let annualized_mean = returns.mean() * TRADING_DAYS - risk_free_rate;
    let annualized_std = std_dev * TRADING_DAYS.sqrt();

    annualized_mean / annualized_std
}

/// Worst peak-to-trough decline of an equity curve (non-positive fraction)
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let Some(&first) = equity_curve.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &value in &equity_curve[1..] {
        if value > peak {
            peak = value;
        }
        let dd = (value - peak) / peak;
        max_dd = max_dd.min(dd);
    }

    max_dd
}

/// `(last - first) / first` over the equity curve
pub fn total_return(equity_curve: &[f64]) -> f64 {
    match (equity_curve.first(), equity_curve.last()) {
        (Some(&first), Some(&last)) if equity_curve.len() >= 2 => (last - first) / first,
        _ => 0.0,
    }
}

/// Mean periodic return scaled to a year
pub fn annual_return(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    returns.mean() * TRADING_DAYS
}

/// Full-sample statistics for one backtest
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub annual_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
}

impl PerformanceMetrics {
    pub fn from_result(result: &BacktestResult, risk_free_rate: f64) -> Self {
        let returns = result.returns().values();
        let equity = result.equity_curve().values();

        PerformanceMetrics {
            total_return: total_return(equity),
            annual_return: annual_return(returns),
            sharpe_ratio: sharpe(returns, risk_free_rate),
            max_drawdown: max_drawdown(equity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sharpe_flat_series_is_zero() {
        let flat = vec![0.001; 50];
        assert_eq!(sharpe(&flat, 0.0), 0.0);
        assert_eq!(sharpe(&[], 0.0), 0.0);
        assert_eq!(sharpe(&[0.05], 0.0), 0.0);
    }

    #[test]
    fn test_sharpe_value() {
        let returns = vec![0.01, -0.01, 0.02, 0.02];
        let mean = 0.01;
        let std = (0.0006_f64 / 3.0).sqrt();
        let expected = mean * 252.0 / (std * 252.0_f64.sqrt());
        assert_relative_eq!(sharpe(&returns, 0.0), expected, epsilon = 1e-9);

        let with_rf = (mean * 252.0 - 0.05) / (std * 252.0_f64.sqrt());
        assert_relative_eq!(sharpe(&returns, 0.05), with_rf, epsilon = 1e-9);
    }

    #[test]
    fn test_max_drawdown() {
        let equity = vec![100.0, 120.0, 90.0, 110.0, 80.0, 130.0];
        assert_relative_eq!(max_drawdown(&equity), (80.0 - 120.0) / 120.0, epsilon = 1e-12);
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(max_drawdown(&[100.0, 101.0, 102.0]), 0.0);
    }

    #[test]
    fn test_max_drawdown_scale_invariant() {
        let equity = vec![100.0, 95.0, 130.0, 70.0, 85.0];
        let scaled: Vec<f64> = equity.iter().map(|v| v * 3.7).collect();
        assert_relative_eq!(max_drawdown(&equity), max_drawdown(&scaled), epsilon = 1e-12);
    }

    #[test]
    fn test_total_and_annual_return() {
        assert_relative_eq!(total_return(&[100.0, 110.0, 99.0]), -0.01, epsilon = 1e-12);
        assert_eq!(total_return(&[100.0]), 0.0);
        assert_relative_eq!(annual_return(&[0.01, -0.01, 0.02, 0.02]), 0.01 * 252.0, epsilon = 1e-9);
        assert_eq!(annual_return(&[]), 0.0);
    }
}
