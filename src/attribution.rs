//! Regime-conditioned attribution
//!
//! Splits a backtest's returns by the regime label at each step and
//! recomputes metrics per regime. Labels and returns are aligned by index up
//! to the shorter of the two sequences; labels are usually shorter because
//! the feature windows consume the head of the series.

use serde::Serialize;

use crate::backtest::BacktestResult;
use crate::metrics;

/// Performance of one strategy restricted to one regime
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimePerformance {
    pub regime: usize,
    pub observations: usize,
    pub annual_return: f64,
    pub sharpe_ratio: f64,
}

/// Occupancy of one regime over the labelled sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeStats {
    pub regime: usize,
    pub periods: usize,
    /// Share of labelled periods, as a fraction
    pub share: f64,
}

/// Group `returns` by `labels`. Index `r` holds the returns labelled `r`;
/// labels outside `[0, num_regimes)` are ignored.
pub fn partition_returns(returns: &[f64], labels: &[usize], num_regimes: usize) -> Vec<Vec<f64>> {
    let mut partitions = vec![Vec::new(); num_regimes];
    for (&label, &ret) in labels.iter().zip(returns) {
        if let Some(bucket) = partitions.get_mut(label) {
            bucket.push(ret);
        }
    }
    partitions
}

/// Per-regime annual return and Sharpe. Regimes with no aligned returns
/// are skipped.
pub fn attribute(
    result: &BacktestResult,
    labels: &[usize],
    num_regimes: usize,
    risk_free_rate: f64,
) -> Vec<RegimePerformance> {
    partition_returns(result.returns().values(), labels, num_regimes)
        .into_iter()
        .enumerate()
        .filter(|(_, returns)| !returns.is_empty())
        .map(|(regime, returns)| RegimePerformance {
            regime,
            observations: returns.len(),
            annual_return: metrics::annual_return(&returns),
            sharpe_ratio: metrics::sharpe(&returns, risk_free_rate),
        })
        .collect()
}

/// Count how many periods fall in each regime
pub fn regime_stats(labels: &[usize], num_regimes: usize) -> Vec<RegimeStats> {
    let mut counts = vec![0usize; num_regimes];
    for &label in labels {
        if let Some(count) = counts.get_mut(label) {
            *count += 1;
        }
    }

    let total = labels.len();
    counts
        .into_iter()
        .enumerate()
        .map(|(regime, periods)| RegimeStats {
            regime,
            periods,
            share: if total > 0 {
                periods as f64 / total as f64
            } else {
                0.0
            },
        })
        .collect()
}
