//! Analysis report
//!
//! Plain data collected by [`crate::analysis::run_analysis`], rendered as
//! text for the terminal or serialized as JSON.

use serde::Serialize;
use std::fmt;

use crate::attribution::{RegimePerformance, RegimeStats};
use crate::metrics::PerformanceMetrics;

const RULE_WIDTH: usize = 60;

/// Results for one strategy
#[derive(Debug, Clone, Serialize)]
pub struct StrategyReport {
    pub name: String,
    pub overall: PerformanceMetrics,
    pub by_regime: Vec<RegimePerformance>,
}

/// Everything produced by one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Number of input prices
    pub observations: usize,
    pub num_regimes: usize,
    pub regime_stats: Vec<RegimeStats>,
    pub inertia: f64,
    pub converged_at: Option<usize>,
    /// One `[volatility, drawdown]` row per regime
    pub centroids: Vec<Vec<f64>>,
    pub strategies: Vec<StrategyReport>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{}", rule)?;
        writeln!(f, "MARKET REGIMES")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Observations:       {}", self.observations)?;
        writeln!(f, "Inertia:            {:.6}", self.inertia)?;
        match self.converged_at {
            Some(iter) => writeln!(f, "Converged:          iteration {}", iter)?,
            None => writeln!(f, "Converged:          no (iteration limit)")?,
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:<8} {:>8} {:>8} {:>12} {:>12}",
            "Regime", "Periods", "Share", "Volatility", "Drawdown"
        )?;
        for stats in &self.regime_stats {
            let centroid = self.centroids.get(stats.regime);
            let vol = centroid.and_then(|c| c.first()).copied().unwrap_or(f64::NAN);
            let dd = centroid.and_then(|c| c.get(1)).copied().unwrap_or(f64::NAN);
            writeln!(
                f,
                "{:<8} {:>8} {:>7.1}% {:>12.4} {:>11.2}%",
                stats.regime,
                stats.periods,
                stats.share * 100.0,
                vol,
                dd * 100.0
            )?;
        }

        writeln!(f, "\n{}", rule)?;
        writeln!(f, "OVERALL PERFORMANCE")?;
        writeln!(f, "{}", rule)?;
        for strategy in &self.strategies {
            let m = &strategy.overall;
            writeln!(f, "{}", strategy.name)?;
            writeln!(f, "  Total Return:     {:.2}%", m.total_return * 100.0)?;
            writeln!(f, "  Annual Return:    {:.2}%", m.annual_return * 100.0)?;
            writeln!(f, "  Sharpe Ratio:     {:.2}", m.sharpe_ratio)?;
            writeln!(f, "  Max Drawdown:     {:.2}%", m.max_drawdown * 100.0)?;
        }

        writeln!(f, "\n{}", rule)?;
        writeln!(f, "PERFORMANCE BY REGIME")?;
        writeln!(f, "{}", rule)?;
        for strategy in &self.strategies {
            writeln!(f, "{}", strategy.name)?;
            if strategy.by_regime.is_empty() {
                writeln!(f, "  (no labelled periods)")?;
            }
            for perf in &strategy.by_regime {
                writeln!(
                    f,
                    "  Regime {}: ann. return {:>8.2}%  Sharpe {:>6.2}  ({} periods)",
                    perf.regime,
                    perf.annual_return * 100.0,
                    perf.sharpe_ratio,
                    perf.observations
                )?;
            }
        }
        writeln!(f, "{}", rule)
    }
}
