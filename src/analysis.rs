//! End-to-end regime analysis
//!
//! Wires the stages together: prices → rolling features → k-means regimes,
//! and independently prices → strategy backtests, joined at attribution.

use anyhow::Context;
use rand::Rng;
use tracing::info;

use crate::attribution;
use crate::backtest::{self, BacktestResult};
use crate::config::{ClusteringConfig, Config, FeatureConfig};
use crate::features;
use crate::kmeans::{FitObserver, KMeans};
use crate::metrics::PerformanceMetrics;
use crate::report::{AnalysisReport, StrategyReport};
use crate::series::TimeSeries;
use crate::strategies;

/// Regime labels and the fitted clustering model summary
#[derive(Debug, Clone)]
pub struct RegimeDetection {
    /// One label per feature row
    pub labels: Vec<usize>,
    pub inertia: f64,
    pub centroids: Vec<Vec<f64>>,
    pub converged_at: Option<usize>,
}

/// Build volatility/drawdown features from `prices` and cluster them
pub fn detect_regimes<R: Rng + ?Sized>(
    prices: &TimeSeries,
    features_config: &FeatureConfig,
    clustering: &ClusteringConfig,
    rng: &mut R,
    observer: &mut dyn FitObserver,
) -> crate::Result<RegimeDetection> {
    let returns = features::log_returns(prices)?;
    let vol = features::rolling_volatility(&returns, features_config.volatility_window)?;
    let dd = features::rolling_drawdown(prices, features_config.drawdown_window)?;
    let x = features::feature_matrix(&[&vol, &dd])?;

    let mut km = KMeans::new(clustering.regimes, clustering.max_iters, clustering.tolerance);
    let labels = km.fit_predict_observed(&x, rng, observer)?;

    Ok(RegimeDetection {
        labels,
        inertia: km.inertia(),
        centroids: km.centroids().to_rows(),
        converged_at: km.converged_at(),
    })
}

/// Run the full pipeline and assemble the report
pub fn run_analysis<R: Rng + ?Sized>(
    prices: &TimeSeries,
    config: &Config,
    rng: &mut R,
    observer: &mut dyn FitObserver,
) -> anyhow::Result<AnalysisReport> {
    let detection = detect_regimes(prices, &config.features, &config.clustering, rng, observer)
        .context("Regime detection failed")?;
    info!(
        regimes = config.clustering.regimes,
        inertia = detection.inertia,
        "Regimes detected"
    );

    let num_regimes = config.clustering.regimes;
    let risk_free_rate = config.backtest.risk_free_rate;
    let mut strategy_reports = Vec::new();

    for entry in config.strategy_entries() {
        let strategy = strategies::create_strategy(&entry.name, &entry.params)?;
        let name = strategy.name();
        info!("Backtesting {}", name);

        let result: BacktestResult = backtest::run(prices, strategy.as_ref())
            .with_context(|| format!("Backtest failed for {}", name))?;

        strategy_reports.push(StrategyReport {
            overall: PerformanceMetrics::from_result(&result, risk_free_rate),
            by_regime: attribution::attribute(
                &result,
                &detection.labels,
                num_regimes,
                risk_free_rate,
            ),
            name,
        });
    }

    Ok(AnalysisReport {
        observations: prices.len(),
        num_regimes,
        regime_stats: attribution::regime_stats(&detection.labels, num_regimes),
        inertia: detection.inertia,
        converged_at: detection.converged_at,
        centroids: detection.centroids,
        strategies: strategy_reports,
    })
}
