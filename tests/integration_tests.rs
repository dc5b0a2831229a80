//! Integration tests for the market regime engine
//!
//! These tests run the pipeline stages together the way the `analyze`
//! command does.

use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;

use market_regime_engine::analysis;
use market_regime_engine::attribution;
use market_regime_engine::config::StrategyEntry;
use market_regime_engine::features;
use market_regime_engine::kmeans::NoopObserver;
use market_regime_engine::strategies::{self, BuyHoldStrategy};
use market_regime_engine::{backtest, data, Config, KMeans, Matrix, TimeSeries};

// =============================================================================
// Test Utilities
// =============================================================================

/// Calm uptrend, a volatile selloff, then a calm recovery
fn generate_regime_prices(count: usize) -> Vec<f64> {
    let mut prices = Vec::with_capacity(count);
    let mut price = 100.0;
    let stress = count / 3..2 * count / 3;

    for i in 0..count {
        let change = if stress.contains(&i) {
            match i % 3 {
                0 => -0.045,
                1 => 0.02,
                _ => -0.01,
            }
        } else {
            0.002 + 0.003 * ((i as f64) * 1.3).sin()
        };
        price *= 1.0 + change;
        prices.push(price);
    }

    prices
}

fn write_price_csv(dir: &std::path::Path, prices: &[f64]) -> std::path::PathBuf {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let mut text = String::from("Date,Open,Close\n");
    for (i, p) in prices.iter().enumerate() {
        let date = start + Duration::days(i as i64);
        text.push_str(&format!("{},{:.4},\"{:.4}\"\n", date.format("%Y-%m-%d"), p, p));
    }
    let path = dir.join("prices.csv");
    std::fs::write(&path, text).unwrap();
    path
}

// =============================================================================
// Feature Tests
// =============================================================================

#[test]
fn test_log_returns_telescope() {
    let prices = TimeSeries::from_values(generate_regime_prices(60));
    let returns = features::log_returns(&prices).unwrap();

    let sum: f64 = returns.iter().sum();
    let expected = (prices.last().unwrap() / prices.first().unwrap()).ln();
    assert_relative_eq!(sum, expected, epsilon = 1e-10);
}

#[test]
fn test_feature_lengths() {
    let prices = TimeSeries::from_values(generate_regime_prices(100));
    let returns = features::log_returns(&prices).unwrap();

    let vol = features::rolling_volatility(&returns, 20).unwrap();
    let dd = features::rolling_drawdown(&prices, 20).unwrap();
    assert_eq!(vol.len(), 99 - 20 + 1);
    assert_eq!(dd.len(), 100 - 20 + 1);
    assert!(dd.iter().all(|d| d <= 0.0));

    let x = features::feature_matrix(&[&vol, &dd]).unwrap();
    assert_eq!(x.rows(), vol.len());
    assert_eq!(x.cols(), 2);

    assert!(features::rolling_volatility(&returns, 100).is_err());
    assert!(features::rolling_drawdown(&prices, 0).is_err());
}

// =============================================================================
// Clustering Tests
// =============================================================================

#[test]
fn test_separated_blobs_across_seeds() {
    let mut rows = Vec::new();
    for i in 0..20 {
        let jitter = (i as f64) * 0.001;
        rows.push(vec![0.1 + jitter, -0.01 - jitter]);
        rows.push(vec![0.6 + jitter, -0.30 - jitter]);
    }
    let x = Matrix::from_rows(&rows).unwrap();

    let mut baseline = KMeans::new(1, 100, 1e-4);
    baseline.fit_predict_seeded(&x, 0).unwrap();

    for seed in 0..8 {
        let mut km = KMeans::new(2, 100, 1e-4);
        let labels = km.fit_predict_seeded(&x, seed).unwrap();

        // alternating rows belong to alternating blobs
        assert!(labels.chunks(2).all(|pair| pair[0] != pair[1]));
        assert!(labels.iter().step_by(2).all(|&l| l == labels[0]));
        assert!(km.inertia() < baseline.inertia() * 0.01);
    }
}

#[test]
fn test_regimes_separate_stress_period() {
    let prices = TimeSeries::from_values(generate_regime_prices(240));
    let returns = features::log_returns(&prices).unwrap();
    let vol = features::rolling_volatility(&returns, 20).unwrap();
    let dd = features::rolling_drawdown(&prices, 20).unwrap();
    let x = features::feature_matrix(&[&vol, &dd]).unwrap();

    let mut km = KMeans::new(2, 100, 1e-4);
    let labels = km.fit_predict_seeded(&x, 42).unwrap();

    // deep inside the calm head and the stress middle
    let calm = labels[10];
    let stressed = labels[120];
    assert_ne!(calm, stressed);

    let centroids = km.centroids();
    assert!(centroids.get(stressed, 0).unwrap() > centroids.get(calm, 0).unwrap());
    assert!(centroids.get(stressed, 1).unwrap() < centroids.get(calm, 1).unwrap());
}

// =============================================================================
// Backtest & Attribution Tests
// =============================================================================

#[test]
fn test_buy_hold_equity_matches_prices() {
    let prices = TimeSeries::from_values(vec![100.0, 110.0, 99.0]);
    let result = backtest::run(&prices, &BuyHoldStrategy).unwrap();

    let equity = result.equity_curve().values();
    assert_relative_eq!(equity[0], 100.0);
    assert_relative_eq!(equity[1], 110.0, epsilon = 1e-9);
    assert_relative_eq!(equity[2], 99.0, epsilon = 1e-9);

    let m = result.metrics(0.0);
    assert_relative_eq!(m.total_return, -0.01, epsilon = 1e-9);
    assert_relative_eq!(m.max_drawdown, -0.1, epsilon = 1e-9);
}

#[test]
fn test_registry_strategies_backtest() {
    let prices = TimeSeries::from_values(generate_regime_prices(120));

    for entry in StrategyEntry::defaults() {
        let strategy = strategies::create_strategy(&entry.name, &entry.params).unwrap();
        let result = backtest::run(&prices, strategy.as_ref()).unwrap();

        assert_eq!(result.signals().len(), prices.len());
        assert_eq!(result.returns().len(), prices.len() - 1);
        assert_eq!(result.equity_curve().len(), prices.len());
        assert!(result.equity_curve().iter().all(|e| e > 0.0));
    }

    assert!(strategies::create_strategy("unknown", &serde_json::Value::Null).is_err());
}

#[test]
fn test_attribution_covers_labelled_returns() {
    let prices = TimeSeries::from_values(generate_regime_prices(150));
    let result = backtest::run(&prices, &BuyHoldStrategy).unwrap();
    let labels: Vec<usize> = (0..100).map(|i| usize::from(i >= 50)).collect();

    let parts = attribution::partition_returns(result.returns().values(), &labels, 2);
    assert_eq!(parts[0].len(), 50);
    assert_eq!(parts[1].len(), 50);
    assert_eq!(parts[1][0], result.returns().values()[50]);

    let perf = attribution::attribute(&result, &labels, 2, 0.0);
    assert_eq!(perf.len(), 2);
    assert_eq!(perf[0].observations + perf[1].observations, 100);
}

// =============================================================================
// End-to-End Tests
// =============================================================================

#[test]
fn test_csv_to_report() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_price_csv(dir.path(), &generate_regime_prices(200));

    let prices = data::read_price_series(&path, "Close").unwrap();
    assert_eq!(prices.len(), 200);
    assert_eq!(prices.date(0), Some("2020-01-01"));

    let mut config = Config::default();
    config.clustering.seed = Some(3);
    let mut rng = StdRng::seed_from_u64(3);
    let report = analysis::run_analysis(&prices, &config, &mut rng, &mut NoopObserver).unwrap();

    assert_eq!(report.observations, 200);
    assert_eq!(report.num_regimes, 3);
    assert_eq!(report.centroids.len(), 3);
    let share: f64 = report.regime_stats.iter().map(|s| s.share).sum();
    assert_relative_eq!(share, 1.0, epsilon = 1e-12);

    let names: Vec<&str> = report.strategies.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Buy & Hold", "Momentum(20)", "MeanReversion(20)"]);

    let text = report.render();
    assert!(text.contains("PERFORMANCE BY REGIME"));
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["strategies"].as_array().unwrap().len(), 3);
}

#[test]
fn test_same_seed_same_report() {
    let prices = TimeSeries::from_values(generate_regime_prices(180));
    let config = Config::default();

    let a = analysis::run_analysis(&prices, &config, &mut StdRng::seed_from_u64(11), &mut NoopObserver)
        .unwrap();
    let b = analysis::run_analysis(&prices, &config, &mut StdRng::seed_from_u64(11), &mut NoopObserver)
        .unwrap();

    assert_eq!(a.centroids, b.centroids);
    assert_eq!(a.regime_stats, b.regime_stats);
    assert_eq!(a.inertia, b.inertia);
}

#[test]
fn test_too_short_history_fails() {
    let prices = TimeSeries::from_values(generate_regime_prices(15));
    let mut rng = StdRng::seed_from_u64(0);
    assert!(analysis::run_analysis(&prices, &Config::default(), &mut rng, &mut NoopObserver).is_err());
}
