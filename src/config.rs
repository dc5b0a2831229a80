//! Configuration management
//!
//! Handles loading and parsing of the JSON pipeline configuration. Every
//! section has defaults matching the reference analysis (20-day windows,
//! three regimes, the three built-in strategies), so a partial file or no
//! file at all is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub features: FeatureConfig,
    pub clustering: ClusteringConfig,
    pub backtest: BacktestConfig,
    pub strategies: Vec<StrategyEntry>,
}

impl Config {
    /// Load configuration from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline can never run with
    pub fn validate(&self) -> Result<()> {
        if self.clustering.regimes == 0 {
            anyhow::bail!("clustering.regimes must be at least 1");
        }
        if self.features.volatility_window < 2 {
            anyhow::bail!("features.volatility_window must be at least 2");
        }
        if self.features.drawdown_window == 0 {
            anyhow::bail!("features.drawdown_window must be at least 1");
        }
        if self.clustering.tolerance.is_nan() || self.clustering.tolerance < 0.0 {
            anyhow::bail!("clustering.tolerance must be non-negative");
        }
        Ok(())
    }
}

/// Price data source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: String,
    pub price_column: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            path: "data/sp500.csv".to_string(),
            price_column: "Close".to_string(),
        }
    }
}

/// Rolling feature windows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub volatility_window: usize,
    pub drawdown_window: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        FeatureConfig {
            volatility_window: 20,
            drawdown_window: 20,
        }
    }
}

/// K-means settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub regimes: usize,
    pub max_iters: usize,
    pub tolerance: f64,
    /// Fixed seed for reproducible regimes; OS entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        ClusteringConfig {
            regimes: 3,
            max_iters: 100,
            tolerance: 1e-4,
            seed: None,
        }
    }
}

/// Backtest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Annual risk-free rate subtracted in the Sharpe ratio
    pub risk_free_rate: f64,
    pub results_dir: String,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            risk_free_rate: 0.0,
            results_dir: "results".to_string(),
        }
    }
}

/// One strategy to evaluate: registry name plus its parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyEntry {
    pub name: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl StrategyEntry {
    pub fn new(name: impl Into<String>, params: serde_json::Value) -> Self {
        StrategyEntry {
            name: name.into(),
            params,
        }
    }

    /// Buy & hold, 20-day momentum and 20-day / 1.5σ mean reversion
    pub fn defaults() -> Vec<StrategyEntry> {
        vec![
            StrategyEntry::new("buy_hold", serde_json::Value::Null),
            StrategyEntry::new("momentum", serde_json::json!({ "lookback": 20 })),
            StrategyEntry::new(
                "mean_reversion",
                serde_json::json!({ "window": 20, "threshold": 1.5 }),
            ),
        ]
    }
}

impl Config {
    /// Configured strategies, falling back to the built-in set
    pub fn strategy_entries(&self) -> Vec<StrategyEntry> {
        if self.strategies.is_empty() {
            StrategyEntry::defaults()
        } else {
            self.strategies.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "clustering": { "regimes": 4, "seed": 7 } }"#).unwrap();

        assert_eq!(config.clustering.regimes, 4);
        assert_eq!(config.clustering.seed, Some(7));
        assert_eq!(config.clustering.max_iters, 100);
        assert_eq!(config.features.volatility_window, 20);
        assert_eq!(config.data.price_column, "Close");
        assert_eq!(config.strategy_entries().len(), 3);
    }

    #[test]
    fn test_from_file_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "clustering": {{ "regimes": 0 }} }}"#).unwrap();
        assert!(Config::from_file(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "strategies": [ {{ "name": "momentum", "params": {{ "lookback": 5 }} }} ] }}"#
        )
        .unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.strategy_entries().len(), 1);
        assert_eq!(config.strategies[0].params["lookback"], 5);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/config.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
