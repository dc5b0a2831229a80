//! Market Regime Engine
//!
//! Detects market regimes by clustering rolling volatility and drawdown
//! features with k-means, backtests simple single-asset strategies, and
//! attributes their performance to each regime.

pub mod analysis;
pub mod attribution;
pub mod backtest;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod kmeans;
pub mod matrix;
pub mod metrics;
pub mod report;
pub mod series;
pub mod strategies;

pub use backtest::{BacktestResult, Backtester};
pub use config::Config;
pub use error::{EngineError, Result};
pub use kmeans::KMeans;
pub use matrix::Matrix;
pub use metrics::PerformanceMetrics;
pub use report::AnalysisReport;
pub use series::TimeSeries;
pub use strategies::Strategy;
