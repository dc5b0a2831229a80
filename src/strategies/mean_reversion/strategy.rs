//! Mean reversion signal generation

use statrs::statistics::Statistics;

use crate::error::EngineError;
use crate::metrics::MIN_STD_DEV;
use crate::series::TimeSeries;
use crate::strategies::{flat_signals, Strategy};

use super::config::MeanReversionConfig;

#[derive(Debug, Clone)]
pub struct MeanReversionStrategy {
    config: MeanReversionConfig,
}

impl MeanReversionStrategy {
    pub fn new(config: MeanReversionConfig) -> Self {
        MeanReversionStrategy { config }
    }

    /// Z-score of `price` against `history`; zero when history is flat
    fn z_score(history: &[f64], price: f64) -> f64 {
        let std_dev = history.std_dev();
        if std_dev > MIN_STD_DEV {
            (price - history.mean()) / std_dev
        } else {
            0.0
        }
    }
}

impl Strategy for MeanReversionStrategy {
    fn name(&self) -> String {
        format!("MeanReversion({})", self.config.window)
    }

    fn generate_signals(&self, prices: &TimeSeries) -> crate::Result<TimeSeries> {
        let window = self.config.window;
        let threshold = self.config.threshold;
        if window < 2 {
            return Err(EngineError::invalid("mean reversion window must be at least 2"));
        }
        if prices.len() < window {
            return Err(EngineError::InsufficientHistory {
                strategy: self.name(),
                required: window,
                available: prices.len(),
            });
        }

        let p = prices.values();
        let mut signals = flat_signals(prices)?;

        // Window excludes the bar being scored
        for i in window..p.len() {
            let z = Self::z_score(&p[i - window..i], p[i]);
            let signal = if z > threshold {
                -1.0
            } else if z < -threshold {
                1.0
            } else {
                0.0
            };
            signals.set(i, signal)?;
        }

        Ok(signals)
    }
}
