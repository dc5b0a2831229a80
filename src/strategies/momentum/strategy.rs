//! Momentum signal generation

use crate::error::EngineError;
use crate::series::TimeSeries;
use crate::strategies::{flat_signals, Strategy};

use super::config::MomentumConfig;

#[derive(Debug, Clone)]
pub struct MomentumStrategy {
    config: MomentumConfig,
}

impl MomentumStrategy {
    pub fn new(config: MomentumConfig) -> Self {
        MomentumStrategy { config }
    }
}

impl Strategy for MomentumStrategy {
    fn name(&self) -> String {
        format!("Momentum({})", self.config.lookback)
    }

    fn generate_signals(&self, prices: &TimeSeries) -> crate::Result<TimeSeries> {
        let lookback = self.config.lookback;
        if lookback == 0 {
            return Err(EngineError::invalid("momentum lookback must be at least 1"));
        }
        if prices.len() < lookback {
            return Err(EngineError::InsufficientHistory {
                strategy: self.name(),
                required: lookback,
                available: prices.len(),
            });
        }

        let p = prices.values();
        let mut signals = flat_signals(prices)?;

        for i in lookback..p.len() {
            let change = p[i] - p[i - lookback];
            signals.set(i, if change > 0.0 { 1.0 } else { -1.0 })?;
        }

        Ok(signals)
    }
}
