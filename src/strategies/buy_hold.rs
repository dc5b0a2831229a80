//! Buy & Hold: fully long at every observation

use crate::series::TimeSeries;
use crate::strategies::{flat_signals, Strategy};

#[derive(Debug, Clone, Copy, Default)]
pub struct BuyHoldStrategy;

impl Strategy for BuyHoldStrategy {
    fn name(&self) -> String {
        "Buy & Hold".to_string()
    }

    fn generate_signals(&self, prices: &TimeSeries) -> crate::Result<TimeSeries> {
        let mut signals = flat_signals(prices)?;
        for i in 0..signals.len() {
            signals.set(i, 1.0)?;
        }
        Ok(signals)
    }
}

/// Create strategy from config (called by registry)
pub fn create(_params: &serde_json::Value) -> anyhow::Result<Box<dyn Strategy>> {
    Ok(Box::new(BuyHoldStrategy))
}
