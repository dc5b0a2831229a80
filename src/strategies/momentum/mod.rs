//! Momentum Strategy
//!
//! Long when price is above its value `lookback` observations ago, short
//! otherwise.

mod config;
mod strategy;

pub use config::MomentumConfig;
pub use strategy::MomentumStrategy;

use crate::strategies::{parse_params, Strategy};

/// Create strategy from config (called by registry)
pub fn create(params: &serde_json::Value) -> anyhow::Result<Box<dyn Strategy>> {
    let config: MomentumConfig = parse_params("momentum", params)?;
    config.validate()?;
    Ok(Box::new(MomentumStrategy::new(config)))
}
