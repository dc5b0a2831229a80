//! Mean Reversion Strategy
//!
//! Fades moves away from the trailing mean: short when the z-score of the
//! current price against the previous `window` prices exceeds `threshold`,
//! long when it falls below `-threshold`, flat in between.

mod config;
mod strategy;

pub use config::MeanReversionConfig;
pub use strategy::MeanReversionStrategy;

use crate::strategies::{parse_params, Strategy};

/// Create strategy from config (called by registry)
pub fn create(params: &serde_json::Value) -> anyhow::Result<Box<dyn Strategy>> {
    let config: MeanReversionConfig = parse_params("mean_reversion", params)?;
    config.validate()?;
    Ok(Box::new(MeanReversionStrategy::new(config)))
}
