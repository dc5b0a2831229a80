//! Momentum Strategy Configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    /// Number of observations between compared prices
    pub lookback: usize,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        MomentumConfig { lookback: 20 }
    }
}

impl MomentumConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.lookback == 0 {
            anyhow::bail!("momentum lookback must be at least 1");
        }
        Ok(())
    }
}
