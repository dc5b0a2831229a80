//! Mean Reversion Strategy Configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanReversionConfig {
    /// Trailing window for mean and standard deviation (default: 20)
    pub window: usize,
    /// Z-score magnitude that triggers a position (default: 1.0)
    pub threshold: f64,
}

impl Default for MeanReversionConfig {
    fn default() -> Self {
        MeanReversionConfig {
            window: 20,
            threshold: 1.0,
        }
    }
}

impl MeanReversionConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.window < 2 {
            anyhow::bail!("mean reversion window must be at least 2, got {}", self.window);
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            anyhow::bail!("mean reversion threshold must be a non-negative number");
        }
        Ok(())
    }
}
