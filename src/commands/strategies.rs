//! Strategies command implementation

use anyhow::Result;
use market_regime_engine::strategies;

pub fn run() -> Result<()> {
    println!("Available strategies:");
    for name in strategies::available_strategies() {
        println!("  {}", name);
    }
    Ok(())
}
