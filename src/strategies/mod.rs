//! Trading Strategies Module
//!
//! Strategies are stateless signal generators: given the full price series
//! they return one position weight per observation. A registry maps config
//! names to factories so new strategies can be added without touching the
//! command layer.

pub mod buy_hold;
pub mod mean_reversion;
pub mod momentum;

pub use buy_hold::BuyHoldStrategy;
pub use mean_reversion::{MeanReversionConfig, MeanReversionStrategy};
pub use momentum::{MomentumConfig, MomentumStrategy};

use crate::series::TimeSeries;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

// =============================================================================
// Strategy Trait
// =============================================================================

/// Signal generator consumed by the backtester.
///
/// `generate_signals` must return a series of the same length as `prices`.
/// Values are unconstrained position weights (typically -1, 0 or +1).
pub trait Strategy: Send + Sync {
    /// Display name used in reports
    fn name(&self) -> String;

    fn generate_signals(&self, prices: &TimeSeries) -> crate::Result<TimeSeries>;
}

// =============================================================================
// Strategy Registry
// =============================================================================

/// Factory building a strategy from its JSON parameters
pub type StrategyFactory = fn(&serde_json::Value) -> anyhow::Result<Box<dyn Strategy>>;

static REGISTRY: OnceLock<RwLock<HashMap<&'static str, StrategyFactory>>> = OnceLock::new();

fn get_registry() -> &'static RwLock<HashMap<&'static str, StrategyFactory>> {
    REGISTRY.get_or_init(|| {
        let mut map = HashMap::new();
        map.insert("buy_hold", buy_hold::create as StrategyFactory);
        map.insert("momentum", momentum::create as StrategyFactory);
        map.insert("mean_reversion", mean_reversion::create as StrategyFactory);
        RwLock::new(map)
    })
}

/// Create a strategy by registry name
pub fn create_strategy(name: &str, params: &serde_json::Value) -> anyhow::Result<Box<dyn Strategy>> {
    let registry = get_registry().read().unwrap_or_else(PoisonError::into_inner);

    let factory = registry.get(name).ok_or_else(|| {
        let mut available: Vec<_> = registry.keys().copied().collect();
        available.sort_unstable();
        anyhow::anyhow!(
            "Unknown strategy: '{}'. Available: {}",
            name,
            available.join(", ")
        )
    })?;

    factory(params)
}

/// Registered strategy names, sorted
pub fn available_strategies() -> Vec<&'static str> {
    let mut names: Vec<_> = get_registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .copied()
        .collect();
    names.sort_unstable();
    names
}

/// Register a new strategy (for plugins or testing)
pub fn register_strategy(name: &'static str, factory: StrategyFactory) {
    get_registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name, factory);
}

/// Parse a strategy's parameters, treating `null` as "all defaults"
pub(crate) fn parse_params<T>(name: &str, params: &serde_json::Value) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params.clone())
        .map_err(|e| anyhow::anyhow!("Failed to parse {} config: {}", name, e))
}

/// Signal series of `prices.len()` zeros carrying the price labels
pub(crate) fn flat_signals(prices: &TimeSeries) -> crate::Result<TimeSeries> {
    let mut signals = TimeSeries::zeros(prices.len());
    for i in 0..prices.len() {
        signals.copy_date_from(i, prices, i)?;
    }
    Ok(signals)
}
