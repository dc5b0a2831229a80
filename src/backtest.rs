//! Backtesting engine
//!
//! Vectorized single-asset backtest: the strategy produces a signal series
//! once, and the engine turns it into per-step returns and a compounded
//! equity curve.
//!
//! Execution timing: the signal observed at close of step `i` is the
//! position held over the price move from `i` to `i + 1`. There is no
//! separate lag parameter.

use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::metrics::PerformanceMetrics;
use crate::series::TimeSeries;
use crate::strategies::Strategy;

/// Equity curve starting value
pub const INITIAL_EQUITY: f64 = 100.0;

/// Backtest engine
pub struct Backtester {
    strategy: Box<dyn Strategy>,
}

impl Backtester {
    pub fn new(strategy: Box<dyn Strategy>) -> Self {
        Backtester { strategy }
    }

    /// Run the strategy over `prices`
    pub fn run(&self, prices: &TimeSeries) -> Result<BacktestResult> {
        run(prices, self.strategy.as_ref())
    }
}

/// Run `strategy` over `prices` and compound its returns
pub fn run(prices: &TimeSeries, strategy: &dyn Strategy) -> Result<BacktestResult> {
    if prices.is_empty() {
        return Err(EngineError::invalid("cannot backtest an empty price series"));
    }

    let signals = strategy.generate_signals(prices)?;
    if signals.len() != prices.len() {
        return Err(EngineError::invalid(format!(
            "{} produced {} signals for {} prices",
            strategy.name(),
            signals.len(),
            prices.len()
        )));
    }

    let p = prices.values();
    let s = signals.values();
    let mut returns = TimeSeries::zeros(p.len() - 1);
    let mut equity_curve = TimeSeries::zeros(p.len());

    equity_curve.set(0, INITIAL_EQUITY)?;
    equity_curve.copy_date_from(0, prices, 0)?;
    let mut equity = INITIAL_EQUITY;

    for i in 1..p.len() {
        let price_return = (p[i] - p[i - 1]) / p[i - 1];
        let strategy_return = s[i - 1] * price_return;
        equity *= 1.0 + strategy_return;

        returns.set(i - 1, strategy_return)?;
        returns.copy_date_from(i - 1, prices, i)?;
        equity_curve.set(i, equity)?;
        equity_curve.copy_date_from(i, prices, i)?;
    }

    tracing::debug!(
        strategy = %strategy.name(),
        observations = p.len(),
        final_equity = equity,
        "Backtest complete"
    );

    Ok(BacktestResult {
        signals,
        returns,
        equity_curve,
    })
}

/// Aligned outputs of one backtest run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BacktestResult {
    signals: TimeSeries,
    returns: TimeSeries,
    equity_curve: TimeSeries,
}

impl BacktestResult {
    /// Position held at each price observation
    pub fn signals(&self) -> &TimeSeries {
        &self.signals
    }

    /// Strategy return per price transition (`prices.len() - 1` entries)
    pub fn returns(&self) -> &TimeSeries {
        &self.returns
    }

    /// Compounded equity starting at [`INITIAL_EQUITY`]
    pub fn equity_curve(&self) -> &TimeSeries {
        &self.equity_curve
    }

    pub fn metrics(&self, risk_free_rate: f64) -> PerformanceMetrics {
        PerformanceMetrics::from_result(self, risk_free_rate)
    }
}
