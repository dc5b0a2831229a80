//! Rolling risk features
//!
//! Transforms a raw price series into the feature columns used for regime
//! detection:
//! - Log returns
//! - Rolling annualized volatility (sample std, 252 trading days)
//! - Rolling max drawdown
//!
//! Every output carries the date label of the last observation contributing
//! to each value.

use statrs::statistics::Statistics;

use crate::error::{EngineError, Result};
use crate::matrix::Matrix;
use crate::series::TimeSeries;

/// Trading days per year used for annualization
pub const TRADING_DAYS: f64 = 252.0;

/// Log returns `ln(p[i+1] / p[i])`, labelled with the later price's date
pub fn log_returns(prices: &TimeSeries) -> Result<TimeSeries> {
    if prices.len() < 2 {
        return Err(EngineError::invalid("need at least 2 prices for log returns"));
    }

    let p = prices.values();
    let mut returns = TimeSeries::zeros(p.len() - 1);

    for i in 1..p.len() {
        let (prev, curr) = (p[i - 1], p[i]);
        if prev <= 0.0 || curr <= 0.0 {
            return Err(EngineError::invalid(format!(
                "prices must be positive, got {} and {} at index {}",
                prev, curr, i
            )));
        }
        returns.set(i - 1, (curr / prev).ln())?;
        returns.copy_date_from(i - 1, prices, i)?;
    }

    Ok(returns)
}

/// Rolling annualized volatility over a return series.
///
/// Output length is `returns.len() - window + 1`.
pub fn rolling_volatility(returns: &TimeSeries, window: usize) -> Result<TimeSeries> {
    if window < 2 {
        return Err(EngineError::invalid(format!(
            "volatility window must be at least 2, got {}",
            window
        )));
    }
    if window > returns.len() {
        return Err(EngineError::invalid(format!(
            "window {} larger than series of length {}",
            window,
            returns.len()
        )));
    }

    let r = returns.values();
    let mut vol = TimeSeries::zeros(r.len() - window + 1);

    for (i, w) in r.windows(window).enumerate() {
        let variance = w.variance();
        vol.set(i, (variance * TRADING_DAYS).sqrt())?;
        vol.copy_date_from(i, returns, i + window - 1)?;
    }

    Ok(vol)
}

/// Rolling drawdown of the last price in each window from the window's peak.
///
/// Values are non-positive fractions. Output length is `prices.len() - window + 1`.
pub fn rolling_drawdown(prices: &TimeSeries, window: usize) -> Result<TimeSeries> {
    if window == 0 {
        return Err(EngineError::invalid("drawdown window must be at least 1"));
    }
    if window > prices.len() {
        return Err(EngineError::invalid(format!(
            "window {} larger than series of length {}",
            window,
            prices.len()
        )));
    }

    let p = prices.values();
    let mut dd = TimeSeries::zeros(p.len() - window + 1);

    for (i, w) in p.windows(window).enumerate() {
        let peak = w.iter().copied().fold(f64::MIN, f64::max);
        let current = w[window - 1];
        dd.set(i, (current - peak) / peak)?;
        dd.copy_date_from(i, prices, i + window - 1)?;
    }

    Ok(dd)
}

/// Stack feature columns into a row-per-time-step matrix.
///
/// Columns of different lengths (different window sizes) are truncated to
/// the shortest one; row `i` takes element `i` of every column.
pub fn feature_matrix(columns: &[&TimeSeries]) -> Result<Matrix> {
    if columns.is_empty() {
        return Err(EngineError::invalid("no feature columns supplied"));
    }

    let rows = columns.iter().map(|c| c.len()).min().unwrap_or(0);
    if rows == 0 {
        return Err(EngineError::invalid("feature columns are empty"));
    }

    let mut x = Matrix::zeros(rows, columns.len());
    for (j, column) in columns.iter().enumerate() {
        for (i, value) in column.values()[..rows].iter().enumerate() {
            x.set(i, j, *value)?;
        }
    }

    Ok(x)
}
