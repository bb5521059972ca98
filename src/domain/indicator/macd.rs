//! MACD line (Moving Average Convergence Divergence).
//!
//! MACD = EMA(fast) - EMA(slow), both folded over the trailing
//! `LOOKBACK_FACTOR × max(fast, slow)` points of the window so the cost of
//! a call stays bounded regardless of how long the caller's history is.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{check_period, ema, require_len};

pub const LOOKBACK_FACTOR: usize = 3;

pub fn macd(series: &[f64], fast: usize, slow: usize) -> Result<f64, IndicatorError> {
    check_period(fast)?;
    check_period(slow)?;
    require_len(series.len(), 1)?;

    let lookback = LOOKBACK_FACTOR * fast.max(slow);
    let window = &series[series.len().saturating_sub(lookback)..];

    Ok(ema(window, fast)? - ema(window, slow)?)
}
