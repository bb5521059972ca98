//! Exponential Moving Average.
//!
//! alpha = 2/(n+1), seeded with the first element of the window, then
//! EMA = alpha*C + (1-alpha)*EMA folded left to right.
//! There is no warmup: any non-empty window yields a value.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{check_period, require_len};

pub fn ema(series: &[f64], period: usize) -> Result<f64, IndicatorError> {
    check_period(period)?;
    require_len(series.len(), 1)?;

    let alpha = smoothing_factor(period);
    let seed = series[0];
    Ok(series[1..]
        .iter()
        .fold(seed, |acc, &price| alpha * price + (1.0 - alpha) * acc))
}

pub fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}
