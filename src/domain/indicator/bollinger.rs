//! Bollinger Bands.
//!
//! - Middle: mean of the trailing n closes
//! - Upper: Middle + 2 × StdDev
//! - Lower: Middle - 2 × StdDev
//!
//! StdDev is the population standard deviation of the same window.
//! Needs at least n points.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::stddev::mean_and_stddev;
use crate::domain::indicator::{check_period, require_len};

pub const STDDEV_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

pub fn bollinger(series: &[f64], period: usize) -> Result<BollingerBands, IndicatorError> {
    check_period(period)?;
    require_len(series.len(), period)?;

    let window = &series[series.len() - period..];
    let (middle, stddev) = mean_and_stddev(window);

    Ok(BollingerBands {
        upper: middle + STDDEV_MULTIPLIER * stddev,
        middle,
        lower: middle - STDDEV_MULTIPLIER * stddev,
    })
}
