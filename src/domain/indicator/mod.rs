//! Technical indicator library.
//!
//! Every indicator is a pure function over a trailing price window that
//! returns the value at the window's last point. Nothing is cached between
//! calls; callers recompute from scratch each step.
//!
//! - [`ema`]: exponential moving average seeded with the first element
//! - [`rsi`]: relative strength index with Wilder smoothing
//! - [`macd`]: fast EMA minus slow EMA over a bounded lookback
//! - [`bollinger`]: SMA ± 2 population standard deviations
//! - [`adx`]: directional index from true range and directional movement
//! - [`reversal`]: three-moves-then-reversal pattern detectors

pub mod adx;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod reversal;
pub mod rsi;
pub mod stddev;

pub use adx::adx;
pub use bollinger::{bollinger, BollingerBands};
pub use ema::ema;
pub use macd::macd;
pub use reversal::{detect_reversal_down, detect_reversal_up};
pub use rsi::rsi;

use crate::domain::error::IndicatorError;

/// Additive guard for ratios whose denominator can reach zero.
pub const EPSILON: f64 = 1e-8;

pub(crate) fn check_period(period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        Err(IndicatorError::InvalidPeriod)
    } else {
        Ok(())
    }
}

pub(crate) fn require_len(got: usize, needed: usize) -> Result<(), IndicatorError> {
    if got < needed {
        Err(IndicatorError::InsufficientData { needed, got })
    } else {
        Ok(())
    }
}
