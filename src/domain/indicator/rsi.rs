//! RSI (Relative Strength Index).
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n deltas
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / (avg_loss + eps)))
//!
//! Needs n + 1 points (n price changes).

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{check_period, require_len, EPSILON};

pub fn rsi(series: &[f64], period: usize) -> Result<f64, IndicatorError> {
    check_period(period)?;
    require_len(series.len(), period + 1)?;

    let mut deltas = series.windows(2).map(|w| w[1] - w[0]);

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for change in deltas.by_ref().take(period) {
        avg_gain += change.max(0.0);
        avg_loss += (-change).max(0.0);
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    let n = period as f64;
    for change in deltas {
        avg_gain = (avg_gain * (n - 1.0) + change.max(0.0)) / n;
        avg_loss = (avg_loss * (n - 1.0) + (-change).max(0.0)) / n;
    }

    let rs = avg_gain / (avg_loss + EPSILON);
    Ok(100.0 - 100.0 / (1.0 + rs))
}
