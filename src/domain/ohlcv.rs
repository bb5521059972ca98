//! OHLCV candle and validated price history.

use std::ops::Deref;

use crate::domain::error::SeriesError;

/// One fixed-interval price observation. Timestamps are unit-agnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Non-empty candle history with strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    candles: Vec<Candle>,
}

impl PriceSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self, SeriesError> {
        validate_candles(&candles)?;
        Ok(Self { candles })
    }

    /// Keep only the trailing `limit` candles.
    pub fn truncate_front(mut self, limit: usize) -> Self {
        if limit > 0 && self.candles.len() > limit {
            self.candles.drain(..self.candles.len() - limit);
        }
        self
    }

    pub fn last(&self) -> &Candle {
        // Non-empty by construction.
        &self.candles[self.candles.len() - 1]
    }
}

impl Deref for PriceSeries {
    type Target = [Candle];

    fn deref(&self) -> &[Candle] {
        &self.candles
    }
}

/// Empty input and duplicate or out-of-order timestamps are rejected.
pub fn validate_candles(candles: &[Candle]) -> Result<(), SeriesError> {
    if candles.is_empty() {
        return Err(SeriesError::Empty);
    }
    for (i, pair) in candles.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(SeriesError::NonMonotonic {
                index: i + 1,
                previous: pair[0].timestamp,
                current: pair[1].timestamp,
            });
        }
    }
    Ok(())
}

pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

pub fn highs(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.high).collect()
}

pub fn lows(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.low).collect()
}
