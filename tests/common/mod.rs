#![allow(dead_code)]

use std::collections::HashMap;

use tradegrid::domain::error::TradegridError;
use tradegrid::domain::ohlcv::{Candle, PriceSeries};
use tradegrid::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Candle>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_candles(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.data.insert(symbol.to_string(), candles);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_candles(
        &self,
        symbol: &str,
        limit: Option<usize>,
    ) -> Result<PriceSeries, TradegridError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TradegridError::DataSource {
                reason: reason.clone(),
            });
        }
        let candles = self.data.get(symbol).cloned().unwrap_or_default();
        let series = PriceSeries::new(candles).map_err(|source| TradegridError::Series {
            symbol: symbol.to_string(),
            source,
        })?;
        Ok(match limit {
            Some(n) => series.truncate_front(n),
            None => series,
        })
    }
}

/// Flat candle at `close`; high and low equal the close.
pub fn make_candle(timestamp: i64, close: f64) -> Candle {
    Candle {
        timestamp,
        open: close,
        high: close,
        low: close,
        close,
        volume: 1.0,
    }
}

/// Candles with timestamps 0, 1, 2, ...
pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_candle(i as i64, c))
        .collect()
}

/// Candles with a one-point band around each close.
pub fn ranged_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            timestamp: i as i64,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1.0,
        })
        .collect()
}

/// Deterministic oscillating series with a drift, long enough for every
/// indicator in the default grid.
pub fn wave_closes(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            100.0 + 0.05 * t + 8.0 * (t / 7.0).sin() + 3.0 * (t / 2.3).cos()
        })
        .collect()
}

/// Closes from the EMA-only crossover example: one golden cross at index 4.
pub const CROSS_CLOSES: [f64; 8] = [100.0, 100.0, 100.0, 90.0, 100.0, 110.0, 110.0, 110.0];
