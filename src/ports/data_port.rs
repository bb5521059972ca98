//! Market data port trait.

use crate::domain::error::TradegridError;
use crate::domain::ohlcv::PriceSeries;

pub trait DataPort {
    /// Candle history for `symbol`, oldest first.
    ///
    /// With `limit`, only the trailing `limit` candles are returned.
    fn fetch_candles(
        &self,
        symbol: &str,
        limit: Option<usize>,
    ) -> Result<PriceSeries, TradegridError>;
}
