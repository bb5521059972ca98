//! CSV file price history adapter.
//!
//! Each symbol lives in `<base_path>/<symbol>.csv` with the header
//! `timestamp,open,high,low,close,volume`. The timestamp column holds either
//! an integer or a `YYYY-MM-DD` date, which is read as midnight UTC in UNIX
//! seconds.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::error::TradegridError;
use crate::domain::ohlcv::{Candle, PriceSeries};
use crate::ports::data_port::DataPort;

const COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_candles(path: &Path) -> Result<Vec<Candle>, TradegridError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;

        let headers = rdr
            .headers()
            .map_err(|e| data_error(format!("CSV header error in {}: {}", path.display(), e)))?
            .clone();
        let mut index = [0usize; 6];
        for (slot, name) in index.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    data_error(format!("missing {} column in {}", name, path.display()))
                })?;
        }
        let [ts, open, high, low, close, volume] = index;

        let mut candles = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;
            let field = |i: usize, name: &str| {
                record
                    .get(i)
                    .ok_or_else(|| data_error(format!("row {}: missing {} value", row + 1, name)))
            };

            candles.push(Candle {
                timestamp: parse_timestamp(field(ts, "timestamp")?)
                    .map_err(|reason| data_error(format!("row {}: {}", row + 1, reason)))?,
                open: parse_price(field(open, "open")?, "open", row)?,
                high: parse_price(field(high, "high")?, "high", row)?,
                low: parse_price(field(low, "low")?, "low", row)?,
                close: parse_price(field(close, "close")?, "close", row)?,
                volume: parse_price(field(volume, "volume")?, "volume", row)?,
            });
        }
        Ok(candles)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_candles(
        &self,
        symbol: &str,
        limit: Option<usize>,
    ) -> Result<PriceSeries, TradegridError> {
        let path = self.csv_path(symbol);
        let candles = Self::read_candles(&path)?;
        let rows = candles.len();

        let series = PriceSeries::new(candles).map_err(|source| TradegridError::Series {
            symbol: symbol.to_string(),
            source,
        })?;
        let series = match limit {
            Some(n) => series.truncate_front(n),
            None => series,
        };

        debug!(symbol, rows, kept = series.len(), "Loaded price history");
        Ok(series)
    }
}

fn parse_timestamp(raw: &str) -> Result<i64, String> {
    if let Ok(ts) = raw.parse::<i64>() {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| format!("invalid timestamp '{}', expected integer or YYYY-MM-DD", raw))
}

fn parse_price(raw: &str, name: &str, row: usize) -> Result<f64, TradegridError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(data_error(format!(
            "row {}: invalid {} value '{}'",
            row + 1,
            name,
            raw
        ))),
    }
}

fn data_error(reason: String) -> TradegridError {
    TradegridError::DataSource { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::SeriesError;
    use std::fs;
    use tempfile::TempDir;

    fn setup(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn reads_integer_timestamps() {
        let dir = setup(&[(
            "BTCUSDT.csv",
            "timestamp,open,high,low,close,volume\n\
             1700000000,100,110,90,105,12.5\n\
             1700003600,105,115,100,110,8\n",
        )]);
        let series = CsvAdapter::new(dir.path())
            .fetch_candles("BTCUSDT", None)
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, 1_700_000_000);
        assert_eq!(series[0].high, 110.0);
        assert_eq!(series[0].volume, 12.5);
        assert_eq!(series.last().close, 110.0);
    }

    #[test]
    fn reads_date_timestamps() {
        let dir = setup(&[(
            "ETH.csv",
            "timestamp,open,high,low,close,volume\n\
             1970-01-02,1,1,1,1,0\n\
             1970-01-03,1,1,1,2,0\n",
        )]);
        let series = CsvAdapter::new(dir.path()).fetch_candles("ETH", None).unwrap();
        assert_eq!(series[0].timestamp, 86_400);
        assert_eq!(series[1].timestamp, 172_800);
    }

    #[test]
    fn columns_located_by_header() {
        let dir = setup(&[(
            "X.csv",
            "Close,Timestamp,Volume,Open,High,Low\n\
             5,1,0,4,6,3\n",
        )]);
        let series = CsvAdapter::new(dir.path()).fetch_candles("X", None).unwrap();
        assert_eq!(series[0].close, 5.0);
        assert_eq!(series[0].low, 3.0);
    }

    #[test]
    fn limit_keeps_trailing_candles() {
        let dir = setup(&[(
            "X.csv",
            "timestamp,open,high,low,close,volume\n1,1,1,1,1,0\n2,2,2,2,2,0\n3,3,3,3,3,0\n",
        )]);
        let series = CsvAdapter::new(dir.path()).fetch_candles("X", Some(2)).unwrap();
        let closes: Vec<f64> = series.iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![2.0, 3.0]);
    }

    #[test]
    fn missing_file_is_data_error() {
        let dir = setup(&[]);
        let err = CsvAdapter::new(dir.path()).fetch_candles("NOPE", None).unwrap_err();
        assert!(matches!(err, TradegridError::DataSource { .. }));
    }

    #[test]
    fn missing_column_is_data_error() {
        let dir = setup(&[("X.csv", "timestamp,open,high,low,close\n1,1,1,1,1\n")]);
        let err = CsvAdapter::new(dir.path()).fetch_candles("X", None).unwrap_err();
        assert!(
            matches!(err, TradegridError::DataSource { reason } if reason.contains("volume"))
        );
    }

    #[test]
    fn bad_price_is_data_error() {
        let dir = setup(&[(
            "X.csv",
            "timestamp,open,high,low,close,volume\n1,1,1,1,abc,0\n",
        )]);
        let err = CsvAdapter::new(dir.path()).fetch_candles("X", None).unwrap_err();
        assert!(
            matches!(err, TradegridError::DataSource { reason } if reason.contains("close"))
        );
    }

    #[test]
    fn header_only_file_is_empty_series() {
        let dir = setup(&[("X.csv", "timestamp,open,high,low,close,volume\n")]);
        let err = CsvAdapter::new(dir.path()).fetch_candles("X", None).unwrap_err();
        assert!(matches!(
            err,
            TradegridError::Series {
                source: SeriesError::Empty,
                ..
            }
        ));
    }

    #[test]
    fn out_of_order_rows_rejected() {
        let dir = setup(&[(
            "X.csv",
            "timestamp,open,high,low,close,volume\n2,1,1,1,1,0\n1,1,1,1,1,0\n",
        )]);
        let err = CsvAdapter::new(dir.path()).fetch_candles("X", None).unwrap_err();
        assert!(matches!(
            err,
            TradegridError::Series {
                source: SeriesError::NonMonotonic { index: 1, .. },
                ..
            }
        ));
    }
}
