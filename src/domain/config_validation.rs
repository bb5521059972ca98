//! Configuration validation.
//!
//! Reads the `[backtest]`, `[data]`, `[grid]` and `[strategy]` sections
//! through a [`ConfigPort`] and builds the domain values the optimizer and
//! signal commands run on. Every failure names its section and key.

use std::path::PathBuf;

use tracing::warn;

use crate::domain::backtest::{BacktestConfig, DEFAULT_FEE_RATE};
use crate::domain::error::TradegridError;
use crate::domain::grid::ParameterGrid;
use crate::domain::params::{ParamName, ParameterSet};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 1_000_000.0;

/// Where the price history comes from.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub path: PathBuf,
    pub symbol: String,
    /// Trailing candle count; `None` keeps the whole file.
    pub limit: Option<usize>,
}

/// Checks everything the `optimize` command needs.
pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TradegridError> {
    build_backtest_config(config)?;
    build_data_settings(config)?;
    build_grid(config)?;
    Ok(())
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, TradegridError> {
    let initial_capital =
        config.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL);
    if !initial_capital.is_finite() || initial_capital <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }

    let fee_rate = config.get_double("backtest", "fee_rate", DEFAULT_FEE_RATE);
    if !(0.0..1.0).contains(&fee_rate) {
        return Err(invalid(
            "backtest",
            "fee_rate",
            "fee_rate must be at least 0 and below 1",
        ));
    }

    Ok(BacktestConfig::new(initial_capital).with_fee_rate(fee_rate))
}

pub fn parallel_enabled(config: &dyn ConfigPort) -> bool {
    config.get_bool("backtest", "parallel", true)
}

pub fn build_data_settings(config: &dyn ConfigPort) -> Result<DataSettings, TradegridError> {
    let path = required(config, "data", "path")?;
    let symbol = required(config, "data", "symbol")?;

    let limit = config.get_int("data", "limit", 0);
    if limit < 0 {
        return Err(invalid("data", "limit", "limit must not be negative"));
    }

    Ok(DataSettings {
        path: PathBuf::from(path),
        symbol,
        limit: (limit > 0).then_some(limit as usize),
    })
}

/// Builds the search grid from `[grid]`.
///
/// Dimensions follow `order` when given, otherwise canonical name order
/// restricted to the names that have a candidate list.
pub fn build_grid(config: &dyn ConfigPort) -> Result<ParameterGrid, TradegridError> {
    let order = match config.get_string("grid", "order") {
        Some(s) if !s.trim().is_empty() => parse_order(&s)?,
        _ => ParamName::ALL
            .into_iter()
            .filter(|name| config.get_string("grid", name.as_str()).is_some())
            .collect(),
    };

    for name in ParamName::ALL {
        if !order.contains(&name) && config.get_string("grid", name.as_str()).is_some() {
            warn!(key = name.as_str(), "grid list not named in order; ignored");
        }
    }

    let mut dimensions = Vec::with_capacity(order.len());
    for name in order {
        let values = parse_list(config, "grid", name.as_str())?
            .ok_or_else(|| missing("grid", name.as_str()))?;
        dimensions.push((name, values));
    }

    let grid = ParameterGrid::new(dimensions)?
        .with_reversal_confirmation(config.get_bool("grid", "confirm_reversal", true));
    Ok(grid)
}

/// Builds one parameter set from the single values in `[strategy]`.
pub fn build_strategy_params(config: &dyn ConfigPort) -> Result<ParameterSet, TradegridError> {
    required(config, "strategy", ParamName::EmaShort.as_str())?;
    required(config, "strategy", ParamName::EmaLong.as_str())?;

    let mut values = Vec::new();
    for name in ParamName::ALL {
        if let Some(raw) = config.get_string("strategy", name.as_str()) {
            values.push((name, parse_number("strategy", name.as_str(), &raw)?));
        }
    }

    let confirm = config.get_bool("strategy", "confirm_reversal", true);
    ParameterSet::from_assignment(&values, confirm).ok_or_else(|| {
        invalid(
            "strategy",
            "parameters",
            "values do not form a valid parameter set",
        )
    })
}

fn parse_order(raw: &str) -> Result<Vec<ParamName>, TradegridError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<ParamName>()
                .map_err(|e| invalid("grid", "order", &e.to_string()))
        })
        .collect()
}

fn parse_list(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<Vec<f64>>, TradegridError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|item| parse_number(section, key, item))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn parse_number(section: &str, key: &str, raw: &str) -> Result<f64, TradegridError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(
            section,
            key,
            &format!("'{}' is not a number", raw.trim()),
        )),
    }
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, TradegridError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(missing(section, key)),
    }
}

fn missing(section: &str, key: &str) -> TradegridError {
    TradegridError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> TradegridError {
    TradegridError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
