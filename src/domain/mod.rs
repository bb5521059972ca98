//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod params;
pub mod grid;
pub mod signal;
pub mod portfolio;
pub mod backtest;
pub mod optimizer;
pub mod config_validation;
pub mod error;
