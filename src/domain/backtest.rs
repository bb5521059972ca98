//! Deterministic single-asset replay of the signal rule.
//!
//! The simulator walks the series from index `window_size` to the end,
//! hands the evaluator the trailing `window_size + 1` candles, and flips
//! the portfolio between all-cash and all-in. The final position is marked
//! at the last close without an exit fee.

use crate::domain::ohlcv::Candle;
use crate::domain::params::ParameterSet;
use crate::domain::portfolio::{Fill, PortfolioState, Side};
use crate::domain::signal::{should_buy, should_sell};

pub const DEFAULT_FEE_RATE: f64 = 0.0004;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Charged on entry and exit notional alike.
    pub fee_rate: f64,
}

impl BacktestConfig {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            fee_rate: DEFAULT_FEE_RATE,
        }
    }

    pub fn with_fee_rate(mut self, fee_rate: f64) -> Self {
        self.fee_rate = fee_rate;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub params: ParameterSet,
    pub initial_capital: f64,
    pub terminal_value: f64,
    pub fills: Vec<Fill>,
    /// Portfolio after the last step; IN when the final position is open.
    pub final_state: PortfolioState,
}

impl SimulationResult {
    pub fn return_pct(&self) -> f64 {
        if self.initial_capital == 0.0 {
            return 0.0;
        }
        self.terminal_value / self.initial_capital - 1.0
    }

    /// Completed buy/sell round trips.
    pub fn round_trips(&self) -> usize {
        self.fills.iter().filter(|f| f.side == Side::Sell).count()
    }
}

pub fn run_backtest(
    series: &[Candle],
    params: &ParameterSet,
    config: &BacktestConfig,
) -> SimulationResult {
    let window_size = params.window_size();
    let mut portfolio = PortfolioState::new(config.initial_capital);
    let mut fills = Vec::new();

    for i in window_size..series.len() {
        let window = &series[i - window_size..=i];
        let candle = &series[i];

        let executed = if portfolio.is_invested() {
            if should_sell(window, params) {
                portfolio
                    .sell(candle.close, config.fee_rate)
                    .map(|fill| (Side::Sell, fill))
            } else {
                None
            }
        } else if should_buy(window, params) {
            portfolio
                .buy(candle.close, config.fee_rate)
                .map(|fill| (Side::Buy, fill))
        } else {
            None
        };

        if let Some((side, (quantity, fee))) = executed {
            fills.push(Fill {
                side,
                index: i,
                timestamp: candle.timestamp,
                price: candle.close,
                quantity,
                fee,
            });
        }
    }

    let terminal_value = match series.last() {
        Some(last) => portfolio.mark_to_market(last.close),
        None => portfolio.cash,
    };

    SimulationResult {
        params: params.clone(),
        initial_capital: config.initial_capital,
        terminal_value,
        fills,
        final_state: portfolio,
    }
}
