//! Buy/sell decision rule over a trailing candle window.
//!
//! A decision is the logical AND of every gate the parameter set enables:
//!
//! | gate      | buy                            | sell                          |
//! |-----------|--------------------------------|-------------------------------|
//! | EMA       | golden cross (short over long) | dead cross (short under long) |
//! | MACD      | line > 0                       | line < 0                      |
//! | RSI       | rsi < rsi_buy_thresh           | rsi > rsi_sell_thresh         |
//! | Bollinger | close > lower band             | close >= upper band           |
//! | ADX       | dx > adx_thresh                | dx > adx_thresh               |
//! | reversal  | three down, then up            | three up, then down           |
//!
//! Every call recomputes from the window alone. A window shorter than
//! `window_size() + 1`, or any indicator failure, means "no signal".

use std::fmt;

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{
    adx, bollinger, detect_reversal_down, detect_reversal_up, ema, macd, rsi,
};
use crate::domain::ohlcv::{closes, highs, lows, Candle};
use crate::domain::params::ParameterSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Buy,
    Sell,
}

pub fn should_buy(window: &[Candle], params: &ParameterSet) -> bool {
    gates_pass(window, params, Side::Buy).unwrap_or(false)
}

pub fn should_sell(window: &[Candle], params: &ParameterSet) -> bool {
    gates_pass(window, params, Side::Sell).unwrap_or(false)
}

/// Golden and dead crosses are mutually exclusive, so at most one of
/// buy/sell can fire for a given window.
pub fn evaluate(window: &[Candle], params: &ParameterSet) -> Signal {
    if should_buy(window, params) {
        Signal::Buy
    } else if should_sell(window, params) {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

fn gates_pass(
    window: &[Candle],
    params: &ParameterSet,
    side: Side,
) -> Result<bool, IndicatorError> {
    if window.len() < params.window_size() + 1 {
        return Ok(false);
    }

    let closes = closes(window);
    let previous = &closes[..closes.len() - 1];

    let prev_short = ema(previous, params.ema_short)?;
    let prev_long = ema(previous, params.ema_long)?;
    let curr_short = ema(&closes, params.ema_short)?;
    let curr_long = ema(&closes, params.ema_long)?;
    let crossed = match side {
        Side::Buy => prev_short < prev_long && curr_short > curr_long,
        Side::Sell => prev_short > prev_long && curr_short < curr_long,
    };
    if !crossed {
        return Ok(false);
    }

    if let Some(m) = params.macd {
        let line = macd(&closes, m.fast, m.slow)?;
        let ok = match side {
            Side::Buy => line > 0.0,
            Side::Sell => line < 0.0,
        };
        if !ok {
            return Ok(false);
        }
    }

    if let Some(r) = params.rsi {
        let value = rsi(&closes, r.period)?;
        let ok = match side {
            Side::Buy => value < r.buy_thresh,
            Side::Sell => value > r.sell_thresh,
        };
        if !ok {
            return Ok(false);
        }
    }

    if let Some(period) = params.bb_period {
        let bands = bollinger(&closes, period)?;
        let last = closes[closes.len() - 1];
        let ok = match side {
            Side::Buy => last > bands.lower,
            Side::Sell => last >= bands.upper,
        };
        if !ok {
            return Ok(false);
        }
    }

    if let Some(a) = params.adx {
        let value = adx(&highs(window), &lows(window), &closes, a.period)?;
        if !(value > a.thresh) {
            return Ok(false);
        }
    }

    if params.confirm_reversal {
        let ok = match side {
            Side::Buy => detect_reversal_up(&closes),
            Side::Sell => detect_reversal_down(&closes),
        };
        if !ok {
            return Ok(false);
        }
    }

    Ok(true)
}
