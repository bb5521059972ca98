//! Strategy parameter sets.
//!
//! A `ParameterSet` always carries the EMA crossover pair. The MACD, RSI,
//! Bollinger and ADX groups are optional; an absent group adds no gate to
//! the signal rule.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamName {
    EmaShort,
    EmaLong,
    MacdFast,
    MacdSlow,
    RsiPeriod,
    RsiBuyThresh,
    RsiSellThresh,
    BbPeriod,
    AdxPeriod,
    AdxThresh,
}

impl ParamName {
    /// Canonical declaration order.
    pub const ALL: [ParamName; 10] = [
        ParamName::EmaShort,
        ParamName::EmaLong,
        ParamName::MacdFast,
        ParamName::MacdSlow,
        ParamName::RsiPeriod,
        ParamName::RsiBuyThresh,
        ParamName::RsiSellThresh,
        ParamName::BbPeriod,
        ParamName::AdxPeriod,
        ParamName::AdxThresh,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::EmaShort => "ema_short",
            ParamName::EmaLong => "ema_long",
            ParamName::MacdFast => "macd_fast",
            ParamName::MacdSlow => "macd_slow",
            ParamName::RsiPeriod => "rsi_period",
            ParamName::RsiBuyThresh => "rsi_buy_thresh",
            ParamName::RsiSellThresh => "rsi_sell_thresh",
            ParamName::BbPeriod => "bb_period",
            ParamName::AdxPeriod => "adx_period",
            ParamName::AdxThresh => "adx_thresh",
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown parameter name: {0}")]
pub struct UnknownParam(pub String);

impl FromStr for ParamName {
    type Err = UnknownParam;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        ParamName::ALL
            .into_iter()
            .find(|name| name.as_str() == key)
            .ok_or_else(|| UnknownParam(s.trim().to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiParams {
    pub period: usize,
    pub buy_thresh: f64,
    pub sell_thresh: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdxParams {
    pub period: usize,
    pub thresh: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    pub ema_short: usize,
    pub ema_long: usize,
    pub macd: Option<MacdParams>,
    pub rsi: Option<RsiParams>,
    pub bb_period: Option<usize>,
    pub adx: Option<AdxParams>,
    /// Require the three-moves-then-reversal pattern on top of the
    /// indicator gates.
    pub confirm_reversal: bool,
}

impl ParameterSet {
    /// EMA crossover alone, no pattern confirmation.
    pub fn ema_crossover(ema_short: usize, ema_long: usize) -> Self {
        Self {
            ema_short,
            ema_long,
            macd: None,
            rsi: None,
            bb_period: None,
            adx: None,
            confirm_reversal: false,
        }
    }

    pub fn with_macd(mut self, fast: usize, slow: usize) -> Self {
        self.macd = Some(MacdParams { fast, slow });
        self
    }

    pub fn with_rsi(mut self, period: usize, buy_thresh: f64, sell_thresh: f64) -> Self {
        self.rsi = Some(RsiParams {
            period,
            buy_thresh,
            sell_thresh,
        });
        self
    }

    pub fn with_bollinger(mut self, period: usize) -> Self {
        self.bb_period = Some(period);
        self
    }

    pub fn with_adx(mut self, period: usize, thresh: f64) -> Self {
        self.adx = Some(AdxParams { period, thresh });
        self
    }

    pub fn with_reversal_confirmation(mut self, confirm: bool) -> Self {
        self.confirm_reversal = confirm;
        self
    }

    /// Build from name/value pairs. Returns `None` when a value cannot
    /// form a valid set: missing EMA pair, partial group, non-integral or
    /// zero period, or a violated ordering invariant.
    pub fn from_assignment(values: &[(ParamName, f64)], confirm_reversal: bool) -> Option<Self> {
        let lookup = |name: ParamName| {
            values
                .iter()
                .find(|(n, _)| *n == name)
                .map(|&(_, v)| v)
        };
        let period = |name: ParamName| lookup(name).map(as_period);
        let threshold = |name: ParamName| lookup(name).map(as_threshold);

        let ema_short = period(ParamName::EmaShort)??;
        let ema_long = period(ParamName::EmaLong)??;
        let mut set =
            Self::ema_crossover(ema_short, ema_long).with_reversal_confirmation(confirm_reversal);

        match (period(ParamName::MacdFast), period(ParamName::MacdSlow)) {
            (None, None) => {}
            (Some(fast), Some(slow)) => set = set.with_macd(fast?, slow?),
            _ => return None,
        }

        match (
            period(ParamName::RsiPeriod),
            threshold(ParamName::RsiBuyThresh),
            threshold(ParamName::RsiSellThresh),
        ) {
            (None, None, None) => {}
            (Some(p), Some(buy), Some(sell)) => set = set.with_rsi(p?, buy?, sell?),
            _ => return None,
        }

        if let Some(bb) = period(ParamName::BbPeriod) {
            set = set.with_bollinger(bb?);
        }

        match (period(ParamName::AdxPeriod), threshold(ParamName::AdxThresh)) {
            (None, None) => {}
            (Some(p), Some(thresh)) => set = set.with_adx(p?, thresh?),
            _ => return None,
        }

        set.is_valid().then_some(set)
    }

    /// `ema_short < ema_long`, `macd_fast < macd_slow`,
    /// `rsi_buy_thresh < rsi_sell_thresh`, all periods ≥ 1.
    pub fn is_valid(&self) -> bool {
        if self.periods().any(|p| p == 0) {
            return false;
        }
        self.ema_short < self.ema_long
            && self.macd.is_none_or(|m| m.fast < m.slow)
            && self.rsi.is_none_or(|r| r.buy_thresh < r.sell_thresh)
            && self.adx.is_none_or(|a| a.thresh.is_finite())
    }

    pub fn periods(&self) -> impl Iterator<Item = usize> + '_ {
        [self.ema_short, self.ema_long]
            .into_iter()
            .chain(self.macd.into_iter().flat_map(|m| [m.fast, m.slow]))
            .chain(self.rsi.map(|r| r.period))
            .chain(self.bb_period)
            .chain(self.adx.map(|a| a.period))
    }

    /// Largest period referenced by the set; the simulator's warm-up length.
    pub fn window_size(&self) -> usize {
        self.periods().max().unwrap_or(0)
    }

    /// Mapping view: the value bound to `name`, if its group is present.
    pub fn get(&self, name: ParamName) -> Option<f64> {
        match name {
            ParamName::EmaShort => Some(self.ema_short as f64),
            ParamName::EmaLong => Some(self.ema_long as f64),
            ParamName::MacdFast => self.macd.map(|m| m.fast as f64),
            ParamName::MacdSlow => self.macd.map(|m| m.slow as f64),
            ParamName::RsiPeriod => self.rsi.map(|r| r.period as f64),
            ParamName::RsiBuyThresh => self.rsi.map(|r| r.buy_thresh),
            ParamName::RsiSellThresh => self.rsi.map(|r| r.sell_thresh),
            ParamName::BbPeriod => self.bb_period.map(|p| p as f64),
            ParamName::AdxPeriod => self.adx.map(|a| a.period as f64),
            ParamName::AdxThresh => self.adx.map(|a| a.thresh),
        }
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in ParamName::ALL {
            if let Some(value) = self.get(name) {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{}={}", name, value)?;
                first = false;
            }
        }
        if self.confirm_reversal {
            f.write_str(" +reversal")?;
        }
        Ok(())
    }
}

fn as_period(value: f64) -> Option<usize> {
    if value.is_finite() && value >= 1.0 && value.fract() == 0.0 {
        Some(value as usize)
    } else {
        None
    }
}

fn as_threshold(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
