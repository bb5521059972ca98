//! Single-asset, all-in portfolio state.
//!
//! The portfolio is always fully in one of two assets: cash (OUT) or the
//! traded instrument (IN). A fee is charged on the notional of every fill.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

/// One executed transition between OUT and IN.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub side: Side,
    pub index: usize,
    pub timestamp: i64,
    pub price: f64,
    pub quantity: f64,
    pub fee: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub position_quantity: f64,
    /// Fee-adjusted purchase price; set on buy, cleared on sell.
    pub entry_price: Option<f64>,
}

impl PortfolioState {
    pub fn new(initial_capital: f64) -> Self {
        PortfolioState {
            cash: initial_capital,
            position_quantity: 0.0,
            entry_price: None,
        }
    }

    pub fn is_invested(&self) -> bool {
        self.position_quantity > 0.0
    }

    /// Converts all cash into the instrument at `price`.
    ///
    /// Requires `cash > price`; otherwise nothing happens and `None` is
    /// returned.
    pub fn buy(&mut self, price: f64, fee_rate: f64) -> Option<(f64, f64)> {
        if self.is_invested() || !(self.cash > price) {
            return None;
        }
        let fee = self.cash * fee_rate;
        let quantity = (self.cash / price) * (1.0 - fee_rate);
        self.position_quantity = quantity;
        self.cash = 0.0;
        self.entry_price = Some(price * (1.0 + fee_rate));
        Some((quantity, fee))
    }

    /// Converts the whole position back to cash at `price`.
    pub fn sell(&mut self, price: f64, fee_rate: f64) -> Option<(f64, f64)> {
        if !self.is_invested() {
            return None;
        }
        let quantity = self.position_quantity;
        let notional = quantity * price;
        let fee = notional * fee_rate;
        self.cash = notional * (1.0 - fee_rate);
        self.position_quantity = 0.0;
        self.entry_price = None;
        Some((quantity, fee))
    }

    /// Cash plus position at `price`, with no exit fee charged.
    pub fn mark_to_market(&self, price: f64) -> f64 {
        self.cash + self.position_quantity * price
    }

    /// Return of `price` relative to the fee-adjusted entry price.
    pub fn unrealized_return(&self, price: f64) -> Option<f64> {
        self.entry_price.map(|entry| (price - entry) / entry)
    }
}
