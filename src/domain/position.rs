//! Open position tracking with weighted-average cost basis.

use serde::Serialize;

use super::portfolio::round_cents;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub quantity: i64,
    pub average_price: f64,
    pub last_price: f64,
}

impl Position {
    pub fn open(symbol: &str, quantity: i64, price: f64) -> Self {
        Position {
            symbol: symbol.to_string(),
            quantity,
            average_price: price,
            last_price: price,
        }
    }

    /// Blend an additional buy into the cost basis.
    pub fn add(&mut self, quantity: i64, price: f64) {
        let notional = quantity as f64 * price;
        let new_quantity = self.quantity + quantity;
        self.average_price =
            (self.average_price * self.quantity as f64 + notional) / new_quantity as f64;
        self.quantity = new_quantity;
        self.last_price = price;
    }

    /// Reduce the position and return the realized PnL of the sold units.
    ///
    /// The caller guarantees `quantity <= self.quantity`.
    pub fn reduce(&mut self, quantity: i64, price: f64) -> f64 {
        let realized = (price - self.average_price) * quantity as f64;
        self.quantity -= quantity;
        self.last_price = price;
        realized
    }

    pub fn is_closed(&self) -> bool {
        self.quantity == 0
    }

    pub fn market_value(&self) -> f64 {
        self.quantity as f64 * self.last_price
    }

    pub fn unrealized_pnl(&self) -> f64 {
        (self.last_price - self.average_price) * self.quantity as f64
    }

    pub fn view(&self) -> PositionView {
        PositionView {
            symbol: self.symbol.clone(),
            quantity: self.quantity,
            average_price: round_cents(self.average_price),
            last_price: round_cents(self.last_price),
            market_value: round_cents(self.market_value()),
            unrealized_pnl: round_cents(self.unrealized_pnl()),
        }
    }
}

/// Rounded, read-only copy of a position for snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionView {
    pub symbol: String,
    pub quantity: i64,
    pub average_price: f64,
    pub last_price: f64,
    pub market_value: f64,
    pub unrealized_pnl: f64,
}
