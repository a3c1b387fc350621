//! Trade requests and executed trade records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::HeliosError;
use super::portfolio::{MAX_AMOUNT, PortfolioView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => f.write_str("BUY"),
            TradeSide::Sell => f.write_str("SELL"),
        }
    }
}

impl FromStr for TradeSide {
    type Err = HeliosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(TradeSide::Buy),
            "SELL" => Ok(TradeSide::Sell),
            "" => Err(HeliosError::invalid_ticket("Trade side is required")),
            other => Err(HeliosError::invalid_ticket(format!(
                "Trade side must be BUY or SELL, got {other}"
            ))),
        }
    }
}

/// A caller's trade request, as received.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeTicket {
    pub symbol: String,
    pub side: Option<TradeSide>,
    pub quantity: i64,
    pub price: f64,
    pub note: String,
    pub story_id: String,
    pub story_title: String,
}

impl TradeTicket {
    pub fn new(symbol: &str, side: TradeSide, quantity: i64, price: f64) -> Self {
        TradeTicket {
            symbol: symbol.to_string(),
            side: Some(side),
            quantity,
            price,
            ..Default::default()
        }
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = note.to_string();
        self
    }

    pub fn with_story(mut self, story_id: &str, story_title: &str) -> Self {
        self.story_id = story_id.to_string();
        self.story_title = story_title.to_string();
        self
    }

    /// Check every field and return the normalized order.
    pub fn validate(&self) -> Result<Order, HeliosError> {
        let symbol = self.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(HeliosError::invalid_ticket("Symbol is required"));
        }
        let side = self
            .side
            .ok_or_else(|| HeliosError::invalid_ticket("Trade side is required"))?;
        if self.quantity <= 0 {
            return Err(HeliosError::invalid_ticket(
                "Quantity must be greater than zero",
            ));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(HeliosError::invalid_ticket("Price must be greater than zero"));
        }
        if self.quantity as f64 * self.price > MAX_AMOUNT {
            return Err(HeliosError::invalid_ticket(format!(
                "Notional must not exceed {MAX_AMOUNT:e}"
            )));
        }

        Ok(Order {
            symbol,
            side,
            quantity: self.quantity,
            price: self.price,
            note: self.note.trim().to_string(),
            story_id: self.story_id.trim().to_string(),
            story_title: self.story_title.trim().to_string(),
        })
    }
}

/// A validated ticket: upper-cased symbol, positive quantity and price.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: i64,
    pub price: f64,
    pub note: String,
    pub story_id: String,
    pub story_title: String,
}

impl Order {
    pub fn notional(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedTrade {
    pub trade_id: String,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: i64,
    pub price: f64,
    pub notional: f64,
    pub note: String,
    pub story_title: String,
    pub equity_after_trade: f64,
    pub total_pnl_after_trade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeExecution {
    pub trade: ExecutedTrade,
    pub portfolio: PortfolioView,
}
