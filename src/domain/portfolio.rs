//! Portfolio state: cash, positions, realized PnL and the recent trade blotter.
//!
//! `Portfolio` is plain single-owner state. Concurrent access goes through
//! [`Ledger`](super::ledger::Ledger), which serializes every call behind one lock.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

use super::error::HeliosError;
use super::position::{Position, PositionView};
use super::trade::{ExecutedTrade, Order, TradeSide};

/// Most recent trades kept in the blotter; older ones are evicted.
pub const MAX_RECENT_TRADES: usize = 40;

/// Ceiling for starting cash and for a single trade's notional. Keeps every amount
/// far enough from `f64::MAX` that cent rounding stays finite.
pub const MAX_AMOUNT: f64 = 1e15;

/// Round to cents, halves toward positive infinity.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioView {
    pub starting_cash: f64,
    pub cash: f64,
    pub equity: f64,
    pub total_pnl: f64,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub positions: Vec<PositionView>,
    pub recent_trades: Vec<ExecutedTrade>,
    pub equity_timeline: Vec<EquityPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    starting_cash: f64,
    cash: f64,
    realized_pnl: f64,
    positions: HashMap<String, Position>,
    recent_trades: VecDeque<ExecutedTrade>,
    next_sequence: u64,
}

impl Portfolio {
    pub fn new(starting_cash: f64) -> Result<Self, HeliosError> {
        if !starting_cash.is_finite() || starting_cash <= 0.0 || starting_cash > MAX_AMOUNT {
            return Err(HeliosError::ConfigInvalid {
                section: "ledger".into(),
                key: "starting_cash".into(),
                reason: format!("starting_cash must be positive and at most {MAX_AMOUNT:e}"),
            });
        }
        Ok(Portfolio {
            starting_cash,
            cash: starting_cash,
            realized_pnl: 0.0,
            positions: HashMap::new(),
            recent_trades: VecDeque::with_capacity(MAX_RECENT_TRADES + 1),
            next_sequence: 1,
        })
    }

    pub fn starting_cash(&self) -> f64 {
        self.starting_cash
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    pub fn get_position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn trade_count(&self) -> usize {
        self.recent_trades.len()
    }

    pub fn equity(&self) -> f64 {
        self.cash + self.positions.values().map(Position::market_value).sum::<f64>()
    }

    pub fn unrealized_pnl(&self) -> f64 {
        self.positions.values().map(Position::unrealized_pnl).sum()
    }

    /// Fill a validated order and record it in the blotter.
    ///
    /// Every check happens before the first write, so a rejected order leaves the
    /// portfolio untouched.
    pub fn apply(
        &mut self,
        order: &Order,
        timestamp: DateTime<Utc>,
    ) -> Result<ExecutedTrade, HeliosError> {
        let notional = order.notional();
        match order.side {
            TradeSide::Buy => self.buy(order, notional)?,
            TradeSide::Sell => self.sell(order, notional)?,
        }

        let equity = self.equity();
        let trade = ExecutedTrade {
            trade_id: format!("TRD-{}", self.next_sequence),
            timestamp,
            symbol: order.symbol.clone(),
            side: order.side,
            quantity: order.quantity,
            price: order.price,
            notional: round_cents(notional),
            note: order.note.clone(),
            story_title: order.story_title.clone(),
            equity_after_trade: round_cents(equity),
            total_pnl_after_trade: round_cents(equity - self.starting_cash),
        };
        self.next_sequence += 1;

        self.recent_trades.push_front(trade.clone());
        self.recent_trades.truncate(MAX_RECENT_TRADES);
        Ok(trade)
    }

    fn buy(&mut self, order: &Order, notional: f64) -> Result<(), HeliosError> {
        if notional > self.cash {
            return Err(HeliosError::InsufficientFunds {
                symbol: order.symbol.clone(),
                notional,
                cash: self.cash,
            });
        }
        let held = self.positions.get(&order.symbol).map_or(0, |p| p.quantity);
        if held.checked_add(order.quantity).is_none() {
            return Err(HeliosError::PositionLimit {
                symbol: order.symbol.clone(),
                held,
                requested: order.quantity,
            });
        }

        self.cash -= notional;
        match self.positions.get_mut(&order.symbol) {
            Some(position) => position.add(order.quantity, order.price),
            None => {
                self.positions.insert(
                    order.symbol.clone(),
                    Position::open(&order.symbol, order.quantity, order.price),
                );
            }
        }
        Ok(())
    }

    fn sell(&mut self, order: &Order, notional: f64) -> Result<(), HeliosError> {
        let position = match self.positions.get_mut(&order.symbol) {
            Some(position) if position.quantity >= order.quantity => position,
            other => {
                return Err(HeliosError::InsufficientPosition {
                    symbol: order.symbol.clone(),
                    held: other.map_or(0, |p| p.quantity),
                    requested: order.quantity,
                });
            }
        };

        self.cash += notional;
        self.realized_pnl += position.reduce(order.quantity, order.price);
        if position.is_closed() {
            self.positions.remove(&order.symbol);
        }
        Ok(())
    }

    pub fn view(&self) -> PortfolioView {
        let mut positions: Vec<PositionView> =
            self.positions.values().map(Position::view).collect();
        positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        // Oldest first, then a stable sort so equal timestamps keep execution order.
        let mut equity_timeline: Vec<EquityPoint> = self
            .recent_trades
            .iter()
            .rev()
            .map(|trade| EquityPoint {
                timestamp: trade.timestamp,
                equity: trade.equity_after_trade,
            })
            .collect();
        equity_timeline.sort_by_key(|point| point.timestamp);

        let equity = self.equity();
        PortfolioView {
            starting_cash: round_cents(self.starting_cash),
            cash: round_cents(self.cash),
            equity: round_cents(equity),
            total_pnl: round_cents(equity - self.starting_cash),
            realized_pnl: round_cents(self.realized_pnl),
            unrealized_pnl: round_cents(self.unrealized_pnl()),
            positions,
            recent_trades: self.recent_trades.iter().cloned().collect(),
            equity_timeline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::TradeTicket;
    use chrono::TimeZone;

    fn at(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, second).unwrap()
    }

    fn order(symbol: &str, side: TradeSide, quantity: i64, price: f64) -> Order {
        TradeTicket::new(symbol, side, quantity, price).validate().unwrap()
    }

    #[test]
    fn new_portfolio() {
        let portfolio = Portfolio::new(100_000.0).unwrap();
        assert!((portfolio.cash() - 100_000.0).abs() < f64::EPSILON);
        assert!((portfolio.equity() - 100_000.0).abs() < f64::EPSILON);
        assert_eq!(portfolio.position_count(), 0);
        assert_eq!(portfolio.trade_count(), 0);
    }

    #[test]
    fn new_rejects_non_positive_cash() {
        for cash in [0.0, -1.0, f64::NAN, 1e308, MAX_AMOUNT * 2.0] {
            assert!(matches!(
                Portfolio::new(cash),
                Err(HeliosError::ConfigInvalid { .. })
            ));
        }
    }

    #[test]
    fn round_cents_rounds_half_up() {
        assert!((round_cents(1.005_000_1) - 1.01).abs() < f64::EPSILON);
        assert!((round_cents(2.344) - 2.34).abs() < f64::EPSILON);
        assert!((round_cents(-2.345_000_1) - (-2.35)).abs() < f64::EPSILON);
        assert!((round_cents(-0.125) - (-0.12)).abs() < f64::EPSILON);
    }

    #[test]
    fn buy_opens_position_and_debits_cash() {
        let mut portfolio = Portfolio::new(10_000.0).unwrap();
        let trade = portfolio.apply(&order("X", TradeSide::Buy, 10, 100.0), at(0)).unwrap();

        assert!((portfolio.cash() - 9_000.0).abs() < f64::EPSILON);
        let pos = portfolio.get_position("X").unwrap();
        assert_eq!(pos.quantity, 10);
        assert!((pos.average_price - 100.0).abs() < f64::EPSILON);
        assert_eq!(trade.trade_id, "TRD-1");
        assert!((trade.equity_after_trade - 10_000.0).abs() < f64::EPSILON);
        assert!(trade.total_pnl_after_trade.abs() < f64::EPSILON);
    }

    #[test]
    fn second_buy_blends_cost_basis() {
        let mut portfolio = Portfolio::new(10_000.0).unwrap();
        portfolio.apply(&order("X", TradeSide::Buy, 10, 100.0), at(0)).unwrap();
        portfolio.apply(&order("X", TradeSide::Buy, 10, 110.0), at(1)).unwrap();

        let pos = portfolio.get_position("X").unwrap();
        assert_eq!(pos.quantity, 20);
        assert!((pos.average_price - 105.0).abs() < 1e-9);
        assert!((pos.last_price - 110.0).abs() < f64::EPSILON);
        assert!((portfolio.unrealized_pnl() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn buy_exactly_all_cash_is_allowed() {
        let mut portfolio = Portfolio::new(1_000.0).unwrap();
        portfolio.apply(&order("X", TradeSide::Buy, 10, 100.0), at(0)).unwrap();
        assert!(portfolio.cash().abs() < f64::EPSILON);
    }

    #[test]
    fn buy_beyond_cash_is_rejected_without_changes() {
        let mut portfolio = Portfolio::new(1_000.0).unwrap();
        let before = portfolio.clone();
        let err = portfolio
            .apply(&order("X", TradeSide::Buy, 11, 100.0), at(0))
            .unwrap_err();
        assert!(matches!(err, HeliosError::InsufficientFunds { .. }));
        assert_eq!(portfolio, before);
    }

    #[test]
    fn sell_without_position_is_rejected() {
        let mut portfolio = Portfolio::new(1_000.0).unwrap();
        let err = portfolio
            .apply(&order("X", TradeSide::Sell, 1, 10.0), at(0))
            .unwrap_err();
        assert!(matches!(
            err,
            HeliosError::InsufficientPosition { held: 0, requested: 1, .. }
        ));
        assert_eq!(portfolio.trade_count(), 0);
    }

    #[test]
    fn full_sell_removes_position() {
        let mut portfolio = Portfolio::new(1_000.0).unwrap();
        portfolio.apply(&order("X", TradeSide::Buy, 5, 100.0), at(0)).unwrap();
        portfolio.apply(&order("X", TradeSide::Sell, 5, 90.0), at(1)).unwrap();

        assert!(portfolio.get_position("X").is_none());
        assert!((portfolio.realized_pnl() - (-50.0)).abs() < f64::EPSILON);
        assert!((portfolio.cash() - 950.0).abs() < f64::EPSILON);
    }

    #[test]
    fn buy_that_overflows_quantity_is_rejected_before_any_write() {
        let mut portfolio = Portfolio::new(1_000.0).unwrap();
        portfolio
            .apply(&order("X", TradeSide::Buy, i64::MAX, 1e-300), at(0))
            .unwrap();
        let before = portfolio.clone();

        let err = portfolio
            .apply(&order("X", TradeSide::Buy, 1, 1e-300), at(1))
            .unwrap_err();

        assert!(matches!(
            err,
            HeliosError::PositionLimit { held: i64::MAX, requested: 1, .. }
        ));
        assert!(err.is_client_error());
        assert_eq!(portfolio, before);
    }

    #[test]
    fn view_sorts_positions_by_symbol() {
        let mut portfolio = Portfolio::new(10_000.0).unwrap();
        for symbol in ["SHEL.L", "BARC.L", "IAG.L"] {
            portfolio.apply(&order(symbol, TradeSide::Buy, 1, 10.0), at(0)).unwrap();
        }
        let symbols: Vec<String> =
            portfolio.view().positions.into_iter().map(|p| p.symbol).collect();
        assert_eq!(symbols, vec!["BARC.L", "IAG.L", "SHEL.L"]);
    }

    #[test]
    fn timeline_is_oldest_first_and_history_newest_first() {
        let mut portfolio = Portfolio::new(10_000.0).unwrap();
        portfolio.apply(&order("X", TradeSide::Buy, 10, 100.0), at(5)).unwrap();
        portfolio.apply(&order("X", TradeSide::Sell, 5, 120.0), at(5)).unwrap();
        portfolio.apply(&order("X", TradeSide::Sell, 5, 130.0), at(9)).unwrap();

        let view = portfolio.view();
        let ids: Vec<&str> = view.recent_trades.iter().map(|t| t.trade_id.as_str()).collect();
        assert_eq!(ids, vec!["TRD-3", "TRD-2", "TRD-1"]);

        let equities: Vec<f64> = view.equity_timeline.iter().map(|p| p.equity).collect();
        assert_eq!(equities, vec![10_000.0, 10_200.0, 10_250.0]);
    }

    #[test]
    fn history_is_capped() {
        let mut portfolio = Portfolio::new(1_000_000.0).unwrap();
        for i in 0..(MAX_RECENT_TRADES + 5) {
            portfolio.apply(&order("X", TradeSide::Buy, 1, 1.0), at((i % 60) as u32)).unwrap();
        }
        let view = portfolio.view();
        assert_eq!(view.recent_trades.len(), MAX_RECENT_TRADES);
        assert_eq!(view.recent_trades[0].trade_id, "TRD-45");
        assert_eq!(view.recent_trades[MAX_RECENT_TRADES - 1].trade_id, "TRD-6");
    }
}
