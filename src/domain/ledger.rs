//! Thread-safe paper-trading ledger.
//!
//! All state sits in one [`Portfolio`] behind a single mutex. `execute` and `snapshot`
//! hold the lock for their whole duration, so a snapshot never sees a half-applied trade
//! and cash, positions and PnL always move together.

use chrono::Utc;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use super::error::HeliosError;
use super::portfolio::{Portfolio, PortfolioView};
use super::trade::{TradeExecution, TradeTicket};

#[derive(Debug)]
pub struct Ledger {
    state: Mutex<Portfolio>,
}

impl Ledger {
    pub fn new(starting_cash: f64) -> Result<Self, HeliosError> {
        Ok(Ledger {
            state: Mutex::new(Portfolio::new(starting_cash)?),
        })
    }

    pub fn execute(&self, ticket: &TradeTicket) -> Result<TradeExecution, HeliosError> {
        let order = ticket.validate()?;

        let mut portfolio = self.lock();
        let trade = portfolio.apply(&order, Utc::now()).inspect_err(|err| {
            debug!(symbol = %order.symbol, side = %order.side, error = %err, "trade rejected");
        })?;
        info!(
            trade_id = %trade.trade_id,
            symbol = %trade.symbol,
            side = %trade.side,
            quantity = trade.quantity,
            price = trade.price,
            equity = trade.equity_after_trade,
            "trade executed"
        );
        let portfolio = portfolio.view();
        Ok(TradeExecution { trade, portfolio })
    }

    pub fn snapshot(&self) -> PortfolioView {
        self.lock().view()
    }

    // Portfolio::apply validates before writing, so a panic elsewhere cannot leave
    // the state half-updated and a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Portfolio> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
