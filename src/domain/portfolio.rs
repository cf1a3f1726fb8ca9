//! Portfolio state and equity tracking.

use chrono::NaiveDate;

use super::position::{Position, Trade};

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Cash, the single position, the trade log and the equity curve.
///
/// The trade log and equity curve are append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub position: Position,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            initial_capital,
            position: Position::default(),
            trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn shares(&self) -> i64 {
        self.position.shares
    }

    /// cash + shares * price
    pub fn equity(&self, price: f64) -> f64 {
        self.cash + self.position.market_value(price)
    }

    /// Append one equity sample valued at `price`.
    pub fn mark(&mut self, date: NaiveDate, price: f64) {
        let equity = self.equity(price);
        self.equity_curve.push(EquityPoint { date, equity });
    }

    pub fn record_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    pub fn equity_values(&self) -> Vec<f64> {
        self.equity_curve.iter().map(|p| p.equity).collect()
    }

    pub fn equity_dates(&self) -> Vec<NaiveDate> {
        self.equity_curve.iter().map(|p| p.date).collect()
    }

    /// Last marked equity, or the initial capital if nothing was marked.
    pub fn final_equity(&self) -> f64 {
        self.equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.initial_capital)
    }
}
