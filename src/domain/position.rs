//! Position state and trade records.

use chrono::NaiveDate;
use std::fmt;

/// Long-only holding in the single simulated instrument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Position {
    pub shares: i64,
    /// Weighted-average fill price; `Some` iff `shares > 0`.
    pub avg_entry_price: Option<f64>,
}

impl Position {
    pub fn is_flat(&self) -> bool {
        self.shares == 0
    }

    pub fn is_long(&self) -> bool {
        self.shares > 0
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    /// Add `shares` bought at `fill_price`, re-weighting the average entry.
    pub(crate) fn add(&mut self, shares: i64, fill_price: f64) {
        let prev_cost = self.shares as f64 * self.avg_entry_price.unwrap_or(0.0);
        let total = self.shares + shares;
        self.avg_entry_price = Some((prev_cost + shares as f64 * fill_price) / total as f64);
        self.shares = total;
    }

    /// Remove up to `shares`, returning how many were actually removed.
    pub(crate) fn reduce(&mut self, shares: i64) -> i64 {
        let removed = shares.min(self.shares);
        self.shares -= removed;
        if self.shares == 0 {
            self.avg_entry_price = None;
        }
        removed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// One executed fill.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub side: Side,
    pub shares: i64,
    pub fill_price: f64,
}
