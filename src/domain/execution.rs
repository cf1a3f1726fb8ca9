//! Trade execution and fill simulation.
//!
//! Fills are all-or-nothing: an order that cannot be paid for in full is
//! rejected without touching the portfolio. Slippage is quoted in basis
//! points and always moves the fill against the trader; commission is a
//! flat fee per fill.

use chrono::NaiveDate;
use tracing::debug;

use super::ohlcv::OhlcvBar;
use super::portfolio::Portfolio;
use super::position::{Side, Trade};

const BPS_PER_UNIT: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    pub commission_per_trade: f64,
    pub slippage_bps: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            commission_per_trade: 0.50,
            slippage_bps: 5.0,
        }
    }
}

/// Buy fill: market_price * (1 + slippage_bps / 10000)
pub fn apply_slippage_buy(market_price: f64, slippage_bps: f64) -> f64 {
    market_price * (1.0 + slippage_bps / BPS_PER_UNIT)
}

/// Sell fill: market_price * (1 - slippage_bps / 10000)
pub fn apply_slippage_sell(market_price: f64, slippage_bps: f64) -> f64 {
    market_price * (1.0 - slippage_bps / BPS_PER_UNIT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InsufficientCash,
    InvalidPrice,
}

/// Result of an order request.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    Filled {
        shares: i64,
        fill_price: f64,
        commission: f64,
    },
    Rejected(RejectReason),
    /// Nothing to do: non-positive size, or selling while flat.
    Skipped,
}

impl OrderOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, OrderOutcome::Filled { .. })
    }
}

/// Buy `shares` at the open of `fill_bar`.
pub fn buy(
    portfolio: &mut Portfolio,
    fill_bar: &OhlcvBar,
    shares: i64,
    config: &ExecutionConfig,
) -> OrderOutcome {
    if shares <= 0 {
        return OrderOutcome::Skipped;
    }

    let fill_price = apply_slippage_buy(fill_bar.open, config.slippage_bps);
    if !fill_price.is_finite() || fill_price <= 0.0 {
        debug!(date = %fill_bar.date, fill_price, "buy rejected: invalid fill price");
        return OrderOutcome::Rejected(RejectReason::InvalidPrice);
    }

    let total_cost = shares as f64 * fill_price + config.commission_per_trade;
    if total_cost > portfolio.cash {
        debug!(
            date = %fill_bar.date,
            shares,
            total_cost,
            cash = portfolio.cash,
            "buy rejected: insufficient cash"
        );
        return OrderOutcome::Rejected(RejectReason::InsufficientCash);
    }

    portfolio.position.add(shares, fill_price);
    portfolio.cash -= total_cost;
    portfolio.record_trade(Trade {
        date: fill_bar.date,
        side: Side::Buy,
        shares,
        fill_price,
    });
    debug!(date = %fill_bar.date, shares, fill_price, "buy filled");

    OrderOutcome::Filled {
        shares,
        fill_price,
        commission: config.commission_per_trade,
    }
}

/// Sell up to `shares` at the open of `fill_bar`. Never goes short.
pub fn sell(
    portfolio: &mut Portfolio,
    fill_bar: &OhlcvBar,
    shares: i64,
    config: &ExecutionConfig,
) -> OrderOutcome {
    sell_at(portfolio, fill_bar.date, fill_bar.open, shares, config)
}

/// Sell up to `shares` against an explicit market price.
///
/// Used directly only for the end-of-run liquidation, which has no following
/// bar and fills at the final close.
pub fn sell_at(
    portfolio: &mut Portfolio,
    date: NaiveDate,
    market_price: f64,
    shares: i64,
    config: &ExecutionConfig,
) -> OrderOutcome {
    if shares <= 0 || portfolio.position.is_flat() {
        return OrderOutcome::Skipped;
    }

    let fill_price = apply_slippage_sell(market_price, config.slippage_bps);
    if !fill_price.is_finite() {
        debug!(%date, fill_price, "sell rejected: invalid fill price");
        return OrderOutcome::Rejected(RejectReason::InvalidPrice);
    }

    let shares = portfolio.position.reduce(shares);
    portfolio.cash += shares as f64 * fill_price - config.commission_per_trade;
    portfolio.record_trade(Trade {
        date,
        side: Side::Sell,
        shares,
        fill_price,
    });
    debug!(%date, shares, fill_price, "sell filled");

    OrderOutcome::Filled {
        shares,
        fill_price,
        commission: config.commission_per_trade,
    }
}
