//! Backtest engine and event loop.
//!
//! Each bar is marked at its close before its signal is evaluated. Orders
//! produced by a signal on bar `i` fill at the open of bar `i + 1`; a signal
//! on the last bar has nothing to fill against and ends the loop. A position
//! still open after the loop is liquidated at the final bar's close.

use tracing::{info, warn};

use super::execution::{self, ExecutionConfig, apply_slippage_buy};
use super::ohlcv::OhlcvBar;
use super::portfolio::Portfolio;
use super::strategy::{Signal, Strategy};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub commission_per_trade: f64,
    pub slippage_bps: f64,
    /// Fraction of mark-to-market equity committed on entry.
    pub risk_fraction: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        let execution = ExecutionConfig::default();
        BacktestConfig {
            initial_capital: 100_000.0,
            commission_per_trade: execution.commission_per_trade,
            slippage_bps: execution.slippage_bps,
            risk_fraction: 1.0,
        }
    }
}

impl BacktestConfig {
    pub fn execution_config(&self) -> ExecutionConfig {
        ExecutionConfig {
            commission_per_trade: self.commission_per_trade,
            slippage_bps: self.slippage_bps,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub portfolio: Portfolio,
    pub bar_count: usize,
}

/// Whole shares affordable with `equity * risk_fraction` at `fill_price`.
pub fn position_size(equity: f64, risk_fraction: f64, fill_price: f64) -> i64 {
    let shares = (equity * risk_fraction / fill_price).floor();
    if shares.is_finite() && shares > 0.0 {
        shares as i64
    } else {
        0
    }
}

pub fn run_backtest<S: Strategy + ?Sized>(
    bars: &[OhlcvBar],
    strategy: &S,
    config: &BacktestConfig,
) -> BacktestResult {
    let exec = config.execution_config();
    let mut portfolio = Portfolio::new(config.initial_capital);

    info!(
        bars = bars.len(),
        strategy = %strategy.name(),
        initial_capital = config.initial_capital,
        "running backtest"
    );

    for (i, bar) in bars.iter().enumerate() {
        portfolio.mark(bar.date, bar.close);

        let signal = strategy.signal(&bars[..=i], i);
        if signal.is_hold() {
            continue;
        }

        let Some(next) = bars.get(i + 1) else {
            break;
        };

        match signal {
            Signal::EnterLong if portfolio.position.is_flat() => {
                let equity = portfolio.equity(bar.close);
                let fill_price = apply_slippage_buy(next.open, exec.slippage_bps);
                let shares = position_size(equity, config.risk_fraction, fill_price);
                execution::buy(&mut portfolio, next, shares, &exec);
            }
            Signal::ExitLong if portfolio.position.is_long() => {
                let shares = portfolio.shares();
                execution::sell(&mut portfolio, next, shares, &exec);
            }
            _ => {}
        }
    }

    if let Some(last) = bars.last()
        && portfolio.position.is_long()
    {
        warn!(
            date = %last.date,
            shares = portfolio.shares(),
            "liquidating open position at final close"
        );
        let shares = portfolio.shares();
        execution::sell_at(&mut portfolio, last.date, last.close, shares, &exec);
        portfolio.mark(last.date, last.close);
    }

    info!(
        trades = portfolio.trades.len(),
        final_equity = portfolio.final_equity(),
        "backtest complete"
    );

    BacktestResult {
        portfolio,
        bar_count: bars.len(),
    }
}
