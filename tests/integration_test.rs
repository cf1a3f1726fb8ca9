//! Engine integration tests.
//!
//! Tests cover:
//! - End-to-end SMA 50/200 run over a rising-then-falling series
//! - Fill timing: every fill comes from the next bar's open, except the
//!   terminal liquidation at the final close
//! - Truncating future bars never changes earlier decisions
//! - Buy sizing and all-or-nothing rejection
//! - Metrics over a finished run

mod common;

use approx::assert_relative_eq;
use common::*;
use proptest::prelude::*;
use tradesim::domain::backtest::{BacktestConfig, run_backtest};
use tradesim::domain::execution::{apply_slippage_buy, apply_slippage_sell};
use tradesim::domain::metrics::Metrics;
use tradesim::domain::position::Side;
use tradesim::domain::strategy::{Signal, SmaCrossover, Strategy};

/// Enters long at one fixed index and never exits.
struct EnterAt(usize);

impl Strategy for EnterAt {
    fn name(&self) -> String {
        format!("enter at {}", self.0)
    }

    fn warmup_bars(&self) -> usize {
        self.0
    }

    fn signal(&self, _history: &[OhlcvBar], index: usize) -> Signal {
        if index == self.0 {
            Signal::EnterLong
        } else {
            Signal::Hold
        }
    }
}

fn oscillating_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 15.0 * (i as f64 / 9.0).sin() + 0.05 * i as f64)
        .collect()
}

mod end_to_end {
    use super::*;

    #[test]
    fn rise_then_fall_trades_once_each_way() {
        let bars = bars_from_closes("2020-01-01", &rise_then_fall_closes());
        let result = run_backtest(&bars, &SmaCrossover::default(), &BacktestConfig::default());
        let portfolio = &result.portfolio;

        assert_eq!(result.bar_count, 250);
        assert_eq!(portfolio.trades.len(), 2);

        let buy = &portfolio.trades[0];
        let sell = &portfolio.trades[1];
        assert_eq!(buy.side, Side::Buy);
        assert_eq!(sell.side, Side::Sell);

        // upward cross on bar 201 fills at bar 202's open; downward cross on 247 fills at 248
        assert_eq!(buy.date, bars[202].date);
        assert_eq!(sell.date, bars[248].date);
        assert_eq!(buy.shares, 989);
        assert_eq!(sell.shares, 989);
        assert_relative_eq!(buy.fill_price, 101.0505, epsilon = 1e-9);
        assert_relative_eq!(sell.fill_price, 65.967, epsilon = 1e-9);

        assert!(portfolio.cash >= 0.0);
        assert!(portfolio.position.is_flat());
        assert_relative_eq!(portfolio.cash, 65_301.4185, epsilon = 1e-6);
        // closed before the end, so no terminal liquidation mark
        assert_eq!(portfolio.equity_curve.len(), 250);
    }

    #[test]
    fn rise_then_fall_metrics() {
        let bars = bars_from_closes("2020-01-01", &rise_then_fall_closes());
        let result = run_backtest(&bars, &SmaCrossover::default(), &BacktestConfig::default());
        let metrics = Metrics::compute(&result.portfolio);

        assert_eq!(metrics.total_trades, 2);
        assert_relative_eq!(metrics.final_equity, 65_301.4185, epsilon = 1e-6);
        assert_relative_eq!(metrics.total_return, -0.346985815, epsilon = 1e-9);
        assert!(metrics.cagr < 0.0);
        assert!(metrics.sharpe_ratio < 0.0);
        assert!(metrics.max_drawdown > 0.3 && metrics.max_drawdown <= 1.0);
    }

    #[test]
    fn short_history_never_trades() {
        let closes: Vec<f64> = (0..150).map(|i| 100.0 + i as f64).collect();
        let bars = bars_from_closes("2020-01-01", &closes);
        let result = run_backtest(&bars, &SmaCrossover::default(), &BacktestConfig::default());

        assert!(result.portfolio.trades.is_empty());
        assert_eq!(result.portfolio.equity_curve.len(), 150);
        assert_relative_eq!(result.portfolio.final_equity(), 100_000.0);
    }
}

mod fill_timing {
    use super::*;

    #[test]
    fn fills_come_from_next_open_or_final_close() {
        let bars = bars_from_closes("2021-03-01", &oscillating_closes(300));
        let strategy = SmaCrossover::new(5, 20);
        let config = BacktestConfig::default();

        let result = run_backtest(&bars, &strategy, &config);
        let trades = &result.portfolio.trades;
        assert!(trades.len() >= 4, "expected several round trips");

        let last = bars.len() - 1;
        for (n, trade) in trades.iter().enumerate() {
            let j = bars.iter().position(|b| b.date == trade.date).unwrap();
            let is_terminal = n == trades.len() - 1 && j == last && trade.side == Side::Sell;

            let signal = strategy.signal(&bars[..j], j - 1);
            let from_next_open = match trade.side {
                Side::Buy => apply_slippage_buy(bars[j].open, config.slippage_bps),
                Side::Sell => apply_slippage_sell(bars[j].open, config.slippage_bps),
            };

            if is_terminal && signal != Signal::ExitLong {
                let from_close = apply_slippage_sell(bars[last].close, config.slippage_bps);
                assert_relative_eq!(trade.fill_price, from_close, epsilon = 1e-9);
            } else {
                let expected = match trade.side {
                    Side::Buy => Signal::EnterLong,
                    Side::Sell => Signal::ExitLong,
                };
                assert_eq!(signal, expected, "trade {n} not preceded by its signal");
                assert_relative_eq!(trade.fill_price, from_next_open, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn trades_alternate_buy_sell() {
        let bars = bars_from_closes("2021-03-01", &oscillating_closes(300));
        let result = run_backtest(&bars, &SmaCrossover::new(5, 20), &BacktestConfig::default());

        for (n, trade) in result.portfolio.trades.iter().enumerate() {
            let expected = if n % 2 == 0 { Side::Buy } else { Side::Sell };
            assert_eq!(trade.side, expected);
        }
    }

    #[test]
    fn truncating_future_bars_keeps_earlier_decisions() {
        let bars = bars_from_closes("2021-03-01", &oscillating_closes(300));
        let strategy = SmaCrossover::new(5, 20);
        let config = BacktestConfig::default();
        let full = run_backtest(&bars, &strategy, &config);

        for cut in [60, 123, 200, 271] {
            let partial = run_backtest(&bars[..cut], &strategy, &config);
            let cutoff = bars[cut - 1].date;

            // a trade dated on the last kept bar may be the partial run's forced exit
            let full_prefix: Vec<_> = full
                .portfolio
                .trades
                .iter()
                .filter(|t| t.date < cutoff)
                .collect();
            let partial_prefix: Vec<_> = partial
                .portfolio
                .trades
                .iter()
                .filter(|t| t.date < cutoff)
                .collect();
            assert_eq!(full_prefix, partial_prefix, "diverged before bar {cut}");

            for i in 0..cut {
                assert_eq!(
                    full.portfolio.equity_curve[i],
                    partial.portfolio.equity_curve[i]
                );
            }
        }
    }

    #[test]
    fn open_position_is_liquidated_once_at_final_close() {
        let bars = bars_from_closes("2022-01-03", &oscillating_closes(30));
        let config = BacktestConfig::default();
        let result = run_backtest(&bars, &EnterAt(3), &config);
        let trades = &result.portfolio.trades;

        assert_eq!(trades.len(), 2);
        let exit = &trades[1];
        let last = bars.last().unwrap();
        assert_eq!(exit.date, last.date);
        assert_relative_eq!(
            exit.fill_price,
            apply_slippage_sell(last.close, config.slippage_bps),
            epsilon = 1e-9
        );

        let curve = &result.portfolio.equity_curve;
        assert_eq!(curve.len(), bars.len() + 1);
        assert_eq!(curve[curve.len() - 1].date, last.date);
        assert_eq!(curve[curve.len() - 2].date, last.date);
        assert_relative_eq!(curve[curve.len() - 1].equity, result.portfolio.cash);
    }
}

mod sizing {
    use super::*;

    #[test]
    fn buys_floor_of_equity_over_fill() {
        let closes = [50.0, 50.0, 37.0, 37.0];
        let bars = bars_from_closes("2022-01-03", &closes);
        let config = frictionless_config();

        // signal on bar 1 (close 50); fills at bar 2's open, which is bar 1's close
        let result = run_backtest(&bars, &EnterAt(1), &config);
        assert_eq!(result.portfolio.trades[0].shares, (100_000.0_f64 / 50.0).floor() as i64);
    }

    proptest! {
        #[test]
        fn buy_is_floor_sized_or_fully_rejected(
            capital in 100.0f64..1e6,
            price in 0.5f64..500.0,
            commission in 0.0f64..50.0,
        ) {
            let bars = bars_from_closes("2022-01-03", &[price, price, price]);
            let config = BacktestConfig {
                initial_capital: capital,
                commission_per_trade: commission,
                slippage_bps: 0.0,
                risk_fraction: 1.0,
            };

            let result = run_backtest(&bars[..2], &EnterAt(0), &config);
            let portfolio = &result.portfolio;
            let shares = (capital / price).floor() as i64;

            if shares > 0 && shares as f64 * price + commission <= capital {
                prop_assert_eq!(portfolio.trades.len(), 2);
                prop_assert_eq!(portfolio.trades[0].shares, shares);
                prop_assert_eq!(portfolio.trades[1].shares, shares);
            } else {
                prop_assert!(portfolio.trades.is_empty());
                prop_assert_eq!(portfolio.cash, capital);
                prop_assert!(portfolio.position.is_flat());
            }
        }
    }
}
