//! Plain-text console report.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TradesimError;
use crate::domain::metrics::Metrics;
use crate::domain::position::Trade;
use crate::ports::report_port::ReportPort;
use std::io::Write;

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReport;

impl ConsoleReport {
    pub fn new() -> Self {
        ConsoleReport
    }
}

/// `YYYY-MM-DD SIDE shares @ price`, price to 4 decimals.
pub fn format_trade(trade: &Trade) -> String {
    format!(
        "{} {:<4} {} @ {:.4}",
        trade.date,
        trade.side.to_string(),
        trade.shares,
        trade.fill_price
    )
}

impl ReportPort for ConsoleReport {
    fn write(
        &self,
        result: &BacktestResult,
        metrics: &Metrics,
        strategy_name: &str,
        out: &mut dyn Write,
    ) -> Result<(), TradesimError> {
        writeln!(out, "=== Results ({strategy_name}, long-only) ===")?;
        writeln!(out, "Bars: {}", result.bar_count)?;
        writeln!(out, "Trades: {}", metrics.total_trades)?;
        writeln!(out, "Final Equity: ${:.4}", metrics.final_equity)?;
        writeln!(out, "Total Return: {:.4}%", metrics.total_return * 100.0)?;
        writeln!(out, "CAGR: {:.4}%", metrics.cagr * 100.0)?;
        writeln!(out, "Sharpe (ann.): {:.4}", metrics.sharpe_ratio)?;
        writeln!(out, "Max Drawdown: {:.4}%", metrics.max_drawdown * 100.0)?;

        writeln!(out)?;
        writeln!(out, "Trade Log:")?;
        for trade in &result.portfolio.trades {
            writeln!(out, "{}", format_trade(trade))?;
        }
        Ok(())
    }
}
