//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TradesimError;
use crate::domain::metrics::Metrics;
use std::io::Write;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        metrics: &Metrics,
        strategy_name: &str,
        out: &mut dyn Write,
    ) -> Result<(), TradesimError>;
}
