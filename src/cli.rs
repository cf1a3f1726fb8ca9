//! CLI definition and dispatch.

use clap::{CommandFactory, Parser};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::console_report::ConsoleReport;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestConfig, BacktestResult, run_backtest};
use crate::domain::config_validation::{validate_backtest_config, validate_strategy_config};
use crate::domain::error::TradesimError;
use crate::domain::metrics::Metrics;
use crate::domain::strategy::{DEFAULT_FAST_WINDOW, DEFAULT_SLOW_WINDOW, SmaCrossover, Strategy};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const CSV_FORMAT_HINT: &str = "CSV: Date,Open,High,Low,Close,Volume";

#[derive(Parser, Debug)]
#[command(
    name = "tradesim",
    about = "Backtest a moving average crossover strategy on daily bars"
)]
pub struct Cli {
    /// CSV file of daily bars
    pub input: Option<PathBuf>,
    /// INI file with [backtest] and [strategy] settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    let Some(input) = cli.input else {
        print_usage();
        return ExitCode::SUCCESS;
    };

    let adapter = match cli.config.as_ref() {
        Some(path) => match load_config(path) {
            Ok(a) => a,
            Err(code) => return code,
        },
        None => FileConfigAdapter::empty(),
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let bt_config = build_backtest_config(&adapter);
    let strategy = build_strategy(&adapter);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run_pipeline(
        &CsvAdapter::new(),
        &ConsoleReport::new(),
        &input,
        &strategy,
        &bt_config,
        &mut out,
    ) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn print_usage() {
    let mut cmd = Cli::command();
    println!("{}", cmd.render_usage());
    println!("{CSV_FORMAT_HINT}");
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> BacktestConfig {
    let defaults = BacktestConfig::default();
    BacktestConfig {
        initial_capital: adapter.get_double(
            "backtest",
            "initial_capital",
            defaults.initial_capital,
        ),
        commission_per_trade: adapter.get_double(
            "backtest",
            "commission_per_trade",
            defaults.commission_per_trade,
        ),
        slippage_bps: adapter.get_double("backtest", "slippage_bps", defaults.slippage_bps),
        risk_fraction: adapter.get_double("backtest", "risk_fraction", defaults.risk_fraction),
    }
}

/// Assumes `validate_strategy_config` has accepted `adapter`.
pub fn build_strategy(adapter: &dyn ConfigPort) -> SmaCrossover {
    let fast = adapter.get_int("strategy", "fast_window", DEFAULT_FAST_WINDOW as i64);
    let slow = adapter.get_int("strategy", "slow_window", DEFAULT_SLOW_WINDOW as i64);
    SmaCrossover::new(fast.max(1) as usize, slow.max(1) as usize)
}

/// Load bars, run the backtest, compute metrics and write the report to `out`.
pub fn run_pipeline(
    data_port: &dyn DataPort,
    report: &dyn ReportPort,
    input: &Path,
    strategy: &dyn Strategy,
    bt_config: &BacktestConfig,
    out: &mut dyn Write,
) -> Result<BacktestResult, TradesimError> {
    let bars = data_port.load_bars(input)?;

    let warmup = strategy.warmup_bars();
    if bars.len() < warmup {
        writeln!(
            out,
            "Loaded {} bars. ({}+ better for {}.)",
            bars.len(),
            warmup,
            strategy.name()
        )?;
    }

    let result = run_backtest(&bars, strategy, bt_config);
    let metrics = Metrics::compute(&result.portfolio);
    info!(
        total_return = metrics.total_return,
        sharpe = metrics.sharpe_ratio,
        max_drawdown = metrics.max_drawdown,
        "metrics computed"
    );

    report.write(&result, &metrics, &strategy.name(), out)?;
    Ok(result)
}
