#![allow(dead_code)]

use chrono::NaiveDate;
use std::io::Write;
pub use tradesim::domain::backtest::BacktestConfig;
pub use tradesim::domain::ohlcv::OhlcvBar;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Bars with the given closes; each bar opens at the previous close.
pub fn bars_from_closes(start_date: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 0.5,
                low: open.min(close) - 0.5,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// 250 closes: flat at 100 through index 200, +1/bar to 120 at index 220, then -2/bar.
///
/// With SMA 50/200 this crosses up once (index 201) and down once (index 247).
pub fn rise_then_fall_closes() -> Vec<f64> {
    (0..250)
        .map(|i| match i {
            0..=200 => 100.0,
            201..=220 => 100.0 + (i - 200) as f64,
            _ => 120.0 - 2.0 * (i - 220) as f64,
        })
        .collect()
}

pub fn frictionless_config() -> BacktestConfig {
    BacktestConfig {
        initial_capital: 100_000.0,
        commission_per_trade: 0.0,
        slippage_bps: 0.0,
        risk_fraction: 1.0,
    }
}

pub fn bars_to_csv(bars: &[OhlcvBar]) -> String {
    let mut csv = String::from("Date,Open,High,Low,Close,Volume\n");
    for b in bars {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    csv
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
