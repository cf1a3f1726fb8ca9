//! CSV file data adapter.
//!
//! Rows are `date,open,high,low,close,volume`. A first line whose first field
//! mentions "date" is treated as a header. Rows that are short, carry an
//! unrecognized date, or have a non-numeric price are dropped; only an empty
//! file is an error.

use crate::domain::error::TradesimError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const MIN_FIELDS: usize = 6;

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        CsvAdapter
    }
}

impl DataPort for CsvAdapter {
    fn load_bars(&self, source: &Path) -> Result<Vec<OhlcvBar>, TradesimError> {
        let content = fs::read_to_string(source)?;
        if content.trim().is_empty() {
            return Err(TradesimError::EmptyInput {
                path: source.to_path_buf(),
            });
        }

        let bars = parse_bars(&content);
        info!(path = %source.display(), bars = bars.len(), "loaded bars");
        Ok(bars)
    }
}

/// Parse CSV text into bars, dropping malformed rows.
pub fn parse_bars(content: &str) -> Vec<OhlcvBar> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut bars = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(line = line + 1, error = %e, "dropping unreadable row");
                continue;
            }
        };

        if line == 0 && is_header(&record) {
            continue;
        }

        match parse_record(&record) {
            Some(bar) => bars.push(bar),
            None => debug!(line = line + 1, row = ?record, "dropping malformed row"),
        }
    }

    bars
}

fn is_header(record: &StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|field| field.to_lowercase().contains("date"))
}

fn parse_record(record: &StringRecord) -> Option<OhlcvBar> {
    if record.len() < MIN_FIELDS {
        return None;
    }

    let date = parse_date(record.get(0)?)?;
    let number = |i: usize| record.get(i)?.parse::<f64>().ok();

    Some(OhlcvBar {
        date,
        open: number(1)?,
        high: number(2)?,
        low: number(3)?,
        close: number(4)?,
        volume: number(5)? as i64,
    })
}

/// Try `YYYY-MM-DD`, then `M/D/YYYY`, then `M/D/YY` (years 2000-2099).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    let year = s.rsplit('/').next()?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match year.len() {
        4 => NaiveDate::parse_from_str(s, "%m/%d/%Y").ok(),
        2 => {
            let date = NaiveDate::parse_from_str(s, "%m/%d/%y").ok()?;
            if date.year() < 2000 {
                date.with_year(date.year() + 100)
            } else {
                Some(date)
            }
        }
        _ => None,
    }
}
