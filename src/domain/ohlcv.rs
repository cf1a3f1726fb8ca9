//! OHLCV bar representation.

use chrono::NaiveDate;

/// One daily observation. Bars are never mutated once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}
