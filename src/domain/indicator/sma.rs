//! Simple Moving Average of closing prices.
//!
//! SMA(n)[i] = (C[i-n+1] + ... + C[i]) / n
//! Undefined for the first (n-1) bars and for n = 0.

use crate::domain::ohlcv::OhlcvBar;

/// SMA of the `period` closes ending at `index` (inclusive).
///
/// Only reads `bars[index + 1 - period..=index]`, so it never sees data after `index`.
pub fn sma_at(bars: &[OhlcvBar], index: usize, period: usize) -> Option<f64> {
    if period == 0 || index >= bars.len() || index + 1 < period {
        return None;
    }

    let window = &bars[index + 1 - period..=index];
    Some(window.iter().map(|b| b.close).sum::<f64>() / period as f64)
}
