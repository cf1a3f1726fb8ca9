//! Signal generation.
//!
//! A [`Strategy`] maps bar history up to and including index `i` to a
//! [`Signal`]. The backtest driver only ever hands a strategy `bars[..=i]`,
//! so an implementation cannot observe future bars.

use std::fmt;

use crate::domain::indicator::sma::sma_at;
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_FAST_WINDOW: usize = 50;
pub const DEFAULT_SLOW_WINDOW: usize = 200;

/// Directional recommendation for the next bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// +1: open a long position if flat.
    EnterLong,
    /// -1: close the long position if holding one.
    ExitLong,
    /// 0: do nothing.
    Hold,
}

impl Signal {
    pub fn is_hold(self) -> bool {
        self == Signal::Hold
    }
}

pub trait Strategy {
    fn name(&self) -> String;

    /// Bars of history required before the strategy can emit anything but `Hold`.
    fn warmup_bars(&self) -> usize;

    /// Signal at `index`. `history` must not extend past `index`.
    fn signal(&self, history: &[OhlcvBar], index: usize) -> Signal;
}

/// Dual simple moving average crossover over closing prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmaCrossover {
    pub fast_window: usize,
    pub slow_window: usize,
}

impl SmaCrossover {
    pub fn new(fast_window: usize, slow_window: usize) -> Self {
        SmaCrossover {
            fast_window,
            slow_window,
        }
    }
}

impl Default for SmaCrossover {
    fn default() -> Self {
        SmaCrossover::new(DEFAULT_FAST_WINDOW, DEFAULT_SLOW_WINDOW)
    }
}

impl fmt::Display for SmaCrossover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SMA {}/{}", self.fast_window, self.slow_window)
    }
}

impl Strategy for SmaCrossover {
    fn name(&self) -> String {
        self.to_string()
    }

    fn warmup_bars(&self) -> usize {
        self.slow_window
    }

    fn signal(&self, history: &[OhlcvBar], index: usize) -> Signal {
        // a crossover needs a previous bar to compare against
        if index == 0 || index < self.slow_window {
            return Signal::Hold;
        }

        let averages = (
            sma_at(history, index, self.fast_window),
            sma_at(history, index, self.slow_window),
            sma_at(history, index - 1, self.fast_window),
            sma_at(history, index - 1, self.slow_window),
        );
        let (Some(fast), Some(slow), Some(prev_fast), Some(prev_slow)) = averages else {
            return Signal::Hold;
        };

        if fast > slow && prev_fast <= prev_slow {
            Signal::EnterLong
        } else if fast < slow && prev_fast >= prev_slow {
            Signal::ExitLong
        } else {
            Signal::Hold
        }
    }
}
