//! Performance metrics and statistics.
//!
//! Every metric degrades to 0.0 rather than failing when there are too few
//! samples or a denominator vanishes.

use super::portfolio::Portfolio;
use chrono::NaiveDate;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub cagr: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub final_equity: f64,
    pub total_trades: usize,
}

impl Metrics {
    pub fn compute(portfolio: &Portfolio) -> Self {
        let equity = portfolio.equity_values();
        let dates = portfolio.equity_dates();

        Metrics {
            total_return: total_return(&equity),
            cagr: cagr(&equity, &dates),
            sharpe_ratio: sharpe_ratio(&equity),
            max_drawdown: max_drawdown(&equity),
            final_equity: portfolio.final_equity(),
            total_trades: portfolio.trades.len(),
        }
    }
}

/// last / first - 1
pub fn total_return(equity: &[f64]) -> f64 {
    match (equity.first(), equity.last()) {
        (Some(first), Some(last)) => last / first - 1.0,
        _ => 0.0,
    }
}

/// Compound annual growth rate over the calendar span of `dates`.
pub fn cagr(equity: &[f64], dates: &[NaiveDate]) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }
    let (Some(start), Some(end)) = (dates.first(), dates.last()) else {
        return 0.0;
    };

    let day_span = (*end - *start).num_days() as f64;
    if day_span <= 0.0 {
        return 0.0;
    }

    let growth = equity[equity.len() - 1] / equity[0];
    growth.powf(DAYS_PER_YEAR / day_span) - 1.0
}

/// Simple period-over-period returns, one fewer than `equity`.
pub fn daily_returns(equity: &[f64]) -> Vec<f64> {
    equity.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Annualized Sharpe ratio of daily returns, zero risk-free rate, sample stddev.
pub fn sharpe_ratio(equity: &[f64]) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }

    let returns = daily_returns(equity);
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;

    let denominator = (n - 1.0).max(1.0);
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / denominator;
    let stddev = variance.sqrt();

    if stddev == 0.0 {
        return 0.0;
    }
    mean / stddev * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Largest peak-to-trough decline as a fraction of the running peak.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;

    for &value in equity {
        if value > peak {
            peak = value;
        }
        let dd = (peak - value) / peak;
        if dd > max_dd {
            max_dd = dd;
        }
    }

    max_dd
}
