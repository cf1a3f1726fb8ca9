//! Configuration validation.
//!
//! Validates run parameters before a backtest starts. Keys that are absent
//! take their defaults, which are always valid.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::TradesimError;
use crate::domain::strategy::{DEFAULT_FAST_WINDOW, DEFAULT_SLOW_WINDOW};
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let defaults = BacktestConfig::default();
    validate_initial_capital(config, defaults.initial_capital)?;
    validate_commission(config, defaults.commission_per_trade)?;
    validate_slippage(config, defaults.slippage_bps)?;
    validate_risk_fraction(config, defaults.risk_fraction)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let fast = config.get_int("strategy", "fast_window", DEFAULT_FAST_WINDOW as i64);
    if fast < 1 {
        return Err(invalid("strategy", "fast_window", "fast_window must be at least 1"));
    }
    let slow = config.get_int("strategy", "slow_window", DEFAULT_SLOW_WINDOW as i64);
    if slow <= fast {
        return Err(invalid(
            "strategy",
            "slow_window",
            "slow_window must be greater than fast_window",
        ));
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> TradesimError {
    TradesimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort, default: f64) -> Result<(), TradesimError> {
    let value = config.get_double("backtest", "initial_capital", default);
    if !(value > 0.0 && value.is_finite()) {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort, default: f64) -> Result<(), TradesimError> {
    let value = config.get_double("backtest", "commission_per_trade", default);
    if !(value >= 0.0 && value.is_finite()) {
        return Err(invalid(
            "backtest",
            "commission_per_trade",
            "commission_per_trade must be non-negative",
        ));
    }
    Ok(())
}

fn validate_slippage(config: &dyn ConfigPort, default: f64) -> Result<(), TradesimError> {
    let value = config.get_double("backtest", "slippage_bps", default);
    if !(0.0..10_000.0).contains(&value) {
        return Err(invalid(
            "backtest",
            "slippage_bps",
            "slippage_bps must be in [0, 10000)",
        ));
    }
    Ok(())
}

fn validate_risk_fraction(config: &dyn ConfigPort, default: f64) -> Result<(), TradesimError> {
    let value = config.get_double("backtest", "risk_fraction", default);
    if !(value > 0.0 && value <= 1.0) {
        return Err(invalid(
            "backtest",
            "risk_fraction",
            "risk_fraction must be in (0, 1]",
        ));
    }
    Ok(())
}
