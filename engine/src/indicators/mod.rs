// Technical indicators module
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{compute_bollinger, Bollinger, BollingerOutput};
pub use ema::{compute_ema, Ema};
pub use macd::{compute_macd, Macd, MacdOutput, MacdParams};
pub use rsi::{compute_rsi, Rsi, DEFAULT_RSI_WINDOW};
pub use sma::{compute_sma, Sma};

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{Indicator, PriceSeries};

/// What to do when a series is shorter than an indicator's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPolicy {
    /// Return a result whose undefined entries are `None`.
    #[default]
    Lenient,
    /// Fail with `InvalidWindow`.
    Strict,
}

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    /// One or more output lines, each the length of `series`.
    fn calculate(&self, series: &PriceSeries) -> Result<Vec<Indicator>>;
}

/// Builds a calculator from a kind (`sma`, `ema`, `rsi`, `macd`, `bollinger`)
/// and a JSON parameter object. Missing parameters take their defaults.
pub fn build_calculator(
    kind: &str,
    params: &Value,
    policy: WindowPolicy,
) -> Result<Box<dyn IndicatorCalculator>> {
    let calculator: Box<dyn IndicatorCalculator> = match kind.trim().to_lowercase().as_str() {
        "sma" => Box::new(Sma::new(usize_param(params, "period", 20)?, policy)),
        "ema" => Box::new(Ema::new(usize_param(params, "period", 20)?, policy)),
        "rsi" => Box::new(Rsi::new(usize_param(params, "period", DEFAULT_RSI_WINDOW)?, policy)),
        "macd" => {
            let defaults = MacdParams::default();
            let macd_params = MacdParams {
                fast: usize_param(params, "fast", defaults.fast)?,
                slow: usize_param(params, "slow", defaults.slow)?,
                signal: usize_param(params, "signal", defaults.signal)?,
            };
            Box::new(Macd::new(macd_params, policy))
        }
        "bollinger" | "bb" => Box::new(Bollinger::new(
            usize_param(params, "period", bollinger::DEFAULT_WINDOW)?,
            f64_param(params, "std_dev", bollinger::DEFAULT_STD_DEV)?,
            policy,
        )),
        _ => return Err(EngineError::UnknownIndicator(kind.to_string())),
    };
    Ok(calculator)
}

fn usize_param(params: &Value, key: &str, default: usize) -> Result<usize> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                EngineError::InvalidParameter(format!("'{}' must be a non-negative integer, got {}", key, v))
            }),
    }
}

fn f64_param(params: &Value, key: &str, default: f64) -> Result<f64> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_f64()
            .ok_or_else(|| EngineError::InvalidParameter(format!("'{}' must be a number, got {}", key, v))),
    }
}

pub(crate) fn ensure_window(window: usize) -> Result<()> {
    if window == 0 {
        return Err(EngineError::invalid_window(window, "window must be at least 1"));
    }
    Ok(())
}

/// Fails in strict mode when fewer than `required` points are available.
pub(crate) fn ensure_history(
    window: usize,
    required: usize,
    available: usize,
    policy: WindowPolicy,
) -> Result<()> {
    if policy == WindowPolicy::Strict && available < required {
        return Err(EngineError::insufficient_history(window, required, available));
    }
    Ok(())
}
