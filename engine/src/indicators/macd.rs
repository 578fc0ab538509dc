// Moving Average Convergence/Divergence (MACD) indicator implementation
use super::ema::ema_of;
use super::{ensure_history, ensure_window, IndicatorCalculator, WindowPolicy};
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{Indicator, PriceSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self { fast: 12, slow: 26, signal: 9 }
    }
}

impl MacdParams {
    /// Points needed before the histogram has its first value, `None` when
    /// that count does not fit in a `usize`.
    pub fn required_points(&self) -> Option<usize> {
        self.slow.checked_add(self.signal)?.checked_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// MACD line = EMA(fast) - EMA(slow), signal line = EMA(MACD line, signal),
/// histogram = MACD line - signal line.
///
/// The MACD line is defined from index `slow - 1`; the signal line and
/// histogram from `slow - 1 + signal - 1`.
pub fn compute_macd(series: &PriceSeries, params: MacdParams, policy: WindowPolicy) -> Result<MacdOutput> {
    ensure_window(params.fast)?;
    ensure_window(params.slow)?;
    ensure_window(params.signal)?;
    if params.fast >= params.slow {
        return Err(EngineError::invalid_window(
            params.fast,
            format!("fast period must be shorter than slow period {}", params.slow),
        ));
    }
    let required = params.required_points().ok_or_else(|| {
        EngineError::invalid_window(params.signal, "signal period is too large for the slow period")
    })?;
    ensure_history(params.slow, required, series.len(), policy)?;

    let closes: Vec<Option<f64>> = series.iter().map(|p| Some(p.close)).collect();
    let fast = ema_of(&closes, params.fast);
    let slow = ema_of(&closes, params.slow);

    let macd = difference(&fast, &slow);
    let signal = ema_of(&macd, params.signal);
    let histogram = difference(&macd, &signal);

    Ok(MacdOutput { macd, signal, histogram })
}

fn difference(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<Option<f64>> {
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(x - y),
            _ => None,
        })
        .collect()
}

pub struct Macd {
    name: String,
    params: MacdParams,
    policy: WindowPolicy,
}

impl Macd {
    /// Lines are `MACD`, `MACD_Signal` and `MACD_Hist` for the default
    /// parameters, `MACD_{fast}_{slow}_{signal}` and its suffixes otherwise.
    pub fn new(params: MacdParams, policy: WindowPolicy) -> Self {
        let name = if params == MacdParams::default() {
            "MACD".to_string()
        } else {
            format!("MACD_{}_{}_{}", params.fast, params.slow, params.signal)
        };
        Self { name, params, policy }
    }
}

impl IndicatorCalculator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "fast": self.params.fast,
            "slow": self.params.slow,
            "signal": self.params.signal,
        })
    }

    fn calculate(&self, series: &PriceSeries) -> Result<Vec<Indicator>> {
        let output = compute_macd(series, self.params, self.policy)?;
        let parameters = self.parameters();
        Ok(vec![
            Indicator { name: self.name.clone(), parameters: parameters.clone(), values: output.macd },
            Indicator { name: format!("{}_Signal", self.name), parameters: parameters.clone(), values: output.signal },
            Indicator { name: format!("{}_Hist", self.name), parameters, values: output.histogram },
        ])
    }
}
