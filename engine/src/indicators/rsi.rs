// Relative Strength Index (RSI) indicator implementation
use super::{ensure_history, ensure_window, IndicatorCalculator, WindowPolicy};
use crate::error::{EngineError, Result};
use serde_json::Value;
use shared::models::{Indicator, PriceSeries};

pub const DEFAULT_RSI_WINDOW: usize = 14;

/// Wilder's RSI over close-to-close changes.
///
/// The first value sits at index `window`: it uses the plain mean of the first
/// `window` gains and losses. Later values smooth with
/// `avg = (avg * (window - 1) + current) / window`. An average loss of zero
/// yields 100.
pub fn compute_rsi(series: &PriceSeries, window: usize, policy: WindowPolicy) -> Result<Vec<Option<f64>>> {
    ensure_window(window)?;
    let required = window
        .checked_add(1)
        .ok_or_else(|| EngineError::invalid_window(window, "window is too large"))?;
    ensure_history(window, required, series.len(), policy)?;

    let data = series.points();
    if data.len() <= window {
        return Ok(vec![None; data.len()]);
    }

    let mut results = vec![None; window]; // RSI needs 'window' initial changes

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=window {
        let change = data[i].close - data[i - 1].close;
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change; // losses are positive values
        }
    }

    let mut avg_gain = gains / window as f64;
    let mut avg_loss = losses / window as f64;
    results.push(Some(rsi_value(avg_gain, avg_loss)));

    for i in (window + 1)..data.len() {
        let change = data[i].close - data[i - 1].close;
        let (current_gain, current_loss) = if change > 0.0 { (change, 0.0) } else { (0.0, -change) };

        avg_gain = (avg_gain * (window - 1) as f64 + current_gain) / window as f64;
        avg_loss = (avg_loss * (window - 1) as f64 + current_loss) / window as f64;
        results.push(Some(rsi_value(avg_gain, avg_loss)));
    }
    Ok(results)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

pub struct Rsi {
    name: String,
    period: usize,
    policy: WindowPolicy,
}

impl Rsi {
    pub fn new(period: usize, policy: WindowPolicy) -> Self {
        Self {
            name: format!("RSI_{}", period),
            period,
            policy,
        }
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, series: &PriceSeries) -> Result<Vec<Indicator>> {
        Ok(vec![Indicator {
            name: self.name.clone(),
            parameters: self.parameters(),
            values: compute_rsi(series, self.period, self.policy)?,
        }])
    }
}
