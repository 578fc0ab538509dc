// Simple Moving Average (SMA) indicator implementation
use super::{ensure_history, ensure_window, IndicatorCalculator, WindowPolicy};
use crate::error::Result;
use serde_json::Value;
use shared::models::{Indicator, PriceSeries};

/// Mean of `close` over the trailing `window` points. The first `window - 1`
/// entries are `None`.
///
/// Each value is summed over its own window rather than maintained as a
/// running sum, so `sma[i]` is exactly `closes[i+1-window..=i]` summed and
/// divided by `window`.
pub fn compute_sma(series: &PriceSeries, window: usize, policy: WindowPolicy) -> Result<Vec<Option<f64>>> {
    ensure_window(window)?;
    ensure_history(window, window, series.len(), policy)?;
    Ok(sma_of(&series.closes(), window))
}

pub(crate) fn sma_of(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut results = vec![None; values.len()];
    for (offset, slice) in values.windows(window).enumerate() {
        results[offset + window - 1] = Some(slice.iter().sum::<f64>() / window as f64);
    }
    results
}

pub struct Sma {
    name: String,
    period: usize,
    policy: WindowPolicy,
}

impl Sma {
    pub fn new(period: usize, policy: WindowPolicy) -> Self {
        Self {
            name: format!("SMA_{}", period),
            period,
            policy,
        }
    }
}

impl IndicatorCalculator for Sma {
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
            values: compute_sma(series, self.period, self.policy)?,
        }])
    }
}
