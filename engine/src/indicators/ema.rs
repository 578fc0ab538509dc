// Exponential Moving Average (EMA) indicator implementation
use super::{ensure_history, ensure_window, IndicatorCalculator, WindowPolicy};
use crate::error::Result;
use serde_json::Value;
use shared::models::{Indicator, PriceSeries};

/// EMA of `close`, first defined at index `period - 1`.
pub fn compute_ema(series: &PriceSeries, period: usize, policy: WindowPolicy) -> Result<Vec<Option<f64>>> {
    ensure_window(period)?;
    ensure_history(period, period, series.len(), policy)?;
    let closes: Vec<Option<f64>> = series.iter().map(|p| Some(p.close)).collect();
    Ok(ema_of(&closes, period))
}

/// EMA over a sequence whose defined values form a contiguous run after some
/// leading `None`s (e.g. a MACD line).
///
/// Seeded with the mean of the first `period` defined values, then
/// `ema_t = value_t * k + ema_{t-1} * (1 - k)` with `k = 2 / (period + 1)`.
/// Stops at the first `None` after the seed.
pub(crate) fn ema_of(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut results = vec![None; values.len()];
    if period == 0 {
        return results;
    }
    let Some(start) = values.iter().position(Option::is_some) else {
        return results;
    };
    let Some(seed_end) = start.checked_add(period).filter(|end| *end <= values.len()) else {
        return results;
    };

    let seed: Vec<f64> = values[start..seed_end].iter().flatten().copied().collect();
    if seed.len() < period {
        return results;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut previous_ema = seed.iter().sum::<f64>() / period as f64;
    results[seed_end - 1] = Some(previous_ema);

    for (i, value) in values.iter().enumerate().skip(seed_end) {
        let Some(value) = value else { break };
        let ema = value * k + previous_ema * (1.0 - k);
        results[i] = Some(ema);
        previous_ema = ema;
    }
    results
}

pub struct Ema {
    name: String,
    period: usize,
    policy: WindowPolicy,
}

impl Ema {
    pub fn new(period: usize, policy: WindowPolicy) -> Self {
        Self {
            name: format!("EMA_{}", period),
            period,
            policy,
        }
    }
}

impl IndicatorCalculator for Ema {
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
            values: compute_ema(series, self.period, self.policy)?,
        }])
    }
}
