// Bollinger Bands indicator implementation
use super::sma::sma_of;
use super::{ensure_history, ensure_window, IndicatorCalculator, WindowPolicy};
use crate::error::{EngineError, Result};
use serde_json::Value;
use shared::models::{Indicator, PriceSeries};

pub const DEFAULT_WINDOW: usize = 20;
pub const DEFAULT_STD_DEV: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerOutput {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Bands at `middle ± std_dev * σ`, where σ is the population (÷n) standard
/// deviation of the same window the middle band averages.
pub fn compute_bollinger(
    series: &PriceSeries,
    window: usize,
    std_dev: f64,
    policy: WindowPolicy,
) -> Result<BollingerOutput> {
    ensure_window(window)?;
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(EngineError::invalid_window(
            window,
            format!("band width must be a non-negative number, got {}", std_dev),
        ));
    }
    ensure_history(window, window, series.len(), policy)?;

    let closes = series.closes();
    let middle = sma_of(&closes, window);
    let mut upper = vec![None; closes.len()];
    let mut lower = vec![None; closes.len()];

    for (offset, slice) in closes.windows(window).enumerate() {
        let i = offset + window - 1;
        let Some(mean) = middle[i] else { continue };
        let variance = slice.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / window as f64;
        let band = std_dev * variance.sqrt();
        upper[i] = Some(mean + band);
        lower[i] = Some(mean - band);
    }

    Ok(BollingerOutput { upper, middle, lower })
}

pub struct Bollinger {
    name: String,
    period: usize,
    std_dev: f64,
    policy: WindowPolicy,
}

impl Bollinger {
    /// Lines are `BB_Upper`, `BB_Middle` and `BB_Lower` for the default
    /// parameters, `BB_{period}_{std_dev}_Upper` and so on otherwise.
    pub fn new(period: usize, std_dev: f64, policy: WindowPolicy) -> Self {
        let name = if period == DEFAULT_WINDOW && std_dev == DEFAULT_STD_DEV {
            "BB".to_string()
        } else {
            format!("BB_{}_{}", period, std_dev)
        };
        Self { name, period, std_dev, policy }
    }
}

impl IndicatorCalculator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "std_dev": self.std_dev })
    }

    fn calculate(&self, series: &PriceSeries) -> Result<Vec<Indicator>> {
        let output = compute_bollinger(series, self.period, self.std_dev, self.policy)?;
        let parameters = self.parameters();
        Ok(vec![
            Indicator { name: format!("{}_Upper", self.name), parameters: parameters.clone(), values: output.upper },
            Indicator { name: format!("{}_Middle", self.name), parameters: parameters.clone(), values: output.middle },
            Indicator { name: format!("{}_Lower", self.name), parameters, values: output.lower },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{assert_close, series_from_closes};

    #[test]
    fn test_bollinger_known_values() {
        let series = series_from_closes(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let output = compute_bollinger(&series, 8, 2.0, WindowPolicy::Lenient).unwrap();
        // mean 5, population variance 4, sigma 2
        assert_close(output.middle[7], 5.0);
        assert_close(output.upper[7], 9.0);
        assert_close(output.lower[7], 1.0);
        assert!(output.upper[6].is_none());
    }

    #[test]
    fn test_bollinger_flat_series_collapses() {
        let series = series_from_closes(&[3.0; 5]);
        let output = compute_bollinger(&series, 3, 2.0, WindowPolicy::Lenient).unwrap();
        assert_eq!(output.upper[4], Some(3.0));
        assert_eq!(output.lower[4], Some(3.0));
    }

    #[test]
    fn test_bollinger_bands_order() {
        let closes: Vec<f64> = (0..30).map(|i| 50.0 + ((i * 13) % 7) as f64).collect();
        let output = compute_bollinger(&series_from_closes(&closes), 20, 2.0, WindowPolicy::Lenient).unwrap();
        for i in 19..30 {
            let (u, m, l) = (output.upper[i].unwrap(), output.middle[i].unwrap(), output.lower[i].unwrap());
            assert!(u >= m && m >= l);
        }
    }

    #[test]
    fn test_bollinger_rejects_negative_width() {
        let series = series_from_closes(&[1.0, 2.0, 3.0]);
        assert!(compute_bollinger(&series, 2, -1.0, WindowPolicy::Lenient).is_err());
        assert!(compute_bollinger(&series, 2, f64::NAN, WindowPolicy::Lenient).is_err());
    }

    #[test]
    fn test_bollinger_line_names() {
        let series = series_from_closes(&[1.0, 2.0, 3.0]);
        let default_names: Vec<String> = Bollinger::new(DEFAULT_WINDOW, DEFAULT_STD_DEV, WindowPolicy::Lenient)
            .calculate(&series)
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(default_names, vec!["BB_Upper", "BB_Middle", "BB_Lower"]);

        let custom_names: Vec<String> = Bollinger::new(10, 1.5, WindowPolicy::Lenient)
            .calculate(&series)
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(custom_names, vec!["BB_10_1.5_Upper", "BB_10_1.5_Middle", "BB_10_1.5_Lower"]);
    }

    #[test]
    fn test_bollinger_strict_short_series() {
        let series = series_from_closes(&[1.0, 2.0, 3.0]);
        assert!(compute_bollinger(&series, 20, 2.0, WindowPolicy::Strict).is_err());
        let lenient = compute_bollinger(&series, 20, 2.0, WindowPolicy::Lenient).unwrap();
        assert!(lenient.middle.iter().all(Option::is_none));
    }
}
