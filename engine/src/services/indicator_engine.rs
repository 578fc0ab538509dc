// Runs a configured set of indicator calculators over one series
use crate::config::IndicatorSpec;
use crate::error::Result;
use crate::indicators::{build_calculator, IndicatorCalculator, WindowPolicy};
use shared::models::{IndicatorResult, PriceSeries};

pub struct IndicatorEngine {
    calculators: Vec<Box<dyn IndicatorCalculator>>,
}

impl IndicatorEngine {
    pub fn new(calculators: Vec<Box<dyn IndicatorCalculator>>) -> Self {
        Self { calculators }
    }

    pub fn from_settings(specs: &[IndicatorSpec], policy: WindowPolicy) -> Result<Self> {
        let calculators = specs
            .iter()
            .map(|spec| build_calculator(&spec.kind, &spec.params, policy))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(calculators))
    }

    pub fn calculator_names(&self) -> impl Iterator<Item = &str> {
        self.calculators.iter().map(|c| c.name())
    }

    /// Runs every calculator in order. Lines with a name already produced by
    /// an earlier calculator replace it.
    pub fn analyze(&self, series: &PriceSeries) -> Result<IndicatorResult> {
        let mut result = IndicatorResult::new();
        for calculator in &self.calculators {
            tracing::debug!(
                indicator = calculator.name(),
                parameters = %calculator.parameters(),
                points = series.len(),
                "Calculating indicator"
            );
            result.extend(calculator.calculate(series)?);
        }
        Ok(result)
    }
}
