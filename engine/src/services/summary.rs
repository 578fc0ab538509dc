// Headline figures shown above the charts
use serde::Serialize;
use shared::models::{IndicatorResult, PriceSeries};
use shared::utils::{format_change_pct, format_price, format_thousands};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub last_close: f64,
    /// Change of the last close over the previous one, in percent.
    pub change_pct: Option<f64>,
    pub last_volume: u64,
    pub last_rsi: Option<f64>,
    pub period_high: f64,
    pub period_low: f64,
}

impl MarketSummary {
    /// `None` for an empty series.
    pub fn compute(series: &PriceSeries, result: &IndicatorResult, rsi_name: &str) -> Option<Self> {
        let last = series.last()?;
        let points = series.points();

        let change_pct = points
            .len()
            .checked_sub(2)
            .map(|i| points[i].close)
            .filter(|prev| *prev != 0.0)
            .map(|prev| (last.close - prev) / prev * 100.0);

        let period_high = points.iter().map(|p| p.high).fold(f64::NEG_INFINITY, f64::max);
        let period_low = points.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);

        Some(MarketSummary {
            last_close: last.close,
            change_pct,
            last_volume: last.volume,
            last_rsi: result.get(rsi_name).and_then(|i| i.latest()),
            period_high,
            period_low,
        })
    }
}

impl fmt::Display for MarketSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price {}", format_price(self.last_close, 2))?;
        if let Some(change) = self.change_pct {
            write!(f, " ({})", format_change_pct(change))?;
        }
        write!(f, " | Volume {}", format_thousands(self.last_volume))?;
        match self.last_rsi {
            Some(rsi) => write!(f, " | RSI {:.1}", rsi)?,
            None => write!(f, " | RSI n/a")?,
        }
        write!(
            f,
            " | Range {} - {}",
            format_price(self.period_high, 2),
            format_price(self.period_low, 2)
        )
    }
}
