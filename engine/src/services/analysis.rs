// One analysis request: fetch rows, normalize, trim, compute, summarize
use super::indicator_engine::IndicatorEngine;
use super::summary::MarketSummary;
use crate::config::AnalysisSettings;
use crate::data::{normalize, PriceSource};
use crate::error::{EngineError, Result};
use shared::models::{Exchange, IndicatorResult, Lookback, PriceSeries};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub exchange: Exchange,
    pub lookback: Lookback,
}

impl AnalysisRequest {
    pub fn ticker(&self) -> String {
        self.exchange.ticker(&self.symbol)
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub ticker: String,
    pub series: PriceSeries,
    pub indicators: IndicatorResult,
    pub summary: MarketSummary,
}

pub fn run_analysis(
    source: &dyn PriceSource,
    request: &AnalysisRequest,
    settings: &AnalysisSettings,
) -> Result<AnalysisReport> {
    let ticker = request.ticker();
    let engine = IndicatorEngine::from_settings(&settings.indicators, settings.window_policy())?;

    let rows = source.fetch(&ticker, request.lookback)?;
    let series = normalize(&rows)?.trailing(request.lookback);
    tracing::info!(
        ticker = %ticker,
        rows = rows.len(),
        points = series.len(),
        lookback = request.lookback.code(),
        "Price series ready"
    );

    let indicators = engine.analyze(&series)?;
    let rsi_name = summary_rsi_name(&indicators, &settings.rsi_indicator);
    let summary = MarketSummary::compute(&series, &indicators, rsi_name).ok_or(EngineError::EmptySeries)?;

    Ok(AnalysisReport { ticker, series, indicators, summary })
}

/// The configured RSI line, or the first computed RSI line when the configured
/// one was not produced.
fn summary_rsi_name<'a>(indicators: &'a IndicatorResult, configured: &'a str) -> &'a str {
    if indicators.get(configured).is_some() {
        return configured;
    }
    match indicators.names().find(|name| name.starts_with("RSI_")) {
        Some(name) => {
            tracing::warn!(configured, using = name, "Configured RSI line not computed, using another one");
            name
        }
        None => {
            tracing::warn!(configured, "Configured RSI line not computed, summary has no RSI");
            configured
        }
    }
}
