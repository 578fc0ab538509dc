// Request-level orchestration over the data, indicator and summary layers
pub mod analysis;
pub mod indicator_engine;
pub mod summary;

pub use analysis::{run_analysis, AnalysisReport, AnalysisRequest};
pub use indicator_engine::IndicatorEngine;
pub use summary::MarketSummary;
