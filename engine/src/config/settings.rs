// Analysis settings, loaded from a JSON file or falling back to defaults
use crate::error::{EngineError, Result};
use crate::indicators::WindowPolicy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

/// One indicator to compute, e.g. `{ "kind": "sma", "params": { "period": 50 } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub kind: String,
    #[serde(default)]
    pub params: Value,
}

impl IndicatorSpec {
    pub fn new(kind: &str, params: Value) -> Self {
        Self { kind: kind.to_string(), params }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub delimiter: char,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings { delimiter: ',' }
    }
}

impl ExportSettings {
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() && !self.delimiter.is_ascii_alphanumeric() {
            Ok(self.delimiter as u8)
        } else {
            Err(EngineError::Config(format!(
                "export delimiter must be a single ASCII punctuation or whitespace character, got '{}'",
                self.delimiter
            )))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub indicators: Vec<IndicatorSpec>,
    /// Name of the RSI line the summary reports.
    pub rsi_indicator: String,
    pub strict: bool,
    pub export: ExportSettings,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            indicators: vec![
                IndicatorSpec::new("sma", json!({ "period": 20 })),
                IndicatorSpec::new("sma", json!({ "period": 50 })),
                IndicatorSpec::new("rsi", json!({ "period": 14 })),
                IndicatorSpec::new("macd", json!({ "fast": 12, "slow": 26, "signal": 9 })),
                IndicatorSpec::new("bollinger", json!({ "period": 20, "std_dev": 2.0 })),
            ],
            rsi_indicator: "RSI_14".to_string(),
            strict: false,
            export: ExportSettings::default(),
        }
    }
}

impl AnalysisSettings {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let settings: AnalysisSettings = serde_json::from_str(s)?;
        settings.export.delimiter_byte()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn window_policy(&self) -> WindowPolicy {
        if self.strict {
            WindowPolicy::Strict
        } else {
            WindowPolicy::Lenient
        }
    }
}
