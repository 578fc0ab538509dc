use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Chronologically ordered, immutable sequence of price points.
///
/// Timestamps are strictly increasing, prices are finite and `high >= low`.
/// The only ways to obtain one are [`PriceSeries::try_from_points`] and the
/// engine's series adapter, both of which check these invariants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

/// Why [`PriceSeries::try_from_points`] rejected a point, with its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesViolation {
    NonFinitePrice { index: usize },
    HighBelowLow { index: usize },
    OutOfOrder { index: usize },
}

impl SeriesViolation {
    pub fn index(&self) -> usize {
        match *self {
            SeriesViolation::NonFinitePrice { index }
            | SeriesViolation::HighBelowLow { index }
            | SeriesViolation::OutOfOrder { index } => index,
        }
    }
}

impl fmt::Display for SeriesViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesViolation::NonFinitePrice { index } => {
                write!(f, "point at index {} has a non-finite price", index)
            }
            SeriesViolation::HighBelowLow { index } => {
                write!(f, "point at index {} has high below low", index)
            }
            SeriesViolation::OutOfOrder { index } => {
                write!(f, "timestamp at index {} is not after the previous one", index)
            }
        }
    }
}

impl std::error::Error for SeriesViolation {}

impl PriceSeries {
    pub fn try_from_points(points: Vec<PricePoint>) -> Result<Self, SeriesViolation> {
        for (index, p) in points.iter().enumerate() {
            if ![p.open, p.high, p.low, p.close].iter().all(|v| v.is_finite()) {
                return Err(SeriesViolation::NonFinitePrice { index });
            }
            if p.high < p.low {
                return Err(SeriesViolation::HighBelowLow { index });
            }
        }
        if let Some(index) = points
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(SeriesViolation::OutOfOrder { index: index + 1 });
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Points within `lookback` days of the last timestamp (inclusive).
    pub fn trailing(&self, lookback: Lookback) -> PriceSeries {
        let Some(last) = self.last() else {
            return self.clone();
        };
        let start = last.timestamp - Duration::days(lookback.days());
        PriceSeries {
            points: self
                .points
                .iter()
                .filter(|p| p.timestamp >= start)
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Untrusted tabular input row. Every field is kept as text so the adapter can
/// report exactly which one is missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPriceRow {
    #[serde(
        default,
        alias = "Date",
        alias = "DATE",
        alias = "Datetime",
        alias = "datetime",
        alias = "Timestamp",
        alias = "timestamp"
    )]
    pub date: Option<String>,
    #[serde(default, alias = "Open", alias = "OPEN")]
    pub open: Option<String>,
    #[serde(default, alias = "High", alias = "HIGH")]
    pub high: Option<String>,
    #[serde(default, alias = "Low", alias = "LOW")]
    pub low: Option<String>,
    #[serde(default, alias = "Close", alias = "CLOSE")]
    pub close: Option<String>,
    #[serde(default, alias = "Volume", alias = "VOLUME")]
    pub volume: Option<String>,
}

impl RawPriceRow {
    pub fn new(date: &str, open: &str, high: &str, low: &str, close: &str, volume: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            open: Some(open.to_string()),
            high: Some(high.to_string()),
            low: Some(low.to_string()),
            close: Some(close.to_string()),
            volume: Some(volume.to_string()),
        }
    }
}

/// A single named output line of an indicator, aligned with the input series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub name: String,
    pub parameters: serde_json::Value,
    pub values: Vec<Option<f64>>,
}

impl Indicator {
    /// Last defined value, if any.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }
}

/// Indicator lines keyed by name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    indicators: Vec<Indicator>,
}

impl IndicatorResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line, replacing an existing one with the same name in place.
    pub fn insert(&mut self, indicator: Indicator) {
        match self.indicators.iter_mut().find(|i| i.name == indicator.name) {
            Some(existing) => *existing = indicator,
            None => self.indicators.push(indicator),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.name == name)
    }

    pub fn values(&self, name: &str) -> Option<&[Option<f64>]> {
        self.get(name).map(|i| i.values.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.indicators.iter().map(|i| i.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Indicator> {
        self.indicators.iter()
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

impl Extend<Indicator> for IndicatorResult {
    fn extend<I: IntoIterator<Item = Indicator>>(&mut self, iter: I) {
        for indicator in iter {
            self.insert(indicator);
        }
    }
}

/// Exchanges the analyzer knows how to qualify a ticker for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    Nse,
    Bse,
    Nyse,
    Lse,
    Eur,
    Jpx,
    Hkex,
}

impl Exchange {
    pub const ALL: [Exchange; 7] = [
        Exchange::Nse,
        Exchange::Bse,
        Exchange::Nyse,
        Exchange::Lse,
        Exchange::Eur,
        Exchange::Jpx,
        Exchange::Hkex,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Exchange::Nse => "NSE",
            Exchange::Bse => "BSE",
            Exchange::Nyse => "NYSE",
            Exchange::Lse => "LSE",
            Exchange::Eur => "EUR",
            Exchange::Jpx => "JPX",
            Exchange::Hkex => "HKEX",
        }
    }

    /// Ticker suffix used by the market data provider.
    pub fn suffix(&self) -> &'static str {
        match self {
            Exchange::Nse => ".NS",
            Exchange::Bse => ".BO",
            Exchange::Nyse => "",
            Exchange::Lse => ".L",
            Exchange::Eur => ".DE",
            Exchange::Jpx => ".T",
            Exchange::Hkex => ".HK",
        }
    }

    pub fn ticker(&self, symbol: &str) -> String {
        format!("{}{}", symbol.trim().to_uppercase(), self.suffix())
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Exchange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Exchange::ALL
            .into_iter()
            .find(|e| e.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown exchange '{}'", s))
    }
}

/// How far back an analysis looks, counted in calendar days.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Lookback {
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl Lookback {
    pub fn days(&self) -> i64 {
        match self {
            Lookback::OneMonth => 30,
            Lookback::ThreeMonths => 90,
            Lookback::SixMonths => 180,
            Lookback::OneYear => 365,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Lookback::OneMonth => "1M",
            Lookback::ThreeMonths => "3M",
            Lookback::SixMonths => "6M",
            Lookback::OneYear => "1Y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Lookback::OneMonth => "1 Month",
            Lookback::ThreeMonths => "3 Months",
            Lookback::SixMonths => "6 Months",
            Lookback::OneYear => "1 Year",
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Lookback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1M" => Ok(Lookback::OneMonth),
            "3M" => Ok(Lookback::ThreeMonths),
            "6M" => Ok(Lookback::SixMonths),
            "1Y" => Ok(Lookback::OneYear),
            other => Err(format!("unknown lookback '{}' (expected 1M, 3M, 6M or 1Y)", other)),
        }
    }
}
