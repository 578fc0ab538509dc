// Series adapter: untrusted provider rows to a validated PriceSeries
use super::csv_parser::formats;
use crate::error::{EngineError, Result};
use shared::models::{PricePoint, PriceSeries, RawPriceRow};

/// Validates `rows` and returns them as a chronologically sorted series.
///
/// Rows may arrive in any order and with gaps; gaps are kept. Row numbers in
/// errors are 1-based positions in `rows`.
pub fn normalize(rows: &[RawPriceRow]) -> Result<PriceSeries> {
    if rows.is_empty() {
        return Err(EngineError::EmptySeries);
    }

    let mut numbered = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| parse_row(idx + 1, row).map(|point| (idx + 1, point)))
        .collect::<Result<Vec<_>>>()?;

    numbered.sort_by_key(|(_, point)| point.timestamp);
    if let Some(pair) = numbered
        .windows(2)
        .find(|pair| pair[0].1.timestamp == pair[1].1.timestamp)
    {
        return Err(EngineError::validation(
            pair[1].0,
            format!(
                "duplicate timestamp {} (also at row {})",
                pair[1].1.timestamp.to_rfc3339(),
                pair[0].0
            ),
        ));
    }

    let points: Vec<PricePoint> = numbered.into_iter().map(|(_, point)| point).collect();
    tracing::debug!(points = points.len(), "Normalized price series");

    PriceSeries::try_from_points(points)
        .map_err(|violation| EngineError::validation(violation.index() + 1, violation.to_string()))
}

fn parse_row(row: usize, raw: &RawPriceRow) -> Result<PricePoint> {
    let date = required(row, "date", &raw.date)?;
    let timestamp = formats::parse_timestamp(date)
        .ok_or_else(|| EngineError::validation(row, format!("unrecognized date '{}'", date)))?;

    let open = price(row, "open", &raw.open)?;
    let high = price(row, "high", &raw.high)?;
    let low = price(row, "low", &raw.low)?;
    let close = price(row, "close", &raw.close)?;

    let volume_str = required(row, "volume", &raw.volume)?;
    let volume = formats::parse_volume(volume_str).ok_or_else(|| {
        EngineError::validation(
            row,
            format!("'volume' must be a non-negative integer, got '{}'", volume_str),
        )
    })?;

    if high < low {
        return Err(EngineError::validation(
            row,
            format!("high {} is below low {}", high, low),
        ));
    }

    Ok(PricePoint { timestamp, open, high, low, close, volume })
}

fn required<'a>(row: usize, field: &str, value: &'a Option<String>) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(EngineError::validation(row, format!("missing '{}' field", field))),
    }
}

fn price(row: usize, field: &str, value: &Option<String>) -> Result<f64> {
    let text = required(row, field, value)?;
    formats::parse_price(text).ok_or_else(|| {
        EngineError::validation(row, format!("'{}' is not a finite number: '{}'", field, text))
    })
}
