// Delimited export of a series joined with its indicator columns
use crate::error::Result;
use chrono::SecondsFormat;
use csv::WriterBuilder;
use shared::models::{IndicatorResult, PriceSeries};
use std::io::Write;

const BASE_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Writes `Date, Open, High, Low, Close, Volume` followed by each indicator
/// line in result order. Undefined values are empty cells; dates are RFC 3339
/// UTC.
pub fn write_csv<W: Write>(
    writer: W,
    series: &PriceSeries,
    result: &IndicatorResult,
    delimiter: u8,
) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(writer);

    let header: Vec<&str> = BASE_COLUMNS.iter().copied().chain(result.names()).collect();
    wtr.write_record(&header)?;

    for (i, point) in series.iter().enumerate() {
        let mut record = vec![
            point.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            point.open.to_string(),
            point.high.to_string(),
            point.low.to_string(),
            point.close.to_string(),
            point.volume.to_string(),
        ];
        record.extend(result.iter().map(|indicator| {
            indicator
                .values
                .get(i)
                .copied()
                .flatten()
                .map(|v| v.to_string())
                .unwrap_or_default()
        }));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_bytes(series: &PriceSeries, result: &IndicatorResult, delimiter: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, series, result, delimiter)?;
    Ok(buffer)
}

pub fn export_file_name(ticker: &str) -> String {
    format!("{}_analysis.csv", ticker)
}
