// Input boundary: where raw price rows come from.
use super::csv_parser;
use crate::error::Result;
use shared::models::{Lookback, RawPriceRow};
use std::path::PathBuf;

/// Supplies raw price history for a ticker. Transport and format belong to
/// the implementation; the engine only sees rows.
pub trait PriceSource {
    fn fetch(&self, ticker: &str, lookback: Lookback) -> Result<Vec<RawPriceRow>>;
}

/// Reads `<dir>/<ticker>.csv` exports. The file may hold more history than
/// requested; callers trim with `PriceSeries::trailing` after normalizing.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    dir: PathBuf,
    delimiter: u8,
}

impl CsvPriceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker))
    }
}

impl PriceSource for CsvPriceSource {
    fn fetch(&self, ticker: &str, lookback: Lookback) -> Result<Vec<RawPriceRow>> {
        let path = self.path_for(ticker);
        tracing::info!(ticker, path = %path.display(), lookback = lookback.code(), "Loading price history");
        csv_parser::read_rows_from_path(&path, self.delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_csv_source_reads_ticker_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("RELIANCE.NS.csv"),
            "Date,Open,High,Low,Close,Volume\n2024-01-02,1,2,0.5,1.5,10\n",
        )
        .unwrap();

        let source = CsvPriceSource::new(dir.path());
        let rows = source.fetch("RELIANCE.NS", Lookback::OneMonth).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].high.as_deref(), Some("2"));
    }

    #[test]
    fn test_csv_source_missing_ticker() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvPriceSource::new(dir.path());
        assert!(source.fetch("NOPE", Lookback::OneYear).is_err());
    }
}
