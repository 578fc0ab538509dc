use crate::error::Result;
use csv::{ReaderBuilder, Trim};
use shared::models::RawPriceRow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// Field-level parsing for the text formats price providers export.
pub mod formats {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"];
    const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

    /// Parses the date layouts seen in provider exports. Naive values are
    /// taken as UTC, offset values are converted to UTC.
    pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in OFFSET_DATETIME_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Some(dt.with_timezone(&Utc));
            }
        }
        for fmt in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.and_utc());
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
            }
        }
        None
    }

    /// Parses a finite decimal. Thousands separators are not accepted.
    pub fn parse_price(s: &str) -> Option<f64> {
        s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Parses a non-negative whole volume; `1200` and `1200.0` are both fine.
    pub fn parse_volume(s: &str) -> Option<u64> {
        let s = s.trim();
        if let Ok(v) = s.parse::<u64>() {
            return Some(v);
        }
        let v = s.parse::<f64>().ok()?;
        if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
            Some(v as u64)
        } else {
            None
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{Datelike, Timelike};

        #[test]
        fn test_parse_plain_date() {
            let dt = parse_timestamp("2024-12-30").unwrap();
            assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 12, 30));
            assert_eq!(dt.hour(), 0);
        }

        #[test]
        fn test_parse_offset_datetime_converts_to_utc() {
            let dt = parse_timestamp("2024-01-02 09:15:00+05:30").unwrap();
            assert_eq!((dt.day(), dt.hour(), dt.minute()), (2, 3, 45));
            let rfc = parse_timestamp("2024-01-02T09:15:00+05:30").unwrap();
            assert_eq!(dt, rfc);
        }

        #[test]
        fn test_parse_day_first_date() {
            let dt = parse_timestamp("30/12/2024").unwrap();
            assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 12, 30));
        }

        #[test]
        fn test_parse_invalid_dates() {
            assert!(parse_timestamp("32/12/2024").is_none());
            assert!(parse_timestamp("yesterday").is_none());
            assert!(parse_timestamp("").is_none());
        }

        #[test]
        fn test_parse_price() {
            assert_eq!(parse_price(" 123.45 "), Some(123.45));
            assert_eq!(parse_price("NaN"), None);
            assert_eq!(parse_price("inf"), None);
            assert_eq!(parse_price("1,234.5"), None);
        }

        #[test]
        fn test_parse_volume() {
            assert_eq!(parse_volume("1200"), Some(1200));
            assert_eq!(parse_volume("1200.0"), Some(1200));
            assert_eq!(parse_volume("1200.5"), None);
            assert_eq!(parse_volume("-5"), None);
            assert_eq!(parse_volume("lots"), None);
        }
    }
}

/// Reads price rows from any CSV source. Headers are matched by name, so
/// column order and extra columns (e.g. `Dividends`) do not matter.
pub fn read_rows<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawPriceRow>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawPriceRow>() {
        rows.push(result?);
    }
    tracing::debug!(rows = rows.len(), "Read raw price rows");
    Ok(rows)
}

pub fn read_rows_from_path(path: &Path, delimiter: u8) -> Result<Vec<RawPriceRow>> {
    let file = File::open(path)?;
    read_rows(BufReader::new(file), delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_rows_provider_layout() {
        let csv_content = "\
Date,Open,High,Low,Close,Volume,Dividends,Stock Splits
2024-01-02 00:00:00+05:30,2590.0,2610.5,2575.1,2601.3,5123400,0.0,0.0
2024-01-03 00:00:00+05:30,2601.3,2620.0,2590.0,2612.8,4876100,0.0,0.0";
        let rows = read_rows(csv_content.as_bytes(), b',').unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date.as_deref(), Some("2024-01-02 00:00:00+05:30"));
        assert_eq!(rows[0].close.as_deref(), Some("2601.3"));
        assert_eq!(rows[1].volume.as_deref(), Some("4876100"));
    }

    #[test]
    fn test_read_rows_missing_column_is_none() {
        let csv_content = "date;open;high;low;close\n2024-01-02;1;2;0.5;1.5";
        let rows = read_rows(csv_content.as_bytes(), b';').unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].open.as_deref(), Some("1"));
        assert_eq!(rows[0].volume, None);
    }

    #[test]
    fn test_read_rows_header_only() {
        let tmp_file = create_test_csv("Date,Open,High,Low,Close,Volume");
        let rows = read_rows_from_path(tmp_file.path(), b',').unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_rows_missing_file() {
        let err = read_rows_from_path(Path::new("/definitely/not/here.csv"), b',').unwrap_err();
        assert!(matches!(err, crate::error::EngineError::Io { .. }));
    }
}
