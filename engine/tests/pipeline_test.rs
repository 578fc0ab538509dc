use engine::config::AnalysisSettings;
use engine::data::{csv_parser, normalize, CsvPriceSource};
use engine::export;
use engine::indicators::{compute_macd, compute_rsi, compute_sma, MacdParams, WindowPolicy};
use engine::services::{run_analysis, AnalysisRequest};
use engine::EngineError;
use shared::models::{Exchange, Lookback};
use std::fmt::Write as _;
use std::fs;

/// Provider-style export, newest rows first, with an extra column.
fn provider_csv(days: usize) -> String {
    let mut csv = String::from("Date,Open,High,Low,Close,Volume,Dividends\n");
    for i in (0..days).rev() {
        let date = chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Duration::days(i as i64);
        let close = 250.0 + (i as f64 * 0.7).sin() * 12.0 + i as f64 * 0.1;
        writeln!(
            csv,
            "{} 00:00:00-05:00,{:.2},{:.2},{:.2},{:.2},{},0.0",
            date,
            close - 0.5,
            close + 2.0,
            close - 2.0,
            close,
            100_000 + i * 17
        )
        .unwrap();
    }
    csv
}

#[test]
fn test_full_pipeline_writes_export() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("AAPL.csv"), provider_csv(400)).unwrap();

    let request = AnalysisRequest {
        symbol: "aapl".to_string(),
        exchange: Exchange::Nyse,
        lookback: Lookback::SixMonths,
    };
    let source = CsvPriceSource::new(dir.path());
    let report = run_analysis(&source, &request, &AnalysisSettings::default()).unwrap();

    assert_eq!(report.ticker, "AAPL");
    assert_eq!(report.series.len(), 181);
    let rsi = report.summary.last_rsi.unwrap();
    assert!((0.0..=100.0).contains(&rsi));

    let out = dir.path().join(export::export_file_name(&report.ticker));
    export::write_csv(fs::File::create(&out).unwrap(), &report.series, &report.indicators, b',').unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.len(), 6 + 9);
    assert_eq!(&headers[6], "SMA_20");
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), report.series.len());
    // SMA_20 undefined for the first 19 rows only.
    assert_eq!(&records[18][6], "");
    assert!(!records[19][6].is_empty());
}

#[test]
fn test_series_properties_from_provider_rows() {
    let rows = csv_parser::read_rows(provider_csv(120).as_bytes(), b',').unwrap();
    let series = normalize(&rows).unwrap();
    assert_eq!(series.len(), 120);
    assert!(series.points().windows(2).all(|w| w[0].timestamp < w[1].timestamp));

    let closes = series.closes();
    for window in [1, 5, 20, 120] {
        let sma = compute_sma(&series, window, WindowPolicy::Strict).unwrap();
        for i in window - 1..closes.len() {
            let expected = closes[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
            assert_eq!(sma[i], Some(expected));
        }
    }

    let rsi = compute_rsi(&series, 14, WindowPolicy::Lenient).unwrap();
    assert!(rsi.iter().flatten().all(|v| (0.0..=100.0).contains(v)));
    assert_eq!(rsi, compute_rsi(&series, 14, WindowPolicy::Lenient).unwrap());

    let macd = compute_macd(&series, MacdParams::default(), WindowPolicy::Strict).unwrap();
    for i in 0..series.len() {
        if let (Some(m), Some(s)) = (macd.macd[i], macd.signal[i]) {
            assert_eq!(macd.histogram[i], Some(m - s));
        }
    }
}

#[test]
fn test_missing_ticker_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let request = AnalysisRequest {
        symbol: "NOPE".to_string(),
        exchange: Exchange::Lse,
        lookback: Lookback::OneMonth,
    };
    let err = run_analysis(&CsvPriceSource::new(dir.path()), &request, &AnalysisSettings::default()).unwrap_err();
    assert!(matches!(err, EngineError::Io { .. }));
}

#[test]
fn test_header_only_file_is_empty_series() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("EMPTY.L.csv"), "Date,Open,High,Low,Close,Volume\n").unwrap();
    let request = AnalysisRequest {
        symbol: "empty".to_string(),
        exchange: Exchange::Lse,
        lookback: Lookback::OneMonth,
    };
    let err = run_analysis(&CsvPriceSource::new(dir.path()), &request, &AnalysisSettings::default()).unwrap_err();
    assert!(matches!(err, EngineError::EmptySeries));
}
