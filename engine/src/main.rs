// Command-line shell: analyze one ticker and write the joined export
use anyhow::Context;
use clap::Parser;
use engine::config::AnalysisSettings;
use engine::data::CsvPriceSource;
use engine::export;
use engine::services::{run_analysis, AnalysisRequest};
use shared::models::{Exchange, Lookback};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Computes SMA, RSI, MACD and Bollinger Bands for a stock's price history.
#[derive(Parser, Debug)]
#[command(name = "stock-engine", version, about)]
struct Args {
    /// Stock symbol, e.g. RELIANCE
    #[arg(short, long)]
    symbol: String,

    /// Exchange: NSE, BSE, NYSE, LSE, EUR, JPX or HKEX
    #[arg(short, long, default_value = "NSE")]
    exchange: Exchange,

    /// Lookback: 1M, 3M, 6M or 1Y
    #[arg(short, long, default_value = "1M")]
    lookback: Lookback,

    /// Directory holding `<TICKER>.csv` price history files
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// JSON settings file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export path (defaults to `<TICKER>_analysis.csv`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail when the history is shorter than an indicator window
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => AnalysisSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => AnalysisSettings::default(),
    };
    settings.strict |= args.strict;
    let delimiter = settings.export.delimiter_byte()?;

    let request = AnalysisRequest {
        symbol: args.symbol.clone(),
        exchange: args.exchange,
        lookback: args.lookback,
    };
    info!(ticker = %request.ticker(), lookback = %request.lookback, "Analyzing");

    let source = CsvPriceSource::new(&args.data_dir);
    let report = run_analysis(&source, &request, &settings)
        .with_context(|| format!("analysis of {} failed", request.ticker()))?;

    info!(ticker = %report.ticker, "{}", report.summary);

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(export::export_file_name(&report.ticker)));
    let file = File::create(&output).with_context(|| format!("cannot create {}", output.display()))?;
    export::write_csv(BufWriter::new(file), &report.series, &report.indicators, delimiter)?;

    info!(
        path = %output.display(),
        rows = report.series.len(),
        columns = report.indicators.len(),
        "Export written"
    );
    Ok(())
}
