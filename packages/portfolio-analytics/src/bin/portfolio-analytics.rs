//! Portfolio analytics CLI - command line interface over a dataset file.
//!
//! Every command prints a JSON `ApiResponse` on stdout. Logs go to stderr and are
//! controlled by `RUST_LOG`.

use clap::{Parser, Subcommand};
use portfolio_analytics::{
    analytics::max_drawdown, AnalyticsConfig, AnalyticsService, ApiResponse, DatedReturn,
    JsonPortfolioStore, Result, Timeframe, TimeframePreset,
};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portfolio-analytics")]
#[command(about = "Portfolio performance, risk and income analytics")]
#[command(version)]
struct Cli {
    /// Dataset file (overrides config and PORTFOLIO_ANALYTICS_DATA_FILE)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate portfolio metrics for a timeframe
    Metrics {
        /// Timeframe code: 1W, 1M, 3M, YTD, 1Y or ALL
        #[arg(short, long)]
        timeframe: Option<String>,
    },
    /// Full performance, risk and income report
    Report {
        /// Timeframe code: 1W, 1M, 3M, YTD, 1Y or ALL
        #[arg(short, long)]
        timeframe: Option<String>,
        /// JSON file with benchmark returns: [{"date": "...", "value": ...}]
        #[arg(short, long)]
        benchmark: Option<PathBuf>,
        /// Annual risk-free rate in percent
        #[arg(short, long)]
        risk_free_rate: Option<f64>,
    },
    /// Max drawdown of a list of values
    Drawdown {
        /// Portfolio values in chronological order
        #[arg(required = true, num_args = 1..)]
        values: Vec<f64>,
    },
    /// Resolve a timeframe code to a date range
    Timeframe {
        /// Timeframe code: 1W, 1M, 3M, YTD, 1Y or ALL
        code: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Metrics { timeframe } => render(handle_metrics(cli.data, timeframe)),
        Commands::Report {
            timeframe,
            benchmark,
            risk_free_rate,
        } => render(handle_report(cli.data, timeframe, benchmark, risk_free_rate)),
        Commands::Drawdown { values } => render(Ok(json!({
            "max_drawdown_percent": max_drawdown(&values),
            "points": values.len(),
        }))),
        Commands::Timeframe { code } => render(handle_timeframe(&code)),
    };

    println!("{}", output);
}

fn render<T: Serialize>(result: Result<T>) -> String {
    if let Err(e) = &result {
        tracing::error!("{}", e);
    }
    let response: ApiResponse<T> = result.into();
    serde_json::to_string_pretty(&response)
        .unwrap_or_else(|e| format!(r#"{{"ok": false, "error": "{}"}}"#, e))
}

fn load_config(data: Option<PathBuf>) -> Result<AnalyticsConfig> {
    let mut config = AnalyticsConfig::load()?;
    if data.is_some() {
        config.data_file = data;
    }
    Ok(config)
}

fn parse_timeframe(code: Option<String>, service: &AnalyticsService<'_>) -> Result<Timeframe> {
    let preset = code.map(|c| c.parse::<TimeframePreset>()).transpose()?;
    Ok(service.resolve(preset))
}

fn handle_metrics(data: Option<PathBuf>, timeframe: Option<String>) -> Result<serde_json::Value> {
    let config = load_config(data)?;
    let store = JsonPortfolioStore::from_config(&config)?;
    let service = AnalyticsService::from_repository(&store, config);

    let timeframe = parse_timeframe(timeframe, &service)?;
    let metrics = service.metrics(timeframe)?;
    Ok(json!({
        "timeframe": timeframe,
        "metrics": metrics,
    }))
}

fn handle_report(
    data: Option<PathBuf>,
    timeframe: Option<String>,
    benchmark: Option<PathBuf>,
    risk_free_rate: Option<f64>,
) -> Result<portfolio_analytics::PortfolioReport> {
    let mut config = load_config(data)?;
    if let Some(rate) = risk_free_rate {
        config = config.with_risk_free_rate(rate)?;
    }
    let store = JsonPortfolioStore::from_config(&config)?;
    let service = AnalyticsService::from_repository(&store, config);

    let benchmark: Option<Vec<DatedReturn>> = match benchmark {
        Some(path) => Some(serde_json::from_str(&fs::read_to_string(path)?)?),
        None => None,
    };

    let timeframe = parse_timeframe(timeframe, &service)?;
    service.report(timeframe, benchmark.as_deref())
}

fn handle_timeframe(code: &str) -> Result<serde_json::Value> {
    let preset: TimeframePreset = code.parse()?;
    let today = chrono::Utc::now().date_naive();
    Ok(json!({
        "code": preset.code(),
        "label": preset.label(),
        "timeframe": preset.to_timeframe(today),
    }))
}
