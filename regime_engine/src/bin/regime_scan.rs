use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use market_data_feed::{
    cache::MemoryCache, fetcher::Fetcher, providers::yahoo_chart::YahooChartProvider,
};
use regime_engine::{
    config::{self, EngineConfig},
    pipeline::{self, Profiles},
};
use tracing::warn;

#[derive(Parser)]
#[command(version, about = "Market regime scanner")]
struct Cli {
    /// Tickers to classify, in addition to the market table
    tickers: Vec<String>,

    /// Path to a TOML config file (falls back to $REGIME_SCAN_CONFIG)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Skip the market regime table and only classify the given tickers
    #[arg(long)]
    skip_market: bool,
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    if let Some(path) = &cli.config {
        return config::load_config_path(path);
    }
    match shared_utils::env::get_env_var("REGIME_SCAN_CONFIG") {
        Ok(path) => config::load_config_path(&path),
        Err(_) => Ok(EngineConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli)?;
    let profiles = Profiles::from_config(&cfg)?;

    let provider = YahooChartProvider::new().context("failed to build data provider")?;
    let fetcher = Fetcher::new(Box::new(provider))
        .with_cache(Arc::new(MemoryCache::new()))
        .with_config(cfg.fetcher_config());

    let mut rows = Vec::new();
    if !cli.skip_market {
        rows.extend(pipeline::market_regime_table(&fetcher, &cfg, &profiles).await);
    }
    for ticker in &cli.tickers {
        let series = fetcher.fetch(ticker, cfg.period, cfg.interval).await;
        if series.is_empty() {
            warn!(ticker, "no data, skipping");
            continue;
        }
        rows.push(pipeline::classify_entity(ticker, &series, &profiles));
    }

    // one JSON object per line; diagnostics go to stderr via tracing
    for row in &rows {
        println!("{}", serde_json::to_string(row)?);
    }

    Ok(())
}
