mod analyzer;
mod config;
mod fetcher;
mod model;
mod normalizer;
mod parser;
mod report;
mod storage;
mod utils;

use chrono::{DateTime, Utc};
use config::{load_config, AppConfig};
use fetcher::{ProventSource, StatusInvestClient};
use futures::future::join_all;
use model::StockAnalysis;
use normalizer::Diagnostics;
use report::AnalysisBatch;
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use storage::SqliteCache;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("config load failed ({e}), using defaults");
            AppConfig::default()
        }
    };
    let config = Arc::new(config);

    let fetcher = match StatusInvestClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("failed to build http client: {e}");
            return;
        }
    };

    let cache = match SqliteCache::new(&config.cache_db, config.cache_ttl_hours) {
        Ok(cache) => Arc::new(Mutex::new(cache)),
        Err(e) => {
            error!("failed to open cache: {e}");
            return;
        }
    };

    let now = Utc::now();
    info!(
        "analyzing {} tickers over the last {} years",
        config.tickers.len(),
        config.years_to_analyze
    );

    // One independent task per ticker; results only ever combine by key.
    let tasks: Vec<_> = config
        .tickers
        .iter()
        .cloned()
        .map(|ticker| process_ticker(ticker, fetcher.clone(), cache.clone(), config.clone(), now))
        .collect();

    let mut analyses = AnalysisBatch::new();
    for (ticker, analysis) in join_all(tasks).await {
        analyses.insert(ticker, analysis);
    }

    let successful = analyses.values().filter(|a| a.is_some()).count();
    let predicted = analyses
        .values()
        .filter(|a| a.as_ref().is_some_and(|a| a.next_payment_prediction.is_some()))
        .count();
    info!(
        "{successful}/{} analyses completed, {predicted} with a prediction",
        analyses.len()
    );

    let markdown = report::render_markdown(&analyses, config.years_to_analyze, now);
    match fs::write(&config.markdown_output, markdown) {
        Ok(()) => info!("markdown report written to {}", config.markdown_output),
        Err(e) => error!("failed to write markdown report: {e}"),
    }

    match report::render_json(&analyses, config.years_to_analyze, now) {
        Ok(json) => match fs::write(&config.json_output, json) {
            Ok(()) => info!("json report written to {}", config.json_output),
            Err(e) => error!("failed to write json report: {e}"),
        },
        Err(e) => error!("failed to render json report: {e}"),
    }
}

/// Resolves the payload (cache or network) and runs the analysis engine for
/// one ticker. Every failure degrades to an absent slot so a single ticker
/// never aborts the batch.
async fn process_ticker(
    ticker: String,
    fetcher: Arc<StatusInvestClient>,
    cache: Arc<Mutex<SqliteCache>>,
    config: Arc<AppConfig>,
    now: DateTime<Utc>,
) -> (String, Option<StockAnalysis>) {
    let Some(payload) = load_payload(&ticker, &fetcher, &cache).await else {
        return (ticker, None);
    };

    let window = (config.years_to_analyze > 0).then_some(config.years_to_analyze);
    let mut diagnostics = Diagnostics::default();
    let analysis = analyzer::analyze_stock(&ticker, &payload, window, now, &mut diagnostics);

    if diagnostics.skipped() > 0 {
        info!(
            ticker = %ticker,
            skipped = diagnostics.skipped(),
            "records skipped during normalization"
        );
    }
    match &analysis {
        Some(analysis) => info!(
            ticker = %ticker,
            events = analysis.total_dividends_paid,
            pattern = %analysis.payment_pattern,
            "analysis complete"
        ),
        None => warn!(ticker = %ticker, "no analysis available"),
    }

    (ticker, analysis)
}

async fn load_payload(
    ticker: &str,
    fetcher: &StatusInvestClient,
    cache: &Mutex<SqliteCache>,
) -> Option<Value> {
    {
        let guard = cache.lock().await;
        match guard.get(ticker) {
            Ok(Some(payload)) => {
                debug!(ticker, "cache hit");
                return Some(payload);
            }
            Ok(None) => {}
            Err(e) => warn!(ticker, error = %e, "cache read failed"),
        }
    }

    match fetcher.fetch(ticker).await {
        Ok(payload) => {
            if let Err(e) = cache.lock().await.put(ticker, &payload) {
                warn!(ticker, error = %e, "cache write failed");
            }
            Some(payload)
        }
        Err(e) => {
            warn!(ticker, error = %e, "fetch failed");
            None
        }
    }
}
