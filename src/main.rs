//! promo-alerts: one monitoring pass over the configured travel-promo feeds.
//!
//! Meant to run from a scheduler (cron, GitHub Actions); exits non-zero only when
//! configuration or state persistence fails.

use anyhow::{Context, Result};
use chrono::Utc;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use promo_alerts::config;
use promo_alerts::ingest::{rss::HttpFeedSource, seen::SeenStore, types::FeedSource};
use promo_alerts::market::{AmadeusClient, CorridorMarket, OpenSkyClient};
use promo_alerts::notify::TelegramNotifier;
use promo_alerts::Monitor;

/// `PROMO_LOG_FORMAT=json` switches to JSON lines; default is compact text.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("promo_alerts=info,relevance=info,warn"));

    let json = std::env::var("PROMO_LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

async fn run() -> Result<()> {
    let filters = config::load_filters_default().context("loading filters")?;
    let feeds = config::load_feeds_default().context("loading feeds")?;
    if feeds.is_empty() {
        tracing::warn!("no feeds configured");
        return Ok(());
    }

    let sources: Vec<Box<dyn FeedSource>> = feeds
        .into_iter()
        .map(|f| Box::new(HttpFeedSource::new(f.name, f.url)) as Box<dyn FeedSource>)
        .collect();

    let mut monitor = Monitor::new(filters, sources);

    match AmadeusClient::from_env() {
        Some(fares) => {
            let market = CorridorMarket::new(fares, Some(OpenSkyClient::from_env()));
            monitor = monitor.with_market(Box::new(market));
        }
        None => tracing::info!("amadeus credentials not set, price analysis disabled"),
    }
    if let Some(telegram) = TelegramNotifier::from_env() {
        monitor = monitor.with_notifier(Box::new(telegram));
    }
    if let Some(path) = std::env::var("GITHUB_OUTPUT").ok().filter(|v| !v.is_empty()) {
        monitor = monitor.with_github_output(path);
    }

    let mut seen = SeenStore::load(config::seen_path()).await;
    let report = monitor.run_once(&mut seen, Utc::now()).await?;

    tracing::info!(
        feeds = report.feeds_total,
        failed = report.feeds_failed,
        new_posts = report.admitted.len(),
        rejected = report.rejected,
        notify = ?report.notify,
        "monitoring completed"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "fatal error");
            ExitCode::FAILURE
        }
    }
}
