// src/monitor.rs
//! One batch run: fetch → filter → enrich → stats → notify.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use metrics::counter;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::FilterConfig;
use crate::enrich;
use crate::ingest::{fetch_posts, seen::SeenStore, types::FeedSource};
use crate::market::{HourlyCache, MarketSource};
use crate::model::Post;
use crate::notify::{format_no_results, format_summary, write_github_output, Notifier};
use crate::relevance::RelevanceFilter;
use crate::rules::is_corridor_flight_post;
use crate::text::truncate_chars;

const REJECTED_EXAMPLES: usize = 3;
const REJECTED_TITLE_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Summary of admitted posts was sent.
    Summary,
    /// Heartbeat "nothing found" message was sent.
    NoResults,
    /// Nothing was sent (no posts, below threshold, or no notifier).
    Skipped,
    /// A send was attempted and failed.
    Failed,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub feeds_total: usize,
    pub feeds_failed: usize,
    pub admitted: Vec<Post>,
    pub rejected: usize,
    pub notify: NotifyOutcome,
}

impl RunReport {
    /// Unseen posts that went through the relevance gate.
    pub fn analyzed(&self) -> usize {
        self.admitted.len() + self.rejected
    }
}

pub struct Monitor {
    filters: FilterConfig,
    feeds: Vec<Box<dyn FeedSource>>,
    market: Option<Box<dyn MarketSource>>,
    notifier: Option<Box<dyn Notifier>>,
    github_output: Option<PathBuf>,
    cache: HourlyCache,
    feed_pause: Duration,
}

impl Monitor {
    pub fn new(filters: FilterConfig, feeds: Vec<Box<dyn FeedSource>>) -> Self {
        Self {
            filters,
            feeds,
            market: None,
            notifier: None,
            github_output: None,
            cache: HourlyCache::new(),
            feed_pause: Duration::from_millis(500),
        }
    }

    pub fn with_market(mut self, market: Box<dyn MarketSource>) -> Self {
        self.market = Some(market);
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_github_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.github_output = Some(path.into());
        self
    }

    /// Pause between feeds; zero disables it.
    pub fn with_feed_pause(mut self, pause: Duration) -> Self {
        self.feed_pause = pause;
        self
    }

    pub fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    /// Process every feed once, persist `seen` and notify.
    ///
    /// Feed failures are logged and skipped; only seen-store persistence and
    /// GitHub output failures surface as errors.
    pub async fn run_once(&mut self, seen: &mut SeenStore, now: DateTime<Utc>) -> Result<RunReport> {
        info!(feeds = self.feeds.len(), "starting monitoring run");

        let mut filter = RelevanceFilter::new(&self.filters);
        let mut admitted = Vec::new();
        let mut rejected_titles = Vec::new();
        let mut feeds_failed = 0usize;

        for (i, feed) in self.feeds.iter().enumerate() {
            if i > 0 && !self.feed_pause.is_zero() {
                tokio::time::sleep(self.feed_pause).await;
            }

            let posts = match fetch_posts(feed.as_ref(), now).await {
                Ok(p) => p,
                Err(e) => {
                    warn!(feed = feed.name(), error = %e, "feed fetch failed, skipping");
                    feeds_failed += 1;
                    continue;
                }
            };

            let mut found = 0usize;
            for mut post in posts {
                if seen.contains(&post.id) {
                    continue;
                }
                let id = post.id.clone();
                if filter.admit(&post) {
                    if let Some(market) = self.market.as_deref() {
                        enrich_post(&mut self.cache, market, &self.filters, &mut post, now).await;
                    }
                    admitted.push(post);
                    found += 1;
                } else {
                    rejected_titles.push(post.title);
                }
                // Rejected posts are marked too so they are not re-evaluated.
                seen.insert(id);
            }
            info!(feed = feed.name(), new_posts = found, "feed processed");
        }

        let rejected = rejected_titles.len();
        counter!("monitor_posts_admitted_total").increment(admitted.len() as u64);
        counter!("monitor_posts_rejected_total").increment(rejected as u64);
        let advanced = &self.filters.advanced;
        if self.filters.enabled {
            info!(
                total = admitted.len() + rejected,
                admitted = admitted.len(),
                rejected,
                "filtering summary"
            );
            if advanced.log_rejected_posts {
                for t in rejected_titles.iter().take(REJECTED_EXAMPLES) {
                    info!(title = %truncate_chars(t, REJECTED_TITLE_CHARS), "rejected example");
                }
            }
        } else {
            info!(total = admitted.len(), "no filters applied");
        }

        let mut report = RunReport {
            feeds_total: self.feeds.len(),
            feeds_failed,
            admitted,
            rejected,
            notify: NotifyOutcome::Skipped,
        };

        let below_threshold =
            self.filters.enabled && report.admitted.len() < advanced.min_posts_to_notify;
        if below_threshold {
            info!(
                admitted = report.admitted.len(),
                minimum = advanced.min_posts_to_notify,
                "too few relevant posts, skipping summary"
            );
        }

        seen.save(now).await?;

        let local_now = now.with_timezone(&Local);
        if below_threshold {
            let analyzed = report.analyzed();
            if advanced.notify_when_no_results {
                if analyzed >= advanced.no_results_min_posts_analyzed {
                    let msg = format_no_results(analyzed, report.rejected, &local_now);
                    report.notify = self.send(&msg, NotifyOutcome::NoResults).await;
                } else {
                    info!(
                        analyzed,
                        minimum = advanced.no_results_min_posts_analyzed,
                        "too few posts analyzed for a no-results notice"
                    );
                }
            }
            return Ok(report);
        }

        if let Some(msg) = format_summary(&report.admitted, &local_now) {
            report.notify = self.send(&msg, NotifyOutcome::Summary).await;
        }
        if let Some(path) = &self.github_output {
            write_github_output(path, &report.admitted).await?;
        }

        Ok(report)
    }

    async fn send(&self, msg: &str, on_success: NotifyOutcome) -> NotifyOutcome {
        let Some(notifier) = self.notifier.as_deref() else {
            warn!("telegram credentials not configured, skipping notification");
            return NotifyOutcome::Skipped;
        };
        match notifier.send_text(msg).await {
            Ok(()) => on_success,
            Err(e) => {
                warn!(error = %e, "notification failed");
                NotifyOutcome::Failed
            }
        }
    }
}

/// Attach a deal analysis to corridor flight posts when a market snapshot exists.
async fn enrich_post(
    cache: &mut HourlyCache,
    market: &dyn MarketSource,
    filters: &FilterConfig,
    post: &mut Post,
    now: DateTime<Utc>,
) {
    if !is_corridor_flight_post(&post.text(), &filters.tables) {
        return;
    }
    let Some(snapshot) = cache.get(market, now).await else {
        return;
    };
    let analysis = enrich::analyze(post, &snapshot, &filters.mileage.programs);
    if let (Some(promo), Some(q)) = (analysis.promo_price_brl, analysis.deal_quality) {
        info!(
            title = %truncate_chars(&post.title, REJECTED_TITLE_CHARS),
            promo,
            market = analysis.market_price_brl,
            quality = %q,
            "deal analyzed"
        );
    }
    post.price_analysis = Some(analysis);
}
