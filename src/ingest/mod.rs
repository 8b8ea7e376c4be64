// src/ingest/mod.rs
//! Feed entries → `Post`s.

pub mod rss;
pub mod seen;
pub mod types;

use anyhow::Result;
use chrono::{DateTime, Utc};
use metrics::counter;

use crate::model::Post;
use types::{FeedEntry, FeedSource};

/// Only the newest entries of each feed are considered per run.
pub const MAX_ENTRIES_PER_FEED: usize = 5;

const UNTITLED: &str = "No title";

/// Dedup key `"{feed}:{guid|link|title}"`; `None` when the entry has no usable key.
pub fn post_id(feed_name: &str, entry: &FeedEntry) -> Option<String> {
    let key = [&entry.guid, &entry.link, &entry.title]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())?;
    Some(format!("{feed_name}:{key}"))
}

pub fn entry_to_post(feed_name: &str, entry: FeedEntry, now: DateTime<Utc>) -> Option<Post> {
    let id = post_id(feed_name, &entry)?;
    Some(Post {
        id,
        feed_name: feed_name.to_string(),
        title: entry
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string()),
        link: entry.link.unwrap_or_default(),
        summary: entry.summary.unwrap_or_default(),
        published_at: entry.published,
        discovered_at: now,
        price_analysis: None,
    })
}

/// Turn the first [`MAX_ENTRIES_PER_FEED`] entries into posts, dropping keyless ones.
pub fn entries_to_posts(feed_name: &str, entries: Vec<FeedEntry>, now: DateTime<Utc>) -> Vec<Post> {
    entries
        .into_iter()
        .take(MAX_ENTRIES_PER_FEED)
        .filter_map(|e| entry_to_post(feed_name, e, now))
        .collect()
}

/// Fetch one source and build its candidate posts.
pub async fn fetch_posts(source: &dyn FeedSource, now: DateTime<Utc>) -> Result<Vec<Post>> {
    let entries = match source.fetch_entries().await {
        Ok(v) => v,
        Err(e) => {
            counter!("ingest_feed_errors_total").increment(1);
            return Err(e);
        }
    };
    if entries.is_empty() {
        tracing::warn!(feed = source.name(), "no entries found in feed");
    }
    counter!("ingest_entries_total").increment(entries.len() as u64);
    Ok(entries_to_posts(source.name(), entries, now))
}
