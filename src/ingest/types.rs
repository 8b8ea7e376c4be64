// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One decoded feed entry, before it becomes a `Post`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeedEntry {
    pub guid: Option<String>,
    pub link: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    /// Entries in feed order (newest first for most feeds).
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>>;
    fn name(&self) -> &str;
}
