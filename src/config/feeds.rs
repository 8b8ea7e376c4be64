// src/config/feeds.rs
use serde::Deserialize;

/// One `[[feeds]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_name")]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

fn default_feed_name() -> String {
    "Unknown Feed".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FeedsFile {
    #[serde(default)]
    feeds: Vec<FeedConfig>,
}

/// Parse the feed list; entries without a URL are dropped with a warning.
pub fn parse_feeds(s: &str) -> anyhow::Result<Vec<FeedConfig>> {
    let file: FeedsFile = toml::from_str(s)?;
    Ok(file
        .feeds
        .into_iter()
        .filter(|f| {
            let ok = !f.url.trim().is_empty();
            if !ok {
                tracing::warn!(feed = %f.name, "no URL configured for feed, skipping");
            }
            ok
        })
        .collect())
}
