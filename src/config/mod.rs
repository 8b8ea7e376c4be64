// src/config/mod.rs
//! File-backed configuration: filters, feeds and the seen-store path.
//!
//! Each path resolves as `$ENV_VAR` → built-in default under the working dir.

pub mod feeds;
pub mod filters;
pub mod tables;

pub use feeds::FeedConfig;
pub use filters::{
    AdvancedSection, AirlinesSection, FilterConfig, KeywordsSection, PriceSection, RouteSpec,
    RoutesSection,
};
pub use tables::MatchTables;

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_FILTERS_PATH: &str = "config/filters.toml";
pub const DEFAULT_FEEDS_PATH: &str = "config/feeds.toml";
pub const DEFAULT_SEEN_PATH: &str = "data/seen.json";

pub const ENV_FILTERS_PATH: &str = "PROMO_FILTERS_PATH";
pub const ENV_FEEDS_PATH: &str = "PROMO_FEEDS_PATH";
pub const ENV_SEEN_PATH: &str = "PROMO_SEEN_PATH";

fn resolve(env_key: &str, default: &str) -> PathBuf {
    std::env::var(env_key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

pub fn filters_path() -> PathBuf {
    resolve(ENV_FILTERS_PATH, DEFAULT_FILTERS_PATH)
}

pub fn feeds_path() -> PathBuf {
    resolve(ENV_FEEDS_PATH, DEFAULT_FEEDS_PATH)
}

pub fn seen_path() -> PathBuf {
    resolve(ENV_SEEN_PATH, DEFAULT_SEEN_PATH)
}

/// Load filters from `path`. A missing file disables filtering; a present but
/// malformed file is an error.
pub fn load_filters_from(path: &Path) -> Result<FilterConfig> {
    if !path.exists() {
        warn!(path = %path.display(), "filters file not found, filtering disabled");
        return Ok(FilterConfig::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading filters from {}", path.display()))?;
    let cfg = FilterConfig::from_toml_str(&content)
        .with_context(|| format!("parsing filters at {}", path.display()))?;
    if cfg.enabled {
        info!(path = %path.display(), "filters loaded and enabled");
    } else {
        info!(path = %path.display(), "filters loaded but disabled");
    }
    Ok(cfg)
}

pub fn load_filters_default() -> Result<FilterConfig> {
    load_filters_from(&filters_path())
}

/// Load the feed list from `path`. The feed list is required.
pub fn load_feeds_from(path: &Path) -> Result<Vec<FeedConfig>> {
    if !path.exists() {
        return Err(anyhow!("feeds file {} does not exist", path.display()));
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feeds from {}", path.display()))?;
    let feeds = feeds::parse_feeds(&content)
        .with_context(|| format!("parsing feeds at {}", path.display()))?;
    info!(count = feeds.len(), "loaded feeds from configuration");
    Ok(feeds)
}

pub fn load_feeds_default() -> Result<Vec<FeedConfig>> {
    load_feeds_from(&feeds_path())
}
