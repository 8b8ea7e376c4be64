// src/ingest/seen.rs
//! Persistent set of post ids that were already processed.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SeenFile {
    #[serde(default)]
    seen_posts: Vec<String>,
    /// RFC 3339; kept as text so older naive timestamps still load.
    #[serde(default)]
    last_updated: Option<String>,
}

#[derive(Debug)]
pub struct SeenStore {
    path: PathBuf,
    ids: BTreeSet<String>,
}

impl SeenStore {
    /// Empty store that will be written to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ids: BTreeSet::new(),
        }
    }

    /// Load from `path`. A missing or unreadable file starts fresh.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = match fs::read_to_string(&path).await {
            Ok(s) => match serde_json::from_str::<SeenFile>(&s) {
                Ok(f) => {
                    tracing::info!(count = f.seen_posts.len(), "loaded seen posts");
                    f.seen_posts.into_iter().collect()
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not parse seen posts, starting fresh");
                    BTreeSet::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no seen posts file found, starting fresh");
                BTreeSet::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read seen posts, starting fresh");
                BTreeSet::new()
            }
        };
        Self { path, ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true` if the id was not seen before.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all ids plus a `last_updated` stamp as pretty JSON, creating parent dirs.
    pub async fn save(&self, now: DateTime<Utc>) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let file = SeenFile {
            seen_posts: self.ids.iter().cloned().collect(),
            last_updated: Some(now.to_rfc3339()),
        };
        let body = serde_json::to_vec_pretty(&file).context("serializing seen posts")?;
        fs::write(&self.path, body)
            .await
            .with_context(|| format!("writing seen posts to {}", self.path.display()))?;
        tracing::info!(count = self.ids.len(), "saved seen posts");
        Ok(())
    }
}
