//! `GITHUB_OUTPUT` step outputs for workflow follow-ups.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use tokio::io::AsyncWriteExt;

use crate::model::Post;

const SUMMARY_POSTS: usize = 3;

/// Single-line `posts_summary` value: newlines and quotes escaped.
pub fn posts_summary(posts: &[Post]) -> String {
    let mut s = String::from("🔥 NOVAS PROMOÇÕES ENCONTRADAS!\n\n");
    for p in posts.iter().take(SUMMARY_POSTS) {
        let _ = write!(s, "📰 **{}**\n📝 [{}]({})\n\n", p.feed_name, p.title, p.link);
    }
    if posts.len() > SUMMARY_POSTS {
        let _ = writeln!(s, "... e mais {} promoções!", posts.len() - SUMMARY_POSTS);
    }
    s.replace('\n', "\\n").replace('"', "\\\"")
}

/// Append `new_posts_count` and `posts_summary` to `path`. No-op for an empty run.
pub async fn write_github_output(path: &Path, posts: &[Post]) -> Result<()> {
    if posts.is_empty() {
        return Ok(());
    }
    let body = format!(
        "new_posts_count={}\nposts_summary={}\n",
        posts.len(),
        posts_summary(posts)
    );
    let mut f = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("opening {}", path.display()))?;
    f.write_all(body.as_bytes())
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    f.flush().await?;
    Ok(())
}
