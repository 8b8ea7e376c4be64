pub mod format;
pub mod github;
pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

pub use format::{format_no_results, format_summary};
pub use github::write_github_output;
pub use telegram::TelegramNotifier;

/// Delivery channel for run summaries (Markdown text).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<()>;
}
