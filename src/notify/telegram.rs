use super::Notifier;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub const API_BASE: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    api_base: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            api_base: API_BASE.to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
        }
    }

    /// `None` unless TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID are both set.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN").ok().filter(|v| !v.is_empty())?;
        let chat = std::env::var("TELEGRAM_CHAT_ID").ok().filter(|v| !v.is_empty())?;
        Some(Self::new(token, chat))
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

/// Longest pause between attempts is `500ms << MAX_BACKOFF_SHIFT` (32s).
const MAX_BACKOFF_SHIFT: u32 = 6;

/// Pause after failed attempt `attempt` (1-based): 500ms, 1s, 2s, ... capped.
fn backoff(attempt: u8) -> Duration {
    let shift = u32::from(attempt.saturating_sub(1)).min(MAX_BACKOFF_SHIFT);
    Duration::from_millis(500u64 << shift)
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_text(&self, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: true,
        };
        let url = self.endpoint();

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&url)
                .timeout(self.timeout)
                .json(&payload)
                .send()
                .await;

            // The token is part of the URL; keep it out of errors.
            let err = match res {
                Ok(rsp) => match rsp.error_for_status_ref() {
                    Ok(_) => {
                        tracing::info!("telegram notification sent");
                        return Ok(());
                    }
                    Err(e) => anyhow!("Telegram HTTP error: {}", e.without_url()),
                },
                Err(e) => anyhow!("Telegram request failed: {}", e.without_url()),
            };

            if attempt < self.max_retries {
                tracing::debug!(attempt, error = %err, "telegram send failed, retrying");
                tokio::time::sleep(backoff(attempt)).await;
                continue;
            }
            return Err(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff(1), Duration::from_millis(500));
        assert_eq!(backoff(3), Duration::from_secs(2));
        assert_eq!(backoff(7), Duration::from_secs(32));
        assert_eq!(backoff(200), Duration::from_secs(32));
        assert_eq!(backoff(u8::MAX), Duration::from_secs(32));
    }

    #[test]
    fn endpoint_embeds_token() {
        let n = TelegramNotifier::new("123:abc".into(), "42".into()).with_api_base("http://local");
        assert_eq!(n.endpoint(), "http://local/bot123:abc/sendMessage");
    }

    #[test]
    fn payload_shape() {
        let p = SendMessage {
            chat_id: "42",
            text: "*oi*",
            parse_mode: "Markdown",
            disable_web_page_preview: true,
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["chat_id"], "42");
        assert_eq!(v["parse_mode"], "Markdown");
        assert_eq!(v["disable_web_page_preview"], true);
    }
}
