// src/ingest/rss.rs
//! RSS 2.0 / Atom parsing and the HTTP feed source.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use super::types::{FeedEntry, FeedSource};
use crate::text::strip_html;

/* ---------- RSS 2.0 ---------- */

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<TextNode>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

/* ---------- Atom ---------- */

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    id: Option<String>,
    title: Option<TextNode>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
    summary: Option<TextNode>,
    content: Option<TextNode>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

/// Element whose attributes we ignore (`<guid isPermaLink=..>`, `<title type=..>`).
#[derive(Debug, Default, Deserialize)]
struct TextNode {
    #[serde(rename = "$text", default)]
    value: String,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn text_of(n: Option<TextNode>) -> Option<String> {
    non_empty(n.map(|t| t.value))
}

pub fn parse_rfc2822(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    OffsetDateTime::parse(ts, &Rfc2822)
        .ok()
        .and_then(|dt| DateTime::from_timestamp(dt.unix_timestamp(), 0))
        .or_else(|| {
            DateTime::parse_from_rfc2822(ts)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}

pub fn parse_rfc3339(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse an RSS 2.0 or Atom document into entries, in document order.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let xml = scrub_html_entities_for_xml(xml);
    if looks_like_atom(&xml) {
        let feed: AtomFeed = from_str(&xml).context("parsing atom xml")?;
        return Ok(feed.entry.into_iter().map(atom_entry).collect());
    }
    let rss: Rss = from_str(&xml).context("parsing rss xml")?;
    Ok(rss.channel.item.into_iter().map(rss_item).collect())
}

fn looks_like_atom(xml: &str) -> bool {
    // Root element decides; `<rss` wins if both appear (e.g. atom:link inside RSS).
    match (xml.find("<rss"), xml.find("<feed")) {
        (Some(_), _) => false,
        (None, Some(_)) => true,
        (None, None) => false,
    }
}

fn rss_item(it: Item) -> FeedEntry {
    FeedEntry {
        guid: text_of(it.guid),
        link: non_empty(it.link),
        title: non_empty(it.title),
        summary: non_empty(it.description.map(|d| strip_html(&d))),
        published: it.pub_date.as_deref().and_then(parse_rfc2822),
    }
}

fn atom_entry(e: AtomEntry) -> FeedEntry {
    let link = e
        .links
        .iter()
        .find(|l| l.rel.as_deref().map_or(true, |r| r == "alternate"))
        .or_else(|| e.links.first())
        .and_then(|l| l.href.clone());
    FeedEntry {
        guid: non_empty(e.id),
        link: non_empty(link),
        title: text_of(e.title),
        summary: text_of(e.summary)
            .or_else(|| text_of(e.content))
            .map(|s| strip_html(&s)),
        published: e
            .published
            .as_deref()
            .or(e.updated.as_deref())
            .and_then(parse_rfc3339),
    }
}

/// HTML entities that are not valid XML and would abort the parser.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

/* ---------- HTTP source ---------- */

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub struct HttpFeedSource {
    name: String,
    url: String,
    client: reqwest::Client,
    timeout: Duration,
    max_attempts: u8,
    retry_pause: Duration,
}

impl HttpFeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(15),
            max_attempts: 2,
            retry_pause: Duration::from_secs(1),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_attempts(mut self, attempts: u8) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    async fn fetch_body(&self) -> Result<String> {
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .get(&self.url)
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .header(
                    reqwest::header::ACCEPT,
                    "application/rss+xml, application/xml, text/xml, */*",
                )
                .header(reqwest::header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9,en;q=0.8")
                .header(reqwest::header::CACHE_CONTROL, "no-cache")
                .timeout(self.timeout)
                .send()
                .await;

            let err = match res {
                Ok(rsp) => match rsp.error_for_status() {
                    Ok(rsp) => return rsp.text().await.context("reading feed body"),
                    Err(e) => e,
                },
                Err(e) => e,
            };

            // A 403 will not change on retry.
            let forbidden = err.status() == Some(reqwest::StatusCode::FORBIDDEN);
            if attempt < self.max_attempts && !forbidden {
                tracing::debug!(feed = %self.name, attempt, error = %err, "feed fetch failed, retrying");
                tokio::time::sleep(self.retry_pause).await;
                continue;
            }
            return Err(anyhow!("fetching feed {} failed after {attempt} attempt(s): {err}", self.name));
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>> {
        let body = self.fetch_body().await?;
        parse_feed(&body).with_context(|| format!("feed {}", self.name))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
