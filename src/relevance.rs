// src/relevance.rs
//! Relevance gate: the admit/reject decision for one post.
//!
//! All four rule predicates are available through [`RelevanceFilter::verdict`], but the
//! admit decision is wired to the keyword predicate alone. Route, price and airline
//! sections can be configured and inspected without changing what gets admitted.

use std::collections::HashMap;

use tracing::info;

use crate::config::FilterConfig;
use crate::model::Post;
use crate::rules::{self, Verdict};
use crate::text::truncate_chars;

/// Detailed rejection lines per feed before switching to a single summary line.
pub const DETAILED_REJECTIONS_PER_FEED: usize = 3;
const TITLE_PREFIX_CHARS: usize = 60;

/// Per-run rejection counter keyed by feed name; only throttles log output.
#[derive(Debug, Default)]
pub struct RejectionLog {
    per_feed: HashMap<String, usize>,
}

/// What a rejection should print, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionNotice {
    Detailed,
    Summary,
    Silent,
}

impl RejectionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one rejection for `feed` and decide what to emit for it.
    pub fn record(&mut self, feed: &str) -> RejectionNotice {
        let count = self.per_feed.entry(feed.to_string()).or_insert(0);
        let notice = if *count < DETAILED_REJECTIONS_PER_FEED {
            RejectionNotice::Detailed
        } else if *count == DETAILED_REJECTIONS_PER_FEED {
            RejectionNotice::Summary
        } else {
            RejectionNotice::Silent
        };
        // Counting stops once a feed has gone silent.
        if notice != RejectionNotice::Silent {
            *count += 1;
        }
        notice
    }

    pub fn count(&self, feed: &str) -> usize {
        self.per_feed.get(feed).copied().unwrap_or(0)
    }
}

/// Filter state for a single run: shared config plus the run's rejection log.
#[derive(Debug)]
pub struct RelevanceFilter<'a> {
    cfg: &'a FilterConfig,
    rejections: RejectionLog,
}

impl<'a> RelevanceFilter<'a> {
    pub fn new(cfg: &'a FilterConfig) -> Self {
        Self {
            cfg,
            rejections: RejectionLog::new(),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        self.cfg
    }

    /// Admit or reject `post`. Always admits when filtering is disabled.
    pub fn admit(&mut self, post: &Post) -> bool {
        if !self.cfg.enabled {
            return true;
        }
        let passed = rules::keyword_matches(&post.text(), self.cfg);
        if !passed && self.cfg.advanced.log_rejected_posts {
            self.log_rejection(post);
        }
        passed
    }

    /// Every predicate's outcome, independent of the admit wiring.
    pub fn verdict(&self, post: &Post) -> Verdict {
        rules::evaluate_all(&post.text(), self.cfg)
    }

    pub fn rejections(&self) -> &RejectionLog {
        &self.rejections
    }

    fn log_rejection(&mut self, post: &Post) {
        match self.rejections.record(&post.feed_name) {
            RejectionNotice::Detailed => info!(
                target: "relevance",
                feed = %post.feed_name,
                title = %truncate_chars(&post.title, TITLE_PREFIX_CHARS),
                "post filtered out: not about flights/miles to Recife"
            ),
            RejectionNotice::Summary => info!(
                target: "relevance",
                feed = %post.feed_name,
                "more posts rejected for this feed (not about Recife)"
            ),
            RejectionNotice::Silent => {}
        }
    }
}
