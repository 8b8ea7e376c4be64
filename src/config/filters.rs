// src/config/filters.rs
//! Filter configuration (`config/filters.toml`).
//!
//! Every section and field carries a serde default, so a missing key never rejects
//! posts: disabled sections pass everything, an absent file disables filtering.

use serde::Deserialize;

use super::tables::MatchTables;
use crate::mileage::{builtin_programs, MileageProgram};
use crate::text::normalize;

pub const DEFAULT_DOMESTIC_MAX: f64 = 800.0;
pub const DEFAULT_INTERNATIONAL_MAX: f64 = 2500.0;

/// Use [`FilterConfig::from_toml_str`] or call [`FilterConfig::prepared`] on a
/// hand-built value: the `tables` lists are matched as stored and must already be
/// normalized. Mileage keywords are normalized at match time either way.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Master switch; `false` admits every post.
    pub enabled: bool,
    pub routes: RoutesSection,
    pub keywords: KeywordsSection,
    pub price: PriceSection,
    pub airlines: AirlinesSection,
    pub advanced: AdvancedSection,
    pub tables: MatchTables,
    pub mileage: MileageSection,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            routes: RoutesSection::default(),
            keywords: KeywordsSection::default(),
            price: PriceSection::default(),
            airlines: AirlinesSection::default(),
            advanced: AdvancedSection::default(),
            tables: MatchTables::default(),
            mileage: MileageSection::default(),
        }
    }
}

impl FilterConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let cfg: FilterConfig = toml::from_str(s)?;
        Ok(cfg.prepared())
    }

    /// Normalize word lists once so predicates compare normalized text only.
    pub fn prepared(mut self) -> Self {
        self.tables = self.tables.normalized();
        self.keywords.miles_keywords = self
            .keywords
            .miles_keywords
            .iter()
            .map(|k| normalize(k))
            .filter(|k| !k.is_empty())
            .collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoutesSection {
    pub enabled: bool,
    pub include: Vec<RouteSpec>,
    pub exclude: Vec<RouteSpec>,
}

/// `"Origin -> Destination"` or a bare location, normalized at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RouteSpec {
    Pair { origin: String, destination: String },
    Location(String),
}

pub const ROUTE_SEPARATOR: &str = " -> ";

impl From<String> for RouteSpec {
    fn from(raw: String) -> Self {
        RouteSpec::parse(&raw)
    }
}

impl RouteSpec {
    /// A string without the separator is a bare location, never an error.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(ROUTE_SEPARATOR) {
            Some((o, d)) => RouteSpec::Pair {
                origin: normalize(o),
                destination: normalize(d),
            },
            None => RouteSpec::Location(normalize(raw)),
        }
    }

    /// True when the (normalized) text mentions this route.
    pub fn is_mentioned_in(&self, normalized_text: &str) -> bool {
        match self {
            RouteSpec::Pair {
                origin,
                destination,
            } => normalized_text.contains(origin.as_str()) && normalized_text.contains(destination.as_str()),
            RouteSpec::Location(loc) => normalized_text.contains(loc.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeywordsSection {
    pub enabled: bool,
    pub miles_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PriceSection {
    pub enabled: bool,
    pub domestic_max: f64,
    pub international_max: f64,
}

impl Default for PriceSection {
    fn default() -> Self {
        Self {
            enabled: false,
            domestic_max: DEFAULT_DOMESTIC_MAX,
            international_max: DEFAULT_INTERNATIONAL_MAX,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AirlinesSection {
    pub enabled: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdvancedSection {
    pub log_rejected_posts: bool,
    pub min_posts_to_notify: usize,
    pub notify_when_no_results: bool,
    pub no_results_min_posts_analyzed: usize,
}

impl Default for AdvancedSection {
    fn default() -> Self {
        Self {
            log_rejected_posts: false,
            min_posts_to_notify: 1,
            notify_when_no_results: false,
            no_results_min_posts_analyzed: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MileageSection {
    pub programs: Vec<MileageProgram>,
}

impl Default for MileageSection {
    fn default() -> Self {
        Self {
            programs: builtin_programs(),
        }
    }
}
