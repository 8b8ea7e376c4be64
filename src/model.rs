// src/model.rs
//! Values that flow through one monitoring run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deal::{DealQuality, MarketRating};

/// One feed entry under evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// `"{feed_name}:{guid|link|title}"`; unique across feeds.
    pub id: String,
    pub feed_name: String,
    pub title: String,
    pub link: String,
    /// Summary as plain text (tags stripped, entities decoded).
    pub summary: String,
    pub published_at: Option<DateTime<Utc>>,
    pub discovered_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_analysis: Option<DealAnalysis>,
}

impl Post {
    /// Title and summary joined with a space; the text every predicate looks at.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }
}

/// Cheapest current fare for the corridor, as reported by the fare API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPriceSnapshot {
    pub cheapest_price_brl: f64,
    pub price_rating: MarketRating,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub best_origin: Option<String>,
    #[serde(default)]
    pub airline: Option<String>,
}

/// Points alternative for the promo fare, taken from the best mileage program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilesAlternative {
    pub best_program: String,
    pub estimated_miles: u64,
    pub worth_using_miles: bool,
}

/// Enrichment attached to an admitted post when a market snapshot exists.
///
/// Promo-dependent fields are `None` when no price could be read from the post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealAnalysis {
    pub market_price_brl: f64,
    pub market_price_rating: MarketRating,
    pub promo_price_brl: Option<f64>,
    pub savings_vs_market: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub is_good_deal: Option<bool>,
    pub deal_quality: Option<DealQuality>,
    pub miles_alternative: Option<MilesAlternative>,
}

impl DealAnalysis {
    pub fn has_promotion_price(&self) -> bool {
        self.promo_price_brl.is_some()
    }
}
