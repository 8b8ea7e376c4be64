// src/deal.rs
//! Deal scoring: promotional fare vs. current market fare.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Savings above this (BRL) are needed for a "good deal".
pub const GOOD_DEAL_MIN_SAVINGS: f64 = 50.0;
/// Fares at or above this (BRL) are never a "good deal".
pub const GOOD_DEAL_MAX_PRICE: f64 = 500.0;

/// Grade of a promo fare relative to the market fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealQuality {
    Bad,
    Regular,
    Good,
    VeryGood,
    Excellent,
}

impl DealQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bad => "BAD",
            Self::Regular => "REGULAR",
            Self::Good => "GOOD",
            Self::VeryGood => "VERY_GOOD",
            Self::Excellent => "EXCELLENT",
        }
    }
}

impl fmt::Display for DealQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standalone grade of a market fare for the corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketRating {
    Excellent,
    Good,
    Regular,
    Expensive,
}

/// Upper bounds (inclusive, BRL) of the market-fare brackets.
pub const MARKET_EXCELLENT_MAX: f64 = 300.0;
pub const MARKET_GOOD_MAX: f64 = 450.0;
pub const MARKET_REGULAR_MAX: f64 = 600.0;

impl MarketRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::Regular => "REGULAR",
            Self::Expensive => "EXPENSIVE",
        }
    }

    /// Savings vs. a regular fare; zero unless the market is already cheap.
    pub fn potential_savings(&self, price: f64) -> f64 {
        match self {
            Self::Excellent | Self::Good => MARKET_REGULAR_MAX - price,
            Self::Regular | Self::Expensive => 0.0,
        }
    }

    pub fn recommendation(&self, price: f64) -> String {
        match self {
            Self::Excellent => format!("🔥 COMPRE AGORA! Preço excelente de R${price:.0}"),
            Self::Good => format!("✅ Boa oferta por R${price:.0}. Recomendado!"),
            Self::Regular => format!("⚠️ Preço regular R${price:.0}. Aguarde melhor oferta."),
            Self::Expensive => format!("❌ Preço alto R${price:.0}. Evite comprar agora."),
        }
    }
}

impl fmt::Display for MarketRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bracket a market fare: ≤300 excellent, ≤450 good, ≤600 regular, else expensive.
pub fn rate_market_price(price: f64) -> MarketRating {
    if price <= MARKET_EXCELLENT_MAX {
        MarketRating::Excellent
    } else if price <= MARKET_GOOD_MAX {
        MarketRating::Good
    } else if price <= MARKET_REGULAR_MAX {
        MarketRating::Regular
    } else {
        MarketRating::Expensive
    }
}

/// Result of comparing one promo fare with the market fare.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DealScore {
    pub savings: f64,
    /// Rounded to one decimal; 0 when the market fare is not positive.
    pub discount_pct: f64,
    pub is_good_deal: bool,
    pub quality: DealQuality,
}

pub fn score(promo_price: f64, market_price: f64) -> DealScore {
    let savings = market_price - promo_price;
    DealScore {
        savings,
        discount_pct: discount_percentage(savings, market_price),
        is_good_deal: is_good_deal(savings, promo_price),
        quality: deal_quality(promo_price, market_price),
    }
}

pub fn discount_percentage(savings: f64, market_price: f64) -> f64 {
    if market_price <= 0.0 {
        return 0.0;
    }
    round1(savings / market_price * 100.0)
}

pub fn is_good_deal(savings: f64, promo_price: f64) -> bool {
    savings > GOOD_DEAL_MIN_SAVINGS && promo_price < GOOD_DEAL_MAX_PRICE
}

pub fn deal_quality(promo_price: f64, market_price: f64) -> DealQuality {
    if promo_price >= market_price {
        return DealQuality::Bad;
    }
    // promo < market implies market > promo; still guard non-positive markets.
    if market_price <= 0.0 {
        return DealQuality::Bad;
    }
    let savings_pct = (market_price - promo_price) / market_price * 100.0;
    if savings_pct >= 30.0 {
        DealQuality::Excellent
    } else if savings_pct >= 15.0 {
        DealQuality::VeryGood
    } else if savings_pct >= 5.0 {
        DealQuality::Good
    } else {
        DealQuality::Regular
    }
}

/// One decimal, ties to even: 12.25 -> 12.2.
fn round1(v: f64) -> f64 {
    (v * 10.0).round_ties_even() / 10.0
}
