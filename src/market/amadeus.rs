// src/market/amadeus.rs
//! Amadeus self-service fare search for São Paulo (GRU, CGH) → Recife (REC).

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;

use super::MarketSource;
use crate::deal::rate_market_price;
use crate::model::MarketPriceSnapshot;

pub const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";
pub const ORIGINS: [&str; 2] = ["GRU", "CGH"];
pub const DESTINATION: &str = "REC";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Default, Deserialize)]
struct OffersResponse {
    #[serde(default)]
    data: Vec<Offer>,
}

#[derive(Debug, Deserialize)]
struct Offer {
    price: OfferPrice,
    #[serde(default)]
    itineraries: Vec<Itinerary>,
}

#[derive(Debug, Deserialize)]
struct OfferPrice {
    total: String,
}

#[derive(Debug, Deserialize)]
struct Itinerary {
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    departure: Endpoint,
    #[serde(rename = "carrierCode")]
    carrier_code: String,
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    at: String,
}

/// Essential fields of one offer.
#[derive(Debug, Clone, PartialEq)]
pub struct FareQuote {
    pub price: f64,
    pub origin: String,
    pub airline: String,
    pub departure_time: String,
    pub stops: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FareSearch {
    pub departure_date: NaiveDate,
    /// Sorted by price, cheapest first; never empty.
    pub quotes: Vec<FareQuote>,
}

impl FareSearch {
    pub fn cheapest(&self) -> &FareQuote {
        &self.quotes[0]
    }

    /// (min, max, avg rounded to cents)
    pub fn price_range(&self) -> (f64, f64, f64) {
        let min = self.quotes.iter().map(|q| q.price).fold(f64::INFINITY, f64::min);
        let max = self.quotes.iter().map(|q| q.price).fold(f64::NEG_INFINITY, f64::max);
        let avg = self.quotes.iter().map(|q| q.price).sum::<f64>() / self.quotes.len() as f64;
        (min, max, (avg * 100.0).round_ties_even() / 100.0)
    }
}

/// Next Monday strictly after `today` (a Monday maps to the following one).
pub fn next_departure_date(today: NaiveDate) -> NaiveDate {
    let days_ahead = 7 - i64::from(today.weekday().num_days_from_monday());
    today + ChronoDuration::days(days_ahead)
}

fn quote_from_offer(offer: &Offer, origin: &str) -> Option<FareQuote> {
    let price = offer.price.total.trim().parse::<f64>().ok()?;
    let segments = &offer.itineraries.first()?.segments;
    let first = segments.first()?;
    Some(FareQuote {
        price,
        origin: origin.to_string(),
        airline: first.carrier_code.clone(),
        departure_time: first.departure.at.clone(),
        stops: segments.len() - 1,
    })
}

pub struct AmadeusClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    token: Mutex<Option<String>>,
    timeout: Duration,
}

impl AmadeusClient {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            api_secret,
            token: Mutex::new(None),
            timeout: Duration::from_secs(15),
        }
    }

    /// `None` unless both AMADEUS_API_KEY and AMADEUS_API_SECRET are set.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("AMADEUS_API_KEY").ok().filter(|v| !v.is_empty())?;
        let secret = std::env::var("AMADEUS_API_SECRET").ok().filter(|v| !v.is_empty())?;
        Some(Self::new(key, secret))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn access_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        if let Some(t) = guard.as_ref() {
            return Ok(t.clone());
        }
        let url = format!("{}/v1/security/oauth2/token", self.base_url);
        let rsp: TokenResponse = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.api_key.as_str()),
                ("client_secret", self.api_secret.as_str()),
            ])
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .context("amadeus token request")?
            .error_for_status()
            .context("amadeus token non-2xx")?
            .json()
            .await
            .context("amadeus token body")?;
        tracing::debug!("amadeus token obtained");
        *guard = Some(rsp.access_token.clone());
        Ok(rsp.access_token)
    }

    /// Search both São Paulo airports for `departure_date` and merge the offers.
    pub async fn search_fares(&self, departure_date: NaiveDate) -> Result<FareSearch> {
        let token = self.access_token().await?;
        let url = format!("{}/v2/shopping/flight-offers", self.base_url);
        let date = departure_date.format("%Y-%m-%d").to_string();

        let mut quotes = Vec::new();
        for origin in ORIGINS {
            let rsp: OffersResponse = self
                .client
                .get(&url)
                .bearer_auth(&token)
                .query(&[
                    ("originLocationCode", origin),
                    ("destinationLocationCode", DESTINATION),
                    ("departureDate", date.as_str()),
                    ("adults", "1"),
                    ("currencyCode", "BRL"),
                    ("max", "10"),
                ])
                .timeout(self.timeout)
                .send()
                .await
                .with_context(|| format!("amadeus offers {origin}->{DESTINATION}"))?
                .error_for_status()
                .with_context(|| format!("amadeus offers {origin}->{DESTINATION} non-2xx"))?
                .json()
                .await
                .context("amadeus offers body")?;
            quotes.extend(rsp.data.iter().filter_map(|o| quote_from_offer(o, origin)));
        }

        if quotes.is_empty() {
            return Err(anyhow!("no flights found for {date}"));
        }
        quotes.sort_by(|a, b| a.price.total_cmp(&b.price));
        Ok(FareSearch {
            departure_date,
            quotes,
        })
    }
}

#[async_trait]
impl MarketSource for AmadeusClient {
    async fn corridor_snapshot(&self) -> Result<MarketPriceSnapshot> {
        let date = next_departure_date(Utc::now().date_naive());
        let search = self.search_fares(date).await?;
        let cheapest = search.cheapest();
        let (min, max, avg) = search.price_range();
        tracing::debug!(flights = search.quotes.len(), min, max, avg, "fare search done");
        Ok(MarketPriceSnapshot {
            cheapest_price_brl: cheapest.price,
            price_rating: rate_market_price(cheapest.price),
            timestamp: Utc::now(),
            best_origin: Some(cheapest.origin.clone()),
            airline: Some(cheapest.airline.clone()),
        })
    }

    fn name(&self) -> &str {
        "amadeus"
    }
}
