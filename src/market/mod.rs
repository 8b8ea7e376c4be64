// src/market/mod.rs
//! Market fare collaborators and the per-hour snapshot cache.

pub mod amadeus;
pub mod opensky;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::MarketPriceSnapshot;

pub use amadeus::AmadeusClient;
pub use opensky::{AirTraffic, OpenSkyClient, TrafficLevel};

#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Current cheapest corridor fare. An `Err` means "no snapshot this time".
    async fn corridor_snapshot(&self) -> Result<MarketPriceSnapshot>;
    fn name(&self) -> &str;
}

/// `YYYYMMDD_HH` bucket for `now` (UTC).
pub fn hour_bucket(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d_%H").to_string()
}

/// Holds at most one snapshot, valid for the wall-clock hour it was fetched in.
///
/// A failed fetch is cached as absence for the rest of the hour, so the API is hit at
/// most once per bucket.
#[derive(Debug, Default)]
pub struct HourlyCache {
    slot: Option<(String, Option<MarketPriceSnapshot>)>,
}

impl HourlyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(
        &mut self,
        source: &dyn MarketSource,
        now: DateTime<Utc>,
    ) -> Option<MarketPriceSnapshot> {
        let bucket = hour_bucket(now);
        if let Some((b, v)) = &self.slot {
            if *b == bucket {
                return v.clone();
            }
        }

        let fetched = match source.corridor_snapshot().await {
            Ok(s) => {
                tracing::info!(
                    source = source.name(),
                    price = s.cheapest_price_brl,
                    rating = %s.price_rating,
                    "market snapshot fetched"
                );
                Some(s)
            }
            Err(e) => {
                tracing::warn!(source = source.name(), error = %e, "market snapshot unavailable");
                None
            }
        };
        self.slot = Some((bucket, fetched.clone()));
        fetched
    }
}

/// Fares plus informational air traffic around the destination airport.
pub struct CorridorMarket {
    fares: AmadeusClient,
    traffic: Option<OpenSkyClient>,
}

impl CorridorMarket {
    pub fn new(fares: AmadeusClient, traffic: Option<OpenSkyClient>) -> Self {
        Self { fares, traffic }
    }
}

#[async_trait]
impl MarketSource for CorridorMarket {
    async fn corridor_snapshot(&self) -> Result<MarketPriceSnapshot> {
        let snapshot = self.fares.corridor_snapshot().await?;
        if let Some(traffic) = &self.traffic {
            match traffic.fetch_traffic().await {
                Ok(t) => tracing::info!(
                    aircraft = t.aircraft_in_region,
                    commercial = t.commercial_flights_detected,
                    level = %t.level,
                    "air traffic near destination"
                ),
                Err(e) => tracing::debug!(error = %e, "air traffic unavailable"),
            }
        }
        Ok(snapshot)
    }

    fn name(&self) -> &str {
        "corridor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::MarketRating;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl MarketSource for Counting {
        async fn corridor_snapshot(&self) -> Result<MarketPriceSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("no offers");
            }
            Ok(MarketPriceSnapshot {
                cheapest_price_brl: 420.0,
                price_rating: MarketRating::Good,
                timestamp: Utc::now(),
                best_origin: None,
                airline: None,
            })
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn bucket_format() {
        let t = Utc.with_ymd_and_hms(2025, 9, 6, 9, 59, 59).unwrap();
        assert_eq!(hour_bucket(t), "20250906_09");
    }

    #[tokio::test]
    async fn fetches_once_per_hour() {
        let src = Counting {
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let mut cache = HourlyCache::new();
        let t0 = Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap();

        assert!(cache.get(&src, t0).await.is_some());
        assert!(cache.get(&src, t0 + chrono::Duration::minutes(59)).await.is_some());
        assert_eq!(src.calls.load(Ordering::SeqCst), 1);

        assert!(cache.get(&src, t0 + chrono::Duration::minutes(60)).await.is_some());
        assert_eq!(src.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_cached_as_absence() {
        let src = Counting {
            calls: AtomicUsize::new(0),
            fail: true,
        };
        let mut cache = HourlyCache::new();
        let t0 = Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap();
        assert!(cache.get(&src, t0).await.is_none());
        assert!(cache.get(&src, t0).await.is_none());
        assert_eq!(src.calls.load(Ordering::SeqCst), 1);
    }
}
