// src/market/opensky.rs
//! Live aircraft states around Recife. Informational only.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const STATES_URL: &str = "https://opensky-network.org/api/states/all";

/// (lat_min, lat_max, lon_min, lon_max)
pub const RECIFE_BBOX: (f64, f64, f64, f64) = (-8.5, -7.5, -35.5, -34.5);

/// ICAO prefixes of the domestic carriers flying the corridor.
pub const COMMERCIAL_PREFIXES: [&str; 4] = ["GLO", "AZU", "TAM", "ONE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrafficLevel {
    VeryLow,
    Low,
    Medium,
    High,
}

impl TrafficLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficLevel::VeryLow => "VERY_LOW",
            TrafficLevel::Low => "LOW",
            TrafficLevel::Medium => "MEDIUM",
            TrafficLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn traffic_level(aircraft: usize) -> TrafficLevel {
    match aircraft {
        n if n >= 15 => TrafficLevel::High,
        n if n >= 8 => TrafficLevel::Medium,
        n if n >= 3 => TrafficLevel::Low,
        _ => TrafficLevel::VeryLow,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirTraffic {
    pub aircraft_in_region: usize,
    pub commercial_flights_detected: usize,
    pub sample_callsigns: Vec<String>,
    pub level: TrafficLevel,
}

#[derive(Debug, Deserialize)]
struct StatesResponse {
    #[serde(default)]
    states: Option<Vec<Vec<serde_json::Value>>>,
}

fn summarize(states: &[Vec<serde_json::Value>]) -> AirTraffic {
    let commercial: Vec<String> = states
        .iter()
        .filter_map(|s| s.get(1).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|cs| COMMERCIAL_PREFIXES.iter().any(|p| cs.contains(p)))
        .map(str::to_string)
        .collect();

    AirTraffic {
        aircraft_in_region: states.len(),
        commercial_flights_detected: commercial.len(),
        sample_callsigns: commercial.into_iter().take(3).collect(),
        level: traffic_level(states.len()),
    }
}

pub struct OpenSkyClient {
    client: reqwest::Client,
    url: String,
    credentials: Option<(String, String)>,
}

impl OpenSkyClient {
    pub fn new(credentials: Option<(String, String)>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: STATES_URL.to_string(),
            credentials,
        }
    }

    /// Anonymous access unless OPENSKY_CLIENT_ID is set.
    pub fn from_env() -> Self {
        let creds = std::env::var("OPENSKY_CLIENT_ID")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|id| {
                let secret = std::env::var("OPENSKY_CLIENT_SECRET").unwrap_or_default();
                (id, secret)
            });
        Self::new(creds)
    }

    pub async fn fetch_traffic(&self) -> Result<AirTraffic> {
        let (lamin, lamax, lomin, lomax) = RECIFE_BBOX;
        let mut req = self
            .client
            .get(&self.url)
            .query(&[("lamin", lamin), ("lamax", lamax), ("lomin", lomin), ("lomax", lomax)])
            .timeout(Duration::from_secs(15));
        if let Some((id, secret)) = &self.credentials {
            req = req.basic_auth(id, Some(secret));
        }
        let rsp: StatesResponse = req
            .send()
            .await
            .context("opensky request")?
            .error_for_status()
            .context("opensky non-2xx")?
            .json()
            .await
            .context("opensky body")?;
        Ok(summarize(rsp.states.as_deref().unwrap_or_default()))
    }
}
