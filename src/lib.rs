// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod deal;
pub mod enrich;
pub mod ingest;
pub mod market;
pub mod mileage;
pub mod model;
pub mod monitor;
pub mod notify;
pub mod price;
pub mod relevance;
pub mod rules;
pub mod text;

// ---- Re-exports for stable public API ----
pub use crate::config::FilterConfig;
pub use crate::model::{DealAnalysis, MarketPriceSnapshot, Post};
pub use crate::monitor::{Monitor, NotifyOutcome, RunReport};
pub use crate::relevance::RelevanceFilter;
