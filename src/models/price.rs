//! Price sample models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single observed price for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub price: f64,
    #[serde(rename = "lastUpdatedAt")]
    pub observed_at: DateTime<Utc>,
}

impl PriceSample {
    pub fn new(price: f64, observed_at: DateTime<Utc>) -> Self {
        Self { price, observed_at }
    }
}

/// Samples for one ticker over one trailing window, in the order the upstream sent them.
/// Not guaranteed to be chronological or free of duplicate timestamps.
pub type PriceSeries = Vec<PriceSample>;
