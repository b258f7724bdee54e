//! Stock page models

use super::{Interval, PriceSeries};

/// An entry of the `/stocks` listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockListing {
    pub ticker: String,
    pub name: Option<String>,
}

impl StockListing {
    pub fn new(ticker: impl Into<String>, name: Option<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name,
        }
    }
}

/// Result struct for the single-ticker page
#[derive(Debug, Clone)]
pub struct StockPageResult {
    pub ticker: String,
    pub interval: Interval,
    pub samples: PriceSeries,
    /// `None` when the series is empty
    pub average: Option<f64>,
}
