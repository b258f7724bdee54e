use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use thiserror::Error;

use crate::models::{PriceSample, PriceSeries, StockListing};

/// Response from GET /stocks
#[derive(Debug, Clone, Deserialize)]
pub struct StocksResponse {
    pub stocks: StockDirectory,
}

/// The listing comes either as a bare symbol list or as a name mapping
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StockDirectory {
    Symbols(Vec<String>),
    Named(BTreeMap<String, String>),
}

impl StockDirectory {
    /// Flatten into listings without duplicate tickers.
    ///
    /// A symbol list keeps the upstream order, so its first entry stays the
    /// default selection. A mapping has no usable order and is sorted by
    /// ticker. Mapping keys are taken as tickers unless the key does not look
    /// like a symbol and the value does, in which case the entry is
    /// `name -> ticker`.
    pub fn into_listings(self) -> Vec<StockListing> {
        match self {
            StockDirectory::Symbols(symbols) => {
                let mut seen = HashSet::new();
                symbols
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty() && seen.insert(s.clone()))
                    .map(|s| StockListing::new(s, None))
                    .collect()
            }
            StockDirectory::Named(entries) => {
                let mut listings: Vec<StockListing> = entries
                    .into_iter()
                    .map(|(key, value)| {
                        if !is_symbol(&key) && is_symbol(&value) {
                            StockListing::new(value, Some(key))
                        } else {
                            StockListing::new(key, Some(value))
                        }
                    })
                    .collect();

                listings.sort_by(|a, b| a.ticker.cmp(&b.ticker));
                listings.dedup_by(|a, b| a.ticker == b.ticker);
                listings
            }
        }
    }
}

fn is_symbol(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 10
        && s.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '.' || c == '-')
}

/// Response from GET /stocks/{ticker}
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PricesResponse {
    /// `?minutes=n` form
    Series(Vec<PriceSample>),
    /// Latest-price form, returned when no window is given
    Latest { stock: PriceSample },
}

impl PricesResponse {
    pub fn into_series(self) -> PriceSeries {
        match self {
            PricesResponse::Series(samples) => samples,
            PricesResponse::Latest { stock } => vec![stock],
        }
    }
}

/// Error type for stock API operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// 401 / 403
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// 404 Not Found
    #[error("Not Found: {0}")]
    NotFound(String),
    /// 429 Too Many Requests
    #[error("Rate Limited. Retry after {retry_after} ms")]
    RateLimited { retry_after: u64 },
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other non-2xx statuses
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
    #[error("Invalid Configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_list_keeps_upstream_order() {
        let response: StocksResponse =
            serde_json::from_str(r#"{"stocks": ["GOOG", "AAPL", " ", "GOOG", "MSFT"]}"#).unwrap();
        let tickers: Vec<String> = response
            .stocks
            .into_listings()
            .into_iter()
            .map(|l| l.ticker)
            .collect();
        assert_eq!(tickers, vec!["GOOG", "AAPL", "MSFT"]);
    }

    #[test]
    fn test_ticker_to_name_mapping() {
        let response: StocksResponse =
            serde_json::from_str(r#"{"stocks": {"NVDA": "Nvidia Corporation", "AMD": "Advanced Micro Devices, Inc."}}"#)
                .unwrap();
        let listings = response.stocks.into_listings();
        assert_eq!(listings[0], StockListing::new("AMD", Some("Advanced Micro Devices, Inc.".to_string())));
        assert_eq!(listings[1].ticker, "NVDA");
    }

    #[test]
    fn test_name_to_ticker_mapping() {
        let response: StocksResponse =
            serde_json::from_str(r#"{"stocks": {"Apple Inc.": "AAPL", "Berkshire Hathaway Inc.": "BRK.B"}}"#)
                .unwrap();
        let listings = response.stocks.into_listings();
        assert_eq!(listings[0], StockListing::new("AAPL", Some("Apple Inc.".to_string())));
        assert_eq!(listings[1].ticker, "BRK.B");
    }

    #[test]
    fn test_prices_response_forms() {
        let series: PricesResponse = serde_json::from_str(
            r#"[{"price": 1.5, "lastUpdatedAt": "2025-05-08T04:11:42Z"}, {"price": 2.5, "lastUpdatedAt": "2025-05-08T04:12:42Z"}]"#,
        )
        .unwrap();
        assert_eq!(series.into_series().len(), 2);

        let latest: PricesResponse = serde_json::from_str(
            r#"{"stock": {"price": 1.5, "lastUpdatedAt": "2025-05-08T04:11:42Z"}}"#,
        )
        .unwrap();
        let samples = latest.into_series();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].price, 1.5);
    }
}
