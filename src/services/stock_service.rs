use tracing::{error, info};

use crate::api::PriceProvider;
use crate::models::{Interval, PriceSeries, StockListing, StockPageResult};
use crate::stats;

/// Fetch the ticker listing. Failures are logged and read as "no tickers".
pub async fn fetch_all_stocks(provider: &dyn PriceProvider) -> Vec<StockListing> {
    match provider.list_stocks().await {
        Ok(listings) => {
            info!("Loaded {} tickers", listings.len());
            listings
        }
        Err(e) => {
            error!("Error fetching all stocks: {}", e);
            Vec::new()
        }
    }
}

/// Fetch one trailing window. Failures are logged and read as an empty series.
pub async fn fetch_stock_prices(provider: &dyn PriceProvider, ticker: &str, interval: Interval) -> PriceSeries {
    match provider.get_stock_prices(ticker, interval.minutes()).await {
        Ok(samples) => samples,
        Err(e) => {
            error!("Error fetching prices for {} ({}): {}", ticker, interval, e);
            Vec::new()
        }
    }
}

/// Normalize a user-supplied ticker
pub fn parse_ticker(raw: &str) -> Result<String, String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err("Ticker cannot be empty".to_string());
    }
    Ok(ticker)
}

/// Price table and average for a single ticker
pub async fn get_stock_page(
    provider: &dyn PriceProvider,
    ticker: &str,
    interval: Interval,
) -> Result<StockPageResult, String> {
    let ticker = parse_ticker(ticker)?;
    let samples = fetch_stock_prices(provider, &ticker, interval).await;
    let average = stats::average_price(&samples);

    Ok(StockPageResult {
        ticker,
        interval,
        samples,
        average,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::PriceSample;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory provider; tickers without a series answer 404
    #[derive(Default)]
    pub(crate) struct FakeProvider {
        pub tickers: Vec<String>,
        pub series: HashMap<String, Vec<f64>>,
        /// Artificial latency per ticker, in milliseconds
        pub delays: HashMap<String, u64>,
        pub fail_listing: bool,
        pub requests: Mutex<Vec<(String, u32)>>,
    }

    impl FakeProvider {
        pub fn with_series(entries: &[(&str, &[f64])]) -> Self {
            Self {
                tickers: entries.iter().map(|(t, _)| t.to_string()).collect(),
                series: entries
                    .iter()
                    .map(|(t, prices)| (t.to_string(), prices.to_vec()))
                    .collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl PriceProvider for FakeProvider {
        async fn list_stocks(&self) -> Result<Vec<StockListing>, ApiError> {
            if self.fail_listing {
                return Err(ApiError::ServerError(500, "boom".to_string()));
            }
            Ok(self.tickers.iter().map(|t| StockListing::new(t.clone(), None)).collect())
        }

        async fn get_stock_prices(&self, ticker: &str, minutes: u32) -> Result<PriceSeries, ApiError> {
            self.requests.lock().unwrap().push((ticker.to_string(), minutes));
            if let Some(ms) = self.delays.get(ticker) {
                tokio::time::sleep(std::time::Duration::from_millis(*ms)).await;
            }
            let prices = self
                .series
                .get(ticker)
                .ok_or_else(|| ApiError::NotFound(ticker.to_string()))?;
            let start = Utc.with_ymd_and_hms(2025, 5, 8, 4, 0, 0).unwrap();
            Ok(prices
                .iter()
                .enumerate()
                .map(|(i, p)| PriceSample::new(*p, start + Duration::seconds(60 * i as i64)))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_fetch_all_stocks_degrades_to_empty() {
        let provider = FakeProvider {
            fail_listing: true,
            ..Default::default()
        };
        assert!(fetch_all_stocks(&provider).await.is_empty());
    }

    #[tokio::test]
    async fn test_stock_page_average() {
        let provider = FakeProvider::with_series(&[("AAPL", &[100.0, 102.0, 104.0])]);
        let page = get_stock_page(&provider, " aapl ", Interval::Minutes30).await.unwrap();

        assert_eq!(page.ticker, "AAPL");
        assert_eq!(page.samples.len(), 3);
        assert!((page.average.unwrap() - 102.0).abs() < 1e-12);
        assert_eq!(provider.requests.lock().unwrap()[0], ("AAPL".to_string(), 30));
    }

    #[tokio::test]
    async fn test_stock_page_without_data() {
        let provider = FakeProvider::default();
        let page = get_stock_page(&provider, "MSFT", Interval::Minutes5).await.unwrap();
        assert!(page.samples.is_empty());
        assert_eq!(page.average, None);
    }

    #[tokio::test]
    async fn test_stock_page_rejects_empty_ticker() {
        let provider = FakeProvider::default();
        assert!(get_stock_page(&provider, "  ", Interval::Minutes5).await.is_err());
    }
}
