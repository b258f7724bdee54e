pub mod stocks;

use async_trait::async_trait;

use crate::models::{PriceSeries, StockListing};
pub use stocks::ApiError;

/// Source of ticker listings and trailing price windows
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// All tickers the upstream knows about
    async fn list_stocks(&self) -> Result<Vec<StockListing>, ApiError>;

    /// Samples for `ticker` over the last `minutes` minutes, in upstream order
    async fn get_stock_prices(&self, ticker: &str, minutes: u32) -> Result<PriceSeries, ApiError>;
}
