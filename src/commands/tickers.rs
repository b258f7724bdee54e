use std::sync::Arc;

use crate::models::StockListing;
use crate::services::stock_service;
use crate::state::AppState;
use crate::utils::Table;

use super::Dispatch;

/// Fetch the listing and store it on the dashboard
pub async fn load(app: &AppState) -> Vec<StockListing> {
    let listings = stock_service::fetch_all_stocks(app.provider.as_ref()).await;
    app.dashboard.set_tickers(listings.clone()).await;
    listings
}

/// `tickers`: reload and print the available tickers
pub async fn execute(app: &Arc<AppState>) -> Result<Dispatch, String> {
    tracing::info!("📋 Tickers command called");
    let listings = load(app).await;
    println!("{}", render(&listings));
    Ok(Dispatch::Done)
}

pub fn render(listings: &[StockListing]) -> String {
    if listings.is_empty() {
        return "No tickers available.".to_string();
    }

    let mut table = Table::new(vec!["Ticker", "Name"]);
    for listing in listings {
        table.add_row(vec![listing.ticker.clone(), listing.name.clone().unwrap_or_default()]);
    }
    format!("{} tickers available\n\n{}", listings.len(), table.render())
}
