use tracing::{debug, info};

use crate::api::PriceProvider;
use crate::models::{Alignment, CorrelationResult, CorrelationStrength, Interval};
use crate::services::stock_service::{fetch_stock_prices, parse_ticker};
use crate::stats;

/// Correlate two tickers over the same trailing window.
///
/// Both series are fetched one after the other, then correlated according to
/// `alignment`. Fetch failures show up as an undefined coefficient.
pub async fn get_correlation(
    provider: &dyn PriceProvider,
    ticker_a: &str,
    ticker_b: &str,
    interval: Interval,
    alignment: Alignment,
) -> Result<CorrelationResult, String> {
    let ticker_a = parse_ticker(ticker_a)?;
    let ticker_b = parse_ticker(ticker_b)?;

    if ticker_a == ticker_b {
        return Err("Please select two different stocks for correlation.".to_string());
    }

    let prices_a = fetch_stock_prices(provider, &ticker_a, interval).await;
    let prices_b = fetch_stock_prices(provider, &ticker_b, interval).await;
    debug!(
        "Fetched {} samples for {} and {} samples for {}",
        prices_a.len(),
        ticker_a,
        prices_b.len(),
        ticker_b
    );

    let (coefficient, samples_used) = match alignment {
        Alignment::ReceiptOrder => (
            stats::pearson_correlation(&prices_a, &prices_b),
            prices_a.len().min(prices_b.len()),
        ),
        Alignment::NearestTimestamp { tolerance } => {
            stats::pearson_correlation_aligned(&prices_a, &prices_b, tolerance)
        }
    };

    let strength = CorrelationStrength::classify(coefficient);
    info!(
        "Correlation {}/{} over {}: {:?} ({})",
        ticker_a,
        ticker_b,
        interval,
        coefficient,
        strength.label()
    );

    Ok(CorrelationResult {
        ticker_a,
        ticker_b,
        interval,
        coefficient,
        samples_used,
        strength,
    })
}
