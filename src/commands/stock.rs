use std::sync::Arc;

use crate::models::{Interval, StockPageResult};
use crate::services::stock_service;
use crate::state::{AppState, Page};
use crate::utils::{format_average, format_price, format_timestamp, Align, Table};

use super::Dispatch;

/// `stock [TICKER] [MINUTES]`: switch to the single-ticker page
pub async fn execute(app: &Arc<AppState>, args: &[&str]) -> Result<Dispatch, String> {
    tracing::info!("📈 Stock command called with args: {:?}", args);

    let ticker = args.first().map(|t| stock_service::parse_ticker(t)).transpose()?;
    let interval = args.get(1).map(|i| i.parse::<Interval>()).transpose()?;
    if let Some(ticker) = &ticker {
        super::warn_if_unlisted(app, ticker).await;
    }

    let selection = app
        .dashboard
        .update_selection(|s| {
            s.page = Page::Stock;
            if let Some(ticker) = ticker {
                s.ticker = Some(ticker);
            }
            if let Some(interval) = interval {
                s.interval = interval;
            }
        })
        .await;

    if selection.ticker.is_none() {
        return Err("No ticker selected. Use `stock <TICKER>` or `tickers` to see what is available.".to_string());
    }

    Ok(Dispatch::Pending(super::refresh(app).await))
}

/// Price table with the average on top
pub fn render(page: &StockPageResult) -> String {
    if page.samples.is_empty() {
        return "No data available for the selected stock and interval.".to_string();
    }

    let mut table = Table::new(vec!["Price", "Last Updated At"]).align(0, Align::Right);
    for sample in &page.samples {
        table.add_row(vec![format_price(sample.price), format_timestamp(&sample.observed_at)]);
    }

    let mut output = format!(
        "{} Price Data (Last {} Minutes)\n",
        page.ticker,
        page.interval.minutes()
    );
    if let Some(average) = page.average {
        output.push_str(&format!("Average Price: {}\n", format_average(average)));
    }
    output.push('\n');
    output.push_str(&table.render());
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceSample;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_page() {
        let at = Utc.with_ymd_and_hms(2025, 5, 8, 4, 11, 42).unwrap();
        let page = StockPageResult {
            ticker: "NVDA".to_string(),
            interval: Interval::Minutes15,
            samples: vec![PriceSample::new(100.0, at), PriceSample::new(104.5, at)],
            average: Some(102.25),
        };

        let rendered = render(&page);
        assert!(rendered.starts_with("NVDA Price Data (Last 15 Minutes)\nAverage Price: $102.25\n"));
        assert!(rendered.contains("$100.00000"));
        assert!(rendered.contains("$104.50000"));
    }

    #[test]
    fn test_render_empty_page() {
        let page = StockPageResult {
            ticker: "NVDA".to_string(),
            interval: Interval::Minutes5,
            samples: Vec::new(),
            average: None,
        };
        assert_eq!(render(&page), "No data available for the selected stock and interval.");
    }
}
