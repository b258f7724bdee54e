use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use plotters::prelude::*;
use tracing::info;

use crate::api::PriceProvider;
use crate::models::{Interval, PriceSample, StockPageResult};
use crate::services::stock_service;

pub const CHART_WIDTH: u32 = 1024;
pub const CHART_HEIGHT: u32 = 768;

/// File name for a chart of `ticker` over `interval`
pub fn chart_file_name(ticker: &str, interval: Interval) -> String {
    let safe_ticker: String = ticker
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!(
        "chart_{}_{}m_{}.png",
        safe_ticker,
        interval.minutes(),
        Utc::now().timestamp_millis()
    )
}

/// Fetch a ticker's window and write it as a PNG line chart under `chart_dir`
pub async fn generate_chart(
    provider: &dyn PriceProvider,
    ticker: &str,
    interval: Interval,
    chart_dir: &Path,
) -> Result<PathBuf, String> {
    let page = stock_service::get_stock_page(provider, ticker, interval).await?;

    if page.samples.len() < 2 {
        return Err(format!(
            "Not enough price data to chart {} over {} ({} point(s) found, need at least 2)",
            page.ticker,
            interval,
            page.samples.len()
        ));
    }

    let path = chart_dir.join(chart_file_name(&page.ticker, interval));
    render_price_chart(&page, &path, CHART_WIDTH, CHART_HEIGHT)?;
    info!("Chart for {} ({}) written to {}", page.ticker, interval, path.display());

    Ok(path)
}

/// Draw the series (in time order) and its average as a PNG at `path`
pub fn render_price_chart(page: &StockPageResult, path: &Path, width: u32, height: u32) -> Result<(), String> {
    if page.samples.len() < 2 {
        return Err("Not enough price data to generate chart (minimum 2 points required).".to_string());
    }

    let mut points: Vec<&PriceSample> = page.samples.iter().collect();
    points.sort_by_key(|p| p.observed_at);

    let backend = BitMapBackend::new(path, (width, height));
    let root = backend.into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| format!("Failed to fill canvas: {}", e))?;

    let min_price = points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let max_price = points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);

    let price_range = (max_price - min_price).max(1e-8);
    let padding = price_range * 0.1;
    let y_min = (min_price - padding).max(0.0);
    let y_max = max_price + padding;

    let x_min = points[0].observed_at;
    let mut x_max = points[points.len() - 1].observed_at;
    if x_max <= x_min {
        x_max = x_min + Duration::seconds(1);
    }

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} Price (Last {} Minutes)", page.ticker, page.interval.minutes()),
            ("sans-serif", 40.0).into_font(),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| format!("Failed to build chart: {}", e))?;

    chart
        .configure_mesh()
        .y_desc("Price ($)")
        .x_desc("Time (UTC)")
        .draw()
        .map_err(|e| format!("Failed to draw mesh: {}", e))?;

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|p| (p.observed_at, p.price)),
            &BLUE,
        ))
        .map_err(|e| format!("Failed to draw price line: {}", e))?
        .label("Price")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_series(
            points
                .iter()
                .map(|p| Circle::new((p.observed_at, p.price), 3, BLUE.filled())),
        )
        .map_err(|e| format!("Failed to draw points: {}", e))?;

    if let Some(average) = page.average {
        chart
            .draw_series(LineSeries::new(vec![(x_min, average), (x_max, average)], &RED))
            .map_err(|e| format!("Failed to draw average line: {}", e))?
            .label(format!("Average ${:.2}", average))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| format!("Failed to draw legend: {}", e))?;

    root.present()
        .map_err(|e| format!("Failed to render chart: {}", e))?;

    Ok(())
}
