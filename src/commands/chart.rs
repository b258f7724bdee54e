use std::sync::Arc;

use crate::models::Interval;
use crate::services::{chart_service, stock_service};
use crate::state::AppState;

use super::Dispatch;

/// `chart [TICKER] [MINUTES]`: write a PNG of the series. Defaults to the
/// current stock page selection and leaves the selection untouched.
pub async fn execute(app: &Arc<AppState>, args: &[&str]) -> Result<Dispatch, String> {
    tracing::info!("🎨 Chart command called with args: {:?}", args);

    let selection = app.dashboard.selection().await;
    let ticker = match args.first() {
        Some(raw) => stock_service::parse_ticker(raw)?,
        None => selection
            .ticker
            .ok_or("No ticker selected. Use `chart <TICKER> [MINUTES]`.")?,
    };
    let interval = match args.get(1) {
        Some(raw) => raw.parse::<Interval>()?,
        None => selection.interval,
    };

    println!("⏳ Rendering chart for {} ({})...", ticker, interval);

    let app = Arc::clone(app);
    let handle = tokio::spawn(async move {
        let chart_dir = app.config.chart_dir.clone();
        match chart_service::generate_chart(app.provider.as_ref(), &ticker, interval, &chart_dir).await {
            Ok(path) => println!("🖼️  Chart written to {}", path.display()),
            Err(e) => {
                tracing::warn!("Chart generation failed for {}: {}", ticker, e);
                println!("❌ {}", e);
            }
        }
    });

    Ok(Dispatch::Pending(handle))
}
