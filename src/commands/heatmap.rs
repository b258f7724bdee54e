use std::sync::Arc;

use crate::models::{CorrelationResult, CorrelationStrength, Interval};
use crate::services::stock_service;
use crate::state::{AppState, Page};
use crate::utils::{format_coefficient, paint_badge};

use super::Dispatch;

/// `heatmap [TICKER_A] [TICKER_B] [MINUTES]`: switch to the correlation page
pub async fn execute(app: &Arc<AppState>, args: &[&str]) -> Result<Dispatch, String> {
    tracing::info!("🔥 Heatmap command called with args: {:?}", args);

    let ticker_a = args.first().map(|t| stock_service::parse_ticker(t)).transpose()?;
    let ticker_b = args.get(1).map(|t| stock_service::parse_ticker(t)).transpose()?;
    let interval = args.get(2).map(|i| i.parse::<Interval>()).transpose()?;
    for ticker in [&ticker_a, &ticker_b].into_iter().flatten() {
        super::warn_if_unlisted(app, ticker).await;
    }

    app.dashboard
        .update_selection(|s| {
            s.page = Page::Heatmap;
            if let Some(ticker) = ticker_a {
                s.ticker_a = Some(ticker);
            }
            if let Some(ticker) = ticker_b {
                s.ticker_b = Some(ticker);
            }
            if let Some(interval) = interval {
                s.interval = interval;
            }
        })
        .await;

    Ok(Dispatch::Pending(super::refresh(app).await))
}

/// Coefficient badge followed by the legend
pub fn render(result: &CorrelationResult, color: bool) -> String {
    let mut output = format!(
        "Correlation between {} and {} (Last {} Minutes)\n",
        result.ticker_a,
        result.ticker_b,
        result.interval.minutes()
    );

    let badge_text = match result.coefficient {
        Some(_) => format!("{}  {}", format_coefficient(result.coefficient), result.strength.label()),
        None => result.strength.label().to_string(),
    };
    output.push_str(&paint_badge(&badge_text, result.strength.rgb(), color));
    output.push('\n');

    match result.coefficient {
        Some(_) => output.push_str(&format!("Based on {} paired samples\n", result.samples_used)),
        None => output.push_str("Not enough varying price data in both series to correlate.\n"),
    }

    output.push('\n');
    output.push_str(&render_legend(color));
    output
}

pub fn render_legend(color: bool) -> String {
    let mut output = String::from("Correlation Strength Legend:");
    for (strength, range) in CorrelationStrength::LEGEND {
        output.push_str("\n  ");
        output.push_str(&paint_badge(
            &format!("{} ({})", strength.label(), range),
            strength.rgb(),
            color,
        ));
        if !color {
            output.push(' ');
            output.push_str(strength.color());
        }
    }
    output
}
