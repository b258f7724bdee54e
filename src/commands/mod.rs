pub mod chart;
pub mod heatmap;
pub mod help;
pub mod stock;
pub mod tickers;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::Interval;
use crate::services::{correlation_service, stock_service};
use crate::state::{AppState, Page, Selection, View};

/// What the input loop should do after a command
pub enum Dispatch {
    Done,
    /// Work continues in the background; one-shot mode waits for it
    Pending(JoinHandle<()>),
    Quit,
}

pub async fn handle_line(app: &Arc<AppState>, line: &str) -> Dispatch {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Dispatch::Done;
    }

    let command = parts[0].to_lowercase();
    let args = &parts[1..];

    let result = match command.as_str() {
        "stock" | "s" => stock::execute(app, args).await,
        "heatmap" | "corr" | "correlation" => heatmap::execute(app, args).await,
        "interval" | "i" => execute_interval(app, args).await,
        "tickers" | "list" => tickers::execute(app).await,
        "chart" => chart::execute(app, args).await,
        "help" | "?" => help::execute(),
        "quit" | "exit" | "q" => Ok(Dispatch::Quit),
        other => Err(format!("Unknown command '{}'. Type `help` for the command list.", other)),
    };

    match result {
        Ok(dispatch) => dispatch,
        Err(e) => {
            warn!("Error executing command {}: {}", command, e);
            println!("❌ {}", e);
            Dispatch::Done
        }
    }
}

/// `interval MINUTES`: change the window and re-render the current page
async fn execute_interval(app: &Arc<AppState>, args: &[&str]) -> Result<Dispatch, String> {
    let raw = args
        .first()
        .ok_or_else(|| format!("Usage: `interval <MINUTES>` ({})", Interval::choices()))?;
    let interval = raw.parse::<Interval>()?;

    app.dashboard.update_selection(|s| s.interval = interval).await;
    Ok(Dispatch::Pending(refresh(app).await))
}

/// Fetch, compute and render the current selection in the background.
///
/// The request token is taken before the task starts, so tokens follow the
/// order in which selections were made.
pub async fn refresh(app: &Arc<AppState>) -> JoinHandle<()> {
    let token = app.dashboard.begin_request();
    let selection = app.dashboard.selection().await;
    println!("⏳ Loading...");

    let app = Arc::clone(app);
    tokio::spawn(async move {
        let view = match build_view(&app, &selection).await {
            Ok(view) => view,
            Err(e) => View::Notice(format!("❌ {}", e)),
        };

        if app.dashboard.commit(token, view.clone()).await {
            println!("{}", render_view(&view, app.config.color));
        } else {
            debug!("Selection changed while loading {:?}; response discarded", selection.page);
        }
    })
}

async fn build_view(app: &AppState, selection: &Selection) -> Result<View, String> {
    let provider = app.provider.as_ref();

    match selection.page {
        Page::Stock => {
            let ticker = selection
                .ticker
                .as_deref()
                .ok_or("No ticker selected. Use `stock <TICKER>`.")?;
            let page = stock_service::get_stock_page(provider, ticker, selection.interval).await?;
            Ok(View::Stock(page))
        }
        Page::Heatmap => match (selection.ticker_a.as_deref(), selection.ticker_b.as_deref()) {
            (Some(a), Some(b)) => {
                let result =
                    correlation_service::get_correlation(provider, a, b, selection.interval, app.config.alignment)
                        .await?;
                Ok(View::Correlation(result))
            }
            _ => Ok(View::Notice(
                "Select two stocks and an interval to see their correlation.".to_string(),
            )),
        },
    }
}

/// Log when a ticker is not part of the loaded listing; the fetch still goes ahead
pub(crate) async fn warn_if_unlisted(app: &AppState, ticker: &str) {
    let listings = app.dashboard.tickers().await;
    if !listings.is_empty() && !listings.iter().any(|l| l.ticker == ticker) {
        warn!("{} is not in the ticker listing", ticker);
    }
}

pub fn render_view(view: &View, color: bool) -> String {
    match view {
        View::Stock(page) => stock::render(page),
        View::Correlation(result) => heatmap::render(result, color),
        View::Notice(text) => text.clone(),
    }
}
