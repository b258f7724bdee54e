use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod state;
mod stats;
mod utils;

use api::stocks::StockApiClient;
use api::PriceProvider;
use commands::Dispatch;
use config::AppConfig;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Logs go to stderr; stdout is the dashboard
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stock_pulse=info,reqwest=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("📊 Starting stock-pulse v{}", env!("CARGO_PKG_VERSION"));

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let client = match StockApiClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create stock API client: {}", e);
            return;
        }
    };
    info!("Using stock API at {}", client.base_url());

    let provider: Arc<dyn PriceProvider> = Arc::new(client);
    let app = Arc::new(AppState::new(config, provider));

    // Initial listing, mirroring a page mount
    let listings = commands::tickers::load(&app).await;
    if listings.is_empty() {
        warn!("No tickers available from the stock API");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        run_once(&app, &args.join(" ")).await;
        return;
    }

    run_interactive(&app).await;
}

/// Run a single command given on the command line and wait for its output
async fn run_once(app: &Arc<AppState>, line: &str) {
    if let Dispatch::Pending(handle) = commands::handle_line(app, line).await {
        if let Err(e) = handle.await {
            error!("Command task failed: {}", e);
        }
    }
}

async fn run_interactive(app: &Arc<AppState>) {
    println!("{}", commands::help::render());
    println!();

    // Render the default page once, as the dashboard would on load
    commands::handle_line(app, "stock").await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        if let Dispatch::Quit = commands::handle_line(app, &line).await {
            break;
        }
    }

    info!("👋 Bye");
}
