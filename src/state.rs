//! Dashboard state shared between the input loop and in-flight fetches
//!
//! Every fetch is stamped with a [`RequestToken`]. Issuing a new token
//! supersedes all earlier ones, and only the holder of the current token may
//! commit a view. A slow response to an old selection can therefore never
//! overwrite the view of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::api::PriceProvider;
use crate::config::AppConfig;
use crate::models::{CorrelationResult, Interval, StockListing, StockPageResult};

/// Which page the dashboard is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Stock,
    Heatmap,
}

/// Current user selection; every change re-renders the page
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub page: Page,
    pub ticker: Option<String>,
    pub ticker_a: Option<String>,
    pub ticker_b: Option<String>,
    pub interval: Interval,
}

/// What was last rendered
#[derive(Debug, Clone)]
pub enum View {
    Stock(StockPageResult),
    Correlation(CorrelationResult),
    Notice(String),
}

/// Generation stamp of one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

pub struct Dashboard {
    generation: AtomicU64,
    selection: Mutex<Selection>,
    tickers: Mutex<Vec<StockListing>>,
    view: Mutex<Option<View>>,
}

impl Dashboard {
    pub fn new(default_interval: Interval) -> Self {
        Self {
            generation: AtomicU64::new(0),
            selection: Mutex::new(Selection {
                interval: default_interval,
                ..Default::default()
            }),
            tickers: Mutex::new(Vec::new()),
            view: Mutex::new(None),
        }
    }

    /// Start a new fetch, superseding every earlier token
    pub fn begin_request(&self) -> RequestToken {
        RequestToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.0
    }

    /// Store `view` if `token` is still current. Returns whether it was stored.
    pub async fn commit(&self, token: RequestToken, view: View) -> bool {
        let mut current = self.view.lock().await;
        if !self.is_current(token) {
            debug!(
                "Dropping stale response (request {}, latest {})",
                token.0,
                self.generation.load(Ordering::SeqCst)
            );
            return false;
        }
        *current = Some(view);
        true
    }

    pub async fn view(&self) -> Option<View> {
        self.view.lock().await.clone()
    }

    pub async fn selection(&self) -> Selection {
        self.selection.lock().await.clone()
    }

    /// Apply `update` to the selection and return the result
    pub async fn update_selection<F>(&self, update: F) -> Selection
    where
        F: FnOnce(&mut Selection),
    {
        let mut selection = self.selection.lock().await;
        update(&mut selection);
        selection.clone()
    }

    pub async fn tickers(&self) -> Vec<StockListing> {
        self.tickers.lock().await.clone()
    }

    /// Replace the ticker listing and fill in default selections:
    /// the first ticker for the stock page, the first two for the heatmap.
    pub async fn set_tickers(&self, listings: Vec<StockListing>) {
        {
            let mut selection = self.selection.lock().await;
            let mut symbols = listings.iter().map(|l| l.ticker.clone());
            let first = symbols.next();
            let second = symbols.next();

            if selection.ticker.is_none() {
                selection.ticker = first.clone();
            }
            if selection.ticker_a.is_none() && selection.ticker_b.is_none() {
                selection.ticker_a = first;
                selection.ticker_b = second;
            }
        }
        *self.tickers.lock().await = listings;
    }
}

/// Everything a command needs: configuration, data source and dashboard
pub struct AppState {
    pub config: AppConfig,
    pub provider: Arc<dyn PriceProvider>,
    pub dashboard: Dashboard,
}

impl AppState {
    pub fn new(config: AppConfig, provider: Arc<dyn PriceProvider>) -> Self {
        let dashboard = Dashboard::new(config.default_interval);
        Self {
            config,
            provider,
            dashboard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stale_token_cannot_commit() {
        let dashboard = Dashboard::new(Interval::Minutes5);
        let first = dashboard.begin_request();
        let second = dashboard.begin_request();

        assert!(dashboard.commit(second, View::Notice("new".to_string())).await);
        assert!(!dashboard.commit(first, View::Notice("old".to_string())).await);

        match dashboard.view().await {
            Some(View::Notice(text)) => assert_eq!(text, "new"),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_superseded_before_response_arrives() {
        let dashboard = Dashboard::new(Interval::Minutes5);
        let token = dashboard.begin_request();
        assert!(dashboard.is_current(token));

        dashboard.begin_request();
        assert!(!dashboard.is_current(token));
        assert!(!dashboard.commit(token, View::Notice("late".to_string())).await);
        assert!(dashboard.view().await.is_none());
    }

    #[tokio::test]
    async fn test_set_tickers_fills_default_selection() {
        let dashboard = Dashboard::new(Interval::Minutes15);
        dashboard
            .set_tickers(vec![
                StockListing::new("AAPL", None),
                StockListing::new("GOOG", None),
                StockListing::new("MSFT", None),
            ])
            .await;

        let selection = dashboard.selection().await;
        assert_eq!(selection.ticker.as_deref(), Some("AAPL"));
        assert_eq!(selection.ticker_a.as_deref(), Some("AAPL"));
        assert_eq!(selection.ticker_b.as_deref(), Some("GOOG"));
        assert_eq!(selection.interval, Interval::Minutes15);
        assert_eq!(dashboard.tickers().await.len(), 3);
    }

    #[tokio::test]
    async fn test_set_tickers_keeps_explicit_selection() {
        let dashboard = Dashboard::new(Interval::Minutes5);
        dashboard
            .update_selection(|s| s.ticker = Some("NVDA".to_string()))
            .await;
        dashboard.set_tickers(vec![StockListing::new("AAPL", None)]).await;

        let selection = dashboard.selection().await;
        assert_eq!(selection.ticker.as_deref(), Some("NVDA"));
        assert_eq!(selection.ticker_a.as_deref(), Some("AAPL"));
        assert_eq!(selection.ticker_b, None);
    }
}
