use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use super::models::{ApiError, PricesResponse, StocksResponse};
use crate::api::PriceProvider;
use crate::config::AppConfig;
use crate::models::{PriceSeries, StockListing};

/// HTTP client for the stock price service
pub struct StockApiClient {
    http_client: HttpClient,
    base_url: String,
    api_token: Option<String>,
}

impl StockApiClient {
    /// Create a client from the runtime configuration
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    /// Create a client against an arbitrary base URL with no token (for testing)
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn create_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.api_token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidConfig(format!("Failed to create auth header: {}", e)))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    /// Map a non-2xx response onto an `ApiError`
    async fn handle_error_response(status: reqwest::StatusCode, response: reqwest::Response) -> ApiError {
        let status_code = status.as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(|secs| secs * 1000);
        let body_text = response.text().await.unwrap_or_default();

        match status_code {
            400 => ApiError::BadRequest(extract_message(&body_text)),
            401 | 403 => ApiError::Unauthorized(extract_message(&body_text)),
            404 => ApiError::NotFound(extract_message(&body_text)),
            429 => {
                let retry_after = retry_after.unwrap_or(1000);
                warn!("Rate limited by stock API, retry after {} ms", retry_after);
                ApiError::RateLimited { retry_after }
            }
            500..=599 => {
                warn!("Stock API server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code, body_text)
            }
            _ => ApiError::HttpError(status_code, body_text),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let headers = self.create_headers()?;

        debug!("GET {}", url);
        let response = self
            .http_client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }

    /// GET /stocks
    ///
    /// Returns every listed ticker, sorted by symbol.
    pub async fn list_stocks(&self) -> Result<Vec<StockListing>, ApiError> {
        let url = format!("{}/stocks", self.base_url);
        let response: StocksResponse = self.get_json(&url).await?;
        Ok(response.stocks.into_listings())
    }

    /// GET /stocks/{ticker}?minutes={minutes}
    ///
    /// Samples are returned exactly in the order the service sent them.
    pub async fn get_stock_prices(&self, ticker: &str, minutes: u32) -> Result<PriceSeries, ApiError> {
        let url = format!(
            "{}/stocks/{}?minutes={}",
            self.base_url,
            urlencoding::encode(ticker),
            minutes
        );
        let response: PricesResponse = self.get_json(&url).await?;
        Ok(response.into_series())
    }
}

/// Pull `message` out of a JSON error body, falling back to the raw text
fn extract_message(body_text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body_text)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body_text.to_string())
}

#[async_trait]
impl PriceProvider for StockApiClient {
    async fn list_stocks(&self) -> Result<Vec<StockListing>, ApiError> {
        StockApiClient::list_stocks(self).await
    }

    async fn get_stock_prices(&self, ticker: &str, minutes: u32) -> Result<PriceSeries, ApiError> {
        StockApiClient::get_stock_prices(self, ticker, minutes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned response per connection and record each request line
    async fn serve(status: &'static str, body: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let mut read = 0;
                loop {
                    let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    read += n;
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buf.len() {
                        break;
                    }
                }
                let request = String::from_utf8_lossy(&buf[..read]).to_string();
                if let Some(line) = request.lines().next() {
                    seen.lock().unwrap().push(line.to_string());
                }

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), requests)
    }

    #[tokio::test]
    async fn test_list_stocks() {
        let (base, requests) = serve("200 OK", r#"{"stocks": {"Apple Inc.": "AAPL", "Alphabet Inc. Class A": "GOOGL"}}"#).await;
        let client = StockApiClient::with_base_url(format!("{}/", base));

        let listings = client.list_stocks().await.unwrap();
        let tickers: Vec<&str> = listings.iter().map(|l| l.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "GOOGL"]);
        assert_eq!(requests.lock().unwrap()[0], "GET /stocks HTTP/1.1");
    }

    #[tokio::test]
    async fn test_get_stock_prices_keeps_upstream_order() {
        let (base, requests) = serve(
            "200 OK",
            r#"[{"price": 3.0, "lastUpdatedAt": "2025-05-08T04:13:00Z"}, {"price": 1.0, "lastUpdatedAt": "2025-05-08T04:11:00Z"}]"#,
        )
        .await;
        let client = StockApiClient::with_base_url(base);

        let samples = client.get_stock_prices("NVDA", 15).await.unwrap();
        assert_eq!(samples.iter().map(|s| s.price).collect::<Vec<_>>(), vec![3.0, 1.0]);
        assert_eq!(requests.lock().unwrap()[0], "GET /stocks/NVDA?minutes=15 HTTP/1.1");
    }

    #[tokio::test]
    async fn test_ticker_is_percent_encoded() {
        let (base, requests) = serve("200 OK", "[]").await;
        let client = StockApiClient::with_base_url(base);

        let samples = client.get_stock_prices("BRK B", 5).await.unwrap();
        assert!(samples.is_empty());
        assert_eq!(requests.lock().unwrap()[0], "GET /stocks/BRK%20B?minutes=5 HTTP/1.1");
    }

    #[tokio::test]
    async fn test_status_errors_are_mapped() {
        let (base, _) = serve("404 Not Found", r#"{"message": "unknown ticker"}"#).await;
        let client = StockApiClient::with_base_url(base);
        match client.get_stock_prices("ZZZZ", 5).await {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "unknown ticker"),
            other => panic!("expected NotFound, got {:?}", other),
        }

        let (base, _) = serve("503 Service Unavailable", "down").await;
        let client = StockApiClient::with_base_url(base);
        assert!(matches!(client.list_stocks().await, Err(ApiError::ServerError(503, _))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_deserialization_error() {
        let (base, _) = serve("200 OK", r#"{"unexpected": true}"#).await;
        let client = StockApiClient::with_base_url(base);
        assert!(matches!(client.list_stocks().await, Err(ApiError::DeserializationError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = StockApiClient::with_base_url(format!("http://{}", addr));
        assert!(matches!(client.list_stocks().await, Err(ApiError::RequestError(_))));
    }
}
