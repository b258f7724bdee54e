use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{Alignment, Interval};

const DEFAULT_API_BASE_URL: &str = "http://20.244.56.144/evaluation-service";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TOLERANCE_SECS: i64 = 30;

/// Runtime configuration derived from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// Sent as a bearer token when set
    pub api_token: Option<String>,
    pub default_interval: Interval,
    pub alignment: Alignment,
    /// Where `chart` writes its PNG files
    pub chart_dir: PathBuf,
    pub color: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let api_base_url = get("STOCK_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(format!("STOCK_API_BASE_URL must be an http(s) URL, got '{}'", api_base_url));
        }

        let timeout_secs = match get("STOCK_API_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| format!("STOCK_API_TIMEOUT_SECS must be a whole number, got '{}'", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let default_interval = match get("DEFAULT_INTERVAL_MINUTES") {
            Some(raw) => raw
                .parse::<Interval>()
                .map_err(|e| format!("DEFAULT_INTERVAL_MINUTES: {}", e))?,
            None => Interval::default(),
        };

        let tolerance_secs = match get("ALIGNMENT_TOLERANCE_SECS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs >= 0)
                .ok_or_else(|| format!("ALIGNMENT_TOLERANCE_SECS must be a non-negative number, got '{}'", raw))?,
            None => DEFAULT_TOLERANCE_SECS,
        };

        let alignment = match get("CORRELATION_ALIGNMENT").map(|s| s.to_lowercase()).as_deref() {
            None | Some("receipt") => Alignment::ReceiptOrder,
            Some("timestamp") => Alignment::NearestTimestamp {
                tolerance: chrono::Duration::try_seconds(tolerance_secs)
                    .ok_or_else(|| format!("ALIGNMENT_TOLERANCE_SECS is out of range, got {}", tolerance_secs))?,
            },
            Some(other) => {
                return Err(format!(
                    "CORRELATION_ALIGNMENT must be 'receipt' or 'timestamp', got '{}'",
                    other
                ))
            }
        };

        let chart_dir = get("CHART_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir);

        // Any value of NO_COLOR disables color, including an empty one
        let color = lookup("NO_COLOR").is_none();

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            api_token: get("STOCK_API_TOKEN"),
            default_interval,
            alignment,
            chart_dir,
            color,
        })
    }
}
