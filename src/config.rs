use crate::sources::binance::BINANCE_API_URL;
use std::env;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Klines REST base URL.
    pub binance_api_url: String,
    /// Candles fetched per timeframe.
    pub kline_limit: u32,
    /// Decision endpoint receiving the assembled payload.
    pub decision_url: Option<String>,
    pub decision_api_key: Option<String>,
    pub fundamentals_url: Option<String>,
    pub economic_events_url: Option<String>,
    /// Upper bound on additional timeframes processed at once.
    pub max_concurrent_timeframes: usize,
    pub chart_width: u32,
    pub chart_height: u32,
    pub http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unparseable values
    /// fall back to defaults, empty strings count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(3001),
            binance_api_url: var("BINANCE_API_URL").unwrap_or_else(|| BINANCE_API_URL.to_string()),
            kline_limit: var("KLINE_LIMIT")
                .and_then(|v| v.parse().ok())
                .filter(|&limit| limit > 0)
                .unwrap_or(300),
            decision_url: var("DECISION_URL"),
            decision_api_key: var("DECISION_API_KEY"),
            fundamentals_url: var("FUNDAMENTALS_URL"),
            economic_events_url: var("ECONOMIC_EVENTS_URL"),
            max_concurrent_timeframes: var("MAX_CONCURRENT_TIMEFRAMES")
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(4),
            chart_width: var("CHART_WIDTH").and_then(|v| v.parse().ok()).unwrap_or(1200),
            chart_height: var("CHART_HEIGHT").and_then(|v| v.parse().ok()).unwrap_or(600),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
