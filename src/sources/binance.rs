use super::KlineSource;
use crate::error::{AppError, Result};
use crate::types::{RawKline, Timeframe};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub const BINANCE_API_URL: &str = "https://api.binance.com/api/v3";

/// Trading pairs offered by the dashboard (pair → display label).
pub const SYMBOL_PAIRS: &[(&str, &str)] = &[
    ("BTCUSDT", "BTC/USDT"),
    ("ETHUSDT", "ETH/USDT"),
    ("SOLUSDT", "SOL/USDT"),
    ("XRPUSDT", "XRP/USDT"),
    ("DOGEUSDT", "DOGE/USDT"),
];

/// Binance klines REST client.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    /// Create a new Binance client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent("Alchemist/1.0")
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn klines_url(&self) -> String {
        format!("{}/klines", self.base_url)
    }
}

#[async_trait]
impl KlineSource for BinanceClient {
    async fn fetch_klines(&self, symbol: &str, timeframe: Timeframe, limit: u32) -> Result<Vec<RawKline>> {
        debug!("Fetching Binance klines: {} {} x{}", symbol, timeframe, limit);

        let response = self
            .client
            .get(self.klines_url())
            .query(&[
                ("symbol", symbol.to_uppercase()),
                ("interval", timeframe.label().to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("Binance request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(200).collect();
            warn!("Binance API returned {}: {}", status, snippet);
            return Err(AppError::UpstreamUnavailable(format!(
                "Failed to fetch data: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )));
        }

        response
            .json::<Vec<RawKline>>()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("Failed to parse Binance klines: {}", e)))
    }
}

/// Whether `symbol` is one of the dashboard's pairs.
pub fn is_supported_symbol(symbol: &str) -> bool {
    let upper = symbol.to_uppercase();
    SYMBOL_PAIRS.iter().any(|(pair, _)| *pair == upper)
}
