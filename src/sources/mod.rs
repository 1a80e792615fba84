pub mod binance;

pub use binance::BinanceClient;

use crate::error::Result;
use crate::types::{RawKline, Timeframe};
use async_trait::async_trait;

/// Provider of raw klines records, oldest first.
#[async_trait]
pub trait KlineSource: Send + Sync {
    async fn fetch_klines(&self, symbol: &str, timeframe: Timeframe, limit: u32) -> Result<Vec<RawKline>>;
}
