use super::ApiResponse;
use crate::sources::binance::SYMBOL_PAIRS;
use crate::types::{AiPreferences, Timeframe, ADDITIONAL_TIMEFRAMES, INDICATOR_SELECTIONS, PRIMARY_TIMEFRAMES};
use crate::AppState;
use axum::{routing::get, Json, Router};
use serde::Serialize;

/// A selectable value with its display label.
#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Initial dashboard settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDefaults {
    pub symbol: &'static str,
    pub primary_timeframe: Timeframe,
    pub indicator: &'static str,
    pub include_fundamentals: bool,
    pub additional_timeframes: Vec<Timeframe>,
    pub preferences: AiPreferences,
}

impl Default for ChartDefaults {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT",
            primary_timeframe: Timeframe::FourHours,
            indicator: "all",
            include_fundamentals: true,
            additional_timeframes: vec![Timeframe::OneDay, Timeframe::OneHour],
            preferences: AiPreferences::default(),
        }
    }
}

/// Everything the dashboard needs to populate its selectors.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOptions {
    pub symbols: Vec<SelectOption>,
    pub primary_timeframes: Vec<SelectOption>,
    pub additional_timeframes: Vec<SelectOption>,
    pub indicators: Vec<SelectOption>,
    pub defaults: ChartDefaults,
}

fn timeframe_options(timeframes: &[(Timeframe, &str)]) -> Vec<SelectOption> {
    timeframes
        .iter()
        .map(|(tf, label)| SelectOption::new(tf.label(), *label))
        .collect()
}

pub fn market_options() -> MarketOptions {
    MarketOptions {
        symbols: SYMBOL_PAIRS.iter().map(|(v, l)| SelectOption::new(*v, *l)).collect(),
        primary_timeframes: timeframe_options(PRIMARY_TIMEFRAMES),
        additional_timeframes: timeframe_options(ADDITIONAL_TIMEFRAMES),
        indicators: INDICATOR_SELECTIONS.iter().map(|(v, l)| SelectOption::new(*v, *l)).collect(),
        defaults: ChartDefaults::default(),
    }
}

/// GET /api/market/options
async fn get_options() -> Json<ApiResponse<MarketOptions>> {
    Json(ApiResponse::new(market_options()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/options", get(get_options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{get, send, state};
    use axum::http::StatusCode;

    #[test]
    fn test_market_options_contents() {
        let options = market_options();
        assert_eq!(options.symbols.len(), SYMBOL_PAIRS.len());
        assert_eq!(options.symbols[0].value, "BTCUSDT");
        assert!(options.primary_timeframes.iter().any(|o| o.value == "4h"));
        assert!(options.indicators.iter().any(|o| o.value == "bb"));
    }

    #[test]
    fn test_defaults_serialization() {
        let json = serde_json::to_value(ChartDefaults::default()).unwrap();
        assert_eq!(json["symbol"], "BTCUSDT");
        assert_eq!(json["primaryTimeframe"], "4h");
        assert_eq!(json["additionalTimeframes"], serde_json::json!(["1d", "1h"]));
        assert_eq!(json["preferences"]["riskProfile"], "moderate");
    }

    #[tokio::test]
    async fn test_options_route() {
        let (status, body) = send(state(), get("/api/market/options")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["cached"], false);
        assert_eq!(body["data"]["defaults"]["indicator"], "all");
    }
}
