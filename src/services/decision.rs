//! Decision-step and context collaborators.
//!
//! The model call and the context lookups live behind HTTP endpoints; this
//! module only posts payloads and provides fallbacks when lookups degrade.

use crate::error::{AppError, Result};
use crate::services::payload::DecisionPayload;
use crate::types::{EconomicEvents, FundamentalAnalysis, TradeSignalOutput};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc, Weekday};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Produces a trade signal from an assembled payload.
#[async_trait]
pub trait DecisionEngine: Send + Sync {
    async fn generate_signal(&self, payload: &DecisionPayload) -> Result<TradeSignalOutput>;
}

/// Fundamental and macro context for a symbol.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    async fn fundamental_analysis(&self, symbol: &str) -> Result<FundamentalAnalysis>;
    async fn economic_events(&self, symbol: &str) -> Result<EconomicEvents>;
}

fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .user_agent("Alchemist/1.0")
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let snippet: String = text.chars().take(200).collect();
        return Err(AppError::UpstreamUnavailable(format!("{} returned {}: {}", what, status, snippet)));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| AppError::UpstreamUnavailable(format!("Failed to parse {} response: {}", what, e)))
}

/// Posts the payload JSON to a remote decision endpoint.
pub struct HttpDecisionEngine {
    client: Client,
    url: Option<String>,
    api_key: Option<String>,
}

impl HttpDecisionEngine {
    pub fn new(url: Option<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            url,
            api_key,
        }
    }
}

#[async_trait]
impl DecisionEngine for HttpDecisionEngine {
    async fn generate_signal(&self, payload: &DecisionPayload) -> Result<TradeSignalOutput> {
        let Some(url) = &self.url else {
            return Err(AppError::UpstreamUnavailable(
                "UNAVAILABLE: no decision endpoint configured".to_string(),
            ));
        };

        debug!(
            "Requesting trade signal ({} additional charts)",
            payload.additional_chart_count()
        );

        let mut request = self.client.post(url).json(payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("UNAVAILABLE: {}", e)))?;

        read_json(response, "Decision endpoint").await
    }
}

/// Context lookups against remote endpoints, queried with `?symbol=`.
pub struct HttpContextProvider {
    client: Client,
    fundamentals_url: Option<String>,
    events_url: Option<String>,
}

impl HttpContextProvider {
    pub fn new(fundamentals_url: Option<String>, events_url: Option<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            fundamentals_url,
            events_url,
        }
    }

    async fn lookup<T: DeserializeOwned>(&self, url: Option<&String>, symbol: &str, what: &str) -> Result<T> {
        let url = url.ok_or_else(|| AppError::UpstreamUnavailable(format!("{} endpoint not configured", what)))?;
        let response = self
            .client
            .get(url)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("{} request failed: {}", what, e)))?;
        read_json(response, what).await
    }
}

#[async_trait]
impl ContextProvider for HttpContextProvider {
    async fn fundamental_analysis(&self, symbol: &str) -> Result<FundamentalAnalysis> {
        self.lookup(self.fundamentals_url.as_ref(), symbol, "Fundamentals").await
    }

    async fn economic_events(&self, symbol: &str) -> Result<EconomicEvents> {
        self.lookup(self.events_url.as_ref(), symbol, "Economic events").await
    }
}

/// Fewer than two fields carry lookup error markers.
pub fn is_valid_fundamental_analysis(analysis: &FundamentalAnalysis) -> bool {
    let markers = [
        analysis.regulatory_news.contains("Error retrieving"),
        analysis.institutional_adoption.contains("Error retrieving"),
        analysis.market_sentiment.contains("Unknown"),
        analysis.overall_summary.contains("Unable to retrieve"),
    ];
    markers.iter().filter(|&&m| m).count() < 2
}

const LAYER_ONE_TOKENS: [&str; 5] = ["BNB", "SOL", "ADA", "AVAX", "MATIC"];

/// Canned context keyed on the symbol family.
pub fn fallback_fundamental_analysis(symbol: &str) -> FundamentalAnalysis {
    let (regulatory, institutional, sentiment, summary) = if symbol.contains("BTC") {
        (
            "Bitcoin regulatory landscape continues to evolve with increased institutional acceptance",
            "Strong institutional adoption continues with major corporations and ETFs",
            "Generally bullish on long-term institutional adoption",
            "Bitcoin maintains strong fundamental support from institutional adoption trends",
        )
    } else if symbol.contains("ETH") {
        (
            "Ethereum benefits from regulatory clarity around utility tokens and DeFi ecosystem",
            "Growing institutional interest in Ethereum ecosystem and staking opportunities",
            "Positive on technology fundamentals and ecosystem growth",
            "Ethereum fundamentals supported by strong ecosystem development and institutional interest",
        )
    } else if LAYER_ONE_TOKENS.iter().any(|token| symbol.contains(token)) {
        (
            "Alternative layer-1 tokens face varied regulatory environments across jurisdictions",
            "Selective institutional interest based on technology adoption and ecosystem growth",
            "Mixed to positive based on individual project fundamentals",
            "Fundamental outlook varies by individual project adoption and ecosystem development",
        )
    } else {
        (
            "Monitor ongoing regulatory developments in major markets",
            "Continue tracking institutional adoption trends",
            "Mixed",
            "Fundamental outlook remains dependent on broader market conditions",
        )
    };

    FundamentalAnalysis {
        regulatory_news: regulatory.to_string(),
        institutional_adoption: institutional.to_string(),
        market_sentiment: sentiment.to_string(),
        overall_summary: summary.to_string(),
    }
}

pub fn is_valid_economic_events(events: &EconomicEvents) -> bool {
    !events.event_summary.trim().is_empty()
        && !events.event_summary.contains("Error retrieving")
        && !events.event_summary.contains("Could not retrieve")
}

/// Calendar-based event context for the 48 hours after `now`.
pub fn fallback_economic_events(symbol: &str, now: DateTime<Utc>) -> EconomicEvents {
    let mut events = Vec::new();

    match now.weekday() {
        Weekday::Mon => events.push("Market open after weekend - potential gap movements"),
        Weekday::Fri => events.push("End of trading week - potential position closures and lower volume"),
        _ => {}
    }
    if now.day() <= 7 {
        events.push("First week of month - typically higher institutional activity");
    }
    if symbol.contains("BTC") || symbol.contains("ETH") {
        events.push("Monitor for major cryptocurrency news and regulatory updates");
    }
    events.push("Check for major central bank announcements and economic data releases");
    events.push("Be aware of potential market volatility during session overlaps");

    EconomicEvents {
        event_summary: format!("Economic considerations for the next 48 hours: {}.", events.join(". ")),
    }
}

/// Fundamentals, falling back to canned context on failure or error-laden output.
pub async fn fundamentals_or_fallback(provider: &dyn ContextProvider, symbol: &str) -> FundamentalAnalysis {
    match provider.fundamental_analysis(symbol).await {
        Ok(analysis) if is_valid_fundamental_analysis(&analysis) => analysis,
        Ok(_) => {
            warn!("Fundamental analysis for {} looks degraded, using fallback", symbol);
            fallback_fundamental_analysis(symbol)
        }
        Err(e) => {
            warn!("Failed to get fundamental analysis for {}: {}", symbol, e);
            fallback_fundamental_analysis(symbol)
        }
    }
}

/// Economic events, falling back to the calendar summary.
pub async fn economic_events_or_fallback(provider: &dyn ContextProvider, symbol: &str) -> EconomicEvents {
    match provider.economic_events(symbol).await {
        Ok(events) if is_valid_economic_events(&events) => events,
        Ok(_) => {
            warn!("Economic events for {} look degraded, using fallback", symbol);
            fallback_economic_events(symbol, Utc::now())
        }
        Err(e) => {
            warn!("Failed to get economic events for {}: {}", symbol, e);
            fallback_economic_events(symbol, Utc::now())
        }
    }
}

/// Message shown to the user when the decision step fails.
pub fn user_facing_error(message: &str) -> String {
    let detail = if message.contains("UNAVAILABLE") {
        "The AI model is currently unavailable. Please try again later."
    } else if message.contains("INVALID_ARGUMENT") {
        "There was an issue with the data sent for analysis. Please refresh and try again."
    } else {
        message
    };
    format!("Failed to get analysis: {}", detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn analysis(regulatory: &str, institutional: &str, sentiment: &str, summary: &str) -> FundamentalAnalysis {
        FundamentalAnalysis {
            regulatory_news: regulatory.into(),
            institutional_adoption: institutional.into(),
            market_sentiment: sentiment.into(),
            overall_summary: summary.into(),
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl ContextProvider for FailingProvider {
        async fn fundamental_analysis(&self, _symbol: &str) -> Result<FundamentalAnalysis> {
            Err(AppError::UpstreamUnavailable("down".into()))
        }

        async fn economic_events(&self, _symbol: &str) -> Result<EconomicEvents> {
            Ok(EconomicEvents {
                event_summary: "Could not retrieve calendar".into(),
            })
        }
    }

    #[test]
    fn test_valid_with_single_marker() {
        let a = analysis("Error retrieving news", "Banks buying", "Bullish", "Fine");
        assert!(is_valid_fundamental_analysis(&a));
    }

    #[test]
    fn test_invalid_with_two_markers() {
        let a = analysis("Error retrieving news", "Banks buying", "Unknown", "Fine");
        assert!(!is_valid_fundamental_analysis(&a));
    }

    #[test]
    fn test_fallback_families() {
        assert!(fallback_fundamental_analysis("BTCUSDT").overall_summary.starts_with("Bitcoin"));
        assert!(fallback_fundamental_analysis("ETHUSDT").overall_summary.starts_with("Ethereum"));
        assert_eq!(fallback_fundamental_analysis("SOLUSDT").market_sentiment, "Mixed to positive based on individual project fundamentals");
        assert_eq!(fallback_fundamental_analysis("DOGEUSDT").market_sentiment, "Mixed");
    }

    #[test]
    fn test_fallback_economic_events_friday_first_week() {
        // 2024-03-01 was a Friday.
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let events = fallback_economic_events("BTCUSDT", now);
        assert_eq!(
            events.event_summary,
            "Economic considerations for the next 48 hours: \
             End of trading week - potential position closures and lower volume. \
             First week of month - typically higher institutional activity. \
             Monitor for major cryptocurrency news and regulatory updates. \
             Check for major central bank announcements and economic data releases. \
             Be aware of potential market volatility during session overlaps."
        );
    }

    #[test]
    fn test_fallback_economic_events_midweek() {
        // 2024-03-13 was a Wednesday.
        let now = Utc.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap();
        let events = fallback_economic_events("SOLUSDT", now);
        assert!(!events.event_summary.contains("weekend"));
        assert!(!events.event_summary.contains("cryptocurrency news"));
        assert!(events.event_summary.contains("central bank"));
    }

    #[tokio::test]
    async fn test_context_fallbacks() {
        let fundamentals = fundamentals_or_fallback(&FailingProvider, "ETHUSDT").await;
        assert_eq!(fundamentals, fallback_fundamental_analysis("ETHUSDT"));

        let events = economic_events_or_fallback(&FailingProvider, "ETHUSDT").await;
        assert!(events.event_summary.starts_with("Economic considerations"));
    }

    #[tokio::test]
    async fn test_unconfigured_decision_engine_is_unavailable() {
        let engine = HttpDecisionEngine::new(None, None, Duration::from_secs(1));
        let payload = DecisionPayload::assemble(&[], &Default::default(), "uri").unwrap();
        let err = engine.generate_signal(&payload).await.unwrap_err();
        assert_eq!(
            user_facing_error(&err.to_string()),
            "Failed to get analysis: The AI model is currently unavailable. Please try again later."
        );
    }

    #[test]
    fn test_user_facing_error_mapping() {
        assert_eq!(
            user_facing_error("14 UNAVAILABLE: overloaded"),
            "Failed to get analysis: The AI model is currently unavailable. Please try again later."
        );
        assert_eq!(
            user_facing_error("3 INVALID_ARGUMENT: bad image"),
            "Failed to get analysis: There was an issue with the data sent for analysis. Please refresh and try again."
        );
        assert_eq!(user_facing_error("timeout"), "Failed to get analysis: timeout");
    }
}
