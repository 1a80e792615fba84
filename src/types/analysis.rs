use super::Timeframe;
use serde::{Deserialize, Serialize};

/// Trading risk appetite passed to the decision step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

/// User preferences for the generated analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiPreferences {
    pub risk_profile: RiskProfile,
    pub detailed_analysis: bool,
}

impl Default for AiPreferences {
    fn default() -> Self {
        Self {
            risk_profile: RiskProfile::Moderate,
            detailed_analysis: true,
        }
    }
}

/// Entry, targets and stop for an advisory trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSignal {
    pub entry_price_range: String,
    pub take_profit_levels: Vec<String>,
    pub stop_loss: String,
}

/// Structured result of the decision step.
///
/// `trade_signal` is absent when no clear setup was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSignalOutput {
    pub analysis_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_signal: Option<TradeSignal>,
}

/// News and sentiment context for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalAnalysis {
    pub regulatory_news: String,
    pub institutional_adoption: String,
    pub market_sentiment: String,
    pub overall_summary: String,
}

/// Upcoming macro events for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicEvents {
    pub event_summary: String,
}

/// Analysis request sent by the dashboard.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub symbol: String,
    pub primary_timeframe: Timeframe,
    #[serde(default = "default_indicator_selection")]
    pub indicator: String,
    #[serde(default = "default_true")]
    pub include_fundamentals: bool,
    #[serde(default)]
    pub additional_timeframes: Vec<String>,
    #[serde(default)]
    pub preferences: AiPreferences,
    /// Requests sharing a session supersede each other.
    #[serde(default)]
    pub session_id: Option<String>,
}

fn default_indicator_selection() -> String {
    "all".to_string()
}

fn default_true() -> bool {
    true
}

/// A completed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub timestamp: String,
    pub analysis: TradeSignalOutput,
    pub chart_image: String,
}
