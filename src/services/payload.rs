//! Decision-step payload assembly.

use crate::error::Result;
use crate::types::{AiPreferences, Candle, EconomicEvents, FundamentalAnalysis, IndicatorSet, RiskProfile};
use serde::Serialize;
use std::collections::BTreeMap;

/// Key prefix for charts of additional timeframes.
pub const ADDITIONAL_CHART_PREFIX: &str = "chartDataUri_";

/// JSON object handed to the decision step.
///
/// `ohlc_data` and `indicator_data` are stringified JSON, additional chart
/// images are flattened into top-level `chartDataUri_<timeframe>` keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionPayload {
    pub ohlc_data: String,
    pub indicator_data: String,
    pub chart_data_uri: String,
    #[serde(flatten)]
    additional_charts: BTreeMap<String, String>,
    pub risk_profile: RiskProfile,
    pub detailed_analysis: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fundamental_analysis_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub economic_event_summary: Option<String>,
}

impl DecisionPayload {
    /// Assemble the payload for the primary timeframe with default preferences.
    pub fn assemble(candles: &[Candle], indicators: &IndicatorSet, chart_data_uri: impl Into<String>) -> Result<Self> {
        let preferences = AiPreferences::default();
        Ok(Self {
            ohlc_data: ohlc_json(candles)?,
            indicator_data: indicator_json(indicators)?,
            chart_data_uri: chart_data_uri.into(),
            additional_charts: BTreeMap::new(),
            risk_profile: preferences.risk_profile,
            detailed_analysis: preferences.detailed_analysis,
            fundamental_analysis_summary: None,
            economic_event_summary: None,
        })
    }

    pub fn with_preferences(mut self, preferences: AiPreferences) -> Self {
        self.risk_profile = preferences.risk_profile;
        self.detailed_analysis = preferences.detailed_analysis;
        self
    }

    /// Attach the chart of an additional timeframe under its sanitized key.
    pub fn with_additional_chart(mut self, timeframe_key: &str, data_uri: impl Into<String>) -> Self {
        self.additional_charts
            .insert(format!("{}{}", ADDITIONAL_CHART_PREFIX, timeframe_key), data_uri.into());
        self
    }

    pub fn with_context(mut self, fundamentals: Option<&FundamentalAnalysis>, events: Option<&EconomicEvents>) -> Self {
        self.fundamental_analysis_summary = fundamentals.map(|f| f.overall_summary.clone());
        self.economic_event_summary = events.map(|e| e.event_summary.clone());
        self
    }

    pub fn additional_chart(&self, timeframe_key: &str) -> Option<&str> {
        self.additional_charts
            .get(&format!("{}{}", ADDITIONAL_CHART_PREFIX, timeframe_key))
            .map(String::as_str)
    }

    pub fn additional_chart_count(&self) -> usize {
        self.additional_charts.len()
    }
}

/// Stringified array of `{time, open, high, low, close, volume}`.
pub fn ohlc_json(candles: &[Candle]) -> Result<String> {
    Ok(serde_json::to_string(candles)?)
}

/// Stringified object keyed `sma`, `rsi`, `macd`, `bollingerBands`.
pub fn indicator_json(indicators: &IndicatorSet) -> Result<String> {
    Ok(serde_json::to_string(indicators)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IndicatorConfig;

    fn candles(count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let close = 100.0 + (i % 7) as f64;
                Candle::new(1_700_000_000 + i as i64 * 3600, close - 0.5, close + 1.0, close - 1.0, close, 5.0)
            })
            .collect()
    }

    #[test]
    fn test_ohlc_json_shape() {
        let json = ohlc_json(&candles(2)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &parsed[0];
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        for key in ["time", "open", "high", "low", "close", "volume"] {
            assert!(first.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(first["time"], 1_700_000_000);
    }

    #[test]
    fn test_indicator_json_keys() {
        let series = candles(60);
        let set = IndicatorSet::compute(&series, &IndicatorConfig::all());
        let parsed: serde_json::Value = serde_json::from_str(&indicator_json(&set).unwrap()).unwrap();
        for key in ["sma", "rsi", "macd", "bollingerBands"] {
            assert!(parsed.get(key).is_some(), "missing {}", key);
        }
        assert!(parsed["macd"].get("macdLine").is_some());
        assert!(parsed["macd"].get("signalLine").is_some());
        assert!(parsed["macd"]["histogram"][0].get("tone").is_some());
    }

    #[test]
    fn test_indicator_json_omits_disabled() {
        let series = candles(60);
        let set = IndicatorSet::compute(&series, &IndicatorConfig::from_selection("sma").unwrap());
        let parsed: serde_json::Value = serde_json::from_str(&indicator_json(&set).unwrap()).unwrap();
        assert!(parsed.get("sma").is_some());
        assert!(parsed.get("rsi").is_none());
    }

    #[test]
    fn test_payload_flattens_additional_charts() {
        let series = candles(30);
        let payload = DecisionPayload::assemble(&series, &IndicatorSet::default(), "data:image/png;base64,AAA")
            .unwrap()
            .with_additional_chart("1d", "data:image/png;base64,BBB")
            .with_additional_chart("1h", "data:image/png;base64,CCC");

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["chartDataUri"], "data:image/png;base64,AAA");
        assert_eq!(value["chartDataUri_1d"], "data:image/png;base64,BBB");
        assert_eq!(value["chartDataUri_1h"], "data:image/png;base64,CCC");
        assert!(value.get("additionalCharts").is_none());
        assert_eq!(payload.additional_chart("1d"), Some("data:image/png;base64,BBB"));
        assert_eq!(payload.additional_chart_count(), 2);
    }

    #[test]
    fn test_payload_preferences_and_context() {
        let series = candles(5);
        let fundamentals = FundamentalAnalysis {
            regulatory_news: "r".into(),
            institutional_adoption: "i".into(),
            market_sentiment: "s".into(),
            overall_summary: "Outlook steady".into(),
        };
        let payload = DecisionPayload::assemble(&series, &IndicatorSet::default(), "uri")
            .unwrap()
            .with_preferences(AiPreferences {
                risk_profile: RiskProfile::Aggressive,
                detailed_analysis: false,
            })
            .with_context(Some(&fundamentals), None);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["riskProfile"], "aggressive");
        assert_eq!(value["detailedAnalysis"], false);
        assert_eq!(value["fundamentalAnalysisSummary"], "Outlook steady");
        assert!(value.get("economicEventSummary").is_none());
    }

    #[test]
    fn test_payload_defaults() {
        let payload = DecisionPayload::assemble(&[], &IndicatorSet::default(), "uri").unwrap();
        assert_eq!(payload.ohlc_data, "[]");
        assert_eq!(payload.indicator_data, "{}");
        assert_eq!(payload.risk_profile, RiskProfile::Moderate);
        assert!(payload.detailed_analysis);
    }
}
