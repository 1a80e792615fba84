use serde::{Deserialize, Serialize};

/// A single indicator value aligned to a candle time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub time: i64,
    pub value: f64,
}

impl IndicatorPoint {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Display tone of a MACD histogram bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
}

impl Tone {
    /// Zero counts as positive.
    pub fn from_value(value: f64) -> Self {
        if value >= 0.0 {
            Tone::Positive
        } else {
            Tone::Negative
        }
    }
}

/// MACD histogram bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramPoint {
    pub time: i64,
    pub value: f64,
    pub tone: Tone,
}

/// The three MACD components, sharing one time window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdSeries {
    pub macd_line: Vec<IndicatorPoint>,
    pub signal_line: Vec<IndicatorPoint>,
    pub histogram: Vec<HistogramPoint>,
}

impl MacdSeries {
    pub fn len(&self) -> usize {
        self.histogram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }
}

/// Bollinger envelope at one candle time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerPoint {
    pub time: i64,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Which indicators to compute. Periods are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub sma: bool,
    pub rsi: bool,
    pub macd: bool,
    pub bollinger: bool,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self::all()
    }
}

impl IndicatorConfig {
    pub fn all() -> Self {
        Self {
            sma: true,
            rsi: true,
            macd: true,
            bollinger: true,
        }
    }

    pub fn none() -> Self {
        Self {
            sma: false,
            rsi: false,
            macd: false,
            bollinger: false,
        }
    }

    /// Parse a dashboard indicator selection: `all`, `sma`, `rsi`, `macd` or `bb`.
    pub fn from_selection(s: &str) -> Option<Self> {
        let none = Self::none();
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::all()),
            "sma" => Some(Self { sma: true, ..none }),
            "rsi" => Some(Self { rsi: true, ..none }),
            "macd" => Some(Self { macd: true, ..none }),
            "bb" | "bollinger" => Some(Self { bollinger: true, ..none }),
            _ => None,
        }
    }
}

/// Selection values accepted by [`IndicatorConfig::from_selection`].
pub const INDICATOR_SELECTIONS: &[(&str, &str)] = &[
    ("all", "All Indicators"),
    ("sma", "SMA (20)"),
    ("rsi", "RSI (14)"),
    ("macd", "MACD"),
    ("bb", "Bollinger Bands"),
];

/// Computed indicator series for one candle series. Disabled indicators are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma: Option<Vec<IndicatorPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<Vec<IndicatorPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_bands: Option<Vec<BollingerPoint>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_all() {
        assert_eq!(IndicatorConfig::from_selection("all"), Some(IndicatorConfig::all()));
    }

    #[test]
    fn test_selection_single() {
        let config = IndicatorConfig::from_selection("bb").unwrap();
        assert!(config.bollinger);
        assert!(!config.sma && !config.rsi && !config.macd);

        let config = IndicatorConfig::from_selection(" RSI ").unwrap();
        assert!(config.rsi);
        assert!(!config.bollinger);
    }

    #[test]
    fn test_selection_unknown() {
        assert_eq!(IndicatorConfig::from_selection("ichimoku"), None);
    }

    #[test]
    fn test_selections_all_parse() {
        for (value, _) in INDICATOR_SELECTIONS {
            assert!(IndicatorConfig::from_selection(value).is_some(), "{}", value);
        }
    }

    #[test]
    fn test_tone_from_value() {
        assert_eq!(Tone::from_value(0.5), Tone::Positive);
        assert_eq!(Tone::from_value(0.0), Tone::Positive);
        assert_eq!(Tone::from_value(-0.1), Tone::Negative);
    }

    #[test]
    fn test_indicator_set_skips_disabled() {
        let set = IndicatorSet {
            sma: Some(vec![IndicatorPoint::new(1, 2.0)]),
            ..Default::default()
        };
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.get("sma").is_some());
        assert!(json.get("rsi").is_none());
        assert!(json.get("bollingerBands").is_none());
    }

    #[test]
    fn test_macd_series_camel_case() {
        let json = serde_json::to_value(MacdSeries::default()).unwrap();
        assert!(json.get("macdLine").is_some());
        assert!(json.get("signalLine").is_some());
        assert!(json.get("histogram").is_some());
    }
}
