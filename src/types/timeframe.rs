use serde::{Deserialize, Serialize};
use std::fmt;

/// Candle interval, using the klines provider's labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "3m")]
    ThreeMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "8h")]
    EightHours,
    #[serde(rename = "12h")]
    TwelveHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "3d")]
    ThreeDays,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
}

impl Timeframe {
    /// Parse a label such as `"4h"`. Whitespace anywhere in the label is ignored.
    pub fn from_str(s: &str) -> Option<Self> {
        match sanitize_label(s).as_str() {
            "1m" => Some(Timeframe::OneMinute),
            "3m" => Some(Timeframe::ThreeMinutes),
            "5m" => Some(Timeframe::FiveMinutes),
            "15m" => Some(Timeframe::FifteenMinutes),
            "30m" => Some(Timeframe::ThirtyMinutes),
            "1h" => Some(Timeframe::OneHour),
            "2h" => Some(Timeframe::TwoHours),
            "4h" => Some(Timeframe::FourHours),
            "6h" => Some(Timeframe::SixHours),
            "8h" => Some(Timeframe::EightHours),
            "12h" => Some(Timeframe::TwelveHours),
            "1d" => Some(Timeframe::OneDay),
            "3d" => Some(Timeframe::ThreeDays),
            "1w" => Some(Timeframe::OneWeek),
            "1M" => Some(Timeframe::OneMonth),
            _ => None,
        }
    }

    /// Provider interval label.
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1m",
            Timeframe::ThreeMinutes => "3m",
            Timeframe::FiveMinutes => "5m",
            Timeframe::FifteenMinutes => "15m",
            Timeframe::ThirtyMinutes => "30m",
            Timeframe::OneHour => "1h",
            Timeframe::TwoHours => "2h",
            Timeframe::FourHours => "4h",
            Timeframe::SixHours => "6h",
            Timeframe::EightHours => "8h",
            Timeframe::TwelveHours => "12h",
            Timeframe::OneDay => "1d",
            Timeframe::ThreeDays => "3d",
            Timeframe::OneWeek => "1w",
            Timeframe::OneMonth => "1M",
        }
    }

    /// Candle duration in seconds (a month is 30 days).
    pub fn seconds(&self) -> i64 {
        match self {
            Timeframe::OneMinute => 60,
            Timeframe::ThreeMinutes => 180,
            Timeframe::FiveMinutes => 300,
            Timeframe::FifteenMinutes => 900,
            Timeframe::ThirtyMinutes => 1800,
            Timeframe::OneHour => 3600,
            Timeframe::TwoHours => 7200,
            Timeframe::FourHours => 14400,
            Timeframe::SixHours => 21600,
            Timeframe::EightHours => 28800,
            Timeframe::TwelveHours => 43200,
            Timeframe::OneDay => 86400,
            Timeframe::ThreeDays => 259200,
            Timeframe::OneWeek => 604800,
            Timeframe::OneMonth => 2592000,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Strip all whitespace from a timeframe label.
pub fn sanitize_label(label: &str) -> String {
    label.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Timeframes offered by the dashboard as the primary chart.
pub const PRIMARY_TIMEFRAMES: &[(Timeframe, &str)] = &[
    (Timeframe::FifteenMinutes, "15 Minutes"),
    (Timeframe::OneHour, "1 Hour"),
    (Timeframe::FourHours, "4 Hours"),
    (Timeframe::OneDay, "1 Day"),
    (Timeframe::OneWeek, "1 Week"),
];

/// Timeframes offered for supplementary charts.
pub const ADDITIONAL_TIMEFRAMES: &[(Timeframe, &str)] = &[
    (Timeframe::OneDay, "1 Day"),
    (Timeframe::FourHours, "4 Hours"),
    (Timeframe::OneHour, "1 Hour"),
];
