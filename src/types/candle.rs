use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// OHLCV candle with `time` in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Ordered, immutable candle sequence with strictly increasing times.
///
/// Built by the normalizer (or [`CandleSeries::new`]) and only ever borrowed
/// by the indicator engine, renderer and payload assembler.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Wrap candles, returning the index of the first out-of-order candle on failure.
    pub fn new(candles: Vec<Candle>) -> Result<Self, usize> {
        if let Some(pos) = candles.windows(2).position(|w| w[1].time <= w[0].time) {
            return Err(pos + 1);
        }
        Ok(Self { candles })
    }

    pub fn contains_time(&self, time: i64) -> bool {
        self.candles.binary_search_by_key(&time, |c| c.time).is_ok()
    }
}

impl Deref for CandleSeries {
    type Target = [Candle];

    fn deref(&self) -> &Self::Target {
        &self.candles
    }
}

/// One klines record as returned by the provider:
/// `[openTimeMs, open, high, low, close, volume, closeTimeMs, ...]`.
///
/// Prices arrive as strings; fields are kept as raw JSON until normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawKline(pub Vec<serde_json::Value>);

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time: i64, close: f64) -> Candle {
        Candle::new(time, close, close, close, close, 1.0)
    }

    #[test]
    fn test_series_accepts_increasing_times() {
        let series = CandleSeries::new(vec![candle(1, 1.0), candle(2, 2.0), candle(5, 3.0)]).unwrap();
        assert_eq!(series.len(), 3);
        assert!(series.contains_time(5));
        assert!(!series.contains_time(3));
    }

    #[test]
    fn test_series_rejects_duplicate_time() {
        let err = CandleSeries::new(vec![candle(1, 1.0), candle(2, 2.0), candle(2, 3.0)]).unwrap_err();
        assert_eq!(err, 2);
    }

    #[test]
    fn test_series_rejects_decreasing_time() {
        let err = CandleSeries::new(vec![candle(10, 1.0), candle(9, 2.0)]).unwrap_err();
        assert_eq!(err, 1);
    }

    #[test]
    fn test_series_serializes_as_array() {
        let series = CandleSeries::new(vec![candle(60, 1.5)]).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(
            json,
            r#"[{"time":60,"open":1.5,"high":1.5,"low":1.5,"close":1.5,"volume":1.0}]"#
        );
    }

    #[test]
    fn test_raw_kline_deserialization() {
        let json = r#"[1700000000000,"43500.10","43600.00","43400.00","43550.55","12.5",1700003599999,"0",10,"0","0","0"]"#;
        let raw: RawKline = serde_json::from_str(json).unwrap();
        assert_eq!(raw.0.len(), 12);
        assert_eq!(raw.0[1].as_str(), Some("43500.10"));
    }
}
