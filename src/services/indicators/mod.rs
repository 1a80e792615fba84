//! Technical indicator engine.
//!
//! Every indicator is a pure function of a candle slice and its periods.
//! Insufficient history is not an error: the output series is just shorter,
//! or empty. Every emitted point carries the time of a source candle.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger_bands, BollingerBands};
pub use ema::ema;
pub use macd::{macd, Macd};
pub use rsi::{rsi, Rsi};
pub use sma::{sma, Sma};

use crate::types::{BollingerPoint, Candle, IndicatorConfig, IndicatorPoint, IndicatorSet, MacdSeries};

pub const SMA_PERIOD: usize = 20;
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;
pub const MACD_SIGNAL_PERIOD: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_DEV_MULTIPLIER: f64 = 2.0;

/// Output of one indicator run.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorOutput {
    Sma(Vec<IndicatorPoint>),
    Rsi(Vec<IndicatorPoint>),
    Macd(MacdSeries),
    Bollinger(Vec<BollingerPoint>),
}

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Unique identifier, also the key in the indicator payload.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Minimum number of candles needed to emit at least one point.
    fn min_periods(&self) -> usize;

    /// Compute the full series over the candles.
    fn compute(&self, candles: &[Candle]) -> IndicatorOutput;
}

/// Indicators enabled by `config`, with their fixed periods.
pub fn enabled_indicators(config: &IndicatorConfig) -> Vec<Box<dyn Indicator>> {
    let mut indicators: Vec<Box<dyn Indicator>> = Vec::new();
    if config.sma {
        indicators.push(Box::new(Sma::default()));
    }
    if config.rsi {
        indicators.push(Box::new(Rsi::default()));
    }
    if config.macd {
        indicators.push(Box::new(Macd::default()));
    }
    if config.bollinger {
        indicators.push(Box::new(BollingerBands::default()));
    }
    indicators
}

impl IndicatorSet {
    /// Compute every indicator enabled by `config`.
    pub fn compute(candles: &[Candle], config: &IndicatorConfig) -> Self {
        let mut set = IndicatorSet::default();
        for indicator in enabled_indicators(config) {
            set.insert(indicator.compute(candles));
        }
        set
    }

    pub fn insert(&mut self, output: IndicatorOutput) {
        match output {
            IndicatorOutput::Sma(points) => self.sma = Some(points),
            IndicatorOutput::Rsi(points) => self.rsi = Some(points),
            IndicatorOutput::Macd(series) => self.macd = Some(series),
            IndicatorOutput::Bollinger(points) => self.bollinger_bands = Some(points),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_enabled_indicators_all() {
        let ids: Vec<String> = enabled_indicators(&IndicatorConfig::all())
            .iter()
            .map(|i| i.id().to_string())
            .collect();
        assert_eq!(ids, vec!["sma", "rsi", "macd", "bollingerBands"]);
    }

    #[test]
    fn test_enabled_indicators_none() {
        assert!(enabled_indicators(&IndicatorConfig::none()).is_empty());
    }

    #[test]
    fn test_compute_respects_config() {
        let candles = wave(60);
        let config = IndicatorConfig::from_selection("rsi").unwrap();
        let set = IndicatorSet::compute(&candles, &config);
        assert!(set.rsi.is_some());
        assert!(set.sma.is_none());
        assert!(set.macd.is_none());
        assert!(set.bollinger_bands.is_none());
    }

    #[test]
    fn test_compute_all_lengths() {
        let candles = wave(100);
        let set = IndicatorSet::compute(&candles, &IndicatorConfig::all());
        assert_eq!(set.sma.unwrap().len(), 81);
        assert_eq!(set.rsi.unwrap().len(), 86);
        assert_eq!(set.bollinger_bands.unwrap().len(), 81);
        assert_eq!(set.macd.unwrap().len(), 100);
    }

    #[test]
    fn test_min_periods() {
        assert_eq!(Sma::default().min_periods(), 20);
        assert_eq!(Rsi::default().min_periods(), 15);
        assert_eq!(Macd::default().min_periods(), 26);
        assert_eq!(BollingerBands::default().min_periods(), 20);
    }

    #[test]
    fn test_empty_below_min_periods() {
        for indicator in enabled_indicators(&IndicatorConfig::all()) {
            let candles = constant(indicator.min_periods() - 1, 50.0);
            let mut set = IndicatorSet::default();
            set.insert(indicator.compute(&candles));
            let empty = match (set.sma, set.rsi, set.macd, set.bollinger_bands) {
                (Some(s), None, None, None) => s.is_empty(),
                (None, Some(r), None, None) => r.is_empty(),
                (None, None, Some(m), None) => m.is_empty(),
                (None, None, None, Some(b)) => b.is_empty(),
                _ => false,
            };
            assert!(empty, "{} should be empty below min periods", indicator.name());
        }
    }
}
