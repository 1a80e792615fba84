//! Simple Moving Average (SMA) indicator.

use super::{Indicator, IndicatorOutput, SMA_PERIOD};
use crate::types::{Candle, IndicatorPoint};

/// Mean close over each trailing window of `period` candles.
///
/// Emits `N - period + 1` points, the first aligned to candle `period - 1`.
/// Returns an empty series when `N < period` or `period == 0`.
pub fn sma(candles: &[Candle], period: usize) -> Vec<IndicatorPoint> {
    if period == 0 || candles.len() < period {
        return Vec::new();
    }

    candles
        .windows(period)
        .map(|window| {
            let sum: f64 = window.iter().map(|c| c.close).sum();
            IndicatorPoint::new(window[period - 1].time, sum / period as f64)
        })
        .collect()
}

/// SMA (Simple Moving Average) indicator.
pub struct Sma {
    period: usize,
}

impl Default for Sma {
    fn default() -> Self {
        Self { period: SMA_PERIOD }
    }
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Sma {
    fn id(&self) -> &str {
        "sma"
    }

    fn name(&self) -> &str {
        match self.period {
            20 => "SMA (20)",
            _ => "SMA",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> IndicatorOutput {
        IndicatorOutput::Sma(sma(candles, self.period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::test_support::*;

    #[test]
    fn test_sma_calculation() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let points = sma(&candles, 3);
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
        assert_eq!(points[0].time, candles[2].time);
        assert_eq!(points[2].time, candles[4].time);
    }

    #[test]
    fn test_sma_first_value_is_plain_average() {
        let candles = wave(40);
        let points = sma(&candles, 20);
        let expected: f64 = candles[..20].iter().map(|c| c.close).sum::<f64>() / 20.0;
        assert_eq!(points[0].value, expected);
        assert_eq!(points.len(), 21);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let candles = candles_from_closes(&[1.0, 2.0]);
        assert!(sma(&candles, 3).is_empty());
    }

    #[test]
    fn test_sma_exact_period() {
        let candles = candles_from_closes(&[2.0, 4.0, 6.0]);
        let points = sma(&candles, 3);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 4.0);
    }

    #[test]
    fn test_sma_period_one() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0]);
        let values: Vec<f64> = sma(&candles, 1).iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_sma_period_zero() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0]);
        assert!(sma(&candles, 0).is_empty());
    }

    #[test]
    fn test_sma_empty_data() {
        assert!(sma(&[], 3).is_empty());
    }

    #[test]
    fn test_sma_name() {
        assert_eq!(Sma::default().name(), "SMA (20)");
        assert_eq!(Sma::new(7).name(), "SMA");
        assert_eq!(Sma::new(50).name(), "SMA");
    }
}
