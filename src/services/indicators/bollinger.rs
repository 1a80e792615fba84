//! Bollinger Bands indicator.

use super::{Indicator, IndicatorOutput, BOLLINGER_PERIOD, BOLLINGER_STD_DEV_MULTIPLIER};
use crate::types::{BollingerPoint, Candle};

/// Bollinger envelope over each trailing window of `period` closes.
///
/// - Middle band: SMA(period)
/// - Upper band: middle + multiplier * population std-dev
/// - Lower band: middle - multiplier * population std-dev
///
/// Same warmup as SMA: `N - period + 1` points, empty when `N < period`.
pub fn bollinger_bands(candles: &[Candle], period: usize, std_dev_multiplier: f64) -> Vec<BollingerPoint> {
    if period == 0 || candles.len() < period {
        return Vec::new();
    }

    candles
        .windows(period)
        .map(|window| {
            let middle = window.iter().map(|c| c.close).sum::<f64>() / period as f64;
            let std_dev = population_std_dev(window, middle);
            BollingerPoint {
                time: window[period - 1].time,
                upper: middle + std_dev_multiplier * std_dev,
                middle,
                lower: middle - std_dev_multiplier * std_dev,
            }
        })
        .collect()
}

/// Standard deviation dividing by the window length.
fn population_std_dev(window: &[Candle], mean: f64) -> f64 {
    let variance = window.iter().map(|c| (c.close - mean).powi(2)).sum::<f64>() / window.len() as f64;
    variance.sqrt()
}

/// Bollinger Bands indicator.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: BOLLINGER_PERIOD,
            std_dev_multiplier: BOLLINGER_STD_DEV_MULTIPLIER,
        }
    }
}

impl Indicator for BollingerBands {
    fn id(&self) -> &str {
        "bollingerBands"
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> IndicatorOutput {
        IndicatorOutput::Bollinger(bollinger_bands(candles, self.period, self.std_dev_multiplier))
    }
}
