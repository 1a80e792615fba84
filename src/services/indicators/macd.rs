//! MACD (Moving Average Convergence Divergence) indicator.

use super::{ema, Indicator, IndicatorOutput, MACD_FAST_PERIOD, MACD_SIGNAL_PERIOD, MACD_SLOW_PERIOD};
use crate::types::{Candle, HistogramPoint, IndicatorPoint, MacdSeries, Tone};

/// MACD line, signal line and histogram over closes.
///
/// - MACD line = EMA(fast) - EMA(slow)
/// - Signal line = EMA(signal) of the MACD line
/// - Histogram = MACD line - signal line
///
/// The EMAs seed from the first close and emit one value per input, so all
/// three series have exactly one point per candle, sharing its time. The
/// earliest samples are distorted by the seeding and are kept as-is.
/// Empty when `N < slow` or any period is zero.
pub fn macd(candles: &[Candle], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    if fast == 0 || slow == 0 || signal == 0 || candles.len() < slow {
        return MacdSeries::default();
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let fast_ema = ema(&closes, fast);
    let slow_ema = ema(&closes, slow);

    let macd_values: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal_values = ema(&macd_values, signal);

    let mut series = MacdSeries {
        macd_line: Vec::with_capacity(signal_values.len()),
        signal_line: Vec::with_capacity(signal_values.len()),
        histogram: Vec::with_capacity(signal_values.len()),
    };

    for ((candle, &macd_value), &signal_value) in candles.iter().zip(&macd_values).zip(&signal_values) {
        let histogram = macd_value - signal_value;
        series.macd_line.push(IndicatorPoint::new(candle.time, macd_value));
        series.signal_line.push(IndicatorPoint::new(candle.time, signal_value));
        series.histogram.push(HistogramPoint {
            time: candle.time,
            value: histogram,
            tone: Tone::from_value(histogram),
        });
    }

    series
}

/// MACD indicator.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: MACD_FAST_PERIOD,
            slow_period: MACD_SLOW_PERIOD,
            signal_period: MACD_SIGNAL_PERIOD,
        }
    }
}

impl Indicator for Macd {
    fn id(&self) -> &str {
        "macd"
    }

    fn name(&self) -> &str {
        "MACD"
    }

    fn min_periods(&self) -> usize {
        self.slow_period
    }

    fn compute(&self, candles: &[Candle]) -> IndicatorOutput {
        IndicatorOutput::Macd(macd(
            candles,
            self.fast_period,
            self.slow_period,
            self.signal_period,
        ))
    }
}
