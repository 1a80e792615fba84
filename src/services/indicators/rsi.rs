//! Relative Strength Index (RSI) indicator.

use super::{Indicator, IndicatorOutput, RSI_PERIOD};
use crate::types::{Candle, IndicatorPoint};

/// RSI with Wilder smoothing.
///
/// The first `period` close-to-close changes seed the average gain and loss as
/// simple means; the first point is emitted at candle `period`. Each later
/// change updates `avg = (avg * (period - 1) + current) / period`.
/// A zero average loss yields RSI = 100, including a flat series.
///
/// Emits `N - period` points, or nothing when `N <= period`.
pub fn rsi(candles: &[Candle], period: usize) -> Vec<IndicatorPoint> {
    if period == 0 || candles.len() <= period {
        return Vec::new();
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let change = candles[i].close - candles[i - 1].close;
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;

    let mut points = Vec::with_capacity(candles.len() - period);
    points.push(IndicatorPoint::new(candles[period].time, rsi_value(avg_gain, avg_loss)));

    for i in (period + 1)..candles.len() {
        let change = candles[i].close - candles[i - 1].close;
        let (current_gain, current_loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };

        avg_gain = (avg_gain * (period - 1) as f64 + current_gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + current_loss) / period as f64;

        points.push(IndicatorPoint::new(candles[i].time, rsi_value(avg_gain, avg_loss)));
    }

    points
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// RSI (Relative Strength Index) indicator.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: RSI_PERIOD }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Rsi {
    fn id(&self) -> &str {
        "rsi"
    }

    fn name(&self) -> &str {
        match self.period {
            14 => "RSI (14)",
            _ => "RSI",
        }
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, candles: &[Candle]) -> IndicatorOutput {
        IndicatorOutput::Rsi(rsi(candles, self.period))
    }
}
