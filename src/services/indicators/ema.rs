//! Exponential Moving Average (EMA), used internally by MACD.

/// EMA over `values` with smoothing factor `k = 2 / (period + 1)`.
///
/// Seeded with the first value unweighted, so there is one output per input
/// and no warmup gap (unlike [`super::sma`]).
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut iter = values.iter();

    if let Some(&first) = iter.next() {
        out.push(first);
        let mut prev = first;
        for &value in iter {
            prev = value * k + prev * (1.0 - k);
            out.push(prev);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_single_value_is_seed() {
        for period in [1usize, 2, 9, 26, 200] {
            assert_eq!(ema(&[42.5], period), vec![42.5]);
        }
    }

    #[test]
    fn test_ema_calculation() {
        // k = 0.5 for period 3
        let out = ema(&[10.0, 12.0, 14.0], 3);
        assert_eq!(out, vec![10.0, 11.0, 12.5]);
    }

    #[test]
    fn test_ema_same_length_as_input() {
        let values: Vec<f64> = (0..50).map(|i| i as f64).collect();
        assert_eq!(ema(&values, 12).len(), 50);
    }

    #[test]
    fn test_ema_constant_input() {
        let out = ema(&[7.0; 30], 9);
        assert!(out.iter().all(|&v| (v - 7.0).abs() < 1e-12));
    }

    #[test]
    fn test_ema_empty() {
        assert!(ema(&[], 9).is_empty());
    }

    #[test]
    fn test_ema_period_zero() {
        assert!(ema(&[1.0, 2.0], 0).is_empty());
    }
}
