//! Raw klines → canonical [`CandleSeries`].

use crate::error::{AppError, Result};
use crate::types::{Candle, CandleSeries, RawKline};
use serde_json::Value;

const FIELD_NAMES: [&str; 6] = ["open time", "open", "high", "low", "close", "volume"];

/// Convert provider records into a candle series.
///
/// Open times are converted from milliseconds to whole seconds (truncating).
/// Any missing or non-numeric field, or a candle whose open/close falls
/// outside its low/high range, aborts the whole series.
pub fn normalize(records: &[RawKline]) -> Result<CandleSeries> {
    let candles = records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_record(index, record))
        .collect::<Result<Vec<_>>>()?;

    CandleSeries::new(candles).map_err(|index| {
        AppError::malformed(index, "open time is not strictly increasing")
    })
}

fn parse_record(index: usize, record: &RawKline) -> Result<Candle> {
    let fields = &record.0;
    if fields.len() < FIELD_NAMES.len() {
        return Err(AppError::malformed(
            index,
            format!("expected at least 6 fields, got {}", fields.len()),
        ));
    }

    let open_time_ms = parse_time(&fields[0])
        .ok_or_else(|| AppError::malformed(index, "open time is not an integer"))?;

    let mut values = [0.0_f64; 5];
    for (slot, (field, name)) in values
        .iter_mut()
        .zip(fields[1..6].iter().zip(&FIELD_NAMES[1..]))
    {
        *slot = parse_number(field)
            .ok_or_else(|| AppError::malformed(index, format!("{} is not numeric: {}", name, field)))?;
    }
    let [open, high, low, close, volume] = values;

    if low > open.min(close) || open.max(close) > high {
        return Err(AppError::malformed(index, "price fields violate low <= open/close <= high"));
    }

    Ok(Candle::new(open_time_ms / 1000, open, high, low, close, volume))
}

fn parse_time(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}
