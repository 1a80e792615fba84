//! Chart snapshot rendering.
//!
//! The indicator engine never depends on this module; callers hand the
//! computed series to a [`Renderer`] and get back a PNG data-URI.

use crate::error::{AppError, Result};
use crate::types::{Candle, CandleSeries, IndicatorPoint, IndicatorSet, Tone};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;

/// Rendering sink producing a raster snapshot of a chart.
pub trait Renderer: Send + Sync {
    /// Render candles and indicators to a `data:image/png;base64,...` URI.
    /// Identical input must produce identical output.
    fn snapshot(&self, candles: &CandleSeries, indicators: &IndicatorSet) -> Result<String>;
}

type Rgba = [u8; 4];

const BACKGROUND: Rgba = [17, 24, 39, 255];
const GRID: Rgba = [52, 58, 70, 255];
const UP: Rgba = [0x33, 0x66, 0xFF, 255];
const DOWN: Rgba = [0xEF, 0x44, 0x44, 255];
const SMA_COLOR: Rgba = [255, 165, 0, 255];
const BAND_COLOR: Rgba = [120, 144, 156, 255];
const RSI_COLOR: Rgba = [128, 0, 128, 255];
const RSI_GUIDE: Rgba = [90, 90, 110, 255];
const MACD_COLOR: Rgba = [0, 0, 255, 255];
const SIGNAL_COLOR: Rgba = [255, 0, 0, 255];
const HIST_POSITIVE: Rgba = [0, 150, 136, 255];
const HIST_NEGATIVE: Rgba = [255, 82, 82, 255];

const PANE_PADDING: u32 = 6;
const GRID_LINES: u32 = 4;

/// Software renderer writing RGBA pixels and encoding them as PNG.
#[derive(Debug, Clone)]
pub struct PngRenderer {
    width: u32,
    height: u32,
}

impl PngRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn layout(&self, indicators: &IndicatorSet) -> Vec<(PaneKind, Pane)> {
        let mut kinds = vec![PaneKind::Price];
        if indicators.rsi.is_some() {
            kinds.push(PaneKind::Rsi);
        }
        if indicators.macd.is_some() {
            kinds.push(PaneKind::Macd);
        }

        // Price pane gets three shares, sub-panes one each.
        let shares: u32 = 3 + (kinds.len() as u32 - 1);
        let unit = self.height / shares;
        let mut top = 0;
        kinds
            .into_iter()
            .map(|kind| {
                let height = match kind {
                    PaneKind::Price => self.height - unit * (shares - 3),
                    _ => unit,
                };
                let pane = Pane { top, height };
                top += height;
                (kind, pane)
            })
            .collect()
    }
}

impl Renderer for PngRenderer {
    fn snapshot(&self, candles: &CandleSeries, indicators: &IndicatorSet) -> Result<String> {
        if self.width == 0 || self.height == 0 {
            return Err(AppError::Render(format!(
                "invalid chart size {}x{}",
                self.width, self.height
            )));
        }

        let mut canvas = Canvas::new(self.width, self.height, BACKGROUND);
        let xs = XScale::new(candles, self.width);

        for (kind, pane) in self.layout(indicators) {
            pane.draw_grid(&mut canvas);
            match kind {
                PaneKind::Price => draw_price_pane(&mut canvas, &pane, &xs, candles, indicators),
                PaneKind::Rsi => {
                    if let Some(rsi) = &indicators.rsi {
                        draw_rsi_pane(&mut canvas, &pane, &xs, rsi);
                    }
                }
                PaneKind::Macd => draw_macd_pane(&mut canvas, &pane, &xs, indicators),
            }
        }

        let png = canvas.encode_png()?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PaneKind {
    Price,
    Rsi,
    Macd,
}

#[derive(Debug, Clone, Copy)]
struct Pane {
    top: u32,
    height: u32,
}

impl Pane {
    fn inner_top(&self) -> f64 {
        (self.top + PANE_PADDING) as f64
    }

    fn inner_height(&self) -> f64 {
        self.height.saturating_sub(2 * PANE_PADDING).max(1) as f64
    }

    fn draw_grid(&self, canvas: &mut Canvas) {
        for i in 0..=GRID_LINES {
            let y = self.inner_top() + self.inner_height() * i as f64 / GRID_LINES as f64;
            canvas.hline(y.round() as i64, GRID);
        }
    }
}

/// Vertical value mapping inside one pane.
struct YScale {
    min: f64,
    max: f64,
    top: f64,
    height: f64,
}

impl YScale {
    fn new(pane: &Pane, values: impl Iterator<Item = f64>) -> Self {
        let (mut min, mut max) = values
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if !min.is_finite() || !max.is_finite() {
            min = 0.0;
            max = 1.0;
        }
        if max - min < f64::EPSILON {
            let pad = if min.abs() > 0.0 { min.abs() * 0.01 } else { 1.0 };
            min -= pad;
            max += pad;
        }
        Self {
            min,
            max,
            top: pane.inner_top(),
            height: pane.inner_height(),
        }
    }

    fn fixed(pane: &Pane, min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            top: pane.inner_top(),
            height: pane.inner_height(),
        }
    }

    fn y(&self, value: f64) -> i64 {
        let t = ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        (self.top + (1.0 - t) * self.height).round() as i64
    }
}

/// Horizontal mapping from candle time to slot centre.
struct XScale {
    index_by_time: HashMap<i64, usize>,
    slot: f64,
}

impl XScale {
    fn new(candles: &[Candle], width: u32) -> Self {
        let index_by_time = candles.iter().enumerate().map(|(i, c)| (c.time, i)).collect();
        let slot = width as f64 / candles.len().max(1) as f64;
        Self { index_by_time, slot }
    }

    fn x_at(&self, index: usize) -> i64 {
        ((index as f64 + 0.5) * self.slot).round() as i64
    }

    fn x(&self, time: i64) -> Option<i64> {
        self.index_by_time.get(&time).map(|&i| self.x_at(i))
    }

    fn body_half_width(&self) -> i64 {
        ((self.slot * 0.35).floor() as i64).max(0)
    }
}

fn draw_price_pane(canvas: &mut Canvas, pane: &Pane, xs: &XScale, candles: &[Candle], indicators: &IndicatorSet) {
    let bands = indicators.bollinger_bands.as_deref().unwrap_or(&[]);
    let sma = indicators.sma.as_deref().unwrap_or(&[]);
    let values = candles
        .iter()
        .flat_map(|c| [c.low, c.high])
        .chain(bands.iter().flat_map(|b| [b.lower, b.upper]))
        .chain(sma.iter().map(|p| p.value));
    let ys = YScale::new(pane, values);

    let half = xs.body_half_width();
    for (i, candle) in candles.iter().enumerate() {
        let x = xs.x_at(i);
        let color = if candle.close >= candle.open { UP } else { DOWN };
        canvas.line(x, ys.y(candle.high), x, ys.y(candle.low), color);
        canvas.fill_rect(x - half, ys.y(candle.open), x + half, ys.y(candle.close), color);
    }

    if !bands.is_empty() {
        let upper: Vec<IndicatorPoint> = bands.iter().map(|b| IndicatorPoint::new(b.time, b.upper)).collect();
        let middle: Vec<IndicatorPoint> = bands.iter().map(|b| IndicatorPoint::new(b.time, b.middle)).collect();
        let lower: Vec<IndicatorPoint> = bands.iter().map(|b| IndicatorPoint::new(b.time, b.lower)).collect();
        draw_series(canvas, xs, &ys, &upper, BAND_COLOR);
        draw_series(canvas, xs, &ys, &middle, BAND_COLOR);
        draw_series(canvas, xs, &ys, &lower, BAND_COLOR);
    }
    draw_series(canvas, xs, &ys, sma, SMA_COLOR);
}

fn draw_rsi_pane(canvas: &mut Canvas, pane: &Pane, xs: &XScale, rsi: &[IndicatorPoint]) {
    let ys = YScale::fixed(pane, 0.0, 100.0);
    canvas.hline(ys.y(30.0), RSI_GUIDE);
    canvas.hline(ys.y(70.0), RSI_GUIDE);
    draw_series(canvas, xs, &ys, rsi, RSI_COLOR);
}

fn draw_macd_pane(canvas: &mut Canvas, pane: &Pane, xs: &XScale, indicators: &IndicatorSet) {
    let Some(macd) = &indicators.macd else {
        return;
    };
    let values = macd
        .macd_line
        .iter()
        .chain(&macd.signal_line)
        .map(|p| p.value)
        .chain(macd.histogram.iter().map(|h| h.value))
        .chain(std::iter::once(0.0));
    let ys = YScale::new(pane, values);
    let zero = ys.y(0.0);
    canvas.hline(zero, GRID);

    let half = xs.body_half_width();
    for bar in &macd.histogram {
        if let Some(x) = xs.x(bar.time) {
            let color = match bar.tone {
                Tone::Positive => HIST_POSITIVE,
                Tone::Negative => HIST_NEGATIVE,
            };
            canvas.fill_rect(x - half, zero, x + half, ys.y(bar.value), color);
        }
    }
    draw_series(canvas, xs, &ys, &macd.macd_line, MACD_COLOR);
    draw_series(canvas, xs, &ys, &macd.signal_line, SIGNAL_COLOR);
}

fn draw_series(canvas: &mut Canvas, xs: &XScale, ys: &YScale, points: &[IndicatorPoint], color: Rgba) {
    let mapped: Vec<(i64, i64)> = points
        .iter()
        .filter(|p| p.value.is_finite())
        .filter_map(|p| xs.x(p.time).map(|x| (x, ys.y(p.value))))
        .collect();
    match mapped.as_slice() {
        [] => {}
        [(x, y)] => canvas.set(*x, *y, color),
        _ => {
            for pair in mapped.windows(2) {
                canvas.line(pair[0].0, pair[0].1, pair[1].0, pair[1].1, color);
            }
        }
    }
}

/// RGBA pixel buffer.
struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(width: u32, height: u32, background: Rgba) -> Self {
        let pixels = background
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self { width, height, pixels }
    }

    fn set(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[offset..offset + 4].copy_from_slice(&color);
    }

    fn hline(&mut self, y: i64, color: Rgba) {
        for x in 0..self.width as i64 {
            self.set(x, y, color);
        }
    }

    fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba) {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        let left = left.max(0);
        let right = right.min(self.width as i64 - 1);
        let top = top.max(0);
        let bottom = bottom.min(self.height as i64 - 1);
        for y in top..=bottom {
            for x in left..=right {
                self.set(x, y, color);
            }
        }
    }

    /// Bresenham line.
    fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.set(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| AppError::Render(e.to_string()))?;
            writer
                .write_image_data(&self.pixels)
                .map_err(|e| AppError::Render(e.to_string()))?;
            writer.finish().map_err(|e| AppError::Render(e.to_string()))?;
        }
        Ok(buf)
    }
}
