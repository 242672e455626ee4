use image::Rgb;

use super::canvas::{fit_text, text_height, text_width, Canvas, FittedText, AXIS, GRID, TEXT};
use super::{ChartImage, BAR_CHART_SIZE, DPI};
use crate::error::ChartError;
use crate::models::domain::ProtocolCount;

pub const TITLE: &str = "Packet Count by Protocol";
pub const X_LABEL: &str = "Protocol";
pub const Y_LABEL: &str = "Number of Packets";

pub const PALETTE: [Rgb<u8>; 4] = [
    Rgb([0xFF, 0x6B, 0x6B]),
    Rgb([0x4E, 0xCD, 0xC4]),
    Rgb([0x45, 0xB7, 0xD1]),
    Rgb([0x96, 0xCE, 0xB4]),
];

const TITLE_SCALE: u32 = 4;
const LABEL_SCALE: u32 = 3;
const TICK_SCALE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl PlotArea {
    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    pub fn width(&self) -> i64 {
        self.right - self.left
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value_label: String,
    pub value: u64,
    pub x: i64,
    pub width: i64,
    /// Height in pixels, kept fractional so the drawn bars are proportional
    /// to their counts before rounding.
    pub height: f64,
    pub color: Rgb<u8>,
    /// `label` and `value_label` as drawn, shrunk to the bar's slot.
    pub name_text: FittedText,
    pub value_text: FittedText,
}

impl Bar {
    pub fn top(&self, plot: &PlotArea) -> i64 {
        plot.bottom - self.height.round() as i64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub y: i64,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub width: u32,
    pub height: u32,
    pub plot: PlotArea,
    pub y_max: f64,
    pub bars: Vec<Bar>,
    pub grid: Vec<GridLine>,
}

impl BarLayout {
    pub fn new(counts: &[ProtocolCount]) -> Self {
        let (width, height) = (BAR_CHART_SIZE.0 * DPI, BAR_CHART_SIZE.1 * DPI);
        let plot = PlotArea {
            left: 170,
            top: 130,
            right: width as i64 - 60,
            bottom: height as i64 - 140,
        };

        let max = counts.iter().map(|c| c.count).max().unwrap_or(0);
        let step = tick_step(max);
        // headroom above the tallest bar for its value label
        let y_max = ((max as f64 * 1.1) / step).ceil().max(1.0) * step;
        let scale = plot.height() as f64 / y_max;

        let grid = (0..)
            .map(|i| i as f64 * step)
            .take_while(|v| *v <= y_max)
            .map(|v| GridLine {
                y: plot.bottom - (v * scale).round() as i64,
                value: v as u64,
            })
            .collect();

        let slot = if counts.is_empty() { 0.0 } else { plot.width() as f64 / counts.len() as f64 };
        let label_room = (slot as i64 - 4).max(0);
        let bars = counts
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let value_label = entry.count.to_string();
                Bar {
                    name_text: fit_text(&entry.protocol, label_room, TICK_SCALE),
                    value_text: fit_text(&value_label, label_room, LABEL_SCALE),
                    label: entry.protocol.clone(),
                    value_label,
                    value: entry.count,
                    x: plot.left + (i as f64 * slot + slot / 10.0).round() as i64,
                    // never thinner than a pixel, even with thousands of bars
                    width: ((slot * 0.8).round() as i64).max(1),
                    height: entry.count as f64 * scale,
                    color: PALETTE[i % PALETTE.len()],
                }
            })
            .collect();

        BarLayout { width, height, plot, y_max, bars, grid }
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        let plot = &self.plot;

        canvas.draw_text_centered(self.width as i64 / 2, 40, TITLE, TITLE_SCALE, TEXT);

        for line in &self.grid {
            canvas.hline(plot.left, plot.right, line.y, 2, GRID);
            let label = line.value.to_string();
            canvas.draw_text(
                plot.left - 16 - text_width(&label, TICK_SCALE),
                line.y - text_height(TICK_SCALE) / 2,
                &label,
                TICK_SCALE,
                TEXT,
            );
        }

        for bar in &self.bars {
            let top = bar.top(plot);
            canvas.fill_rect(bar.x, top, bar.width, plot.bottom - top, bar.color);

            let center = bar.x + bar.width / 2;
            canvas.draw_text_centered(
                center,
                top - 12 - text_height(bar.value_text.scale),
                &bar.value_text.text,
                bar.value_text.scale,
                TEXT,
            );
            canvas.draw_text_centered(
                center,
                plot.bottom + 16,
                &bar.name_text.text,
                bar.name_text.scale,
                TEXT,
            );
        }

        canvas.hline(plot.left, plot.right, plot.bottom, 3, AXIS);
        canvas.vline(plot.left - 3, plot.top, plot.bottom + 3, 3, AXIS);

        canvas.draw_text_centered(
            (plot.left + plot.right) / 2,
            self.height as i64 - 70,
            X_LABEL,
            LABEL_SCALE,
            TEXT,
        );
        canvas.draw_text_vertical(40, (plot.top + plot.bottom) / 2, Y_LABEL, LABEL_SCALE, TEXT);
    }

    pub fn render(&self) -> Result<ChartImage, ChartError> {
        let mut canvas = Canvas::new(self.width, self.height);
        self.draw(&mut canvas);
        Ok(ChartImage::new(canvas.encode_png()?))
    }
}

// 1, 2 or 5 times a power of ten, giving roughly five grid lines.
fn tick_step(max: u64) -> f64 {
    let raw = (max as f64 * 1.1 / 5.0).max(1.0);
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}
