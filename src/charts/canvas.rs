//! Minimal raster surface for the dashboard charts.
//!
//! Text uses the 8×8 glyphs from `font8x8`, scaled by an integer factor, so
//! rendering never depends on fonts installed on the host.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};

use crate::error::ChartError;

pub const GLYPH_SIZE: u32 = 8;

pub const WHITE: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);
pub const BLACK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
pub const TEXT: Rgb<u8> = Rgb([0x22, 0x22, 0x22]);
pub const AXIS: Rgb<u8> = Rgb([0x44, 0x44, 0x44]);
pub const GRID: Rgb<u8> = Rgb([0xDD, 0xDD, 0xDD]);

pub fn text_width(text: &str, scale: u32) -> i64 {
    (text.chars().count() as u32 * GLYPH_SIZE * scale) as i64
}

pub fn text_height(scale: u32) -> i64 {
    (GLYPH_SIZE * scale) as i64
}

/// A label reduced to fit a given width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittedText {
    pub text: String,
    pub scale: u32,
}

impl FittedText {
    pub fn width(&self) -> i64 {
        text_width(&self.text, self.scale)
    }
}

/// Largest scale up to `max_scale` at which `text` fits in `max_width`.
/// Text too wide even at scale 1 keeps its head and ends in "..".
pub fn fit_text(text: &str, max_width: i64, max_scale: u32) -> FittedText {
    for scale in (1..=max_scale.max(1)).rev() {
        if text_width(text, scale) <= max_width {
            return FittedText { text: text.to_string(), scale };
        }
    }

    let room = (max_width.max(0) / text_width("m", 1)) as usize;
    let text = if room >= 3 {
        let mut head: String = text.chars().take(room - 2).collect();
        head.push_str("..");
        head
    } else {
        String::new()
    };
    FittedText { text, scale: 1 }
}

pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbImage::from_pixel(width, height, WHITE) }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64 {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, width: i64, height: i64, color: Rgb<u8>) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width).min(self.width() as i64);
        let y1 = (y + height).min(self.height() as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px as u32, py as u32, color);
            }
        }
    }

    pub fn hline(&mut self, x0: i64, x1: i64, y: i64, thickness: i64, color: Rgb<u8>) {
        self.fill_rect(x0, y, x1 - x0, thickness, color);
    }

    pub fn vline(&mut self, x: i64, y0: i64, y1: i64, thickness: i64, color: Rgb<u8>) {
        self.fill_rect(x, y0, thickness, y1 - y0, color);
    }

    /// Fills the wedge of a circle starting at `start_deg` and sweeping
    /// `sweep_deg` counter-clockwise. Angles are measured from 3 o'clock with
    /// the y axis pointing up, as on a math plot.
    pub fn fill_wedge(
        &mut self,
        center: (i64, i64),
        radius: i64,
        start_deg: f64,
        sweep_deg: f64,
        color: Rgb<u8>,
    ) {
        let (cx, cy) = center;
        let r2 = radius * radius;
        let start = start_deg.rem_euclid(360.0);
        for py in (cy - radius)..=(cy + radius) {
            for px in (cx - radius)..=(cx + radius) {
                let dx = px - cx;
                let dy = cy - py;
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                let angle = (dy as f64).atan2(dx as f64).to_degrees();
                let offset = (angle - start).rem_euclid(360.0);
                if sweep_deg >= 360.0 || offset < sweep_deg {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Draws `text` with its top-left corner at (`x`, `y`).
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let step = text_width("m", scale);
        for (i, ch) in text.chars().enumerate() {
            let glyph = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')).unwrap_or([0; 8]);
            let origin = x + i as i64 * step;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    self.fill_rect(
                        origin + (col * scale) as i64,
                        y + (row as u32 * scale) as i64,
                        scale as i64,
                        scale as i64,
                        color,
                    );
                }
            }
        }
    }

    pub fn draw_text_centered(&mut self, cx: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        self.draw_text(cx - text_width(text, scale) / 2, y, text, scale, color);
    }

    /// Draws `text` rotated a quarter turn counter-clockwise, reading bottom
    /// to top, centred vertically on `cy` with its left edge at `x`.
    pub fn draw_text_vertical(&mut self, x: i64, cy: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let step = text_width("m", scale);
        let bottom = cy + text_width(text, scale) / 2;
        for (i, ch) in text.chars().enumerate() {
            let glyph = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')).unwrap_or([0; 8]);
            let origin = bottom - i as i64 * step;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    self.fill_rect(
                        x + (row as u32 * scale) as i64,
                        origin - ((col + 1) * scale) as i64,
                        scale as i64,
                        scale as i64,
                        color,
                    );
                }
            }
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, ChartError> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            self.image.as_raw(),
            self.width(),
            self.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(bytes)
    }
}
