use image::Rgb;

use super::canvas::{fit_text, text_height, Canvas, FittedText, TEXT, WHITE};
use super::{ChartImage, DPI, PIE_CHART_SIZE};
use crate::error::ChartError;
use crate::models::domain::AddressCount;

pub const TITLE: &str = "Top 3 Most Active IPs";
pub const EMPTY_LABEL: &str = "No address data";
pub const START_ANGLE: f64 = 90.0;

pub const PALETTE: [Rgb<u8>; 3] = [
    Rgb([0xFF, 0x6B, 0x6B]),
    Rgb([0x4E, 0xCD, 0xC4]),
    Rgb([0x45, 0xB7, 0xD1]),
];

const TITLE_SCALE: u32 = 4;
const LABEL_SCALE: u32 = 3;
const LABEL_DISTANCE: f64 = 1.1;
const PERCENT_DISTANCE: f64 = 0.6;
const LABEL_MARGIN: i64 = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub address: String,
    pub count: u64,
    /// Fraction of the combined top-N total.
    pub share: f64,
    pub percent_label: String,
    pub start_deg: f64,
    pub sweep_deg: f64,
    pub color: Rgb<u8>,
    /// Address as drawn, possibly at a smaller scale.
    pub label: FittedText,
    /// Top-left corner of the address label.
    pub label_at: (i64, i64),
    /// Centre of the percentage label.
    pub percent_at: (i64, i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieLayout {
    pub width: u32,
    pub height: u32,
    pub center: (i64, i64),
    pub radius: i64,
    pub wedges: Vec<Wedge>,
}

impl PieLayout {
    pub fn new(top: &[AddressCount]) -> Result<Self, ChartError> {
        if let Some(entry) = top.iter().find(|entry| entry.count == 0) {
            return Err(ChartError::InvalidInput(format!(
                "address {} has a zero count",
                entry.address
            )));
        }
        if top.len() > PALETTE.len() {
            return Err(ChartError::InvalidInput(format!(
                "pie chart takes at most {} addresses, got {}",
                PALETTE.len(),
                top.len()
            )));
        }

        let (width, height) = (PIE_CHART_SIZE.0 * DPI, PIE_CHART_SIZE.1 * DPI);
        let center = (width as i64 / 2, height as i64 / 2 + 60);
        let radius = 400;
        let total: u64 = top.iter().map(|entry| entry.count).sum();

        let mut start = START_ANGLE;
        let mut wedges = Vec::with_capacity(top.len());
        for (i, entry) in top.iter().enumerate() {
            let share = entry.count as f64 / total as f64;
            let sweep = share * 360.0;
            let mid = start + sweep / 2.0;

            let anchor = polar(center, radius as f64 * LABEL_DISTANCE, mid);
            let right_side = mid.to_radians().cos() >= 0.0;
            let (label, label_at) = place_label(&entry.address, anchor, right_side, width as i64);

            wedges.push(Wedge {
                address: entry.address.clone(),
                count: entry.count,
                share,
                percent_label: format!("{:.1}%", share * 100.0),
                start_deg: start,
                sweep_deg: sweep,
                color: PALETTE[i],
                label,
                label_at,
                percent_at: polar(center, radius as f64 * PERCENT_DISTANCE, mid),
            });
            start += sweep;
        }

        Ok(PieLayout { width, height, center, radius, wedges })
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        canvas.draw_text_centered(self.width as i64 / 2, 50, TITLE, TITLE_SCALE, TEXT);

        if self.wedges.is_empty() {
            canvas.draw_text_centered(
                self.center.0,
                self.center.1 - text_height(LABEL_SCALE) / 2,
                EMPTY_LABEL,
                LABEL_SCALE,
                TEXT,
            );
            return;
        }

        for wedge in &self.wedges {
            canvas.fill_wedge(self.center, self.radius, wedge.start_deg, wedge.sweep_deg, wedge.color);
        }
        for wedge in &self.wedges {
            let (x, y) = wedge.label_at;
            canvas.draw_text(x, y, &wedge.label.text, wedge.label.scale, TEXT);

            let (px, py) = wedge.percent_at;
            canvas.draw_text_centered(
                px,
                py - text_height(LABEL_SCALE) / 2,
                &wedge.percent_label,
                LABEL_SCALE,
                WHITE,
            );
        }
    }

    pub fn render(&self) -> Result<ChartImage, ChartError> {
        let mut canvas = Canvas::new(self.width, self.height);
        self.draw(&mut canvas);
        Ok(ChartImage::new(canvas.encode_png()?))
    }
}

// Labels on the right half start at the anchor and those on the left end
// there. A label that does not fit beside the pie at any scale drops to the
// smallest scale and is pushed back inside the canvas margins.
fn place_label(
    address: &str,
    anchor: (i64, i64),
    right_side: bool,
    width: i64,
) -> (FittedText, (i64, i64)) {
    let (ax, ay) = anchor;
    let side_room = if right_side { width - LABEL_MARGIN - ax } else { ax - LABEL_MARGIN };
    let label = if fit_text(address, side_room, 1).text == address {
        fit_text(address, side_room, LABEL_SCALE)
    } else {
        fit_text(address, width - 2 * LABEL_MARGIN, 1)
    };

    let label_width = label.width();
    let x = if right_side { ax } else { ax - label_width };
    let x = x.clamp(LABEL_MARGIN, (width - LABEL_MARGIN - label_width).max(LABEL_MARGIN));
    let y = ay - text_height(label.scale) / 2;
    (label, (x, y))
}

// Image coordinates of the point `distance` from `center` at `angle_deg`,
// measured counter-clockwise from 3 o'clock.
fn polar(center: (i64, i64), distance: f64, angle_deg: f64) -> (i64, i64) {
    let rad = angle_deg.to_radians();
    (
        center.0 + (distance * rad.cos()).round() as i64,
        center.1 - (distance * rad.sin()).round() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top(entries: &[(&str, u64)]) -> Vec<AddressCount> {
        entries
            .iter()
            .map(|(address, count)| AddressCount { address: address.to_string(), count: *count })
            .collect()
    }

    #[test]
    fn shares_are_relative_to_top_total() {
        let layout = PieLayout::new(&top(&[("10.0.0.1", 5), ("10.0.0.2", 3), ("10.0.0.3", 2)])).unwrap();

        let labels: Vec<_> = layout.wedges.iter().map(|w| w.percent_label.as_str()).collect();
        assert_eq!(labels, ["50.0%", "30.0%", "20.0%"]);
        let sweep: f64 = layout.wedges.iter().map(|w| w.sweep_deg).sum();
        assert!((sweep - 360.0).abs() < 1e-9);
    }

    #[test]
    fn percentages_use_one_decimal() {
        let layout = PieLayout::new(&top(&[("a", 1), ("b", 1), ("c", 1)])).unwrap();
        assert!(layout.wedges.iter().all(|w| w.percent_label == "33.3%"));
    }

    #[test]
    fn wedges_start_at_twelve_and_run_counter_clockwise() {
        let layout = PieLayout::new(&top(&[("a", 1), ("b", 1)])).unwrap();
        assert_eq!(layout.wedges[0].start_deg, START_ANGLE);
        assert_eq!(layout.wedges[1].start_deg, START_ANGLE + 180.0);

        // first wedge covers the left half of the pie
        let mut canvas = Canvas::new(layout.width, layout.height);
        layout.draw(&mut canvas);
        let (cx, cy) = layout.center;
        assert_eq!(canvas.pixel((cx - 300) as u32, (cy + 100) as u32), PALETTE[0]);
        assert_eq!(canvas.pixel((cx + 300) as u32, (cy + 100) as u32), PALETTE[1]);
    }

    #[test]
    fn address_labels_follow_wedge_side() {
        let layout = PieLayout::new(&top(&[("10.0.0.1", 3), ("10.0.0.2", 1)])).unwrap();
        let (cx, _) = layout.center;
        // first wedge is centred lower left, second upper right
        let (x0, _) = layout.wedges[0].label_at;
        let (x1, _) = layout.wedges[1].label_at;
        assert_eq!(layout.wedges[0].label.scale, LABEL_SCALE);
        assert!(x0 + layout.wedges[0].label.width() < cx);
        assert!(x1 > cx);
    }

    fn assert_labels_inside(layout: &PieLayout) {
        for wedge in &layout.wedges {
            let (x, y) = wedge.label_at;
            assert_eq!(wedge.label.text, wedge.address, "label for {} was cut", wedge.address);
            assert!(x >= 0, "label {} starts at {}", wedge.address, x);
            assert!(x + wedge.label.width() <= layout.width as i64, "label {} runs past the edge", wedge.address);
            assert!(y >= 0 && y + text_height(wedge.label.scale) <= layout.height as i64);
        }
    }

    #[test]
    fn long_ipv4_labels_stay_on_canvas() {
        let layout = PieLayout::new(&top(&[("192.168.100.200", 2), ("10.0.0.1", 2)])).unwrap();
        // the first wedge is centred at 9 o'clock, with little room to its left
        assert!(layout.wedges[0].label.scale < LABEL_SCALE);
        assert_labels_inside(&layout);
    }

    #[test]
    fn ipv6_labels_stay_on_canvas() {
        let layout = PieLayout::new(&top(&[
            ("2001:0db8:85a3:0000:0000:8a2e:0370:7334", 3),
            ("fe80::1ff:fe23:4567:890a", 2),
            ("192.168.100.200", 1),
        ]))
        .unwrap();
        assert_labels_inside(&layout);

        let layout = PieLayout::new(&top(&[
            ("10.0.0.1", 1),
            ("2001:0db8:85a3:0000:0000:8a2e:0370:7334", 1),
        ]))
        .unwrap();
        assert_labels_inside(&layout);
    }

    #[test]
    fn zero_count_is_rejected() {
        let err = PieLayout::new(&top(&[("a", 2), ("b", 0)])).unwrap_err();
        assert!(matches!(err, ChartError::InvalidInput(_)));
    }

    #[test]
    fn empty_input_draws_placeholder() {
        let layout = PieLayout::new(&[]).unwrap();
        assert!(layout.wedges.is_empty());
        assert!(layout.render().is_ok());
    }
}
