//! PNG charts for the dashboard.
//!
//! Each chart is laid out first (pure geometry and label strings) and then
//! rasterized. The two charts share nothing, and both are regenerated on
//! every request.

pub mod bar;
pub mod canvas;
pub mod pie;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::ChartError;
use crate::models::domain::{AddressCount, ProtocolCount, StatisticsReport};

pub use bar::BarLayout;
pub use pie::PieLayout;

/// Pixels per chart unit.
pub const DPI: u32 = 150;
pub const BAR_CHART_SIZE: (u32, u32) = (10, 6);
pub const PIE_CHART_SIZE: (u32, u32) = (10, 8);

/// Encoded PNG bytes of one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    png: Vec<u8>,
}

impl ChartImage {
    pub fn new(png: Vec<u8>) -> Self {
        Self { png }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }
}

pub fn render_protocol_chart(counts: &[ProtocolCount]) -> Result<ChartImage, ChartError> {
    BarLayout::new(counts).render()
}

pub fn render_address_chart(top: &[AddressCount]) -> Result<ChartImage, ChartError> {
    PieLayout::new(top)?.render()
}

#[derive(Debug, Clone)]
pub struct DashboardCharts {
    pub protocols: ChartImage,
    pub addresses: ChartImage,
}

impl DashboardCharts {
    pub fn render(report: &StatisticsReport) -> Result<Self, ChartError> {
        Ok(Self {
            protocols: render_protocol_chart(&report.protocol_counts)?,
            addresses: render_address_chart(&report.top_addresses)?,
        })
    }
}
