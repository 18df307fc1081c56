use crate::core::{AxisLimits, CarRecord, ChartLimits, PixelRange, Viewport};
use crate::error::{PlotError, PlotResult};

use super::ChartStyle;

pub const PANEL_COUNT: usize = 3;

/// The stacked Y dimensions, in top-to-bottom panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YDimension {
    Horsepower,
    CityMpg,
    HighwayMpg,
}

impl YDimension {
    pub const ALL: [Self; PANEL_COUNT] = [Self::Horsepower, Self::CityMpg, Self::HighwayMpg];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Horsepower => "horsepower",
            Self::CityMpg => "city mpg",
            Self::HighwayMpg => "highway mpg",
        }
    }

    #[must_use]
    pub fn value_of(self, record: &CarRecord) -> f64 {
        match self {
            Self::Horsepower => record.horsepower,
            Self::CityMpg => record.city_mpg,
            Self::HighwayMpg => record.highway_mpg,
        }
    }

    #[must_use]
    pub fn limits_of(self, limits: &ChartLimits) -> AxisLimits {
        match self {
            Self::Horsepower => limits.horsepower,
            Self::CityMpg => limits.city_mpg,
            Self::HighwayMpg => limits.highway_mpg,
        }
    }
}

/// One stacked scatter panel in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelRegion {
    pub dimension: YDimension,
    pub top: f64,
    pub bottom: f64,
}

impl PanelRegion {
    /// Inverted Y range: larger domain values land higher on screen.
    #[must_use]
    pub fn y_range(self) -> PixelRange {
        PixelRange::new(self.bottom, self.top)
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn mid_y(self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

/// Pixel geometry for one render pass: the shared X band, the repeated
/// X-axis strip height, and the three stacked panel regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub x_range: PixelRange,
    pub x_axis_height: f64,
    /// X position of each panel's Y-axis line (left edge of the plot band).
    pub y_axis_x: f64,
    pub panels: [PanelRegion; PANEL_COUNT],
}

/// Splits the viewport into three stacked panels sharing one X band.
///
/// Each panel reserves an X-axis strip below it for the repeated tick
/// labels; the left margin holds the rotated panel title plus the estimated
/// Y tick label width. Fails when the viewport is invalid or too small to
/// hold positive panel extents.
pub fn measure_layout(
    viewport: Viewport,
    style: &ChartStyle,
    y_label_width_px: f64,
) -> PlotResult<PanelLayout> {
    if !viewport.is_valid() {
        return Err(PlotError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);
    let x_axis_height = style.tick_length_px + style.label_margin_px + style.label_size_px;

    let x_start =
        style.padding_px + style.label_size_px + style.label_margin_px + y_label_width_px;
    let x_end = width - style.padding_px;
    if x_end - x_start <= 0.0 {
        return Err(PlotError::InvalidData(format!(
            "viewport width {width} leaves no room for the plot band"
        )));
    }

    let panel_height =
        (height - style.padding_px) / PANEL_COUNT as f64 - style.padding_px - x_axis_height;
    if panel_height <= 0.0 {
        return Err(PlotError::InvalidData(format!(
            "viewport height {height} leaves no room for {PANEL_COUNT} stacked panels"
        )));
    }

    let stride = panel_height + x_axis_height + style.padding_px;
    let panels = std::array::from_fn(|index| {
        let top = style.padding_px + stride * index as f64;
        PanelRegion {
            dimension: YDimension::ALL[index],
            top,
            bottom: top + panel_height,
        }
    });

    Ok(PanelLayout {
        x_range: PixelRange::new(x_start, x_end),
        x_axis_height,
        y_axis_x: x_start,
        panels,
    })
}
