use crate::render::Color;

/// Immutable visual theme, constructed once at startup and passed explicitly
/// into renderer construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    /// Color-scale endpoint for the highest categorical value.
    pub primary_color: Color,
    /// Color-scale endpoint for the lowest categorical value.
    pub secondary_color: Color,
    pub axis_color: Color,
    pub label_color: Color,
    pub selection_outline_color: Color,
    pub padding_px: f64,
    pub point_radius_px: f64,
    pub selected_stroke_width_px: f64,
    pub legend_stroke_width_px: f64,
    pub glow_radius_px: f64,
    pub label_size_px: f64,
    pub label_margin_px: f64,
    pub axis_line_width_px: f64,
    pub tick_length_px: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            primary_color: Color::rgb(0.25, 0.32, 0.71),
            secondary_color: Color::rgb(0.41, 0.70, 0.64),
            axis_color: Color::rgb(0.0, 0.0, 0.0),
            label_color: Color::rgb(0.0, 0.0, 0.0),
            selection_outline_color: Color::rgb(0.0, 0.0, 0.0),
            padding_px: 15.0,
            point_radius_px: 4.0,
            selected_stroke_width_px: 2.0,
            legend_stroke_width_px: 1.0,
            glow_radius_px: 6.0,
            label_size_px: 12.0,
            label_margin_px: 5.0,
            axis_line_width_px: 1.0,
            tick_length_px: 4.0,
        }
    }
}
