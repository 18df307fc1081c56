use crate::core::{AxisLimits, ChartLimits};
use crate::core::x_key::format_tick_number;

use super::ChartStyle;

pub(super) const X_TICK_TARGET_SPACING_PX: f64 = 72.0;
pub(super) const Y_TICK_TARGET_SPACING_PX: f64 = 32.0;
/// Mean advance width of a sans-serif glyph relative to the font size.
const GLYPH_WIDTH_FACTOR: f64 = 0.6;

/// Tick count derived from the axis extent and a target label spacing.
pub(super) fn tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Evenly spaced tick values across a domain, endpoints included.
pub(super) fn linear_ticks(limits: AxisLimits, tick_count: usize) -> Vec<f64> {
    if tick_count == 0 {
        return Vec::new();
    }
    if tick_count == 1 || limits.min == limits.max {
        return vec![limits.min];
    }

    let span = limits.max - limits.min;
    let denominator = (tick_count - 1) as f64;
    (0..tick_count)
        .map(|index| limits.min + span * (index as f64) / denominator)
        .collect()
}

/// Drops tick candidates that would land closer than `min_spacing_px`,
/// keeping the first of each cluster. Candidates are `(value, pixel)` pairs
/// sorted by pixel position.
pub(super) fn select_ticks_with_min_spacing(
    mut ticks: Vec<(f64, f64)>,
    min_spacing_px: f64,
) -> Vec<(f64, f64)> {
    ticks.sort_by(|left, right| left.1.total_cmp(&right.1));
    if ticks.len() <= 1 || !min_spacing_px.is_finite() || min_spacing_px <= 0.0 {
        return ticks;
    }

    let mut selected: Vec<(f64, f64)> = Vec::with_capacity(ticks.len());
    for tick in ticks {
        match selected.last() {
            Some(last) if tick.1 - last.1 < min_spacing_px => {}
            _ => selected.push(tick),
        }
    }
    selected
}

/// Deterministic width estimate for a tick label, replacing the DOM
/// bounding-box measurement of a browser host.
pub(super) fn estimate_label_width_px(text: &str, font_size_px: f64) -> f64 {
    text.chars().count() as f64 * font_size_px * GLYPH_WIDTH_FACTOR
}

/// Widest Y tick label across the three stacked panels, estimated from the
/// formatted domain bounds.
pub(super) fn estimate_y_axis_width_px(limits: &ChartLimits, style: &ChartStyle) -> f64 {
    [limits.horsepower, limits.city_mpg, limits.highway_mpg]
        .into_iter()
        .flat_map(|axis| [axis.min, axis.max])
        .map(|value| estimate_label_width_px(&format_tick_number(value), style.label_size_px))
        .fold(0.0, f64::max)
}
