use serde::{Deserialize, Serialize};

use crate::core::{Viewport, XAxisKind};

use super::ColorProperty;

/// Chart bootstrap configuration.
///
/// Serializable so host applications can persist and restore chart setup.
/// The viewport stands in for the mount point of a browser host: an invalid
/// one fails construction immediately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterChartConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub x_axis: XAxisKind,
    #[serde(default)]
    pub color_property: ColorProperty,
}

impl ScatterChartConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            x_axis: XAxisKind::default(),
            color_property: ColorProperty::default(),
        }
    }

    #[must_use]
    pub fn with_x_axis(mut self, x_axis: XAxisKind) -> Self {
        self.x_axis = x_axis;
        self
    }

    #[must_use]
    pub fn with_color_property(mut self, color_property: ColorProperty) -> Self {
        self.color_property = color_property;
        self
    }
}

/// Per-render configuration overrides.
///
/// Set fields replace the chart's current configuration and persist for
/// subsequent passes, mirroring a host that re-renders with new radio-button
/// choices.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default)]
    pub x_axis: Option<XAxisKind>,
    #[serde(default)]
    pub color_property: Option<ColorProperty>,
}

impl RenderOptions {
    #[must_use]
    pub fn x_axis(x_axis: XAxisKind) -> Self {
        Self {
            x_axis: Some(x_axis),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn color_property(color_property: ColorProperty) -> Self {
        Self {
            color_property: Some(color_property),
            ..Self::default()
        }
    }
}
