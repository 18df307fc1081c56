mod axis;
mod chart_config;
mod chart_style;
mod color_scale;
mod layout;
mod legend;
mod scatter_chart;
mod table_mirror;

pub use chart_config::{RenderOptions, ScatterChartConfig};
pub use chart_style::ChartStyle;
pub use color_scale::{CategoricalColorScale, Category, ColorProperty};
pub use layout::{PANEL_COUNT, PanelLayout, PanelRegion, YDimension, measure_layout};
pub use legend::{ChartLegend, LegendConfig};
pub use scatter_chart::{ChartRenderStats, RenderPhase, ScatterChart};
pub use table_mirror::{RowSink, SelectionTableMirror};
