//! carplot: an interactive multi-panel scatter-plot engine for a small
//! automobile dataset.
//!
//! The crate is organized around one reactive data source
//! ([`source::CarDataSource`]) that exclusively owns the record collection,
//! the selection set, and the hover focus pointer. Renderers
//! ([`api::ScatterChart`], [`api::ChartLegend`]) and the table mirror hold
//! read-only handles and react to the source's notification streams, so
//! every consumer observes the same sequence of state transitions. Drawing
//! goes through the backend-agnostic [`render::Renderer`] contract.

pub mod api;
pub mod core;
pub mod dataset;
pub mod error;
pub mod observe;
pub mod render;
pub mod source;
pub mod telemetry;

pub use api::{ChartLegend, RenderOptions, ScatterChart, ScatterChartConfig};
pub use error::{PlotError, PlotResult};
pub use source::CarDataSource;
