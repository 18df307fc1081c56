use std::cell::{Ref, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::x_key::format_tick_number;
use crate::core::{
    CarId, ChartLimits, LinearScale, Viewport, XKeyTransformer, compute_limits,
};
use crate::error::{PlotError, PlotResult};
use crate::observe::SubscriptionId;
use crate::render::{
    CirclePrimitive, Color, LayeredFrame, LinePrimitive, RenderFrame, Renderer, SceneLayerKind,
    TextHAlign, TextPrimitive,
};
use crate::source::CarDataSource;

use super::axis::{
    X_TICK_TARGET_SPACING_PX, Y_TICK_TARGET_SPACING_PX, estimate_label_width_px,
    estimate_y_axis_width_px, linear_ticks, select_ticks_with_min_spacing, tick_target_count,
};
use super::layout::{PANEL_COUNT, PanelLayout, measure_layout};
use super::{CategoricalColorScale, ChartStyle, RenderOptions, ScatterChartConfig};

/// Steps of one full render pass, in execution order.
///
/// Passes run synchronously to completion; overlapping passes are rejected
/// rather than interleaved, so the phase is back at `Idle` whenever host
/// code can observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPhase {
    #[default]
    Idle,
    MeasuringLayout,
    ComputingDomains,
    DrawingAxes,
    DrawingPoints,
}

/// Pass counters exposed for hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChartRenderStats {
    /// Layout + domains + full redraw.
    pub full_passes: u64,
    /// Decoration-only recomposition (selection outline, hover glow).
    pub patch_passes: u64,
}

/// Retained pixel position of one record's point in one panel.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PointVisual {
    cx: f64,
    cy: f64,
    fill: Color,
}

type VisualRegistry = IndexMap<CarId, SmallVec<[PointVisual; 3]>>;

struct RetainedScene {
    layers: LayeredFrame,
    visuals: VisualRegistry,
}

struct ChartCore<R> {
    renderer: R,
    viewport: Viewport,
    config: ScatterChartConfig,
    style: ChartStyle,
    phase: RenderPhase,
    scene: Option<RetainedScene>,
    stats: ChartRenderStats,
}

struct StreamSubscriptions {
    data: SubscriptionId,
    selection: SubscriptionId,
    focus: SubscriptionId,
}

/// Interactive three-panel scatter chart.
///
/// The chart holds a read-only handle onto the data source and reacts to its
/// notification streams: a data change re-runs the full pass, selection and
/// focus changes only recompose the decoration layers of the retained scene.
/// Pointer input never mutates visuals directly; it is routed through the
/// data source so every consumer observes the same transitions.
pub struct ScatterChart<R: Renderer> {
    core: Rc<RefCell<ChartCore<R>>>,
    source: CarDataSource,
    subscriptions: RefCell<Option<StreamSubscriptions>>,
}

impl<R: Renderer + 'static> ScatterChart<R> {
    /// Builds the chart and attaches it to the source's streams.
    ///
    /// Fails immediately when the configured viewport is invalid; nothing is
    /// partially constructed in that case.
    pub fn new(
        renderer: R,
        source: &CarDataSource,
        config: ScatterChartConfig,
        style: ChartStyle,
    ) -> PlotResult<Self> {
        if !config.viewport.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: config.viewport.width,
                height: config.viewport.height,
            });
        }

        let core = Rc::new(RefCell::new(ChartCore {
            renderer,
            viewport: config.viewport,
            config,
            style,
            phase: RenderPhase::Idle,
            scene: None,
            stats: ChartRenderStats::default(),
        }));

        let data_core = Rc::clone(&core);
        let data_source = source.clone();
        let data = source.subscribe_data_changed(move |event| {
            trace!(record_count = event.record_count, "chart re-rendering after data change");
            let Ok(mut core) = data_core.try_borrow_mut() else {
                warn!("full render skipped: a render pass is already in flight");
                return;
            };
            if let Err(error) = core.run_full_pass(&data_source) {
                warn!(%error, "render pass after data change failed");
            }
        });

        let selection_core = Rc::clone(&core);
        let selection_source = source.clone();
        let selection = source.subscribe_selection(move |event| {
            trace!(id = %event.id, selected = event.selected, "chart patching selection");
            let Ok(mut core) = selection_core.try_borrow_mut() else {
                warn!("selection patch skipped: a render pass is already in flight");
                return;
            };
            if let Err(error) = core.apply_decoration_patch(&selection_source) {
                warn!(%error, "selection patch failed");
            }
        });

        let focus_core = Rc::clone(&core);
        let focus_source = source.clone();
        let focus = source.subscribe_focus(move |change| {
            trace!(old = ?change.old, new = ?change.new, "chart patching focus");
            let Ok(mut core) = focus_core.try_borrow_mut() else {
                warn!("focus patch skipped: a render pass is already in flight");
                return;
            };
            if let Err(error) = core.apply_focus_patch(&focus_source) {
                warn!(%error, "focus patch failed");
            }
        });

        Ok(Self {
            core,
            source: source.clone(),
            subscriptions: RefCell::new(Some(StreamSubscriptions {
                data,
                selection,
                focus,
            })),
        })
    }

    /// Runs one full render pass with the current configuration.
    pub fn render(&self) -> PlotResult<()> {
        let mut core = self
            .core
            .try_borrow_mut()
            .map_err(|_| PlotError::RenderInProgress)?;
        core.run_full_pass(&self.source)
    }

    /// Applies configuration overrides, then runs one full render pass.
    /// Overrides persist for subsequent passes.
    pub fn render_with(&self, options: RenderOptions) -> PlotResult<()> {
        {
            let mut core = self
                .core
                .try_borrow_mut()
                .map_err(|_| PlotError::RenderInProgress)?;
            if let Some(x_axis) = options.x_axis {
                core.config.x_axis = x_axis;
            }
            if let Some(color_property) = options.color_property {
                core.config.color_property = color_property;
            }
        }
        self.render()
    }

    /// Routes pointer position into the focus pointer: the nearest point
    /// under the cursor becomes current, no point clears it.
    pub fn pointer_move(&self, x: f64, y: f64) -> PlotResult<()> {
        let hit = self
            .core
            .try_borrow()
            .map_err(|_| PlotError::RenderInProgress)?
            .hit_test(x, y);
        self.source.set_current(hit);
        Ok(())
    }

    pub fn pointer_leave(&self) {
        self.source.set_current(None);
    }

    /// Toggles selection of the point under the cursor, if any.
    pub fn click(&self, x: f64, y: f64) -> PlotResult<()> {
        let hit = self
            .core
            .try_borrow()
            .map_err(|_| PlotError::RenderInProgress)?
            .hit_test(x, y);
        if let Some(id) = hit {
            self.source.toggle(id);
        }
        Ok(())
    }

    #[must_use]
    pub fn stats(&self) -> ChartRenderStats {
        self.core.borrow().stats
    }

    #[must_use]
    pub fn render_phase(&self) -> RenderPhase {
        self.core.borrow().phase
    }

    #[must_use]
    pub fn config(&self) -> ScatterChartConfig {
        self.core.borrow().config
    }

    /// Flattened copy of the retained scene, `None` before the first
    /// successful pass.
    #[must_use]
    pub fn current_frame(&self) -> Option<RenderFrame> {
        self.core
            .borrow()
            .scene
            .as_ref()
            .map(|scene| scene.layers.flatten())
    }

    /// Read access to the backend, e.g. to grab an SVG document.
    #[must_use]
    pub fn renderer(&self) -> Ref<'_, R> {
        Ref::map(self.core.borrow(), |core| &core.renderer)
    }

    /// Detaches the chart from all three data-source streams.
    ///
    /// The retained scene stays visible; the chart just stops reacting.
    /// Also invoked on drop, and safe to call more than once.
    pub fn dispose(&self) {
        if let Some(subscriptions) = self.subscriptions.borrow_mut().take() {
            self.source.unsubscribe_data_changed(subscriptions.data);
            self.source.unsubscribe_selection(subscriptions.selection);
            self.source.unsubscribe_focus(subscriptions.focus);
            debug!("chart detached from data source streams");
        }
    }
}

impl<R: Renderer> Drop for ScatterChart<R> {
    fn drop(&mut self) {
        if let Some(subscriptions) = self.subscriptions.borrow_mut().take() {
            self.source.unsubscribe_data_changed(subscriptions.data);
            self.source.unsubscribe_selection(subscriptions.selection);
            self.source.unsubscribe_focus(subscriptions.focus);
        }
    }
}

impl<R: Renderer> ChartCore<R> {
    fn run_full_pass(&mut self, source: &CarDataSource) -> PlotResult<()> {
        let result = self.full_pass_inner(source);
        self.phase = RenderPhase::Idle;
        match &result {
            Ok(()) => self.stats.full_passes += 1,
            // The previous retained scene stays visible on failure.
            Err(error) => warn!(%error, "full render pass aborted"),
        }
        result
    }

    fn full_pass_inner(&mut self, source: &CarDataSource) -> PlotResult<()> {
        self.phase = RenderPhase::MeasuringLayout;
        let viewport = self.viewport;
        if !viewport.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        self.phase = RenderPhase::ComputingDomains;
        let transformer = XKeyTransformer::for_axis(self.config.x_axis);
        let records = source.records();
        let limits = compute_limits(records.records(), transformer);

        self.phase = RenderPhase::DrawingAxes;
        let y_label_width = estimate_y_axis_width_px(&limits, &self.style);
        let layout = measure_layout(viewport, &self.style, y_label_width)?;
        let mut layers = LayeredFrame::new(viewport);
        build_axes(&mut layers, &layout, &limits, transformer, &self.style)?;

        self.phase = RenderPhase::DrawingPoints;
        let scale = CategoricalColorScale::new(
            self.config.color_property,
            self.style.secondary_color,
            self.style.primary_color,
        );
        let x_scale = LinearScale::new(limits.x.min, limits.x.max)?;
        let y_scales = y_scales_for(&layout, &limits)?;

        let mut visuals = VisualRegistry::with_capacity(records.len());
        for record in records.records() {
            let cx = x_scale.project(transformer.project(record), layout.x_range)?;
            let fill = scale.color_of(record);
            let entry = visuals.entry(record.id).or_default();
            for (panel, y_scale) in layout.panels.iter().zip(&y_scales) {
                let cy =
                    y_scale.project(panel.dimension.value_of(record), panel.y_range())?;
                layers.layer_mut(SceneLayerKind::Points).circles.push(
                    CirclePrimitive::filled(cx, cy, self.style.point_radius_px, fill),
                );
                entry.push(PointVisual { cx, cy, fill });
            }
        }
        drop(records);

        let mut scene = RetainedScene { layers, visuals };
        rebuild_selection_layer(&mut scene, source, &self.style);
        rebuild_focus_layer(&mut scene, source, &self.style);

        let frame = scene.layers.flatten();
        self.renderer.render(&frame)?;
        debug!(
            records = scene.visuals.len(),
            circles = frame.circles.len(),
            "full render pass committed"
        );
        self.scene = Some(scene);
        Ok(())
    }

    /// Recomposes both decoration layers; selection changes also move the
    /// glow width of a focused point between its plain and selected size.
    fn apply_decoration_patch(&mut self, source: &CarDataSource) -> PlotResult<()> {
        let Some(scene) = self.scene.as_mut() else {
            return Ok(());
        };
        rebuild_selection_layer(scene, source, &self.style);
        rebuild_focus_layer(scene, source, &self.style);
        let frame = scene.layers.flatten();
        self.renderer.render(&frame)?;
        self.stats.patch_passes += 1;
        Ok(())
    }

    fn apply_focus_patch(&mut self, source: &CarDataSource) -> PlotResult<()> {
        let Some(scene) = self.scene.as_mut() else {
            return Ok(());
        };
        rebuild_focus_layer(scene, source, &self.style);
        let frame = scene.layers.flatten();
        self.renderer.render(&frame)?;
        self.stats.patch_passes += 1;
        Ok(())
    }

    /// Nearest retained point within the point radius, if any.
    fn hit_test(&self, x: f64, y: f64) -> Option<CarId> {
        let scene = self.scene.as_ref()?;
        let mut best: Option<(OrderedFloat<f64>, CarId)> = None;
        for (id, points) in &scene.visuals {
            for visual in points {
                let distance =
                    OrderedFloat(((visual.cx - x).powi(2) + (visual.cy - y).powi(2)).sqrt());
                if *distance > self.style.point_radius_px {
                    continue;
                }
                match best {
                    Some((current, _)) if current <= distance => {}
                    _ => best = Some((distance, *id)),
                }
            }
        }
        best.map(|(_, id)| id)
    }
}

/// Redraws every selected point with its selection outline on the layer
/// above the base points, matching a raised outlined circle.
fn rebuild_selection_layer(scene: &mut RetainedScene, source: &CarDataSource, style: &ChartStyle) {
    scene.layers.clear_layer(SceneLayerKind::Selection);
    for id in source.selected().iter() {
        // Dangling ids after a reload simply have no visuals.
        let Some(points) = scene.visuals.get(id) else {
            continue;
        };
        for visual in points {
            scene.layers.layer_mut(SceneLayerKind::Selection).circles.push(
                CirclePrimitive::filled(visual.cx, visual.cy, style.point_radius_px, visual.fill)
                    .with_stroke(style.selected_stroke_width_px, style.selection_outline_color),
            );
        }
    }
}

/// Redraws the focused point set with its hover glow on the topmost layer;
/// rebuilding from the source's current focus makes repeated focus events
/// idempotent.
fn rebuild_focus_layer(scene: &mut RetainedScene, source: &CarDataSource, style: &ChartStyle) {
    scene.layers.clear_layer(SceneLayerKind::Focus);
    let Some(id) = source.current() else {
        return;
    };
    let Some(points) = scene.visuals.get(&id) else {
        return;
    };

    let selected = source.is_selected(id);
    let halo = if selected {
        style.glow_radius_px + style.selected_stroke_width_px
    } else {
        style.glow_radius_px
    };
    for visual in points {
        let mut circle =
            CirclePrimitive::filled(visual.cx, visual.cy, style.point_radius_px, visual.fill)
                .with_halo(halo);
        if selected {
            circle =
                circle.with_stroke(style.selected_stroke_width_px, style.selection_outline_color);
        }
        scene
            .layers
            .layer_mut(SceneLayerKind::Focus)
            .circles
            .push(circle);
    }
}

fn y_scales_for(
    layout: &PanelLayout,
    limits: &ChartLimits,
) -> PlotResult<[LinearScale; PANEL_COUNT]> {
    let mut scales = [LinearScale::new(0.0, 0.0)?; PANEL_COUNT];
    for (scale, panel) in scales.iter_mut().zip(&layout.panels) {
        let axis = panel.dimension.limits_of(limits);
        *scale = LinearScale::new(axis.min, axis.max)?;
    }
    Ok(scales)
}

fn build_axes(
    layers: &mut LayeredFrame,
    layout: &PanelLayout,
    limits: &ChartLimits,
    transformer: XKeyTransformer,
    style: &ChartStyle,
) -> PlotResult<()> {
    let x_scale = LinearScale::new(limits.x.min, limits.x.max)?;
    let x_ticks = x_tick_positions(transformer, limits, x_scale, layout, style)?;
    let y_scales = y_scales_for(layout, limits)?;

    let axis = layers.layer_mut(SceneLayerKind::Axis);
    for (panel, y_scale) in layout.panels.iter().zip(&y_scales) {
        // Shared X axis, repeated under every panel.
        axis.lines.push(LinePrimitive::new(
            layout.x_range.start,
            panel.bottom,
            layout.x_range.end,
            panel.bottom,
            style.axis_line_width_px,
            style.axis_color,
        ));
        for (value, px) in &x_ticks {
            axis.lines.push(LinePrimitive::new(
                *px,
                panel.bottom,
                *px,
                panel.bottom + style.tick_length_px,
                style.axis_line_width_px,
                style.axis_color,
            ));
            let label = transformer.format_tick(*value);
            if label.is_empty() {
                continue;
            }
            axis.texts.push(TextPrimitive::new(
                label,
                *px,
                panel.bottom + style.tick_length_px + style.label_margin_px + style.label_size_px,
                style.label_size_px,
                style.label_color,
                TextHAlign::Center,
            ));
        }

        // Per-panel Y axis.
        axis.lines.push(LinePrimitive::new(
            layout.y_axis_x,
            panel.top,
            layout.y_axis_x,
            panel.bottom,
            style.axis_line_width_px,
            style.axis_color,
        ));
        let y_axis = panel.dimension.limits_of(limits);
        let tick_count = tick_target_count(panel.height(), Y_TICK_TARGET_SPACING_PX, 2, 6);
        for value in linear_ticks(y_axis, tick_count) {
            let py = y_scale.project(value, panel.y_range())?;
            axis.lines.push(LinePrimitive::new(
                layout.y_axis_x - style.tick_length_px,
                py,
                layout.y_axis_x,
                py,
                style.axis_line_width_px,
                style.axis_color,
            ));
            axis.texts.push(TextPrimitive::new(
                format_tick_number(value),
                layout.y_axis_x - style.tick_length_px - style.label_margin_px,
                py + style.label_size_px / 3.0,
                style.label_size_px,
                style.label_color,
                TextHAlign::Right,
            ));
        }

        // Rotated panel title along the left edge.
        axis.texts.push(
            TextPrimitive::new(
                panel.dimension.label(),
                style.padding_px + style.label_size_px,
                panel.mid_y(),
                style.label_size_px,
                style.label_color,
                TextHAlign::Center,
            )
            .rotated(),
        );
    }
    Ok(())
}

/// Projected X tick candidates thinned to readable spacing.
fn x_tick_positions(
    transformer: XKeyTransformer,
    limits: &ChartLimits,
    x_scale: LinearScale,
    layout: &PanelLayout,
    style: &ChartStyle,
) -> PlotResult<Vec<(f64, f64)>> {
    let values = match transformer.categorical_tick_values() {
        Some(values) => values
            .into_iter()
            .filter(|value| limits.x.contains(*value))
            .collect(),
        None => {
            let count =
                tick_target_count(layout.x_range.span(), X_TICK_TARGET_SPACING_PX, 2, 8);
            linear_ticks(limits.x, count)
        }
    };

    let mut candidates = Vec::with_capacity(values.len());
    let mut widest_label = 0.0_f64;
    for value in values {
        let px = x_scale.project(value, layout.x_range)?;
        widest_label = widest_label.max(estimate_label_width_px(
            &transformer.format_tick(value),
            style.label_size_px,
        ));
        candidates.push((value, px));
    }

    Ok(select_ticks_with_min_spacing(
        candidates,
        widest_label + style.label_margin_px,
    ))
}
