use std::cell::{Ref, RefCell};
use std::rc::Rc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::Viewport;
use crate::error::{PlotError, PlotResult};
use crate::observe::SubscriptionId;
use crate::render::{
    Color, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive,
};
use crate::source::CarDataSource;

use super::{Category, CategoricalColorScale, ChartStyle, ColorProperty};

/// Legend bootstrap configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub color_property: ColorProperty,
}

impl LegendConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            color_property: ColorProperty::default(),
        }
    }

    #[must_use]
    pub fn with_color_property(mut self, color_property: ColorProperty) -> Self {
        self.color_property = color_property;
        self
    }
}

/// Retained geometry of one swatch, addressable by its categorical value.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SwatchVisual {
    category: Category,
    x: f64,
    width: f64,
    height: f64,
    fill: Color,
}

struct LegendCore<R> {
    renderer: R,
    viewport: Viewport,
    style: ChartStyle,
    scale: CategoricalColorScale,
    swatches: Vec<SwatchVisual>,
    emphasized: IndexSet<Category>,
    rendered_once: bool,
}

struct StreamSubscriptions {
    data: SubscriptionId,
    selection: SubscriptionId,
    focus: SubscriptionId,
}

/// Discrete color legend kept in sync with the chart's coloring property.
///
/// One swatch per domain value; a swatch gains a thicker border while the
/// focused record or any selected record maps to its value. Focus and
/// selection changes only restroke the retained swatches; dataset or
/// property changes re-render fully.
pub struct ChartLegend<R: Renderer> {
    core: Rc<RefCell<LegendCore<R>>>,
    source: CarDataSource,
    subscriptions: RefCell<Option<StreamSubscriptions>>,
}

impl<R: Renderer + 'static> ChartLegend<R> {
    pub fn new(
        renderer: R,
        source: &CarDataSource,
        config: LegendConfig,
        style: ChartStyle,
    ) -> PlotResult<Self> {
        if !config.viewport.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: config.viewport.width,
                height: config.viewport.height,
            });
        }

        let core = Rc::new(RefCell::new(LegendCore {
            renderer,
            viewport: config.viewport,
            style,
            scale: CategoricalColorScale::new(
                config.color_property,
                style.secondary_color,
                style.primary_color,
            ),
            swatches: Vec::new(),
            emphasized: IndexSet::new(),
            rendered_once: false,
        }));

        let data_core = Rc::clone(&core);
        let data_source = source.clone();
        let data = source.subscribe_data_changed(move |_| {
            let Ok(mut core) = data_core.try_borrow_mut() else {
                warn!("legend full render skipped: a pass is already in flight");
                return;
            };
            if let Err(error) = core.run_full_pass(&data_source) {
                warn!(%error, "legend render after data change failed");
            }
        });

        let selection_core = Rc::clone(&core);
        let selection_source = source.clone();
        let selection = source.subscribe_selection(move |event| {
            trace!(id = %event.id, selected = event.selected, "legend patching emphasis");
            let Ok(mut core) = selection_core.try_borrow_mut() else {
                warn!("legend emphasis patch skipped: a pass is already in flight");
                return;
            };
            if let Err(error) = core.apply_emphasis_patch(&selection_source) {
                warn!(%error, "legend emphasis patch failed");
            }
        });

        let focus_core = Rc::clone(&core);
        let focus_source = source.clone();
        let focus = source.subscribe_focus(move |change| {
            trace!(old = ?change.old, new = ?change.new, "legend patching emphasis");
            let Ok(mut core) = focus_core.try_borrow_mut() else {
                warn!("legend emphasis patch skipped: a pass is already in flight");
                return;
            };
            if let Err(error) = core.apply_emphasis_patch(&focus_source) {
                warn!(%error, "legend emphasis patch failed");
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

    /// Full render with the current coloring property.
    pub fn render(&self) -> PlotResult<()> {
        let mut core = self
            .core
            .try_borrow_mut()
            .map_err(|_| PlotError::RenderInProgress)?;
        core.run_full_pass(&self.source)
    }

    /// Switches the coloring property and re-renders fully.
    pub fn render_with(&self, color_property: ColorProperty) -> PlotResult<()> {
        {
            let mut core = self
                .core
                .try_borrow_mut()
                .map_err(|_| PlotError::RenderInProgress)?;
            let style = core.style;
            core.scale = CategoricalColorScale::new(
                color_property,
                style.secondary_color,
                style.primary_color,
            );
        }
        self.render()
    }

    #[must_use]
    pub fn color_property(&self) -> ColorProperty {
        self.core.borrow().scale.property()
    }

    /// Read access to the backend, e.g. to grab an SVG document.
    #[must_use]
    pub fn renderer(&self) -> Ref<'_, R> {
        Ref::map(self.core.borrow(), |core| &core.renderer)
    }

    /// Detaches the legend from all three data-source streams; safe to call
    /// more than once, also invoked on drop.
    pub fn dispose(&self) {
        if let Some(subscriptions) = self.subscriptions.borrow_mut().take() {
            self.source.unsubscribe_data_changed(subscriptions.data);
            self.source.unsubscribe_selection(subscriptions.selection);
            self.source.unsubscribe_focus(subscriptions.focus);
            debug!("legend detached from data source streams");
        }
    }
}

impl<R: Renderer> Drop for ChartLegend<R> {
    fn drop(&mut self) {
        if let Some(subscriptions) = self.subscriptions.borrow_mut().take() {
            self.source.unsubscribe_data_changed(subscriptions.data);
            self.source.unsubscribe_selection(subscriptions.selection);
            self.source.unsubscribe_focus(subscriptions.focus);
        }
    }
}

impl<R: Renderer> LegendCore<R> {
    fn run_full_pass(&mut self, source: &CarDataSource) -> PlotResult<()> {
        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        let domain = self.scale.domain();
        let swatch_width = width / domain.len() as f64;
        let swatch_height = height / 2.0;

        self.swatches = domain
            .iter()
            .enumerate()
            .map(|(index, category)| SwatchVisual {
                category: *category,
                x: swatch_width * index as f64,
                width: swatch_width,
                height: swatch_height,
                fill: self.scale.color_for(*category),
            })
            .collect();
        self.recompute_emphasis(source);

        let frame = self.compose_frame();
        self.renderer.render(&frame)?;
        self.rendered_once = true;
        debug!(swatches = self.swatches.len(), "legend full render committed");
        Ok(())
    }

    fn apply_emphasis_patch(&mut self, source: &CarDataSource) -> PlotResult<()> {
        if !self.rendered_once {
            return Ok(());
        }
        self.recompute_emphasis(source);
        let frame = self.compose_frame();
        self.renderer.render(&frame)
    }

    /// Emphasized swatches are those whose value the focused record or any
    /// selected record carries. Ids may be stale after a reload, so records
    /// are looked up defensively.
    fn recompute_emphasis(&mut self, source: &CarDataSource) {
        self.emphasized.clear();
        if let Some(id) = source.current() {
            if let Some(record) = source.find(id) {
                self.emphasized.insert(self.scale.category_of(&record));
            }
        }
        for id in source.selected().iter() {
            if let Some(record) = source.find(*id) {
                self.emphasized.insert(self.scale.category_of(&record));
            }
        }
    }

    fn compose_frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for swatch in &self.swatches {
            let stroke_width = if self.emphasized.contains(&swatch.category) {
                self.style.selected_stroke_width_px * 2.0
            } else {
                self.style.legend_stroke_width_px
            };
            frame.rects.push(
                RectPrimitive::filled(swatch.x, 0.0, swatch.width, swatch.height, swatch.fill)
                    .with_stroke(stroke_width, self.style.selection_outline_color),
            );
            frame.texts.push(TextPrimitive::new(
                swatch.category.label(),
                swatch.x,
                swatch.height + self.style.label_margin_px + self.style.label_size_px,
                self.style.label_size_px,
                self.style.label_color,
                TextHAlign::Left,
            ));
        }
        frame
    }
}
