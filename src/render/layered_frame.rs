use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::render::{CirclePrimitive, LinePrimitive, RectPrimitive, RenderFrame, TextPrimitive};

/// Scene layers in draw order, bottom first.
///
/// Decoration layers (`Selection`, `Focus`) recompose independently of the
/// base layers, which is what lets selection and hover patches skip layout
/// and domain work. `Focus` is topmost so a focused point always raises
/// above its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneLayerKind {
    Axis,
    Points,
    Selection,
    Focus,
}

impl SceneLayerKind {
    pub const DRAW_ORDER: [Self; 4] = [Self::Axis, Self::Points, Self::Selection, Self::Focus];
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerPrimitives {
    pub circles: Vec<CirclePrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl LayerPrimitives {
    fn clear(&mut self) {
        self.circles.clear();
        self.lines.clear();
        self.rects.clear();
        self.texts.clear();
    }
}

/// Retained scene split into the canonical layer stack.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredFrame {
    pub viewport: Viewport,
    layers: [LayerPrimitives; SceneLayerKind::DRAW_ORDER.len()],
}

impl LayeredFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layers: Default::default(),
        }
    }

    #[must_use]
    pub fn layer(&self, kind: SceneLayerKind) -> &LayerPrimitives {
        &self.layers[Self::index_of(kind)]
    }

    pub fn layer_mut(&mut self, kind: SceneLayerKind) -> &mut LayerPrimitives {
        &mut self.layers[Self::index_of(kind)]
    }

    pub fn clear_layer(&mut self, kind: SceneLayerKind) {
        self.layers[Self::index_of(kind)].clear();
    }

    /// Flattens the stack into one frame, appending layers in draw order.
    #[must_use]
    pub fn flatten(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for layer in &self.layers {
            frame.circles.extend(layer.circles.iter().copied());
            frame.lines.extend(layer.lines.iter().copied());
            frame.rects.extend(layer.rects.iter().copied());
            frame.texts.extend(layer.texts.iter().cloned());
        }
        frame
    }

    const fn index_of(kind: SceneLayerKind) -> usize {
        match kind {
            SceneLayerKind::Axis => 0,
            SceneLayerKind::Points => 1,
            SceneLayerKind::Selection => 2,
            SceneLayerKind::Focus => 3,
        }
    }
}
