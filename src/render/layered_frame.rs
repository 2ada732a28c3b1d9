use crate::core::Viewport;
use crate::render::{
    CanvasLayerKind, LinePrimitive, MarkerPrimitive, RectPrimitive, RenderFrame, TextPrimitive,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LayerPrimitives {
    pub kind: CanvasLayerKind,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub markers: Vec<MarkerPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl LayerPrimitives {
    fn empty(kind: CanvasLayerKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
            rects: Vec::new(),
            markers: Vec::new(),
            texts: Vec::new(),
        }
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.rects.clear();
        self.markers.clear();
        self.texts.clear();
    }
}

/// Render-pass scene separated into tagged canvas layers.
///
/// A regular render pass clears only the mutable layers; persistent layers
/// (background fill, reference-line overlay) keep their primitives until the
/// definition changes and `clear_all_layers` is called.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredRenderFrame {
    pub viewport: Viewport,
    layers: Vec<LayerPrimitives>,
}

impl LayeredRenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        let layers = CanvasLayerKind::canonical_order()
            .into_iter()
            .map(LayerPrimitives::empty)
            .collect();
        Self { viewport, layers }
    }

    #[must_use]
    pub fn layers(&self) -> &[LayerPrimitives] {
        &self.layers
    }

    #[must_use]
    pub fn layer(&self, kind: CanvasLayerKind) -> Option<&LayerPrimitives> {
        self.layers.iter().find(|layer| layer.kind == kind)
    }

    /// Begins a regular render pass: mutable layers are cleared, persistent
    /// layers are left intact.
    pub fn clear_mutable_layers(&mut self) {
        for layer in &mut self.layers {
            if !layer.kind.is_persistent() {
                layer.clear();
            }
        }
    }

    /// Full reset, used when the chart definition itself changed.
    pub fn clear_all_layers(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }

    pub fn push_line(&mut self, kind: CanvasLayerKind, line: LinePrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.lines.push(line);
        }
    }

    pub fn push_rect(&mut self, kind: CanvasLayerKind, rect: RectPrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.rects.push(rect);
        }
    }

    pub fn push_marker(&mut self, kind: CanvasLayerKind, marker: MarkerPrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.markers.push(marker);
        }
    }

    pub fn push_text(&mut self, kind: CanvasLayerKind, text: TextPrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.texts.push(text);
        }
    }

    /// Flattens all layers into one backend frame, in canonical paint order.
    #[must_use]
    pub fn flatten(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for layer in &self.layers {
            frame.lines.extend(layer.lines.iter().copied());
            frame.rects.extend(layer.rects.iter().copied());
            frame.markers.extend(layer.markers.iter().copied());
            frame.texts.extend(layer.texts.iter().cloned());
        }
        frame
    }

    fn layer_mut(&mut self, kind: CanvasLayerKind) -> Option<&mut LayerPrimitives> {
        self.layers.iter_mut().find(|layer| layer.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::LayeredRenderFrame;
    use crate::core::Viewport;
    use crate::render::{CanvasLayerKind, Color, LinePrimitive};

    fn line(y: f64) -> LinePrimitive {
        LinePrimitive::new(0.0, y, 5.0, y, 1.0, Color::rgb(0.5, 0.5, 0.5))
    }

    #[test]
    fn flatten_preserves_canonical_layer_order() {
        let mut layered = LayeredRenderFrame::new(Viewport::new(100, 50));
        layered.push_line(CanvasLayerKind::Series, line(2.0));
        layered.push_line(CanvasLayerKind::Grid, line(1.0));

        let flattened = layered.flatten();
        assert_eq!(flattened.lines.len(), 2);
        // Grid paints before Series regardless of push order.
        assert_eq!(flattened.lines[0].y1, 1.0);
        assert_eq!(flattened.lines[1].y1, 2.0);
    }

    #[test]
    fn mutable_clear_keeps_persistent_overlay() {
        let mut layered = LayeredRenderFrame::new(Viewport::new(100, 50));
        layered.push_line(CanvasLayerKind::Overlay, line(3.0));
        layered.push_line(CanvasLayerKind::Series, line(2.0));

        layered.clear_mutable_layers();
        let overlay = layered.layer(CanvasLayerKind::Overlay).expect("overlay");
        let series = layered.layer(CanvasLayerKind::Series).expect("series");
        assert_eq!(overlay.lines.len(), 1);
        assert!(series.lines.is_empty());

        layered.clear_all_layers();
        let overlay = layered.layer(CanvasLayerKind::Overlay).expect("overlay");
        assert!(overlay.lines.is_empty());
        assert!(layered.flatten().is_empty());
    }
}
