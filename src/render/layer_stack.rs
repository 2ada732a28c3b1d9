use serde::{Deserialize, Serialize};

/// Canvas layers of one chart card, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Background,
    Grid,
    Series,
    /// Persistent mid-stack layer for placeholder and host-supplied content.
    Overlay,
    Axis,
    Legend,
}

impl CanvasLayerKind {
    /// Persistent layers survive a regular render pass; they are rebuilt only
    /// when the chart definition changes, not on every transform tick.
    #[must_use]
    pub const fn is_persistent(self) -> bool {
        matches!(self, Self::Background | Self::Overlay)
    }

    #[must_use]
    pub const fn canonical_order() -> [Self; 6] {
        [
            Self::Background,
            Self::Grid,
            Self::Series,
            Self::Overlay,
            Self::Axis,
            Self::Legend,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::CanvasLayerKind;

    #[test]
    fn canonical_order_paints_background_first_legend_last() {
        let order = CanvasLayerKind::canonical_order();
        assert_eq!(order[0], CanvasLayerKind::Background);
        assert_eq!(order[order.len() - 1], CanvasLayerKind::Legend);
    }

    #[test]
    fn overlay_and_background_are_persistent() {
        assert!(CanvasLayerKind::Background.is_persistent());
        assert!(CanvasLayerKind::Overlay.is_persistent());
        assert!(!CanvasLayerKind::Series.is_persistent());
        assert!(!CanvasLayerKind::Grid.is_persistent());
    }
}
