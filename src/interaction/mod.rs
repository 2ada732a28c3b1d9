//! Interaction state shared between the gesture controller and the renderer.
//!
//! Ownership is explicit: the zoom/pan controller writes this state, the
//! frame builder only reads it. No closures capture mutable handles.

pub mod zoom;

use serde::{Deserialize, Serialize};

pub use zoom::{ZoomAxes, ZoomAxisMode, ZoomPanConfig, ZoomPanController};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Panning,
    Selecting,
}

/// Raw pointer gestures arriving from the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureKind {
    Wheel,
    Drag,
    /// Reserved for other semantics (e.g. card focus); never zooms.
    DoubleClick,
}

impl GestureKind {
    /// Gesture filter: which gestures may manipulate the zoom transform.
    #[must_use]
    pub const fn manipulates_transform(self) -> bool {
        match self {
            Self::Wheel | Self::Drag => true,
            Self::DoubleClick => false,
        }
    }
}

/// Screen-space selection rectangle, in drag order (not normalized).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl SelectionRect {
    /// Corner-normalized bounds `(min_x, min_y, max_x, max_y)`.
    #[must_use]
    pub fn normalized(self) -> (f64, f64, f64, f64) {
        (
            self.x0.min(self.x1),
            self.y0.min(self.y1),
            self.x0.max(self.x1),
            self.y0.max(self.y1),
        )
    }

    #[must_use]
    pub fn width(self) -> f64 {
        (self.x1 - self.x0).abs()
    }

    #[must_use]
    pub fn height(self) -> f64 {
        (self.y1 - self.y0).abs()
    }
}

/// Interaction snapshot read by the frame builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct InteractionState {
    mode: InteractionMode,
    cursor_x: f64,
    cursor_y: f64,
    selection: Option<SelectionRect>,
}

impl InteractionState {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn is_interacting(self) -> bool {
        self.mode != InteractionMode::Idle
    }

    #[must_use]
    pub fn cursor(self) -> (f64, f64) {
        (self.cursor_x, self.cursor_y)
    }

    /// Active selection rectangle, present only while range-selecting.
    #[must_use]
    pub fn selection(self) -> Option<SelectionRect> {
        self.selection
    }

    pub(crate) fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    pub(crate) fn set_cursor(&mut self, x: f64, y: f64) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub(crate) fn set_selection(&mut self, selection: Option<SelectionRect>) {
        self.selection = selection;
    }
}

#[cfg(test)]
mod tests {
    use super::{GestureKind, SelectionRect};

    #[test]
    fn double_click_never_manipulates_transform() {
        assert!(GestureKind::Wheel.manipulates_transform());
        assert!(GestureKind::Drag.manipulates_transform());
        assert!(!GestureKind::DoubleClick.manipulates_transform());
    }

    #[test]
    fn selection_rect_normalizes_any_drag_direction() {
        let rect = SelectionRect {
            x0: 300.0,
            y0: 50.0,
            x1: 100.0,
            y1: 200.0,
        };
        assert_eq!(rect.normalized(), (100.0, 50.0, 300.0, 200.0));
    }
}
