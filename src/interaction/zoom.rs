//! Pointer/wheel gesture handling and the composable pan/zoom transform.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ChartKind, PanExtent, PlotArea, Scale, ZoomBounds, ZoomTransform};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{GestureKind, InteractionMode, InteractionState, SelectionRect};

/// Minimum selection rectangle edge, in pixels, for a selection zoom to
/// apply. Anything smaller is treated as an accidental click.
const MIN_SELECTION_EDGE_PX: f64 = 3.0;

/// Which axes a zoom gesture affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomAxes {
    pub x: bool,
    pub y: bool,
}

/// Axis mode for zoom gestures.
///
/// `Auto` resolves per chart kind: scatter charts zoom both axes, time-series
/// line/bar charts zoom x only, because vertical zoom on a time series is
/// rarely meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ZoomAxisMode {
    X,
    XY,
    #[default]
    Auto,
}

impl ZoomAxisMode {
    #[must_use]
    pub fn resolve(self, chart_kind: ChartKind) -> ZoomAxes {
        let y = match self {
            Self::X => false,
            Self::XY => true,
            Self::Auto => matches!(chart_kind, ChartKind::Scatter),
        };
        ZoomAxes { x: true, y }
    }
}

/// Tuning for gesture-driven zoom and pan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomPanConfig {
    pub bounds: ZoomBounds,
    pub pan_extent: PanExtent,
    pub axis_mode: ZoomAxisMode,
    /// Multiplicative step applied by the zoom-in button.
    pub step_factor_in: f64,
    /// Multiplicative step applied by the zoom-out button.
    pub step_factor_out: f64,
    /// Per-line wheel factor; one wheel line scales by this amount.
    pub wheel_factor_per_line: f64,
    /// Button-step animation length.
    pub step_duration_ms: f64,
    /// Reset-to-identity animation length.
    pub reset_duration_ms: f64,
    /// Minimum interval between transform-change notifications.
    pub notify_interval_ms: f64,
}

impl Default for ZoomPanConfig {
    fn default() -> Self {
        Self {
            bounds: ZoomBounds::default(),
            pan_extent: PanExtent::default(),
            axis_mode: ZoomAxisMode::default(),
            step_factor_in: 1.2,
            step_factor_out: 0.8,
            wheel_factor_per_line: 1.1,
            step_duration_ms: 200.0,
            reset_duration_ms: 300.0,
            notify_interval_ms: 16.0,
        }
    }
}

impl ZoomPanConfig {
    pub fn validate(self) -> ChartResult<Self> {
        self.bounds.validate()?;
        for (name, value) in [
            ("step_factor_in", self.step_factor_in),
            ("step_factor_out", self.step_factor_out),
            ("wheel_factor_per_line", self.wheel_factor_per_line),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "zoom factor `{name}` must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("step_duration_ms", self.step_duration_ms),
            ("reset_duration_ms", self.reset_duration_ms),
            ("notify_interval_ms", self.notify_interval_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "zoom timing `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}

/// In-flight animated transition between two transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ZoomAnimation {
    from: ZoomTransform,
    to: ZoomTransform,
    start_ms: f64,
    duration_ms: f64,
}

impl ZoomAnimation {
    /// Samples the animation; the bool reports completion.
    fn sample(self, now_ms: f64) -> (ZoomTransform, bool) {
        if self.duration_ms <= 0.0 || now_ms >= self.start_ms + self.duration_ms {
            return (self.to, true);
        }
        let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
        (self.from.lerp(self.to, t), false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    last_x: f64,
    last_y: f64,
}

/// Converts pointer/wheel/drag gestures into the chart's zoom transform.
///
/// The visual transform updates on every pointer event for smoothness;
/// downstream notifications are throttled to roughly one per animation frame
/// through `take_notification`.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomPanController {
    config: ZoomPanConfig,
    chart_kind: ChartKind,
    transform: ZoomTransform,
    animation: Option<ZoomAnimation>,
    drag: Option<DragState>,
    selection_mode: bool,
    changed_since_notify: bool,
    last_notify_ms: Option<f64>,
}

impl ZoomPanController {
    pub fn new(config: ZoomPanConfig, chart_kind: ChartKind) -> ChartResult<Self> {
        Ok(Self {
            config: config.validate()?,
            chart_kind,
            transform: ZoomTransform::identity(),
            animation: None,
            drag: None,
            selection_mode: false,
            changed_since_notify: false,
            last_notify_ms: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> ZoomPanConfig {
        self.config
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    #[must_use]
    pub fn axes(&self) -> ZoomAxes {
        self.config.axis_mode.resolve(self.chart_kind)
    }

    pub fn set_chart_kind(&mut self, chart_kind: ChartKind) {
        self.chart_kind = chart_kind;
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Range-selection mode: drags draw a rectangle instead of panning.
    pub fn set_selection_mode(&mut self, enabled: bool) {
        self.selection_mode = enabled;
    }

    #[must_use]
    pub fn selection_mode(&self) -> bool {
        self.selection_mode
    }

    #[must_use]
    pub fn can_zoom_in(&self) -> bool {
        self.transform.k() < self.config.bounds.max_zoom - 1e-9
    }

    #[must_use]
    pub fn can_zoom_out(&self) -> bool {
        self.transform.k() > self.config.bounds.min_zoom + 1e-9
    }

    /// Animated multiplicative zoom-in step around the plot center.
    /// A no-op at the upper zoom bound.
    pub fn zoom_in(&mut self, now_ms: f64, plot: PlotArea) {
        self.step_by(self.config.step_factor_in, now_ms, plot);
    }

    /// Animated multiplicative zoom-out step around the plot center.
    /// A no-op at the lower zoom bound.
    pub fn zoom_out(&mut self, now_ms: f64, plot: PlotArea) {
        self.step_by(self.config.step_factor_out, now_ms, plot);
    }

    /// Animates back to the identity transform.
    pub fn reset_zoom(&mut self, now_ms: f64) {
        self.begin_animation(ZoomTransform::identity(), now_ms, self.config.reset_duration_ms);
    }

    /// Applies a transform immediately, clamping the primary factor into
    /// bounds. Cancels any running animation.
    pub fn apply_transform(&mut self, transform: ZoomTransform) {
        self.animation = None;
        let mut next = transform;
        next.kx = self.config.bounds.clamp(next.kx);
        next.ky = self.config.bounds.clamp(next.ky);
        self.set_transform(next);
    }

    /// Steps any running animation. Returns `true` when the visual transform
    /// changed on this call.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        let (sampled, done) = animation.sample(now_ms);
        if done {
            self.animation = None;
        }
        if sampled != self.transform {
            self.set_transform(sampled);
            return true;
        }
        done
    }

    /// Teardown hook: synchronously cancels any in-flight animation.
    pub fn cancel_animation(&mut self) {
        self.animation = None;
    }

    /// Gesture filter entry point. Returns `false` for gestures that must not
    /// manipulate the transform (double-click is reserved).
    #[must_use]
    pub fn accepts_gesture(&self, kind: GestureKind) -> bool {
        kind.manipulates_transform()
    }

    /// Immediate wheel zoom anchored at the pointer. Positive `delta_lines`
    /// is scroll-down and zooms out.
    pub fn on_wheel(&mut self, delta_lines: f64, anchor_x: f64, anchor_y: f64) {
        if !delta_lines.is_finite() || delta_lines == 0.0 {
            return;
        }
        self.animation = None;
        let factor = self.config.wheel_factor_per_line.powf(-delta_lines);
        let next = self.transform.scaled_around(
            factor,
            anchor_x,
            anchor_y,
            self.config.bounds,
            self.axes().y,
        );
        self.set_transform(next);
    }

    /// Drag start: begins a pan, or a selection rectangle when in
    /// range-selection mode. The controller writes the shared interaction
    /// state; the renderer only reads it.
    pub fn pointer_down(&mut self, x: f64, y: f64, state: &mut InteractionState) {
        self.animation = None;
        state.set_cursor(x, y);
        if self.selection_mode {
            state.set_mode(InteractionMode::Selecting);
            state.set_selection(Some(SelectionRect {
                x0: x,
                y0: y,
                x1: x,
                y1: y,
            }));
        } else {
            state.set_mode(InteractionMode::Panning);
            self.drag = Some(DragState { last_x: x, last_y: y });
        }
    }

    /// Drag move: pans the transform or grows the selection rectangle. The
    /// visual transform updates on every event.
    pub fn pointer_move(&mut self, x: f64, y: f64, state: &mut InteractionState) {
        state.set_cursor(x, y);
        match state.mode() {
            InteractionMode::Panning => {
                if let Some(drag) = &mut self.drag {
                    let dx = x - drag.last_x;
                    let dy = if self.config.axis_mode.resolve(self.chart_kind).y {
                        y - drag.last_y
                    } else {
                        0.0
                    };
                    drag.last_x = x;
                    drag.last_y = y;
                    let next = self.transform.translated_by(dx, dy, self.config.pan_extent);
                    self.set_transform(next);
                }
            }
            InteractionMode::Selecting => {
                if let Some(mut rect) = state.selection() {
                    rect.x1 = x;
                    rect.y1 = y;
                    state.set_selection(Some(rect));
                }
            }
            InteractionMode::Idle => {}
        }
    }

    /// Drag end. Returns the completed selection rectangle, if any, for the
    /// caller to feed into `zoom_to_selection`.
    pub fn pointer_up(&mut self, state: &mut InteractionState) -> Option<SelectionRect> {
        self.drag = None;
        let finished = match state.mode() {
            InteractionMode::Selecting => state.selection(),
            _ => None,
        };
        state.set_selection(None);
        state.set_mode(InteractionMode::Idle);
        finished.filter(|rect| {
            rect.width() >= MIN_SELECTION_EDGE_PX && rect.height() >= MIN_SELECTION_EDGE_PX
        })
    }

    /// Zoom-to-selection: maps the rectangle's domain extent onto the full
    /// plot area.
    ///
    /// Corners are inverse-mapped through the *current* scales, then a
    /// transform over the *base* scales is computed so the selected domain
    /// rectangle fills the plot. With x-only axes the vertical axis is left
    /// untouched.
    pub fn zoom_to_selection(
        &mut self,
        rect: SelectionRect,
        current_x: Scale,
        current_y: Scale,
        base_x: Scale,
        base_y: Scale,
    ) -> ChartResult<()> {
        let (min_x, min_y, max_x, max_y) = rect.normalized();
        if max_x - min_x < MIN_SELECTION_EDGE_PX {
            return Ok(());
        }

        let (kx, tx) = axis_selection_zoom(current_x, base_x, min_x, max_x, self.config.bounds)?;
        let mut next = self.transform;
        next.kx = kx;
        next.x = tx;

        if self.axes().y && max_y - min_y >= MIN_SELECTION_EDGE_PX {
            let (ky, ty) =
                axis_selection_zoom(current_y, base_y, min_y, max_y, self.config.bounds)?;
            next.ky = ky;
            next.y = ty;
        }

        debug!(kx = next.kx, ky = next.ky, "applying range-selection zoom");
        self.animation = None;
        self.set_transform(next);
        Ok(())
    }

    /// Throttled change notification: at most one per `notify_interval_ms`.
    /// Returns the transform to broadcast, or `None` while inside the
    /// throttle window or when nothing changed.
    pub fn take_notification(&mut self, now_ms: f64) -> Option<ZoomTransform> {
        if !self.changed_since_notify {
            return None;
        }
        if let Some(last) = self.last_notify_ms
            && now_ms - last < self.config.notify_interval_ms
        {
            return None;
        }
        self.changed_since_notify = false;
        self.last_notify_ms = Some(now_ms);
        Some(self.transform)
    }

    fn step_by(&mut self, factor: f64, now_ms: f64, plot: PlotArea) {
        let center_x = plot.left + plot.width / 2.0;
        let center_y = plot.top + plot.height / 2.0;
        let target = self.transform.scaled_around(
            factor,
            center_x,
            center_y,
            self.config.bounds,
            self.axes().y,
        );
        if target == self.transform {
            // Saturated at a zoom bound.
            return;
        }
        self.begin_animation(target, now_ms, self.config.step_duration_ms);
    }

    fn begin_animation(&mut self, to: ZoomTransform, now_ms: f64, duration_ms: f64) {
        if to == self.transform {
            self.animation = None;
            return;
        }
        self.animation = Some(ZoomAnimation {
            from: self.transform,
            to,
            start_ms: now_ms,
            duration_ms,
        });
    }

    fn set_transform(&mut self, transform: ZoomTransform) {
        if transform != self.transform {
            self.transform = transform;
            self.changed_since_notify = true;
        }
    }
}

/// 1-D selection zoom: scale factor and translation mapping the selected
/// pixel span onto the axis' full range.
fn axis_selection_zoom(
    current: Scale,
    base: Scale,
    min_px: f64,
    max_px: f64,
    bounds: ZoomBounds,
) -> ChartResult<(f64, f64)> {
    let domain_a = current.from_pixel(min_px)?;
    let domain_b = current.from_pixel(max_px)?;

    let base_a = base.to_pixel(domain_a)?;
    let base_b = base.to_pixel(domain_b)?;
    let base_span = base_b - base_a;
    if !base_span.is_finite() || base_span.abs() <= f64::EPSILON {
        return Err(ChartError::InvalidData(
            "selection collapses to a degenerate domain".to_owned(),
        ));
    }

    let (range_start, range_end) = base.range();
    let range_min = range_start.min(range_end);
    let range_max = range_start.max(range_end);

    let k = bounds.clamp((range_max - range_min) / base_span.abs());
    // Anchoring at the selection center keeps the zoom centered even when the
    // factor saturates at a bound.
    let base_center = (base_a + base_b) / 2.0;
    let range_center = (range_min + range_max) / 2.0;
    let t = range_center - k * base_center;
    Ok((k, t))
}
