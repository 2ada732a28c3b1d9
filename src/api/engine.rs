//! The per-chart engine facade wiring data, scales, interaction, fidelity
//! and frame building onto one renderer.

use tracing::{debug, warn};

use crate::core::{CategoryTable, DataSeries, PlotArea, Viewport, ZoomTransform};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{GestureKind, InteractionState, ZoomPanController};
use crate::quality::{QualityOptimizer, QualityState};
use crate::render::{
    CanvasLayerKind, Color, LayeredRenderFrame, RectPrimitive, Renderer, TextHAlign,
    TextPrimitive,
};

use super::chart_definition::ChartDefinition;
use super::data_controller::DataController;
use super::engine_config::EngineConfig;
use super::events::ScaleDomainEvent;
use super::frame_builder::{FrameInputs, build_frame};
use super::scale_coordinator::ScaleCoordinator;

const PLACEHOLDER_BACKGROUND: Color = Color::rgb(0.97, 0.97, 0.98);
const PLACEHOLDER_TEXT_COLOR: Color = Color::rgb(0.45, 0.45, 0.50);

/// Render-boundary status of one chart.
///
/// A failed render isolates to this chart; the host shows the failure
/// message and offers `retry_render` instead of unwinding the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChartHealth {
    #[default]
    Healthy,
    Failed {
        message: String,
    },
}

impl ChartHealth {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// One interactive chart bound to a renderer backend.
#[derive(Debug)]
pub struct ChartEngine<R: Renderer> {
    config: EngineConfig,
    definition: ChartDefinition,
    renderer: R,
    data: DataController,
    scales: ScaleCoordinator,
    zoom: ZoomPanController,
    quality: QualityOptimizer,
    interaction: InteractionState,
    frame: LayeredRenderFrame,
    categories: Option<CategoryTable>,
    plot: PlotArea,
    health: ChartHealth,
    persistent_dirty: bool,
}

impl<R: Renderer> ChartEngine<R> {
    pub fn new(renderer: R, config: EngineConfig, definition: ChartDefinition) -> ChartResult<Self> {
        let mut config = config.validate()?;
        config.viewport = config.viewport.clamped_to_minimum();
        definition.validate()?;

        let plot = PlotArea::from_viewport(config.viewport, config.margins);
        Ok(Self {
            renderer,
            definition: definition.clone(),
            data: DataController::new(),
            scales: ScaleCoordinator::new(definition.id, config.domain_tuning)?,
            zoom: ZoomPanController::new(config.zoom, definition.kind)?,
            quality: QualityOptimizer::new(config.quality)?,
            interaction: InteractionState::default(),
            frame: LayeredRenderFrame::new(config.viewport),
            categories: None,
            plot,
            health: ChartHealth::default(),
            persistent_dirty: true,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    #[must_use]
    pub fn definition(&self) -> &ChartDefinition {
        &self.definition
    }

    #[must_use]
    pub fn health(&self) -> &ChartHealth {
        &self.health
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        self.plot
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.zoom.transform()
    }

    #[must_use]
    pub fn quality_state(&self) -> QualityState {
        self.quality.state()
    }

    #[must_use]
    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    /// Replaces the declarative definition; scales and persistent layers
    /// rebuild on the next render.
    pub fn set_definition(&mut self, definition: ChartDefinition) -> ChartResult<()> {
        definition.validate()?;
        self.zoom.set_chart_kind(definition.kind);
        self.definition = definition;
        self.scales.invalidate();
        self.persistent_dirty = true;
        Ok(())
    }

    /// Viewport resize. Degenerate sizes are clamped to 1x1 instead of
    /// failing, matching the zero-size container policy.
    pub fn resize(&mut self, viewport: Viewport) {
        let viewport = viewport.clamped_to_minimum();
        self.config.viewport = viewport;
        self.plot = PlotArea::from_viewport(viewport, self.config.margins);
        self.frame = LayeredRenderFrame::new(viewport);
        self.persistent_dirty = true;
    }

    pub fn set_categories(&mut self, categories: CategoryTable) {
        self.categories = Some(categories);
    }

    pub fn begin_data_load(&mut self) {
        self.data.begin_load();
    }

    pub fn set_series(&mut self, series: DataSeries) {
        self.quality.set_point_count(series.len());
        self.data.resolve(series);
    }

    pub fn fail_data_load(&mut self, message: impl Into<String>) {
        self.data.fail(message);
    }

    pub fn retry_data_load(&mut self) -> bool {
        self.data.retry()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.data.is_loading()
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.data.point_count()
    }

    pub fn pointer_down(&mut self, now_ms: f64, x: f64, y: f64) {
        if !self.zoom.accepts_gesture(GestureKind::Drag) {
            return;
        }
        self.quality.on_interaction_start(now_ms);
        self.zoom.pointer_down(x, y, &mut self.interaction);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.zoom.pointer_move(x, y, &mut self.interaction);
    }

    pub fn pointer_up(&mut self, now_ms: f64) -> ChartResult<()> {
        let selection = self.zoom.pointer_up(&mut self.interaction);
        if let Some(rect) = selection
            && let Some(current) = self.scales.current()
            && let Some(base) = self.scales.base()
        {
            self.zoom
                .zoom_to_selection(rect, current.x, current.y, base.x, base.y)?;
        }
        self.quality.on_interaction_end(now_ms);
        Ok(())
    }

    pub fn wheel(&mut self, now_ms: f64, delta_lines: f64, anchor_x: f64, anchor_y: f64) {
        if !self.zoom.accepts_gesture(GestureKind::Wheel) {
            return;
        }
        self.quality.on_interaction_start(now_ms);
        self.zoom.on_wheel(delta_lines, anchor_x, anchor_y);
        self.quality.on_interaction_end(now_ms);
    }

    /// Double-click is reserved for host semantics and never zooms.
    pub fn double_click(&mut self) {
        debug_assert!(!self.zoom.accepts_gesture(GestureKind::DoubleClick));
    }

    pub fn zoom_in(&mut self, now_ms: f64) {
        self.zoom.zoom_in(now_ms, self.plot);
    }

    pub fn zoom_out(&mut self, now_ms: f64) {
        self.zoom.zoom_out(now_ms, self.plot);
    }

    pub fn reset_zoom(&mut self, now_ms: f64) {
        self.zoom.reset_zoom(now_ms);
    }

    #[must_use]
    pub fn can_zoom_in(&self) -> bool {
        self.zoom.can_zoom_in()
    }

    #[must_use]
    pub fn can_zoom_out(&self) -> bool {
        self.zoom.can_zoom_out()
    }

    pub fn set_selection_mode(&mut self, enabled: bool) {
        self.zoom.set_selection_mode(enabled);
    }

    /// Per-frame step: advances animations and the fidelity restore timer.
    /// Returns `true` when a repaint is needed.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        let animated = self.zoom.advance(now_ms);
        let restored = self.quality.poll(now_ms);
        let notified = self.zoom.take_notification(now_ms).is_some();
        animated || restored || notified
    }

    /// Drains the queued domain-changed event for cross-chart coordination.
    pub fn take_domain_event(&mut self) -> Option<ScaleDomainEvent> {
        self.scales.take_domain_event()
    }

    /// Renders one frame behind the chart's error boundary.
    ///
    /// Failures never propagate; they park the chart in `Failed` health until
    /// `retry_render`.
    pub fn render(&mut self) -> ChartHealth {
        if let ChartHealth::Failed { .. } = self.health {
            return self.health.clone();
        }
        match self.try_render() {
            Ok(()) => self.health = ChartHealth::Healthy,
            Err(error) => {
                warn!(
                    chart = self.definition.id.raw(),
                    %error,
                    "render failed; chart parked until retry"
                );
                self.health = ChartHealth::Failed {
                    message: error.to_string(),
                };
            }
        }
        self.health.clone()
    }

    /// Clears a failed state and renders again.
    pub fn retry_render(&mut self) -> ChartHealth {
        if !self.health.is_healthy() {
            debug!(chart = self.definition.id.raw(), "retrying failed chart");
            self.health = ChartHealth::Healthy;
            self.persistent_dirty = true;
        }
        self.render()
    }

    /// Unmount hook: cancels the zoom animation and the fidelity restore
    /// timer synchronously.
    pub fn teardown(&mut self) {
        self.zoom.cancel_animation();
        self.quality.cancel_pending_restore();
        self.interaction = InteractionState::default();
    }

    fn try_render(&mut self) -> ChartResult<()> {
        let Some(series) = self.data.series() else {
            let message = match self.data.failure_message() {
                Some(message) => format!("data unavailable: {message}"),
                None => "loading data".to_owned(),
            };
            return self.render_placeholder(&message);
        };

        self.scales.ensure_base(
            self.definition.x_axis.kind,
            self.definition.y_axis.kind,
            series,
            self.plot,
        )?;
        self.scales.apply_transform(self.zoom.transform())?;
        let scales = self.scales.current().ok_or_else(|| {
            ChartError::RenderFailure("no current scales after rebuild".to_owned())
        })?;

        let inputs = FrameInputs {
            definition: &self.definition,
            series,
            scales,
            plot: self.plot,
            quality: self.quality.state(),
            interaction: self.interaction,
            categories: self.categories.as_ref(),
        };
        build_frame(&mut self.frame, &inputs, self.persistent_dirty)?;
        self.persistent_dirty = false;
        self.renderer.render(&self.frame.flatten())
    }

    fn render_placeholder(&mut self, message: &str) -> ChartResult<()> {
        self.frame.clear_all_layers();
        self.persistent_dirty = true;

        let viewport = self.frame.viewport;
        self.frame.push_rect(
            CanvasLayerKind::Background,
            RectPrimitive::new(
                0.0,
                0.0,
                f64::from(viewport.width),
                f64::from(viewport.height),
                PLACEHOLDER_BACKGROUND,
            ),
        );
        self.frame.push_text(
            CanvasLayerKind::Overlay,
            TextPrimitive::new(
                message,
                self.plot.left + self.plot.width / 2.0,
                self.plot.top + self.plot.height / 2.0,
                12.0,
                PLACEHOLDER_TEXT_COLOR,
                TextHAlign::Center,
            ),
        );
        self.renderer.render(&self.frame.flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartEngine, ChartHealth};
    use crate::api::chart_definition::ChartDefinition;
    use crate::api::engine_config::EngineConfig;
    use crate::core::{ChartId, ChartKind, DataSeries, SeriesId, SeriesPoint, Viewport};
    use crate::error::{ChartError, ChartResult};
    use crate::render::{NullRenderer, RenderFrame, Renderer};

    struct FailingRenderer {
        fail: bool,
        calls: usize,
    }

    impl Renderer for FailingRenderer {
        fn render(&mut self, _frame: &RenderFrame) -> ChartResult<()> {
            self.calls += 1;
            if self.fail {
                return Err(ChartError::RenderFailure("backend lost".to_owned()));
            }
            Ok(())
        }
    }

    fn engine() -> ChartEngine<NullRenderer> {
        ChartEngine::new(
            NullRenderer::default(),
            EngineConfig::new(Viewport::new(800, 600)),
            ChartDefinition::new(ChartId::new(1), "latency", ChartKind::Line),
        )
        .expect("engine")
    }

    fn series_of(n: usize) -> DataSeries {
        DataSeries::new(
            (0..n)
                .map(|i| SeriesPoint::new(i as f64, (i % 13) as f64, SeriesId::new(0)))
                .collect(),
        )
    }

    #[test]
    fn loading_chart_renders_placeholder_not_scales() {
        let mut engine = engine();
        assert!(engine.is_loading());
        assert!(engine.render().is_healthy());
        assert_eq!(engine.renderer().render_calls, 1);
        assert!(engine.take_domain_event().is_none());
    }

    #[test]
    fn resolved_data_renders_and_emits_initial_domain_event() {
        let mut engine = engine();
        engine.set_series(series_of(100));

        assert!(engine.render().is_healthy());
        let event = engine.take_domain_event().expect("initial event");
        assert_eq!(event.chart, ChartId::new(1));
        assert!(engine.renderer().last_line_count > 0);
    }

    #[test]
    fn render_failure_is_contained_and_retryable() {
        let mut engine = ChartEngine::new(
            FailingRenderer { fail: true, calls: 0 },
            EngineConfig::new(Viewport::new(800, 600)),
            ChartDefinition::new(ChartId::new(2), "t", ChartKind::Line),
        )
        .expect("engine");
        engine.set_series(series_of(10));

        let health = engine.render();
        assert!(matches!(health, ChartHealth::Failed { .. }));
        // Further renders are parked until an explicit retry.
        engine.render();
        assert_eq!(engine.renderer().calls, 1);

        // A recovered backend renders again after retry.
        let mut engine = ChartEngine::new(
            FailingRenderer { fail: false, calls: 0 },
            EngineConfig::new(Viewport::new(800, 600)),
            ChartDefinition::new(ChartId::new(2), "t", ChartKind::Line),
        )
        .expect("engine");
        engine.set_series(series_of(10));
        assert!(engine.retry_render().is_healthy());
    }

    #[test]
    fn zoom_step_saturates_at_bounds() {
        let mut engine = engine();
        engine.set_series(series_of(100));

        for _ in 0..300 {
            engine.wheel(0.0, -1.0, 400.0, 300.0);
        }
        assert!(!engine.can_zoom_in());
        assert!((engine.transform().k() - 10.0).abs() <= 1e-9);
        // The wheel burst leaves one throttled notification pending.
        assert!(engine.advance(50.0));

        // A further zoom-in step changes nothing.
        engine.zoom_in(100.0);
        assert!(!engine.advance(200.0));
        assert!((engine.transform().k() - 10.0).abs() <= 1e-9);
    }

    #[test]
    fn teardown_cancels_animation_and_timers() {
        let mut engine = engine();
        engine.set_series(series_of(20_000));

        engine.zoom_in(0.0);
        engine.pointer_down(10.0, 100.0, 100.0);
        engine.pointer_up(20.0).expect("pointer up");

        engine.teardown();
        assert!(!engine.advance(1_000.0));
        assert!(engine.quality_state().is_transitioning);
    }
}
