use plotgrid::api::{
    AxisConfig, ChartDefinition, ChartEngine, ChartHealth, DisplayFlags, EngineConfig,
    ReferenceLine, SeriesStyle,
};
use plotgrid::core::{AxisKind, ChartId, ChartKind, DataSeries, SeriesId, SeriesPoint, Viewport};
use plotgrid::render::NullRenderer;

fn line_engine(points: usize) -> ChartEngine<NullRenderer> {
    let definition = ChartDefinition::new(ChartId::new(1), "throughput", ChartKind::Line)
        .with_x_axis(AxisConfig::new(AxisKind::ElapsedTime))
        .with_series_style(SeriesStyle::new("rps", 0))
        .with_reference_line(ReferenceLine::horizontal(40.0).with_label("limit"));
    let mut engine = ChartEngine::new(
        NullRenderer::default(),
        EngineConfig::new(Viewport::new(800, 600)),
        definition,
    )
    .expect("engine");
    engine.set_series(DataSeries::new(
        (0..points)
            .map(|i| SeriesPoint::new(i as f64, (i % 50) as f64, SeriesId::new(0)))
            .collect(),
    ));
    engine
}

#[test]
fn full_render_pass_emits_grid_axes_series_and_legend() {
    let mut engine = line_engine(500);
    assert!(engine.render().is_healthy());

    let renderer = engine.renderer();
    assert!(renderer.last_line_count > 500); // series segments + grid + axes
    assert!(renderer.last_text_count > 0); // tick labels + legend
    assert_eq!(renderer.last_rect_count, 1); // background
}

#[test]
fn interaction_degrades_fidelity_and_debounce_restores_it() {
    let mut engine = line_engine(20_000);
    assert!(engine.render().is_healthy());
    let full = engine.renderer().last_line_count;

    engine.pointer_down(0.0, 400.0, 300.0);
    engine.pointer_move(420.0, 300.0);
    assert!(engine.render().is_healthy());
    let degraded = engine.renderer().last_line_count;
    // Low fidelity strides and samples the series.
    assert!(degraded < full / 4);

    engine.pointer_up(100.0).expect("pointer up");
    assert!(engine.advance(300.0));
    assert!(engine.render().is_healthy());
    assert!(engine.renderer().last_line_count >= full / 2);
}

#[test]
fn wheel_zoom_respects_bounds_and_reports_button_state() {
    let mut engine = line_engine(100);
    assert!(engine.can_zoom_in());
    assert!(engine.can_zoom_out());

    for _ in 0..500 {
        engine.wheel(0.0, -1.0, 400.0, 300.0);
    }
    assert!(!engine.can_zoom_in());
    assert!(engine.can_zoom_out());

    for _ in 0..500 {
        engine.wheel(0.0, 1.0, 400.0, 300.0);
    }
    assert!(!engine.can_zoom_out());
    assert!(engine.can_zoom_in());
}

#[test]
fn reset_returns_the_initial_domain() {
    let mut engine = line_engine(100);
    assert!(engine.render().is_healthy());
    let initial = engine.take_domain_event().expect("initial domain");

    engine.wheel(0.0, -3.0, 200.0, 200.0);
    assert!(engine.render().is_healthy());
    let zoomed = engine.take_domain_event().expect("zoomed domain");
    assert!(zoomed.x_domain != initial.x_domain);

    engine.reset_zoom(1_000.0);
    engine.advance(2_000.0);
    assert!(engine.render().is_healthy());
    let reset = engine.take_domain_event().expect("reset domain");
    assert!((reset.x_domain.0 - initial.x_domain.0).abs() <= 1e-6);
    assert!((reset.x_domain.1 - initial.x_domain.1).abs() <= 1e-6);
}

#[test]
fn definition_swap_rebuilds_scales_and_persistent_layers() {
    let mut engine = line_engine(100);
    assert!(engine.render().is_healthy());
    engine.take_domain_event();

    let scatter = ChartDefinition::new(ChartId::new(1), "throughput", ChartKind::Scatter)
        .with_display(DisplayFlags {
            show_title: false,
            show_grid: false,
            show_axes: false,
            show_legend: false,
            ..DisplayFlags::default()
        });
    engine.set_definition(scatter).expect("set definition");
    assert!(engine.render().is_healthy());

    let renderer = engine.renderer();
    assert_eq!(renderer.last_line_count, 0);
    assert_eq!(renderer.last_marker_count, 100);
}

#[test]
fn resize_keeps_the_chart_healthy_and_rebuilds() {
    let mut engine = line_engine(100);
    assert!(engine.render().is_healthy());

    engine.resize(Viewport::new(400, 300));
    assert!(engine.render().is_healthy());

    // Degenerate viewports are clamped, never fatal.
    engine.resize(Viewport::new(0, 0));
    assert!(matches!(engine.render(), ChartHealth::Healthy));
}

#[test]
fn data_failure_shows_placeholder_and_retry_reloads() {
    let mut engine = line_engine(100);
    engine.fail_data_load("upstream timeout");
    assert!(engine.render().is_healthy());
    // Placeholder frame: background plus message only.
    assert_eq!(engine.renderer().last_text_count, 1);

    assert!(engine.retry_data_load());
    assert!(engine.is_loading());
}
