use approx::assert_relative_eq;

use plotgrid::core::{
    AxisKind, ChartKind, PlotArea, PlotMargins, Scale, Viewport, ZoomTransform,
};
use plotgrid::interaction::{
    InteractionState, SelectionRect, ZoomAxisMode, ZoomPanConfig, ZoomPanController,
};

fn plot() -> PlotArea {
    PlotArea::from_viewport(Viewport::new(800, 600), PlotMargins::default())
}

fn scatter_controller() -> ZoomPanController {
    let config = ZoomPanConfig {
        axis_mode: ZoomAxisMode::XY,
        ..ZoomPanConfig::default()
    };
    ZoomPanController::new(config, ChartKind::Scatter).expect("controller")
}

#[test]
fn button_zoom_steps_compound_multiplicatively() {
    let mut controller = ZoomPanController::new(ZoomPanConfig::default(), ChartKind::Line)
        .expect("controller");

    controller.zoom_in(0.0, plot());
    controller.advance(500.0);
    controller.zoom_in(500.0, plot());
    controller.advance(1_000.0);

    assert_relative_eq!(controller.transform().k(), 1.44, epsilon = 1e-9);
}

#[test]
fn zoom_out_then_in_returns_to_identity() {
    let mut controller = ZoomPanController::new(ZoomPanConfig::default(), ChartKind::Line)
        .expect("controller");

    controller.zoom_in(0.0, plot());
    controller.advance(500.0);
    controller.zoom_out(500.0, plot());
    controller.advance(1_000.0);

    // 1.2 * 0.8 != 1; the steps are asymmetric by design.
    assert_relative_eq!(controller.transform().k(), 0.96, epsilon = 1e-9);

    controller.reset_zoom(1_000.0);
    controller.advance(2_000.0);
    assert!(controller.transform().is_identity(1e-9));
}

#[test]
fn reset_animates_rather_than_snapping() {
    let mut controller = scatter_controller();
    controller.apply_transform(ZoomTransform::uniform(4.0, -300.0, -200.0));

    controller.reset_zoom(0.0);
    controller.advance(150.0);
    let halfway = controller.transform();
    assert!(halfway.k() < 4.0 && halfway.k() > 1.0);

    controller.advance(400.0);
    assert!(controller.transform().is_identity(1e-9));
}

#[test]
fn pan_during_zoom_keeps_domain_points_stable() {
    let base = Scale::new(AxisKind::Numeric, 0.0, 100.0, 0.0, 800.0).expect("base");
    let mut controller = scatter_controller();
    let mut state = InteractionState::default();

    controller.on_wheel(-2.0, 400.0, 300.0);
    controller.pointer_down(400.0, 300.0, &mut state);
    controller.pointer_move(480.0, 300.0, &mut state);
    controller.pointer_up(&mut state);

    let current = controller.transform().rescale_x(base).expect("rescale");
    // Panning right by 80px moves the visible domain left by 80px worth.
    let (start, end) = current.domain();
    assert!(start < end);
    assert!(current.domain_span() < base.domain_span());
}

#[test]
fn selection_zoom_maps_selected_domain_onto_plot() {
    let plot = plot();
    let base_x = Scale::new(AxisKind::Numeric, 0.0, 100.0, plot.left, plot.right())
        .expect("base x");
    let base_y = Scale::new(AxisKind::Numeric, 0.0, 50.0, plot.bottom(), plot.top)
        .expect("base y");
    let mut controller = scatter_controller();
    controller.set_selection_mode(true);

    // Identity transform: current scales equal the base scales.
    let rect = SelectionRect {
        x0: 200.0,
        y0: 150.0,
        x1: 400.0,
        y1: 300.0,
    };
    let expected_x = (
        base_x.from_pixel(200.0).expect("x0"),
        base_x.from_pixel(400.0).expect("x1"),
    );
    let expected_y_top = base_y.from_pixel(150.0).expect("y top");
    let expected_y_bottom = base_y.from_pixel(300.0).expect("y bottom");

    controller
        .zoom_to_selection(rect, base_x, base_y, base_x, base_y)
        .expect("selection zoom");

    let current_x = controller.transform().rescale_x(base_x).expect("current x");
    let current_y = controller.transform().rescale_y(base_y).expect("current y");

    let (x_start, x_end) = current_x.domain();
    assert_relative_eq!(x_start, expected_x.0, epsilon = 1e-9);
    assert_relative_eq!(x_end, expected_x.1, epsilon = 1e-9);

    // The y domain runs bottom-to-top like the base scale's orientation.
    let (y_start, y_end) = current_y.domain();
    assert_relative_eq!(y_start, expected_y_bottom, epsilon = 1e-9);
    assert_relative_eq!(y_end, expected_y_top, epsilon = 1e-9);
}

#[test]
fn selection_zoom_in_x_mode_leaves_y_untouched() {
    let plot = plot();
    let base_x = Scale::new(AxisKind::Numeric, 0.0, 100.0, plot.left, plot.right())
        .expect("base x");
    let base_y = Scale::new(AxisKind::Numeric, 0.0, 50.0, plot.bottom(), plot.top)
        .expect("base y");
    let mut controller = ZoomPanController::new(ZoomPanConfig::default(), ChartKind::Line)
        .expect("controller");
    controller.set_selection_mode(true);

    let rect = SelectionRect {
        x0: 200.0,
        y0: 150.0,
        x1: 400.0,
        y1: 300.0,
    };
    controller
        .zoom_to_selection(rect, base_x, base_y, base_x, base_y)
        .expect("selection zoom");

    let transform = controller.transform();
    assert!(transform.kx > 1.0);
    assert_relative_eq!(transform.ky, 1.0, epsilon = 1e-12);
    assert_relative_eq!(transform.y, 0.0, epsilon = 1e-12);
}

#[test]
fn double_zoom_selection_composes_through_current_scales() {
    let plot = plot();
    let base_x = Scale::new(AxisKind::Numeric, 0.0, 100.0, plot.left, plot.right())
        .expect("base x");
    let base_y = Scale::new(AxisKind::Numeric, 0.0, 50.0, plot.bottom(), plot.top)
        .expect("base y");
    let mut controller = scatter_controller();
    controller.set_selection_mode(true);

    let first = SelectionRect {
        x0: plot.left,
        y0: plot.top,
        x1: plot.left + plot.width / 2.0,
        y1: plot.top + plot.height / 2.0,
    };
    controller
        .zoom_to_selection(first, base_x, base_y, base_x, base_y)
        .expect("first zoom");

    let current_x = controller.transform().rescale_x(base_x).expect("current x");
    let current_y = controller.transform().rescale_y(base_y).expect("current y");

    // Select the middle half of the already-zoomed view.
    let second = SelectionRect {
        x0: plot.left + plot.width / 4.0,
        y0: plot.top + plot.height / 4.0,
        x1: plot.left + 3.0 * plot.width / 4.0,
        y1: plot.top + 3.0 * plot.height / 4.0,
    };
    let expected_start = current_x
        .from_pixel(plot.left + plot.width / 4.0)
        .expect("expected start");
    controller
        .zoom_to_selection(second, current_x, current_y, base_x, base_y)
        .expect("second zoom");

    let after_x = controller.transform().rescale_x(base_x).expect("after x");
    assert_relative_eq!(after_x.domain().0, expected_start, epsilon = 1e-9);
}
