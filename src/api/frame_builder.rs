//! Translates a chart definition plus resolved data into layered draw
//! primitives.

use crate::core::{
    CategoryTable, ChartKind, DataSeries, PlotArea, SeriesPoint, sample_points, stride_points,
};
use crate::error::ChartResult;
use crate::interaction::InteractionState;
use crate::quality::QualityState;
use crate::render::{
    CanvasLayerKind, Color, LinePrimitive, LineStrokeStyle, LayeredRenderFrame, MarkerPrimitive,
    RectPrimitive, TextHAlign, TextPrimitive,
};

use super::axis_labels::{
    AXIS_X_TARGET_SPACING_PX, AXIS_Y_TARGET_SPACING_PX, format_tick, tick_target_count,
    tick_values,
};
use super::chart_definition::{ChartDefinition, ReferenceAxis};
use super::scale_coordinator::ScalePair;

pub(super) const SERIES_PALETTE: [Color; 6] = [
    Color::rgb(0.16, 0.45, 0.78),
    Color::rgb(0.90, 0.49, 0.13),
    Color::rgb(0.18, 0.63, 0.31),
    Color::rgb(0.84, 0.23, 0.24),
    Color::rgb(0.55, 0.35, 0.72),
    Color::rgb(0.09, 0.63, 0.62),
];

const BACKGROUND_COLOR: Color = Color::rgb(1.0, 1.0, 1.0);
const GRID_COLOR: Color = Color::rgb(0.90, 0.90, 0.92);
const AXIS_COLOR: Color = Color::rgb(0.35, 0.35, 0.38);
const LABEL_COLOR: Color = Color::rgb(0.25, 0.25, 0.28);
const REFERENCE_COLOR: Color = Color::rgb(0.80, 0.20, 0.20);
const SELECTION_FILL: Color = Color::rgba(0.25, 0.50, 0.85, 0.15);
const SELECTION_EDGE: Color = Color::rgba(0.25, 0.50, 0.85, 0.60);

const LABEL_FONT_PX: f64 = 11.0;
const BADGE_FONT_PX: f64 = 10.0;
const TITLE_FONT_PX: f64 = 13.0;

/// Everything one render pass reads.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub definition: &'a ChartDefinition,
    pub series: &'a DataSeries,
    pub scales: ScalePair,
    pub plot: PlotArea,
    pub quality: QualityState,
    pub interaction: InteractionState,
    pub categories: Option<&'a CategoryTable>,
}

/// Builds one full render pass into `frame`.
///
/// `rebuild_persistent` redraws the persistent background layer as well; it
/// is set when the definition or viewport changed, not on ordinary
/// transform-only passes.
pub fn build_frame(
    frame: &mut LayeredRenderFrame,
    inputs: &FrameInputs<'_>,
    rebuild_persistent: bool,
) -> ChartResult<()> {
    if rebuild_persistent {
        frame.clear_all_layers();
        let viewport = frame.viewport;
        frame.push_rect(
            CanvasLayerKind::Background,
            RectPrimitive::new(
                0.0,
                0.0,
                f64::from(viewport.width),
                f64::from(viewport.height),
                BACKGROUND_COLOR,
            ),
        );
        // The title only changes with the definition, so it lives on the
        // persistent layer and survives transform-only passes.
        if inputs.definition.display.show_title && !inputs.definition.title.is_empty() {
            frame.push_text(
                CanvasLayerKind::Background,
                TextPrimitive::new(
                    inputs.definition.title.clone(),
                    inputs.plot.left + inputs.plot.width / 2.0,
                    TITLE_FONT_PX + 2.0,
                    TITLE_FONT_PX,
                    LABEL_COLOR,
                    TextHAlign::Center,
                ),
            );
        }
    } else {
        frame.clear_mutable_layers();
    }

    let x_ticks = tick_values(
        inputs.scales.x,
        tick_target_count(inputs.plot.width, AXIS_X_TARGET_SPACING_PX),
    );
    let y_ticks = tick_values(
        inputs.scales.y,
        tick_target_count(inputs.plot.height, AXIS_Y_TARGET_SPACING_PX),
    );

    if inputs.definition.display.show_grid {
        build_grid(frame, inputs, &x_ticks, &y_ticks)?;
    }
    build_series_marks(frame, inputs)?;
    build_reference_lines(frame, inputs)?;
    if inputs.definition.display.show_axes {
        build_axes(frame, inputs, &x_ticks, &y_ticks)?;
    }
    if inputs.definition.display.show_legend {
        build_legend(frame, inputs);
    }
    build_overlays(frame, inputs);
    Ok(())
}

fn build_grid(
    frame: &mut LayeredRenderFrame,
    inputs: &FrameInputs<'_>,
    x_ticks: &[f64],
    y_ticks: &[f64],
) -> ChartResult<()> {
    let plot = inputs.plot;
    for tick in x_ticks {
        let x = inputs.scales.x.to_pixel(*tick)?;
        if x < plot.left || x > plot.right() {
            continue;
        }
        frame.push_line(
            CanvasLayerKind::Grid,
            LinePrimitive::new(x, plot.top, x, plot.bottom(), 1.0, GRID_COLOR),
        );
    }
    for tick in y_ticks {
        let y = inputs.scales.y.to_pixel(*tick)?;
        if y < plot.top || y > plot.bottom() {
            continue;
        }
        frame.push_line(
            CanvasLayerKind::Grid,
            LinePrimitive::new(plot.left, y, plot.right(), y, 1.0, GRID_COLOR),
        );
    }
    Ok(())
}

fn build_axes(
    frame: &mut LayeredRenderFrame,
    inputs: &FrameInputs<'_>,
    x_ticks: &[f64],
    y_ticks: &[f64],
) -> ChartResult<()> {
    let plot = inputs.plot;
    frame.push_line(
        CanvasLayerKind::Axis,
        LinePrimitive::new(plot.left, plot.top, plot.left, plot.bottom(), 1.0, AXIS_COLOR),
    );
    frame.push_line(
        CanvasLayerKind::Axis,
        LinePrimitive::new(
            plot.left,
            plot.bottom(),
            plot.right(),
            plot.bottom(),
            1.0,
            AXIS_COLOR,
        ),
    );

    let x_step = tick_step(x_ticks);
    for tick in x_ticks {
        let x = inputs.scales.x.to_pixel(*tick)?;
        if x < plot.left || x > plot.right() {
            continue;
        }
        let label = format_tick(*tick, inputs.definition.x_axis.kind, x_step, inputs.categories);
        if label.is_empty() {
            continue;
        }
        frame.push_text(
            CanvasLayerKind::Axis,
            TextPrimitive::new(
                label,
                x,
                plot.bottom() + 14.0,
                LABEL_FONT_PX,
                LABEL_COLOR,
                TextHAlign::Center,
            ),
        );
    }

    let y_step = tick_step(y_ticks);
    for tick in y_ticks {
        let y = inputs.scales.y.to_pixel(*tick)?;
        if y < plot.top || y > plot.bottom() {
            continue;
        }
        let label = format_tick(*tick, inputs.definition.y_axis.kind, y_step, None);
        if label.is_empty() {
            continue;
        }
        frame.push_text(
            CanvasLayerKind::Axis,
            TextPrimitive::new(
                label,
                plot.left - 6.0,
                y + 4.0,
                LABEL_FONT_PX,
                LABEL_COLOR,
                TextHAlign::Right,
            ),
        );
    }

    if let Some(label) = &inputs.definition.x_axis.label {
        frame.push_text(
            CanvasLayerKind::Axis,
            TextPrimitive::new(
                label.clone(),
                plot.left + plot.width / 2.0,
                plot.bottom() + 28.0,
                LABEL_FONT_PX,
                LABEL_COLOR,
                TextHAlign::Center,
            ),
        );
    }
    if let Some(label) = &inputs.definition.y_axis.label {
        frame.push_text(
            CanvasLayerKind::Axis,
            TextPrimitive::new(
                label.clone(),
                plot.left,
                plot.top - 8.0,
                LABEL_FONT_PX,
                LABEL_COLOR,
                TextHAlign::Left,
            ),
        );
    }
    Ok(())
}

fn build_series_marks(frame: &mut LayeredRenderFrame, inputs: &FrameInputs<'_>) -> ChartResult<()> {
    let options = inputs.quality.options;
    let sampled = sample_points(inputs.series.points(), options.sampling_rate);
    let points = stride_points(&sampled, options.line_stride);
    if points.is_empty() {
        return Ok(());
    }

    let plot = inputs.plot;
    match inputs.definition.kind {
        ChartKind::Line => {
            if inputs.definition.display.show_lines {
                for pair in points.windows(2) {
                    let [a, b] = pair else { continue };
                    if a.series != b.series {
                        continue;
                    }
                    let x1 = inputs.scales.x.to_pixel(a.x)?;
                    let x2 = inputs.scales.x.to_pixel(b.x)?;
                    // Cull segments entirely outside the horizontal plot span.
                    if (x1 < plot.left && x2 < plot.left)
                        || (x1 > plot.right() && x2 > plot.right())
                    {
                        continue;
                    }
                    let y1 = inputs.scales.y.to_pixel(a.y)?;
                    let y2 = inputs.scales.y.to_pixel(b.y)?;
                    frame.push_line(
                        CanvasLayerKind::Series,
                        LinePrimitive::new(
                            x1,
                            y1,
                            x2,
                            y2,
                            series_line_width(inputs.definition, a.series.raw()),
                            series_color(inputs.definition, a.series.raw()),
                        ),
                    );
                }
            }
            if options.enable_markers && inputs.definition.display.show_markers {
                push_markers(frame, inputs, &points)?;
            }
        }
        ChartKind::Scatter => {
            // Markers are the data marks here; quality gating never hides
            // them, only the explicit display flag can.
            if inputs.definition.display.show_markers {
                push_markers(frame, inputs, &points)?;
            }
        }
        ChartKind::Bar => {
            let baseline = inputs
                .scales
                .y
                .to_pixel(0.0)?
                .clamp(plot.top, plot.bottom());
            let bar_width = (plot.width / points.len() as f64 * 0.8).max(1.0);
            for point in &points {
                let x = inputs.scales.x.to_pixel(point.x)?;
                if x + bar_width / 2.0 < plot.left || x - bar_width / 2.0 > plot.right() {
                    continue;
                }
                let y = inputs.scales.y.to_pixel(point.y)?.clamp(plot.top, plot.bottom());
                let top = y.min(baseline);
                let height = (y - baseline).abs();
                if height <= 0.0 {
                    continue;
                }
                frame.push_rect(
                    CanvasLayerKind::Series,
                    RectPrimitive::new(
                        x - bar_width / 2.0,
                        top,
                        bar_width,
                        height,
                        series_color(inputs.definition, point.series.raw()),
                    ),
                );
            }
        }
    }
    Ok(())
}

fn push_markers(
    frame: &mut LayeredRenderFrame,
    inputs: &FrameInputs<'_>,
    points: &[SeriesPoint],
) -> ChartResult<()> {
    let plot = inputs.plot;
    let radius = (inputs.quality.options.marker_size / 2.0).max(1.0);
    for point in points {
        let x = inputs.scales.x.to_pixel(point.x)?;
        let y = inputs.scales.y.to_pixel(point.y)?;
        if !plot.contains(x, y) {
            continue;
        }
        frame.push_marker(
            CanvasLayerKind::Series,
            MarkerPrimitive::new(x, y, radius, series_color(inputs.definition, point.series.raw())),
        );
    }
    Ok(())
}

fn build_reference_lines(
    frame: &mut LayeredRenderFrame,
    inputs: &FrameInputs<'_>,
) -> ChartResult<()> {
    let plot = inputs.plot;
    for line in &inputs.definition.reference_lines {
        match line.axis {
            ReferenceAxis::Y => {
                let y = inputs.scales.y.to_pixel(line.value)?;
                if y < plot.top || y > plot.bottom() {
                    continue;
                }
                frame.push_line(
                    CanvasLayerKind::Axis,
                    LinePrimitive::new(plot.left, y, plot.right(), y, 1.0, REFERENCE_COLOR)
                        .with_stroke_style(LineStrokeStyle::Dashed),
                );
                if let Some(label) = &line.label {
                    frame.push_text(
                        CanvasLayerKind::Axis,
                        TextPrimitive::new(
                            label.clone(),
                            plot.right() - 4.0,
                            y - 4.0,
                            LABEL_FONT_PX,
                            REFERENCE_COLOR,
                            TextHAlign::Right,
                        ),
                    );
                }
            }
            ReferenceAxis::X => {
                let x = inputs.scales.x.to_pixel(line.value)?;
                if x < plot.left || x > plot.right() {
                    continue;
                }
                frame.push_line(
                    CanvasLayerKind::Axis,
                    LinePrimitive::new(x, plot.top, x, plot.bottom(), 1.0, REFERENCE_COLOR)
                        .with_stroke_style(LineStrokeStyle::Dashed),
                );
                if let Some(label) = &line.label {
                    frame.push_text(
                        CanvasLayerKind::Axis,
                        TextPrimitive::new(
                            label.clone(),
                            x + 4.0,
                            plot.top + 12.0,
                            LABEL_FONT_PX,
                            REFERENCE_COLOR,
                            TextHAlign::Left,
                        ),
                    );
                }
            }
        }
    }
    Ok(())
}

fn build_legend(frame: &mut LayeredRenderFrame, inputs: &FrameInputs<'_>) {
    let plot = inputs.plot;
    let mut y = plot.top + 12.0;
    for style in &inputs.definition.series_styles {
        if style.label.is_empty() {
            continue;
        }
        frame.push_text(
            CanvasLayerKind::Legend,
            TextPrimitive::new(
                style.label.clone(),
                plot.right() - 8.0,
                y,
                LABEL_FONT_PX,
                SERIES_PALETTE[style.palette_index % SERIES_PALETTE.len()],
                TextHAlign::Right,
            ),
        );
        y += 14.0;
    }
}

fn build_overlays(frame: &mut LayeredRenderFrame, inputs: &FrameInputs<'_>) {
    if inputs.quality.is_transitioning {
        frame.push_text(
            CanvasLayerKind::Legend,
            TextPrimitive::new(
                "reduced fidelity",
                inputs.plot.right() - 8.0,
                inputs.plot.bottom() - 6.0,
                BADGE_FONT_PX,
                AXIS_COLOR,
                TextHAlign::Right,
            ),
        );
    }

    if let Some(rect) = inputs.interaction.selection() {
        let (min_x, min_y, max_x, max_y) = rect.normalized();
        frame.push_rect(
            CanvasLayerKind::Legend,
            RectPrimitive::new(min_x, min_y, max_x - min_x, max_y - min_y, SELECTION_FILL),
        );
        frame.push_line(
            CanvasLayerKind::Legend,
            LinePrimitive::new(min_x, min_y, max_x, min_y, 1.0, SELECTION_EDGE),
        );
        frame.push_line(
            CanvasLayerKind::Legend,
            LinePrimitive::new(max_x, min_y, max_x, max_y, 1.0, SELECTION_EDGE),
        );
        frame.push_line(
            CanvasLayerKind::Legend,
            LinePrimitive::new(max_x, max_y, min_x, max_y, 1.0, SELECTION_EDGE),
        );
        frame.push_line(
            CanvasLayerKind::Legend,
            LinePrimitive::new(min_x, max_y, min_x, min_y, 1.0, SELECTION_EDGE),
        );
    }
}

fn series_color(definition: &ChartDefinition, series: u32) -> Color {
    let index = definition
        .series_styles
        .get(series as usize)
        .map_or(series as usize, |style| style.palette_index);
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

fn series_line_width(definition: &ChartDefinition, series: u32) -> f64 {
    definition
        .series_styles
        .get(series as usize)
        .map_or(1.5, |style| style.line_width)
}

fn tick_step(ticks: &[f64]) -> f64 {
    ticks
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .find(|step| step.is_finite() && *step > 0.0)
        .unwrap_or(1.0)
}
