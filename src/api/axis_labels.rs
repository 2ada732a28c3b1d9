//! Axis tick placement and label formatting.

use chrono::{DateTime, Utc};

use crate::core::{AxisKind, CategoryTable, Scale};

pub(super) const AXIS_X_TARGET_SPACING_PX: f64 = 88.0;
pub(super) const AXIS_Y_TARGET_SPACING_PX: f64 = 44.0;
pub(super) const AXIS_MIN_TICKS: usize = 2;
pub(super) const AXIS_MAX_TICKS: usize = 12;

/// Tick count for a pixel span aiming at a target label spacing.
#[must_use]
pub fn tick_target_count(axis_span_px: f64, target_spacing_px: f64) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return AXIS_MIN_TICKS;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return AXIS_MIN_TICKS;
    }
    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(AXIS_MIN_TICKS, AXIS_MAX_TICKS)
}

/// Evenly spaced domain values across a scale's domain.
///
/// Category axes snap ticks to whole indices so labels never land between
/// category slots.
#[must_use]
pub fn tick_values(scale: Scale, tick_count: usize) -> Vec<f64> {
    if tick_count == 0 {
        return Vec::new();
    }
    let (start, end) = scale.domain();
    if tick_count == 1 {
        return vec![start];
    }

    let span = end - start;
    let denominator = (tick_count - 1) as f64;
    let mut ticks: Vec<f64> = (0..tick_count)
        .map(|index| start + span * (index as f64) / denominator)
        .collect();

    if scale.kind() == AxisKind::Category {
        ticks = ticks.iter().map(|value| value.round()).collect();
        ticks.dedup();
        ticks.retain(|value| *value >= start.min(end) && *value <= start.max(end));
    }
    ticks
}

/// Formats one tick value for its axis kind.
///
/// `step` is the spacing between adjacent ticks in domain units; it decides
/// datetime granularity and numeric precision.
#[must_use]
pub fn format_tick(
    value: f64,
    kind: AxisKind,
    step: f64,
    categories: Option<&CategoryTable>,
) -> String {
    match kind {
        AxisKind::DateTime => format_datetime(value, step),
        AxisKind::ElapsedTime => format_elapsed(value),
        AxisKind::Category => {
            let index = value.round();
            if index >= 0.0
                && let Some(table) = categories
                && let Some(label) = table.label_at(index as u32)
            {
                return label.to_owned();
            }
            format_numeric(value, step)
        }
        AxisKind::Numeric => format_numeric(value, step),
    }
}

/// Unix-seconds timestamp formatted at a granularity matching the tick step.
fn format_datetime(value: f64, step: f64) -> String {
    let seconds = value.floor() as i64;
    let Some(time) = DateTime::<Utc>::from_timestamp(seconds, 0) else {
        return format_numeric(value, step);
    };
    let format = if step >= 86_400.0 {
        "%Y-%m-%d"
    } else if step >= 60.0 {
        "%H:%M"
    } else {
        "%H:%M:%S"
    };
    time.format(format).to_string()
}

/// Elapsed seconds as `m:ss` or `h:mm:ss`.
fn format_elapsed(value: f64) -> String {
    let total = value.max(0.0).round() as u64;
    let hours = total / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

fn format_numeric(value: f64, step: f64) -> String {
    let decimals = if !step.is_finite() || step <= 0.0 || step >= 1.0 {
        if step.is_finite() && step > 0.0 && step.fract().abs() > 1e-9 {
            1
        } else {
            0
        }
    } else {
        // One digit past the step's leading decimal place, capped for labels.
        ((-step.log10()).ceil() as usize + 1).min(6)
    };
    format!("{value:.decimals$}")
}
