use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{AxisKind, ChartId, ChartKind};
use crate::error::{ChartError, ChartResult};

/// Declarative description of one axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AxisConfig {
    pub kind: AxisKind,
    #[serde(default)]
    pub label: Option<String>,
}

impl AxisConfig {
    #[must_use]
    pub fn new(kind: AxisKind) -> Self {
        Self { kind, label: None }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Visibility toggles for the chart chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFlags {
    pub show_title: bool,
    pub show_markers: bool,
    pub show_lines: bool,
    pub show_grid: bool,
    pub show_axes: bool,
    pub show_legend: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            show_title: true,
            show_markers: true,
            show_lines: true,
            show_grid: true,
            show_axes: true,
            show_legend: true,
        }
    }
}

/// Per-series presentation. Colors are resolved from the built-in palette by
/// index so definitions stay serializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub label: String,
    pub palette_index: usize,
    pub line_width: f64,
}

impl SeriesStyle {
    #[must_use]
    pub fn new(label: impl Into<String>, palette_index: usize) -> Self {
        Self {
            label: label.into(),
            palette_index,
            line_width: 1.5,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "series line width must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceAxis {
    X,
    Y,
}

/// A fixed guide line pinned to one domain value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub axis: ReferenceAxis,
    pub value: f64,
    #[serde(default)]
    pub label: Option<String>,
}

impl ReferenceLine {
    #[must_use]
    pub fn horizontal(value: f64) -> Self {
        Self {
            axis: ReferenceAxis::Y,
            value,
            label: None,
        }
    }

    #[must_use]
    pub fn vertical(value: f64) -> Self {
        Self {
            axis: ReferenceAxis::X,
            value,
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Complete declarative description of one chart card.
///
/// Most dashboards carry a handful of series and at most a couple of
/// reference lines per chart, hence the inline capacities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDefinition {
    pub id: ChartId,
    pub title: String,
    pub kind: ChartKind,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    #[serde(default)]
    pub display: DisplayFlags,
    #[serde(default)]
    pub series_styles: SmallVec<[SeriesStyle; 4]>,
    #[serde(default)]
    pub reference_lines: SmallVec<[ReferenceLine; 2]>,
}

impl ChartDefinition {
    #[must_use]
    pub fn new(id: ChartId, title: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            x_axis: AxisConfig::default(),
            y_axis: AxisConfig::default(),
            display: DisplayFlags::default(),
            series_styles: SmallVec::new(),
            reference_lines: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_x_axis(mut self, axis: AxisConfig) -> Self {
        self.x_axis = axis;
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, axis: AxisConfig) -> Self {
        self.y_axis = axis;
        self
    }

    #[must_use]
    pub fn with_display(mut self, display: DisplayFlags) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub fn with_series_style(mut self, style: SeriesStyle) -> Self {
        self.series_styles.push(style);
        self
    }

    #[must_use]
    pub fn with_reference_line(mut self, line: ReferenceLine) -> Self {
        self.reference_lines.push(line);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for style in &self.series_styles {
            style.validate()?;
        }
        for line in &self.reference_lines {
            if !line.value.is_finite() {
                return Err(ChartError::InvalidConfig(
                    "reference line value must be finite".to_owned(),
                ));
            }
        }
        Ok(())
    }
}
