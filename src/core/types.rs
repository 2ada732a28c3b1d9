use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Clamps degenerate dimensions to 1px instead of failing.
    ///
    /// Zero-size containers are a recoverable configuration edge case, not an
    /// error: scales built against a clamped viewport stay usable until the
    /// next resize observation delivers a real size.
    #[must_use]
    pub fn clamped_to_minimum(self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
        }
    }
}

/// Non-negative pixel margins around the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotMargins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for PlotMargins {
    fn default() -> Self {
        Self {
            left: 48.0,
            right: 16.0,
            top: 24.0,
            bottom: 32.0,
        }
    }
}

impl PlotMargins {
    pub fn validate(self) -> ChartResult<Self> {
        let channels = [
            ("left", self.left),
            ("right", self.right),
            ("top", self.top),
            ("bottom", self.bottom),
        ];
        for (name, value) in channels {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "margin `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}

/// Pixel rectangle the data marks are drawn into, after margins are applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    /// Derives the plot rectangle from a viewport and margins.
    ///
    /// The rectangle never collapses below 1x1 px so scale ranges built from
    /// it remain invertible.
    #[must_use]
    pub fn from_viewport(viewport: Viewport, margins: PlotMargins) -> Self {
        let viewport = viewport.clamped_to_minimum();
        let width = (f64::from(viewport.width) - margins.left - margins.right).max(1.0);
        let height = (f64::from(viewport.height) - margins.top - margins.bottom).max(1.0);
        Self {
            left: margins.left,
            top: margins.top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// Stable identifier for one chart card in a dashboard collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChartId(u64);

impl ChartId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Identifier of one series within a chart (index into the definition's bindings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(u32);

impl SeriesId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChartKind {
    Scatter,
    #[default]
    Line,
    Bar,
}

/// Domain interpretation of an axis.
///
/// All x values are carried as `f64` in domain encoding: unix seconds for
/// `DateTime`, seconds for `ElapsedTime`, category index for `Category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisKind {
    DateTime,
    ElapsedTime,
    Category,
    #[default]
    Numeric,
}

/// One typed sample of a resolved data series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
    pub series: SeriesId,
}

impl SeriesPoint {
    #[must_use]
    pub fn new(x: f64, y: f64, series: SeriesId) -> Self {
        Self { x, y, series }
    }

    /// Encodes a timestamped sample for a `DateTime` axis.
    #[must_use]
    pub fn from_datetime(time: DateTime<Utc>, y: f64, series: SeriesId) -> Self {
        let seconds = time.timestamp() as f64;
        let sub = f64::from(time.timestamp_subsec_millis()) / 1_000.0;
        Self {
            x: seconds + sub,
            y,
            series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PlotArea, PlotMargins, Viewport};

    #[test]
    fn degenerate_viewport_is_clamped_not_rejected() {
        let viewport = Viewport::new(0, 0).clamped_to_minimum();
        assert!(viewport.is_valid());
        assert_eq!(viewport.width, 1);
        assert_eq!(viewport.height, 1);
    }

    #[test]
    fn plot_area_applies_margins_and_never_collapses() {
        let area = PlotArea::from_viewport(Viewport::new(800, 600), PlotMargins::default());
        assert_eq!(area.left, 48.0);
        assert_eq!(area.width, 800.0 - 48.0 - 16.0);
        assert_eq!(area.height, 600.0 - 24.0 - 32.0);

        let tiny = PlotArea::from_viewport(
            Viewport::new(10, 10),
            PlotMargins {
                left: 20.0,
                right: 20.0,
                top: 20.0,
                bottom: 20.0,
            },
        );
        assert_eq!(tiny.width, 1.0);
        assert_eq!(tiny.height, 1.0);
    }

    #[test]
    fn negative_margins_are_rejected() {
        let margins = PlotMargins {
            left: -1.0,
            ..PlotMargins::default()
        };
        assert!(margins.validate().is_err());
    }
}
