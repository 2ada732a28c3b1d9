use serde::{Deserialize, Serialize};

use crate::core::scale::Scale;
use crate::error::{ChartError, ChartResult};

/// Allowed zoom factor range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomBounds {
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min_zoom: 0.5,
            max_zoom: 10.0,
        }
    }
}

impl ZoomBounds {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.min_zoom.is_finite()
            || !self.max_zoom.is_finite()
            || self.min_zoom <= 0.0
            || self.max_zoom < self.min_zoom
        {
            return Err(ChartError::InvalidConfig(
                "zoom bounds must be finite, > 0 and ordered".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn clamp(self, k: f64) -> f64 {
        k.clamp(self.min_zoom, self.max_zoom)
    }
}

/// Optional clamp on pan translation, in pixels.
///
/// Panning is unbounded by default; hosts that want to keep data on screen
/// can configure a finite extent per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PanExtent {
    pub x: Option<(f64, f64)>,
    pub y: Option<(f64, f64)>,
}

impl PanExtent {
    fn clamp_axis(extent: Option<(f64, f64)>, value: f64) -> f64 {
        match extent {
            Some((min, max)) => value.clamp(min, max),
            None => value,
        }
    }
}

/// 2-D pan/zoom state: per-axis scale factors plus pixel translation.
///
/// Pointer and wheel gestures keep the factors uniform (`kx == ky`, or
/// `ky == 1` in x-only zoom mode); they diverge only for rectangular
/// range-selection zoom, which must map an arbitrary-aspect domain rectangle
/// onto the plot area exactly. Composition with a base scale is monotonic for
/// any positive factor, which is what keeps legend, reference-line and grid
/// positions consistent with the marks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub kx: f64,
    pub ky: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ZoomTransform {
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            kx: 1.0,
            ky: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Uniform transform with equal scale factor on both axes.
    #[must_use]
    pub const fn uniform(k: f64, x: f64, y: f64) -> Self {
        Self { kx: k, ky: k, x, y }
    }

    /// Primary scale factor, as reported to zoom-button state and bounds UI.
    #[must_use]
    pub fn k(self) -> f64 {
        self.kx
    }

    #[must_use]
    pub fn is_identity(self, tolerance: f64) -> bool {
        (self.kx - 1.0).abs() <= tolerance
            && (self.ky - 1.0).abs() <= tolerance
            && self.x.abs() <= tolerance
            && self.y.abs() <= tolerance
    }

    #[must_use]
    pub fn apply_x(self, pixel: f64) -> f64 {
        pixel * self.kx + self.x
    }

    #[must_use]
    pub fn apply_y(self, pixel: f64) -> f64 {
        pixel * self.ky + self.y
    }

    #[must_use]
    pub fn invert_x(self, pixel: f64) -> f64 {
        (pixel - self.x) / self.kx
    }

    #[must_use]
    pub fn invert_y(self, pixel: f64) -> f64 {
        (pixel - self.y) / self.ky
    }

    /// Returns the transform scaled by `factor` around a pixel anchor, with
    /// the primary factor clamped into `bounds`.
    ///
    /// The anchor point keeps its screen position, so wheel zoom stays under
    /// the pointer. When `scale_y` is false the vertical axis is left
    /// untouched (x-only zoom mode). At a bound this is a no-op.
    #[must_use]
    pub fn scaled_around(
        self,
        factor: f64,
        anchor_x: f64,
        anchor_y: f64,
        bounds: ZoomBounds,
        scale_y: bool,
    ) -> Self {
        let target_kx = bounds.clamp(self.kx * factor);
        if target_kx == self.kx {
            return self;
        }
        let ratio = target_kx / self.kx;

        let mut next = self;
        next.kx = target_kx;
        next.x = anchor_x - (anchor_x - self.x) * ratio;
        if scale_y {
            next.ky = bounds.clamp(self.ky * ratio);
            next.y = anchor_y - (anchor_y - self.y) * (next.ky / self.ky);
        }
        next
    }

    /// Returns the transform translated by a pixel delta, clamped to `extent`.
    #[must_use]
    pub fn translated_by(self, dx: f64, dy: f64, extent: PanExtent) -> Self {
        Self {
            kx: self.kx,
            ky: self.ky,
            x: PanExtent::clamp_axis(extent.x, self.x + dx),
            y: PanExtent::clamp_axis(extent.y, self.y + dy),
        }
    }

    /// Composes the transform with a base x scale, producing the current scale.
    pub fn rescale_x(self, base: Scale) -> ChartResult<Scale> {
        let (range_start, range_end) = base.range();
        let start = base.from_pixel(self.invert_x(range_start))?;
        let end = base.from_pixel(self.invert_x(range_end))?;
        base.with_domain(start, end)
    }

    /// Composes the transform with a base y scale, producing the current scale.
    pub fn rescale_y(self, base: Scale) -> ChartResult<Scale> {
        let (range_start, range_end) = base.range();
        let start = base.from_pixel(self.invert_y(range_start))?;
        let end = base.from_pixel(self.invert_y(range_end))?;
        base.with_domain(start, end)
    }

    /// Linear interpolation between two transforms for stepped animation.
    #[must_use]
    pub fn lerp(self, target: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            kx: self.kx + (target.kx - self.kx) * t,
            ky: self.ky + (target.ky - self.ky) * t,
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }
}
