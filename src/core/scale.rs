use serde::{Deserialize, Serialize};

use crate::core::types::AxisKind;
use crate::error::{ChartError, ChartResult};

/// Tuning controls for fitting a scale domain to data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainTuning {
    /// Symmetric padding added to both domain ends as a ratio of the span.
    pub padding_ratio: f64,
    /// Minimum domain span; flat data is expanded symmetrically to this.
    pub min_span_absolute: f64,
}

impl Default for DomainTuning {
    fn default() -> Self {
        Self {
            padding_ratio: 0.05,
            min_span_absolute: 1e-9,
        }
    }
}

impl DomainTuning {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.padding_ratio.is_finite() || self.padding_ratio < 0.0 {
            return Err(ChartError::InvalidConfig(
                "domain padding ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !self.min_span_absolute.is_finite() || self.min_span_absolute <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "domain min span must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// A domain-value -> pixel mapping plus its inverse.
///
/// The pixel range is baked in at build time, so a `Scale` is only valid for
/// the plot area it was built against. Ranges may be inverted; y scales are
/// built `[height, 0]` for screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    kind: AxisKind,
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl Scale {
    pub fn new(
        kind: AxisKind,
        domain_start: f64,
        domain_end: f64,
        range_start: f64,
        range_end: f64,
    ) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-degenerate".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() || range_start == range_end {
            return Err(ChartError::InvalidData(
                "scale range must be finite and non-degenerate".to_owned(),
            ));
        }

        Ok(Self {
            kind,
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    /// Fits a scale to a data extent, applying padding and the flat-domain
    /// expansion policy.
    ///
    /// `extent` is `None` for an empty series; a usable default domain is
    /// produced instead of an error.
    pub fn fitted(
        kind: AxisKind,
        extent: Option<(f64, f64)>,
        tuning: DomainTuning,
        range_start: f64,
        range_end: f64,
    ) -> ChartResult<Self> {
        let tuning = tuning.validate()?;
        let (start, end) = match extent {
            Some((min, max)) => normalize_domain(min, max, tuning.min_span_absolute)?,
            None => default_domain(kind),
        };
        let span = end - start;
        let padded_start = start - span * tuning.padding_ratio;
        let padded_end = end + span * tuning.padding_ratio;
        Self::new(kind, padded_start, padded_end, range_start, range_end)
    }

    #[must_use]
    pub fn kind(self) -> AxisKind {
        self.kind
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn domain_span(self) -> f64 {
        self.domain_end - self.domain_start
    }

    /// Returns a copy with a replaced domain and unchanged range/kind.
    pub fn with_domain(self, domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        Self::new(
            self.kind,
            domain_start,
            domain_end,
            self.range_start,
            self.range_end,
        )
    }

    pub fn to_pixel(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(self.range_start + normalized * (self.range_end - self.range_start))
    }

    pub fn from_pixel(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }
        let normalized = (pixel - self.range_start) / (self.range_end - self.range_start);
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}

/// Inclusive min/max of an iterator of finite values.
///
/// Non-finite samples poison the extent and are reported as invalid data; a
/// resolved series is expected to be pre-cleaned by the data collaborator.
pub fn value_extent(values: impl Iterator<Item = f64>) -> ChartResult<Option<(f64, f64)>> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut seen = false;

    for value in values {
        if !value.is_finite() {
            return Err(ChartError::InvalidData(
                "series values must be finite".to_owned(),
            ));
        }
        min = min.min(value);
        max = max.max(value);
        seen = true;
    }

    Ok(seen.then_some((min, max)))
}

fn normalize_domain(start: f64, end: f64, min_span: f64) -> ChartResult<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidData(
            "scale domain must be finite".to_owned(),
        ));
    }

    let (low, high) = (start.min(end), start.max(end));
    if high - low < min_span {
        let mid = (low + high) / 2.0;
        let half = min_span / 2.0;
        return Ok((mid - half, mid + half));
    }

    Ok((low, high))
}

fn default_domain(kind: AxisKind) -> (f64, f64) {
    match kind {
        // One category slot, centered.
        AxisKind::Category => (-0.5, 0.5),
        AxisKind::DateTime | AxisKind::ElapsedTime | AxisKind::Numeric => (0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::{DomainTuning, Scale, value_extent};
    use crate::core::types::AxisKind;

    #[test]
    fn scale_round_trip_within_tolerance() {
        let scale = Scale::new(AxisKind::Numeric, 10.0, 110.0, 0.0, 1000.0).expect("valid scale");
        let px = scale.to_pixel(42.5).expect("to pixel");
        let recovered = scale.from_pixel(px).expect("from pixel");
        assert!((recovered - 42.5).abs() <= 1e-9);
    }

    #[test]
    fn inverted_range_maps_screen_y() {
        let scale = Scale::new(AxisKind::Numeric, 0.0, 100.0, 600.0, 0.0).expect("valid scale");
        assert_eq!(scale.to_pixel(0.0).expect("bottom"), 600.0);
        assert_eq!(scale.to_pixel(100.0).expect("top"), 0.0);
    }

    #[test]
    fn fitted_empty_extent_produces_default_domain() {
        let scale = Scale::fitted(AxisKind::Numeric, None, DomainTuning::default(), 0.0, 100.0)
            .expect("default scale");
        let (start, end) = scale.domain();
        assert!(end > start);
    }

    #[test]
    fn fitted_flat_extent_expands_by_min_span() {
        let tuning = DomainTuning {
            padding_ratio: 0.0,
            min_span_absolute: 2.0,
        };
        let scale = Scale::fitted(AxisKind::Numeric, Some((42.0, 42.0)), tuning, 0.0, 100.0)
            .expect("expanded scale");
        let (start, end) = scale.domain();
        assert!((start - 41.0).abs() <= 1e-9);
        assert!((end - 43.0).abs() <= 1e-9);
    }

    #[test]
    fn value_extent_rejects_non_finite_samples() {
        let result = value_extent([1.0, f64::NAN].into_iter());
        assert!(result.is_err());
    }
}
