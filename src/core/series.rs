use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::core::scale::value_extent;
use crate::core::types::SeriesPoint;
use crate::error::ChartResult;

/// Number of points hashed from each end of a series for identity checks.
const FINGERPRINT_SAMPLE: usize = 16;

/// Cheap approximate identity of a resolved series.
///
/// Hashes length plus the first/last few points. Two series with equal
/// fingerprints are treated as the same dataset for rebuild purposes; this
/// deliberately trades exactness for O(1) comparison on 10^6-point series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesFingerprint(u64);

impl SeriesFingerprint {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Ordered, immutable-per-render-cycle sequence of resolved samples.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSeries {
    points: Vec<SeriesPoint>,
}

impl DataSeries {
    #[must_use]
    pub fn new(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Inclusive min/max of x values, `None` when empty.
    pub fn x_extent(&self) -> ChartResult<Option<(f64, f64)>> {
        value_extent(self.points.iter().map(|point| point.x))
    }

    /// Inclusive min/max of y values, `None` when empty.
    pub fn y_extent(&self) -> ChartResult<Option<(f64, f64)>> {
        value_extent(self.points.iter().map(|point| point.y))
    }

    #[must_use]
    pub fn fingerprint(&self) -> SeriesFingerprint {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.points.len().hash(&mut hasher);

        let head = self.points.iter().take(FINGERPRINT_SAMPLE);
        let tail_start = self.points.len().saturating_sub(FINGERPRINT_SAMPLE);
        let tail = self.points.iter().skip(tail_start.max(FINGERPRINT_SAMPLE));
        for point in head.chain(tail) {
            OrderedFloat(point.x).hash(&mut hasher);
            OrderedFloat(point.y).hash(&mut hasher);
            point.series.raw().hash(&mut hasher);
        }

        SeriesFingerprint(hasher.finish())
    }
}

/// Interning table mapping category keys to stable domain indices.
///
/// Insertion order defines the axis order, so the first key observed plots
/// at x = 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryTable {
    indices: IndexMap<String, u32>,
}

impl CategoryTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the domain index for `key`, interning it on first sight.
    pub fn intern(&mut self, key: &str) -> u32 {
        if let Some(index) = self.indices.get(key) {
            return *index;
        }
        let index = self.indices.len() as u32;
        self.indices.insert(key.to_owned(), index);
        index
    }

    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<u32> {
        self.indices.get(key).copied()
    }

    #[must_use]
    pub fn label_at(&self, index: u32) -> Option<&str> {
        self.indices
            .get_index(index as usize)
            .map(|(key, _)| key.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Keeps every `stride`-th point, always retaining the final point so the
/// series' trailing edge never visually disappears under simplification.
#[must_use]
pub fn stride_points(points: &[SeriesPoint], stride: usize) -> Vec<SeriesPoint> {
    let stride = stride.max(1);
    if stride == 1 || points.len() <= 2 {
        return points.to_vec();
    }

    let mut sampled: Vec<SeriesPoint> = collect_strided(points, stride);
    if let Some(last) = points.last()
        && sampled.last() != Some(last)
    {
        sampled.push(*last);
    }
    sampled
}

/// Rate-samples a series; `rate` is the retained fraction in `(0, 1]`.
#[must_use]
pub fn sample_points(points: &[SeriesPoint], rate: f64) -> Vec<SeriesPoint> {
    if !rate.is_finite() || rate >= 1.0 || rate <= 0.0 {
        return points.to_vec();
    }
    let stride = (1.0 / rate).ceil() as usize;
    stride_points(points, stride)
}

#[cfg(not(feature = "parallel-sampling"))]
fn collect_strided(points: &[SeriesPoint], stride: usize) -> Vec<SeriesPoint> {
    points.iter().copied().step_by(stride).collect()
}

#[cfg(feature = "parallel-sampling")]
fn collect_strided(points: &[SeriesPoint], stride: usize) -> Vec<SeriesPoint> {
    use rayon::prelude::*;

    (0..points.len())
        .into_par_iter()
        .filter(|index| index % stride == 0)
        .map(|index| points[index])
        .collect()
}
