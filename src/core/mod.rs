pub mod scale;
pub mod series;
pub mod transform;
pub mod types;

pub use scale::{DomainTuning, Scale, value_extent};
pub use series::{CategoryTable, DataSeries, SeriesFingerprint, sample_points, stride_points};
pub use transform::{PanExtent, ZoomBounds, ZoomTransform};
pub use types::{AxisKind, ChartId, ChartKind, PlotArea, PlotMargins, SeriesId, SeriesPoint, Viewport};
