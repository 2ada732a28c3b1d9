use serde::{Deserialize, Serialize};

use crate::core::{AxisKind, ChartId};

/// Broadcast when a chart's visible domain actually changed.
///
/// Hosts subscribe to drive linked cursors or synchronized zoom across
/// charts. Events are only emitted for real domain movement, never for
/// rebuilds that land on the same domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleDomainEvent {
    pub chart: ChartId,
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
    pub x_axis: AxisKind,
}
