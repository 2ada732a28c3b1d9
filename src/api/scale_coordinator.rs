//! Base/current scale pair management for one chart.
//!
//! The base pair maps the fitted data domain onto the plot area; the current
//! pair is the base composed with the live zoom transform. Both scales of a
//! pair are replaced together, so a reader can never observe an x scale from
//! one generation paired with a y scale from another.

use tracing::debug;

use crate::core::{
    AxisKind, ChartId, DataSeries, DomainTuning, PlotArea, Scale, SeriesFingerprint, ZoomTransform,
};
use crate::error::ChartResult;
use super::events::ScaleDomainEvent;

/// Relative tolerance for treating two domains as equal, scaled by the
/// domain span.
const DOMAIN_EVENT_TOLERANCE: f64 = 1e-9;

/// An x/y scale pair from one rebuild generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalePair {
    pub x: Scale,
    pub y: Scale,
}

/// Inputs whose change forces a base-scale rebuild.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RebuildKey {
    fingerprint: SeriesFingerprint,
    x_kind: AxisKind,
    y_kind: AxisKind,
    plot: PlotArea,
}

/// Owns base and current scales and the domain-changed event edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleCoordinator {
    chart: ChartId,
    tuning: DomainTuning,
    base: Option<ScalePair>,
    current: Option<ScalePair>,
    rebuilt_for: Option<RebuildKey>,
    pending_event: Option<ScaleDomainEvent>,
}

impl ScaleCoordinator {
    pub fn new(chart: ChartId, tuning: DomainTuning) -> ChartResult<Self> {
        Ok(Self {
            chart,
            tuning: tuning.validate()?,
            base: None,
            current: None,
            rebuilt_for: None,
            pending_event: None,
        })
    }

    #[must_use]
    pub fn base(&self) -> Option<ScalePair> {
        self.base
    }

    #[must_use]
    pub fn current(&self) -> Option<ScalePair> {
        self.current
    }

    /// Rebuilds the base pair when data identity, axis kinds or the plot
    /// area changed. Returns `true` on rebuild.
    ///
    /// The series must already be resolved; loading charts never reach this
    /// point.
    pub fn ensure_base(
        &mut self,
        x_kind: AxisKind,
        y_kind: AxisKind,
        series: &DataSeries,
        plot: PlotArea,
    ) -> ChartResult<bool> {
        let key = RebuildKey {
            fingerprint: series.fingerprint(),
            x_kind,
            y_kind,
            plot,
        };
        if self.rebuilt_for == Some(key) {
            return Ok(false);
        }

        let x = Scale::fitted(x_kind, series.x_extent()?, self.tuning, plot.left, plot.right())?;
        // The y range is inverted so larger values plot higher on screen.
        let y = Scale::fitted(y_kind, series.y_extent()?, self.tuning, plot.bottom(), plot.top)?;

        debug!(
            chart = self.chart.raw(),
            points = series.len(),
            "rebuilding base scales"
        );
        self.base = Some(ScalePair { x, y });
        self.rebuilt_for = Some(key);
        Ok(true)
    }

    /// Recomputes the current pair from the base and a zoom transform. The
    /// pair is swapped as one value; a domain-changed event is queued only
    /// when the domain actually moved.
    pub fn apply_transform(&mut self, transform: ZoomTransform) -> ChartResult<()> {
        let Some(base) = self.base else {
            return Ok(());
        };
        let next = ScalePair {
            x: transform.rescale_x(base.x)?,
            y: transform.rescale_y(base.y)?,
        };

        let moved = match self.current {
            Some(previous) => {
                !domains_equal(previous.x.domain(), next.x.domain())
                    || !domains_equal(previous.y.domain(), next.y.domain())
            }
            None => true,
        };
        self.current = Some(next);

        if moved {
            self.pending_event = Some(ScaleDomainEvent {
                chart: self.chart,
                x_domain: next.x.domain(),
                y_domain: next.y.domain(),
                x_axis: next.x.kind(),
            });
        }
        Ok(())
    }

    /// Drains the queued domain-changed event, if any.
    pub fn take_domain_event(&mut self) -> Option<ScaleDomainEvent> {
        self.pending_event.take()
    }

    /// Drops all built scales; the next `ensure_base` call rebuilds.
    pub fn invalidate(&mut self) {
        self.base = None;
        self.current = None;
        self.rebuilt_for = None;
    }
}

fn domains_equal(a: (f64, f64), b: (f64, f64)) -> bool {
    let span = (a.1 - a.0).abs().max((b.1 - b.0).abs()).max(1.0);
    let tolerance = DOMAIN_EVENT_TOLERANCE * span;
    (a.0 - b.0).abs() <= tolerance && (a.1 - b.1).abs() <= tolerance
}
