use tracing::warn;

use crate::core::{DataSeries, SeriesFingerprint};

/// Lifecycle of a chart's resolved dataset.
///
/// Scales are never built against a `Loading` slot; the chart renders a
/// placeholder until data arrives, so a half-loaded series can never flash a
/// bogus domain.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SeriesSlot {
    #[default]
    Loading,
    Ready(DataSeries),
    Failed {
        message: String,
        attempts: u32,
    },
}

/// Owns the data slot for one chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataController {
    slot: SeriesSlot,
}

impl DataController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn slot(&self) -> &SeriesSlot {
        &self.slot
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.slot, SeriesSlot::Loading)
    }

    /// The resolved series, when ready.
    #[must_use]
    pub fn series(&self) -> Option<&DataSeries> {
        match &self.slot {
            SeriesSlot::Ready(series) => Some(series),
            _ => None,
        }
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.series().map_or(0, DataSeries::len)
    }

    #[must_use]
    pub fn fingerprint(&self) -> Option<SeriesFingerprint> {
        self.series().map(DataSeries::fingerprint)
    }

    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match &self.slot {
            SeriesSlot::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn begin_load(&mut self) {
        self.slot = SeriesSlot::Loading;
    }

    pub fn resolve(&mut self, series: DataSeries) {
        self.slot = SeriesSlot::Ready(series);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        let attempts = match &self.slot {
            SeriesSlot::Failed { attempts, .. } => attempts + 1,
            _ => 1,
        };
        warn!(attempts, %message, "series load failed");
        self.slot = SeriesSlot::Failed { message, attempts };
    }

    /// Moves a failed slot back to `Loading` for another attempt. Returns
    /// `false` when the slot was not failed.
    pub fn retry(&mut self) -> bool {
        if matches!(self.slot, SeriesSlot::Failed { .. }) {
            self.slot = SeriesSlot::Loading;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::DataController;
    use crate::core::{DataSeries, SeriesId, SeriesPoint};

    #[test]
    fn slot_moves_through_load_lifecycle() {
        let mut controller = DataController::new();
        assert!(controller.is_loading());
        assert!(controller.series().is_none());

        controller.resolve(DataSeries::new(vec![SeriesPoint::new(
            0.0,
            1.0,
            SeriesId::new(0),
        )]));
        assert_eq!(controller.point_count(), 1);
        assert!(controller.fingerprint().is_some());
    }

    #[test]
    fn retry_only_applies_to_failed_slots() {
        let mut controller = DataController::new();
        assert!(!controller.retry());

        controller.fail("source unreachable");
        assert_eq!(controller.failure_message(), Some("source unreachable"));
        assert!(controller.retry());
        assert!(controller.is_loading());
    }

    #[test]
    fn repeated_failures_count_attempts() {
        let mut controller = DataController::new();
        controller.fail("boom");
        controller.fail("boom again");
        match controller.slot() {
            super::SeriesSlot::Failed { attempts, .. } => assert_eq!(*attempts, 2),
            other => panic!("unexpected slot: {other:?}"),
        }
    }
}
