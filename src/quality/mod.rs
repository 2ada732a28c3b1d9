//! Adaptive render-fidelity selection for large series.
//!
//! Fidelity drops synchronously the moment an interaction starts, so the very
//! next paint is already cheap, and is restored through a cancellable debounce
//! once the interaction ends. Rapid start/stop gesture bursts therefore never
//! flicker back to full quality in between.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChartError, ChartResult};

/// Discrete rendering-fidelity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum QualityLevel {
    Low,
    Medium,
    #[default]
    High,
}

/// Concrete render options one fidelity tier maps to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub enable_markers: bool,
    pub marker_size: f64,
    /// Keep every n-th point when building line geometry.
    pub line_stride: usize,
    /// Fraction of points considered at all, in `(0, 1]`.
    pub sampling_rate: f64,
    pub enable_animation: bool,
}

impl RenderOptions {
    #[must_use]
    pub fn for_level(level: QualityLevel, point_count: usize, threshold: usize) -> Self {
        match level {
            QualityLevel::High => Self {
                enable_markers: true,
                marker_size: 6.0,
                line_stride: 1,
                sampling_rate: 1.0,
                enable_animation: true,
            },
            QualityLevel::Medium => Self {
                enable_markers: point_count < threshold,
                marker_size: 5.0,
                line_stride: 2,
                sampling_rate: 0.5,
                enable_animation: false,
            },
            QualityLevel::Low => Self {
                enable_markers: false,
                marker_size: 4.0,
                line_stride: 4,
                sampling_rate: 0.25,
                enable_animation: false,
            },
        }
    }
}

/// Tuning for degradation thresholds and restoration timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Point count above which interactions degrade fidelity.
    pub degrade_threshold: usize,
    /// Delay before restoring full fidelity after the last interaction ends.
    pub restore_debounce_ms: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            degrade_threshold: 5_000,
            restore_debounce_ms: 150.0,
        }
    }
}

impl QualityConfig {
    pub fn validate(self) -> ChartResult<Self> {
        if self.degrade_threshold == 0 {
            return Err(ChartError::InvalidConfig(
                "degrade threshold must be > 0".to_owned(),
            ));
        }
        if !self.restore_debounce_ms.is_finite() || self.restore_debounce_ms < 0.0 {
            return Err(ChartError::InvalidConfig(
                "restore debounce must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Public fidelity snapshot consumed by the frame builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityState {
    pub level: QualityLevel,
    pub options: RenderOptions,
    /// True while fidelity is reduced; drives the reduced-fidelity badge.
    pub is_transitioning: bool,
}

/// Pure fidelity decision for a point count and interaction flag.
#[must_use]
pub fn decide(point_count: usize, interacting: bool, threshold: usize) -> QualityLevel {
    if point_count <= threshold || !interacting {
        return QualityLevel::High;
    }
    if point_count <= threshold * 2 {
        QualityLevel::Medium
    } else {
        QualityLevel::Low
    }
}

/// Owns the fidelity state machine and its cancellable restore timer.
///
/// Time is passed in explicitly as host-clock milliseconds; there is no
/// internal timer thread. The host is expected to call `poll` once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityOptimizer {
    config: QualityConfig,
    level: QualityLevel,
    point_count: usize,
    interacting: bool,
    restore_deadline_ms: Option<f64>,
}

impl QualityOptimizer {
    pub fn new(config: QualityConfig) -> ChartResult<Self> {
        Ok(Self {
            config: config.validate()?,
            level: QualityLevel::High,
            point_count: 0,
            interacting: false,
            restore_deadline_ms: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> QualityConfig {
        self.config
    }

    #[must_use]
    pub fn level(&self) -> QualityLevel {
        self.level
    }

    #[must_use]
    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    #[must_use]
    pub fn state(&self) -> QualityState {
        QualityState {
            level: self.level,
            options: RenderOptions::for_level(
                self.level,
                self.point_count,
                self.config.degrade_threshold,
            ),
            is_transitioning: self.level != QualityLevel::High,
        }
    }

    /// Updates the tracked series size; fidelity is re-decided on the next
    /// interaction edge, not retroactively.
    pub fn set_point_count(&mut self, point_count: usize) {
        self.point_count = point_count;
    }

    /// Synchronous degradation at the interaction edge.
    ///
    /// Any pending restore timer is cancelled, so a new gesture arriving
    /// inside the debounce window keeps the degraded level without a flash of
    /// full quality.
    pub fn on_interaction_start(&mut self, _now_ms: f64) {
        self.interacting = true;
        self.restore_deadline_ms = None;

        let next = decide(self.point_count, true, self.config.degrade_threshold);
        if next != self.level {
            debug!(
                points = self.point_count,
                from = ?self.level,
                to = ?next,
                "degrading render fidelity for interaction"
            );
            self.level = next;
        }
    }

    /// Arms the restore timer; fidelity stays degraded until it fires.
    pub fn on_interaction_end(&mut self, now_ms: f64) {
        if !self.interacting {
            return;
        }
        self.interacting = false;
        if self.level != QualityLevel::High {
            self.restore_deadline_ms = Some(now_ms + self.config.restore_debounce_ms);
        }
    }

    /// Fires the restore timer when due. Returns `true` when fidelity
    /// returned to `High` on this call.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let Some(deadline) = self.restore_deadline_ms else {
            return false;
        };
        if self.interacting || now_ms < deadline {
            return false;
        }

        self.restore_deadline_ms = None;
        if self.level == QualityLevel::High {
            return false;
        }
        self.level = QualityLevel::High;
        true
    }

    /// Unmount hook: drops the pending restore timer.
    pub fn cancel_pending_restore(&mut self) {
        self.restore_deadline_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{QualityConfig, QualityLevel, QualityOptimizer, RenderOptions, decide};

    fn optimizer() -> QualityOptimizer {
        QualityOptimizer::new(QualityConfig::default()).expect("valid config")
    }

    #[test]
    fn decision_table_matches_thresholds() {
        assert_eq!(decide(5_000, true, 5_000), QualityLevel::High);
        assert_eq!(decide(5_001, true, 5_000), QualityLevel::Medium);
        assert_eq!(decide(10_000, true, 5_000), QualityLevel::Medium);
        assert_eq!(decide(10_001, true, 5_000), QualityLevel::Low);
        assert_eq!(decide(1_000_000, false, 5_000), QualityLevel::High);
    }

    #[test]
    fn medium_options_hide_markers_above_threshold() {
        let options = RenderOptions::for_level(QualityLevel::Medium, 6_000, 5_000);
        assert!(!options.enable_markers);
        assert_eq!(options.line_stride, 2);
        assert!((options.sampling_rate - 0.5).abs() <= f64::EPSILON);
    }

    #[test]
    fn restore_is_debounced() {
        let mut optimizer = optimizer();
        optimizer.set_point_count(20_000);

        optimizer.on_interaction_start(0.0);
        assert_eq!(optimizer.level(), QualityLevel::Low);

        optimizer.on_interaction_end(10.0);
        assert!(!optimizer.poll(100.0));
        assert_eq!(optimizer.level(), QualityLevel::Low);

        assert!(optimizer.poll(160.0));
        assert_eq!(optimizer.level(), QualityLevel::High);
    }

    #[test]
    fn new_interaction_cancels_pending_restore() {
        let mut optimizer = optimizer();
        optimizer.set_point_count(20_000);

        optimizer.on_interaction_start(0.0);
        optimizer.on_interaction_end(10.0);
        optimizer.on_interaction_start(110.0);

        // The original deadline (10 + 150) must not fire mid-gesture.
        assert!(!optimizer.poll(161.0));
        assert_eq!(optimizer.level(), QualityLevel::Low);
    }

    #[test]
    fn small_series_never_degrade() {
        let mut optimizer = optimizer();
        optimizer.set_point_count(50);

        optimizer.on_interaction_start(0.0);
        assert_eq!(optimizer.level(), QualityLevel::High);
        assert!(!optimizer.state().is_transitioning);
    }
}
