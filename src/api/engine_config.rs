use serde::{Deserialize, Serialize};

use crate::core::{DomainTuning, PlotMargins, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::ZoomPanConfig;
use crate::quality::QualityConfig;

/// Public engine bootstrap configuration.
///
/// Serializable so host applications can persist/load chart setup without
/// inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub margins: PlotMargins,
    #[serde(default)]
    pub domain_tuning: DomainTuning,
    #[serde(default)]
    pub zoom: ZoomPanConfig,
    #[serde(default)]
    pub quality: QualityConfig,
}

impl EngineConfig {
    /// Creates a config with default tuning for a viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margins: PlotMargins::default(),
            domain_tuning: DomainTuning::default(),
            zoom: ZoomPanConfig::default(),
            quality: QualityConfig::default(),
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: PlotMargins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_domain_tuning(mut self, tuning: DomainTuning) -> Self {
        self.domain_tuning = tuning;
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: ZoomPanConfig) -> Self {
        self.zoom = zoom;
        self
    }

    #[must_use]
    pub fn with_quality(mut self, quality: QualityConfig) -> Self {
        self.quality = quality;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.margins.validate()?;
        self.domain_tuning.validate()?;
        self.zoom.validate()?;
        self.quality.validate()?;
        Ok(self)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}
