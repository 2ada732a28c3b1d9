//! Public engine surface: per-chart facade, dashboard coordination and the
//! declarative configuration types.

mod axis_labels;
mod chart_definition;
mod dashboard;
mod data_controller;
mod engine;
mod engine_config;
mod events;
mod frame_builder;
mod scale_coordinator;

pub use axis_labels::{format_tick, tick_target_count, tick_values};
pub use chart_definition::{
    AxisConfig, ChartDefinition, DisplayFlags, ReferenceAxis, ReferenceLine, SeriesStyle,
};
pub use dashboard::DashboardGrid;
pub use data_controller::{DataController, SeriesSlot};
pub use engine::{ChartEngine, ChartHealth};
pub use engine_config::EngineConfig;
pub use events::ScaleDomainEvent;
pub use frame_builder::{FrameInputs, build_frame};
pub use scale_coordinator::{ScaleCoordinator, ScalePair};
