//! plotgrid: interactive charting engine for large-dataset dashboards.
//!
//! The crate separates scale math, gesture handling, render-fidelity policy,
//! render scheduling and viewport virtualization behind a backend-agnostic
//! renderer trait, so hosts can drive many charts from one cooperative loop.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod quality;
pub mod render;
pub mod schedule;
pub mod telemetry;
pub mod virtualize;

pub use api::{ChartDefinition, ChartEngine, DashboardGrid, EngineConfig};
pub use error::{ChartError, ChartResult};
