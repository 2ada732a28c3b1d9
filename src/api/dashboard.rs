//! Dashboard-level coordination: virtualized chart cards feeding the shared
//! render scheduler.

use tracing::debug;

use crate::core::ChartId;
use crate::error::ChartResult;
use crate::schedule::{InFlightRegistry, RenderGuard, RenderJob, RenderPriority, RenderScheduler};
use crate::virtualize::{ViewportWindow, VirtualGrid, VirtualGridConfig};

/// A scrollable grid of chart cards sharing one render queue.
///
/// Cards outside the buffered scroll window are placeholders and never
/// schedule work; a card with a render already in flight skips enqueueing
/// instead of stacking a duplicate.
#[derive(Debug)]
pub struct DashboardGrid {
    grid: VirtualGrid,
    scheduler: RenderScheduler,
    in_flight: InFlightRegistry,
    charts: Vec<ChartId>,
}

impl DashboardGrid {
    pub fn new(
        config: VirtualGridConfig,
        charts: Vec<ChartId>,
        container_height: f64,
    ) -> ChartResult<Self> {
        let grid = VirtualGrid::new(config, charts.len(), container_height)?;
        Ok(Self {
            grid,
            scheduler: RenderScheduler::new(),
            in_flight: InFlightRegistry::new(),
            charts,
        })
    }

    #[must_use]
    pub fn chart_count(&self) -> usize {
        self.charts.len()
    }

    #[must_use]
    pub fn chart_at(&self, index: usize) -> Option<ChartId> {
        self.charts.get(index).copied()
    }

    #[must_use]
    pub fn window(&self) -> ViewportWindow {
        self.grid.window()
    }

    #[must_use]
    pub fn is_card_rendered(&self, index: usize) -> bool {
        self.grid.is_rendered(index)
    }

    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.grid.content_height()
    }

    #[must_use]
    pub fn pending_renders(&self) -> usize {
        self.scheduler.pending_len()
    }

    pub fn set_scroll_offset(&mut self, scroll_offset: f64) {
        self.grid.set_scroll_offset(scroll_offset);
    }

    pub fn on_resize(&mut self, container_height: f64) {
        self.grid.on_resize(container_height);
    }

    /// Replaces the chart list. Queued renders for charts no longer present
    /// are dropped synchronously so no stale job runs after removal.
    pub fn set_charts(&mut self, charts: Vec<ChartId>) {
        for &chart in &self.charts {
            if !charts.contains(&chart) {
                let removed = self.scheduler.clear_chart(chart);
                if removed > 0 {
                    debug!(
                        chart = chart.raw(),
                        removed, "dropping queued renders for removed chart"
                    );
                }
            }
        }
        self.grid.set_item_count(charts.len());
        self.charts = charts;
    }

    /// The per-tick mount step: newly visible cards become rendered and are
    /// returned so the host can initialize their engines.
    pub fn commit_pending_mounts(&mut self) -> Vec<usize> {
        self.grid.commit_pending_mounts()
    }

    /// Queues a render for a card, applying the priority policy.
    ///
    /// Returns `false` when the card is still a placeholder or the chart
    /// already has a render in flight.
    pub fn request_render(
        &mut self,
        index: usize,
        interacting: bool,
        point_count: usize,
        job: RenderJob,
    ) -> bool {
        let Some(chart) = self.chart_at(index) else {
            return false;
        };
        if !self.grid.is_rendered(index) {
            debug!(chart = chart.raw(), "skipping render for unmounted card");
            return false;
        }
        if self.in_flight.is_in_flight(chart) {
            return false;
        }
        let priority = RenderPriority::for_chart(interacting, point_count);
        self.scheduler.add_task(chart, priority, job);
        true
    }

    /// Marks a chart's render as started; the guard clears it on drop.
    #[must_use]
    pub fn begin_render(&self, chart: ChartId) -> Option<RenderGuard> {
        self.in_flight.begin(chart)
    }

    /// Drains queued renders within a millisecond budget.
    pub fn run_renders(&mut self, budget_ms: f64, clock: &mut dyn FnMut() -> f64) -> usize {
        self.scheduler.run_for(budget_ms, clock)
    }

    /// Drains every queued render, ignoring the budget.
    pub fn run_all_renders(&mut self) -> usize {
        self.scheduler.run_all()
    }

    /// Unmount hook: drops all queued work.
    pub fn teardown(&mut self) {
        self.scheduler.clear();
    }
}
