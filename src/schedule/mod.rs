//! Cooperative, priority-ordered render task queue.
//!
//! Draw work is deferred into tasks the host drains while otherwise idle, so
//! interactive operations preempt large background redraws. Within one
//! priority tasks run in FIFO order; a newly queued task for a chart
//! supersedes a queued-but-not-yet-started task for the same chart.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::ChartId;

/// Point count above which a non-interactive redraw is queued at low priority
/// so it never starves smaller charts sharing the same idle budget.
pub const LOW_PRIORITY_POINT_COUNT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderPriority {
    High,
    Normal,
    Low,
}

impl RenderPriority {
    /// Priority policy: interaction always wins; otherwise size decides.
    #[must_use]
    pub fn for_chart(interacting: bool, point_count: usize) -> Self {
        if interacting {
            Self::High
        } else if point_count <= LOW_PRIORITY_POINT_COUNT {
            Self::Normal
        } else {
            Self::Low
        }
    }

    const fn queue_index(self) -> usize {
        match self {
            Self::High => 0,
            Self::Normal => 1,
            Self::Low => 2,
        }
    }
}

/// One deferred unit of draw work.
pub type RenderJob = Box<dyn FnOnce()>;

struct QueuedTask {
    chart: ChartId,
    job: RenderJob,
}

/// Priority + FIFO task queue with per-chart supersede.
#[derive(Default)]
pub struct RenderScheduler {
    queues: [VecDeque<QueuedTask>; 3],
}

impl RenderScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a task, dropping any queued-but-not-started task for the same
    /// chart so the displayed state always reflects the newest inputs.
    pub fn add_task(&mut self, chart: ChartId, priority: RenderPriority, job: RenderJob) {
        let superseded = self.clear_chart(chart);
        if superseded > 0 {
            debug!(chart = chart.raw(), superseded, "superseding queued render task");
        }
        self.queues[priority.queue_index()].push_back(QueuedTask { chart, job });
    }

    /// Runs the single highest-priority task. Returns `false` when idle.
    pub fn run_one(&mut self) -> bool {
        for queue in &mut self.queues {
            if let Some(task) = queue.pop_front() {
                (task.job)();
                return true;
            }
        }
        false
    }

    /// Drains the queue until empty. Returns the number of tasks run.
    pub fn run_all(&mut self) -> usize {
        let mut ran = 0;
        while self.run_one() {
            ran += 1;
        }
        ran
    }

    /// Runs tasks until the time budget is spent, yielding control back to
    /// the host input loop between tasks. `clock` reports milliseconds.
    pub fn run_for(&mut self, budget_ms: f64, clock: &mut dyn FnMut() -> f64) -> usize {
        let start = clock();
        let mut ran = 0;
        while clock() - start < budget_ms {
            if !self.run_one() {
                break;
            }
            ran += 1;
        }
        ran
    }

    /// Drops all pending tasks; used on dashboard unmount.
    pub fn clear(&mut self) {
        for queue in &mut self.queues {
            queue.clear();
        }
    }

    /// Drops pending tasks for one chart. Returns how many were removed.
    pub fn clear_chart(&mut self, chart: ChartId) -> usize {
        let mut removed = 0;
        for queue in &mut self.queues {
            let before = queue.len();
            queue.retain(|task| task.chart != chart);
            removed += before - queue.len();
        }
        removed
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    #[must_use]
    pub fn has_task_for(&self, chart: ChartId) -> bool {
        self.queues
            .iter()
            .any(|queue| queue.iter().any(|task| task.chart == chart))
    }
}

impl std::fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("high", &self.queues[0].len())
            .field("normal", &self.queues[1].len())
            .field("low", &self.queues[2].len())
            .finish()
    }
}

/// Tracks which charts currently have a render in progress.
///
/// At most one render per chart may be active; callers skip enqueueing while
/// a chart is in flight. The returned guard clears the flag on drop, on every
/// exit path including unwinding, so a failed render can never leave a chart
/// permanently stuck non-interactive.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    active: Rc<RefCell<IndexSet<ChartId>>>,
}

impl InFlightRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `chart` in flight. Returns `None` when a render is already
    /// running for it.
    #[must_use]
    pub fn begin(&self, chart: ChartId) -> Option<RenderGuard> {
        let mut active = self.active.borrow_mut();
        if !active.insert(chart) {
            return None;
        }
        Some(RenderGuard {
            active: Rc::clone(&self.active),
            chart,
        })
    }

    #[must_use]
    pub fn is_in_flight(&self, chart: ChartId) -> bool {
        self.active.borrow().contains(&chart)
    }
}

/// Completion token for one chart render.
#[derive(Debug)]
pub struct RenderGuard {
    active: Rc<RefCell<IndexSet<ChartId>>>,
    chart: ChartId,
}

impl RenderGuard {
    #[must_use]
    pub fn chart(&self) -> ChartId {
        self.chart
    }
}

impl Drop for RenderGuard {
    fn drop(&mut self) {
        self.active.borrow_mut().shift_remove(&self.chart);
    }
}
