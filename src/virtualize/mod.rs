//! Viewport virtualization for chart collections.
//!
//! Only cards intersecting the visible scroll region (plus a buffer) are
//! mounted; the rest keep a fixed-footprint placeholder so the scrollbar and
//! layout height stay stable. Mounting is deferred one tick, and a card that
//! has rendered once stays rendered, so small scroll jitters never thrash
//! expensive chart initialization.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChartError, ChartResult};

/// Contiguous index range `[start, end)` of a collection considered visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ViewportWindow {
    pub start: usize,
    pub end: usize,
}

impl ViewportWindow {
    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }
}

/// Grid shape and virtualization tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VirtualGridConfig {
    pub columns: usize,
    pub rows: usize,
    /// Buffer measured in full screens of rows added on each side.
    pub buffer_screens: f64,
    /// Pagination bounds a page to `columns x rows`, so virtualization is
    /// disabled and every item of the page is considered visible.
    pub paginated: bool,
}

impl Default for VirtualGridConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            rows: 2,
            buffer_screens: 1.0,
            paginated: false,
        }
    }
}

impl VirtualGridConfig {
    pub fn validate(self) -> ChartResult<Self> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ChartError::InvalidConfig(
                "grid must have at least one row and one column".to_owned(),
            ));
        }
        if !self.buffer_screens.is_finite() || self.buffer_screens < 0.0 {
            return Err(ChartError::InvalidConfig(
                "buffer screens must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Compact layouts pack three or more rows or columns and use smaller
    /// minimums so dense grids stay legible without overflowing.
    #[must_use]
    pub fn is_compact(self) -> bool {
        self.rows >= 3 || self.columns >= 3
    }

    /// Target card height for the available container height.
    #[must_use]
    pub fn item_height(self, container_height: f64) -> f64 {
        let (min_height, padding) = if self.is_compact() {
            (140.0, 8.0)
        } else {
            (220.0, 16.0)
        };
        let share = container_height / self.rows as f64 - padding;
        share.max(min_height)
    }
}

/// Computes the buffered visible window for a row-major grid.
///
/// Every item whose row intersects `[scroll_offset, scroll_offset +
/// container_height]` is included, expanded by `buffer_screens` worth of rows
/// on each side.
#[must_use]
pub fn compute_window(
    item_count: usize,
    item_height: f64,
    scroll_offset: f64,
    container_height: f64,
    config: VirtualGridConfig,
) -> ViewportWindow {
    if item_count == 0 {
        return ViewportWindow::default();
    }
    if config.paginated || item_height <= 0.0 || container_height <= 0.0 {
        return ViewportWindow {
            start: 0,
            end: item_count,
        };
    }

    let scroll_offset = scroll_offset.max(0.0);
    let rows_per_screen = (container_height / item_height).ceil();
    let buffer_rows = (rows_per_screen * config.buffer_screens).ceil() as usize;

    let first_visible_row = (scroll_offset / item_height).floor() as usize;
    let last_visible_row = ((scroll_offset + container_height) / item_height).floor() as usize;

    let start_row = first_visible_row.saturating_sub(buffer_rows);
    let end_row = last_visible_row + buffer_rows;

    let start = start_row * config.columns;
    let end = ((end_row + 1) * config.columns).min(item_count);
    ViewportWindow {
        start: start.min(item_count),
        end,
    }
}

/// Windows a chart collection and tracks mount lifecycle per card.
#[derive(Debug, Clone)]
pub struct VirtualGrid {
    config: VirtualGridConfig,
    item_count: usize,
    item_height: f64,
    scroll_offset: f64,
    container_height: f64,
    window: ViewportWindow,
    /// Cards queued to mount on the next tick.
    pending_mount: IndexSet<usize>,
    /// Cards that have rendered at least once; sticky for the grid's lifetime.
    rendered: IndexSet<usize>,
}

impl VirtualGrid {
    pub fn new(
        config: VirtualGridConfig,
        item_count: usize,
        container_height: f64,
    ) -> ChartResult<Self> {
        let config = config.validate()?;
        let mut grid = Self {
            config,
            item_count,
            item_height: config.item_height(container_height),
            scroll_offset: 0.0,
            container_height,
            window: ViewportWindow::default(),
            pending_mount: IndexSet::new(),
            rendered: IndexSet::new(),
        };
        grid.recompute();
        Ok(grid)
    }

    #[must_use]
    pub fn config(&self) -> VirtualGridConfig {
        self.config
    }

    #[must_use]
    pub fn window(&self) -> ViewportWindow {
        self.window
    }

    #[must_use]
    pub fn item_height(&self) -> f64 {
        self.item_height
    }

    /// Total scrollable height; placeholders keep it stable regardless of
    /// which cards are mounted.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        let rows = self.item_count.div_ceil(self.config.columns);
        rows as f64 * self.item_height
    }

    pub fn set_item_count(&mut self, item_count: usize) {
        self.item_count = item_count;
        self.rendered.retain(|index| *index < item_count);
        self.pending_mount.retain(|index| *index < item_count);
        self.recompute();
    }

    pub fn set_scroll_offset(&mut self, scroll_offset: f64) {
        self.scroll_offset = scroll_offset.max(0.0);
        self.recompute();
    }

    /// Container resize recomputes the per-card target height.
    pub fn on_resize(&mut self, container_height: f64) {
        self.container_height = container_height.max(0.0);
        self.item_height = self.config.item_height(self.container_height);
        self.recompute();
    }

    /// The deferred mount tick: cards that entered the window since the last
    /// tick become rendered now. Returns the newly mounted indices.
    pub fn commit_pending_mounts(&mut self) -> Vec<usize> {
        let mounted: Vec<usize> = self.pending_mount.drain(..).collect();
        for index in &mounted {
            self.rendered.insert(*index);
        }
        if !mounted.is_empty() {
            debug!(count = mounted.len(), "mounting chart cards");
        }
        mounted
    }

    /// Whether the card should render chart content (vs. a placeholder).
    #[must_use]
    pub fn is_rendered(&self, index: usize) -> bool {
        self.rendered.contains(&index)
    }

    #[must_use]
    pub fn is_in_window(&self, index: usize) -> bool {
        self.window.contains(index)
    }

    #[must_use]
    pub fn rendered_count(&self) -> usize {
        self.rendered.len()
    }

    fn recompute(&mut self) {
        self.window = compute_window(
            self.item_count,
            self.item_height,
            self.scroll_offset,
            self.container_height,
            self.config,
        );
        for index in self.window.start..self.window.end {
            if !self.rendered.contains(&index) {
                self.pending_mount.insert(index);
            }
        }
        // Cards that left the window before their mount tick are dropped from
        // the queue; cards already rendered stay rendered.
        self.pending_mount
            .retain(|index| self.window.contains(*index));
    }
}

#[cfg(test)]
mod tests {
    use super::{VirtualGrid, VirtualGridConfig, compute_window};

    fn config(columns: usize, rows: usize) -> VirtualGridConfig {
        VirtualGridConfig {
            columns,
            rows,
            buffer_screens: 1.0,
            paginated: false,
        }
    }

    #[test]
    fn window_covers_all_intersecting_items() {
        let window = compute_window(100, 200.0, 400.0, 600.0, config(2, 3));
        // Visible rows 2..=5, one screen (3 rows) of buffer each side.
        assert!(window.start <= 2 * 2);
        assert!(window.end >= (5 + 1) * 2);
        assert!(window.end <= 100);
    }

    #[test]
    fn pagination_disables_virtualization() {
        let paginated = VirtualGridConfig {
            paginated: true,
            ..config(2, 2)
        };
        let window = compute_window(8, 200.0, 0.0, 400.0, paginated);
        assert_eq!(window.start, 0);
        assert_eq!(window.end, 8);
    }

    #[test]
    fn cards_render_only_after_mount_tick() {
        let mut grid = VirtualGrid::new(config(2, 2), 40, 600.0).expect("grid");
        assert!(!grid.is_rendered(0));

        let mounted = grid.commit_pending_mounts();
        assert!(mounted.contains(&0));
        assert!(grid.is_rendered(0));
    }

    #[test]
    fn rendered_cards_are_sticky_after_scrolling_away() {
        let mut grid = VirtualGrid::new(config(2, 2), 200, 600.0).expect("grid");
        grid.commit_pending_mounts();
        assert!(grid.is_rendered(0));

        grid.set_scroll_offset(50_000.0);
        assert!(!grid.is_in_window(0));
        assert!(grid.is_rendered(0));
    }

    #[test]
    fn compact_layout_uses_smaller_minimum_height() {
        assert!(config(2, 2).item_height(100.0) >= 220.0);
        assert!(config(3, 3).item_height(100.0) >= 140.0);
        assert!(config(3, 3).item_height(100.0) < 220.0);
    }

    #[test]
    fn content_height_is_stable_regardless_of_mounts() {
        let mut grid = VirtualGrid::new(config(2, 2), 40, 600.0).expect("grid");
        let before = grid.content_height();
        grid.commit_pending_mounts();
        grid.set_scroll_offset(1_000.0);
        grid.commit_pending_mounts();
        assert_eq!(grid.content_height(), before);
    }
}
