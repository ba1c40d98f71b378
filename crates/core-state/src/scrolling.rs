//! Scrolling windows.
//!
//! A scrolling panel keeps the page size as the window length but moves the
//! window origin by a step: page `p` shows `[(p-1)*step, min(start+size, len))`.
//!
//! `next` refuses when `page*step + size >= len + step`. This denies the last
//! partial step: with 15 items, size 9 and step 3 the reachable windows are
//! `[0,9)`, `[3,12)` and `[6,15)`, and `next` from the third is refused
//! (`3*3 + 9 >= 15 + 3`). `scroll_positions` counts those windows and bounds
//! `set_page_number`. A page-bound title still reports `pages_count`
//! (`ceil(len / size)`) as its total, so the last windows can read past it.
//!
//! Step size is lazy. With a region it is one row (vertical) or one column
//! (horizontal) of the region. Without one it is the length of the first run
//! of free cells in the first row (vertical) or column (horizontal) that has
//! any; never less than one.

use core_model::{COLUMNS, Payload, row_col_of, slot_of};
use tracing::trace;

use crate::{Pagination, Panel, PanelItem, PanelMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Fill down a column before moving to the next column.
    Horizontal,
    /// Fill along a row before moving to the next row.
    Vertical,
}

#[derive(Debug, Clone)]
pub struct Scrolling<P> {
    pub(crate) pages: Pagination<P>,
    pub(crate) direction: ScrollDirection,
    pub(crate) step_size: Option<usize>,
}

impl<P> Scrolling<P> {
    /// `step_size == 0` computes the step lazily.
    pub fn new(pages: Pagination<P>, direction: ScrollDirection, step_size: usize) -> Self {
        Self {
            pages,
            direction,
            step_size: (step_size > 0).then_some(step_size),
        }
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn cached_step_size(&self) -> Option<usize> {
        self.step_size
    }

    pub fn pages(&self) -> &Pagination<P> {
        &self.pages
    }
}

impl<P: Payload> Panel<P> {
    fn scrolling(&self) -> Option<&Scrolling<P>> {
        match &self.mode {
            PanelMode::Scrolling(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling().is_some()
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scrolling().map(|s| s.direction)
    }

    pub fn cached_step_size(&self) -> Option<usize> {
        self.scrolling().and_then(|s| s.step_size)
    }

    /// `0` switches back to lazy computation.
    pub fn set_step_size(&mut self, step: usize) {
        if let PanelMode::Scrolling(s) = &mut self.mode {
            s.step_size = (step > 0).then_some(step);
        }
    }

    /// Step size, computed and cached on first use. 0 for non-scrolling panels.
    pub fn step_size(&mut self) -> usize {
        if !self.is_scrolling() {
            return 0;
        }
        if let Some(step) = self.cached_step_size() {
            return step;
        }
        let step = self.compute_step_size();
        if let PanelMode::Scrolling(s) = &mut self.mode {
            s.step_size = Some(step);
        }
        trace!(target: "panel.page", panel = %self.id, step, "step_size_computed");
        step
    }

    /// Cells a window could use when measuring the step: not bound to a
    /// fixed item and not showing anything other than the current page.
    fn is_free_for_step(&self, slot: usize) -> bool {
        let on_page = self
            .current_page_items()
            .is_some_and(|current| current.contains_key(&slot));
        slot < self.surface.size()
            && !self.items.contains_key(&slot)
            && (on_page || !self.surface.is_occupied(slot))
    }

    /// Length of the first run of free cells along `line`; 0 if none.
    fn free_run(&self, line: impl Iterator<Item = usize>) -> usize {
        let mut run = 0;
        for slot in line {
            if self.is_free_for_step(slot) {
                run += 1;
            } else if run > 0 {
                break;
            }
        }
        run
    }

    pub(crate) fn compute_step_size(&self) -> usize {
        let Some(scrolling) = self.scrolling() else {
            return 1;
        };
        let direction = scrolling.direction;
        if let Some(region) = scrolling.pages.region() {
            let Some(&first) = region.slots().first() else {
                return 1;
            };
            let (row, col) = row_col_of(first);
            let line = region.slots().iter().filter(|&&slot| match direction {
                ScrollDirection::Vertical => row_col_of(slot).0 == row,
                ScrollDirection::Horizontal => row_col_of(slot).1 == col,
            });
            return line.count().max(1);
        }
        let rows = self.geometry.rows();
        let first_run = match direction {
            ScrollDirection::Vertical => (1..=rows)
                .map(|row| self.free_run((1..=COLUMNS).map(move |col| slot_of(row, col))))
                .find(|run| *run > 0),
            ScrollDirection::Horizontal => (1..=COLUMNS)
                .map(|col| self.free_run((1..=rows).map(move |row| slot_of(row, col))))
                .find(|run| *run > 0),
        };
        first_run.unwrap_or(1)
    }

    pub(crate) fn scroll_can_advance(&mut self) -> bool {
        let len = self.page_items().len();
        let size = self.page_size();
        let step = self.step_size();
        self.page_number() * step + size < len + step
    }

    pub(crate) fn scroll_accepts(&mut self, page: usize) -> bool {
        let len = self.page_items().len();
        let size = self.page_size();
        let step = self.step_size();
        page > 0 && page * step + size <= len + step
    }

    /// Number of distinct windows `next_page` can reach from the first one.
    pub fn scroll_positions(&mut self) -> usize {
        let len = self.page_items().len();
        let size = self.page_size();
        if !self.is_scrolling() || len <= size {
            return 1;
        }
        (len - size).div_ceil(self.step_size()) + 1
    }

    /// Put each window item in the first free slot of the scroll direction's
    /// scan order.
    pub(crate) fn place_scrolled(&mut self, window: Vec<PanelItem<P>>) {
        let Some(direction) = self.scroll_direction() else {
            return;
        };
        let rows = self.geometry.rows();
        let order: Vec<usize> = match direction {
            ScrollDirection::Vertical => (0..rows * COLUMNS).collect(),
            ScrollDirection::Horizontal => (1..=COLUMNS)
                .flat_map(|col| (1..=rows).map(move |row| slot_of(row, col)))
                .collect(),
        };
        for item in window {
            let Some(slot) = order.iter().copied().find(|slot| !self.is_unavailable(*slot)) else {
                break;
            };
            self.place_page_item(slot, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PanelBuilder;
    use core_events::ViewerId;
    use core_model::PaginationRegion;
    use pretty_assertions::assert_eq;

    fn scroller(rows: u8, direction: ScrollDirection, page_size: usize, step: usize, items: usize) -> Panel<String> {
        let mut panel = PanelBuilder::new()
            .title("Scroll")
            .rows(rows)
            .scrolling(direction)
            .page_size(page_size)
            .step_size(step)
            .build()
            .unwrap();
        panel
            .add_page_items((0..items).map(|i| PanelItem::new(format!("s{i}"))))
            .unwrap();
        panel
    }

    fn payload_at(panel: &Panel<String>, slot: usize) -> Option<String> {
        panel.surface().slot(slot).map(|p| p.payload().clone())
    }

    #[test]
    fn windows_advance_by_step_and_stop_one_step_early() {
        let mut panel = scroller(1, ScrollDirection::Vertical, 9, 3, 15);
        assert_eq!(panel.window(1), 0..9);
        assert_eq!(panel.window(2), 3..12);
        assert_eq!(panel.window(3), 6..15);
        assert_eq!(panel.scroll_positions(), 3);

        panel.open(&ViewerId(1));
        assert!(panel.next_page());
        assert!(panel.next_page());
        assert_eq!(panel.page_number(), 3);
        // 3*3 + 9 >= 15 + 3
        assert!(!panel.next_page());
        assert_eq!(payload_at(&panel, 0).as_deref(), Some("s6"));
        assert_eq!(payload_at(&panel, 8).as_deref(), Some("s14"));
    }

    #[test]
    fn open_accepts_page_only_within_scroll_bound() {
        let mut panel = scroller(1, ScrollDirection::Vertical, 9, 3, 15);
        panel.open_page(&ViewerId(1), 3);
        assert_eq!(panel.page_number(), 3);
        panel.open_page(&ViewerId(1), 4);
        assert_eq!(panel.page_number(), 3);
    }

    #[test]
    fn horizontal_fill_goes_down_columns() {
        let mut panel = scroller(2, ScrollDirection::Horizontal, 4, 2, 6);
        panel.open(&ViewerId(1));
        assert_eq!(payload_at(&panel, 0).as_deref(), Some("s0"));
        assert_eq!(payload_at(&panel, 9).as_deref(), Some("s1"));
        assert_eq!(payload_at(&panel, 1).as_deref(), Some("s2"));
        assert_eq!(payload_at(&panel, 10).as_deref(), Some("s3"));
        assert!(panel.next_page());
        assert_eq!(payload_at(&panel, 0).as_deref(), Some("s2"));
        assert_eq!(payload_at(&panel, 10).as_deref(), Some("s5"));
    }

    #[test]
    fn lazy_step_measures_first_free_run() {
        let mut panel = scroller(3, ScrollDirection::Vertical, 0, 0, 40);
        for slot in 0..9 {
            panel.set_item(slot, PanelItem::new("border".to_string())).unwrap();
        }
        panel.set_item(9, PanelItem::new("edge".to_string())).unwrap();
        panel.set_item(17, PanelItem::new("edge".to_string())).unwrap();
        panel.open(&ViewerId(1));
        assert_eq!(panel.cached_step_size(), Some(7));
        assert_eq!(panel.page_size(), 16);
    }

    #[test]
    fn lazy_step_horizontal_counts_a_column() {
        let mut panel = scroller(3, ScrollDirection::Horizontal, 0, 0, 40);
        panel.set_item(0, PanelItem::new("corner".to_string())).unwrap();
        panel.open(&ViewerId(1));
        assert_eq!(panel.step_size(), 2);
    }

    #[test]
    fn region_step_is_one_row_or_column_of_the_region() {
        let mut vertical: Panel<String> = PanelBuilder::new()
            .title("R")
            .rows(4)
            .scrolling(ScrollDirection::Vertical)
            .region(PaginationRegion::rectangle(2, 2, 3, 8))
            .build()
            .unwrap();
        assert_eq!(vertical.step_size(), 7);
        assert_eq!(vertical.page_size(), 14);

        let mut horizontal: Panel<String> = PanelBuilder::new()
            .title("R")
            .rows(4)
            .scrolling(ScrollDirection::Horizontal)
            .region(PaginationRegion::rectangle(2, 2, 3, 8))
            .build()
            .unwrap();
        assert_eq!(horizontal.step_size(), 2);
    }

    #[test]
    fn next_then_previous_restores_the_window() {
        let mut panel = scroller(2, ScrollDirection::Horizontal, 4, 2, 9);
        panel.open(&ViewerId(1));
        let first: Vec<Option<String>> = (0..18).map(|slot| payload_at(&panel, slot)).collect();

        assert!(panel.next_page());
        assert_eq!(panel.page_number(), 2);
        assert_eq!(payload_at(&panel, 0).as_deref(), Some("s2"));
        assert!(panel.previous_page());

        let restored: Vec<Option<String>> = (0..18).map(|slot| payload_at(&panel, slot)).collect();
        assert_eq!(restored, first);
        assert_eq!(panel.current_page_items().map(|c| c.len()), Some(4));
        assert!(!panel.previous_page());
    }

    #[test]
    fn page_number_is_clamped_to_the_last_reachable_window() {
        let mut panel = scroller(1, ScrollDirection::Vertical, 9, 3, 16);
        assert_eq!(panel.scroll_positions(), 4);
        panel.set_page_number(usize::MAX);
        assert_eq!(panel.page_number(), 4);
        panel.update();
        assert_eq!(payload_at(&panel, 0).as_deref(), Some("s9"));
        assert_eq!(payload_at(&panel, 6).as_deref(), Some("s15"));
        assert_eq!(payload_at(&panel, 7), None);
    }

    #[test]
    fn scrolling_title_reports_page_count() {
        let mut panel: Panel<String> = PanelBuilder::new()
            .rows(1)
            .scrolling(ScrollDirection::Vertical)
            .page_size(9)
            .step_size(3)
            .dynamic_title("Feed")
            .build()
            .unwrap();
        panel
            .add_page_items((0..15).map(|i| PanelItem::new(format!("s{i}"))))
            .unwrap();
        panel.open(&ViewerId(1));
        assert_eq!(panel.pages_count(), 2);
        assert_eq!(panel.title(), "Feed - Page 1/2");
        assert!(panel.next_page());
        assert_eq!(panel.title(), "Feed - Page 2/2");
        assert!(panel.next_page());
        assert_eq!(panel.title(), "Feed - Page 3/2");
    }
}
