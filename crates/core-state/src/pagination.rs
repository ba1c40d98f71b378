//! Paginated windows over the page-item backlog.
//!
//! Page `p` shows backlog items `[(p-1)*size, min(p*size, len))`. Items go
//! either into the pagination region's slots (in region order) or into slots
//! `0, 1, 2, ...`; slots holding a fixed item or anything else the surface
//! already shows are skipped. Window items that find no slot before the
//! surface ends are simply not shown.
//!
//! Page size is lazy: the region size when a region is set, otherwise the
//! number of grid slots without a fixed item. An empty backlog still has one
//! page. Scrolling panels share all of this and only swap the window origin
//! and the free-slot scan (`scrolling.rs`).

use std::collections::BTreeMap;
use std::ops::Range;

use core_model::{ItemId, PaginationRegion, Payload};
use tracing::trace;

use crate::{Panel, PanelError, PanelItem, PanelMode};

/// Backlog and page bookkeeping shared by paginated and scrolling panels.
#[derive(Debug, Clone)]
pub struct Pagination<P> {
    pub(crate) backlog: Vec<PanelItem<P>>,
    pub(crate) page_size: Option<usize>,
    pub(crate) page: usize,
    pub(crate) region: Option<PaginationRegion>,
    pub(crate) current: BTreeMap<usize, PanelItem<P>>,
}

impl<P> Pagination<P> {
    /// `page_size == 0` computes the size lazily.
    pub fn new(page_size: usize, region: Option<PaginationRegion>) -> Self {
        Self {
            backlog: Vec::new(),
            page_size: (page_size > 0).then_some(page_size),
            page: 1,
            region,
            current: BTreeMap::new(),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn cached_page_size(&self) -> Option<usize> {
        self.page_size
    }

    pub fn region(&self) -> Option<&PaginationRegion> {
        self.region.as_ref()
    }

    pub fn backlog(&self) -> &[PanelItem<P>] {
        &self.backlog
    }

    pub fn current(&self) -> &BTreeMap<usize, PanelItem<P>> {
        &self.current
    }
}

impl<P: Payload> Panel<P> {
    pub(crate) fn pagination(&self) -> Option<&Pagination<P>> {
        match &self.mode {
            PanelMode::Plain => None,
            PanelMode::Paginated(p) => Some(p),
            PanelMode::Scrolling(s) => Some(&s.pages),
        }
    }

    pub(crate) fn pagination_mut(&mut self) -> Option<&mut Pagination<P>> {
        match &mut self.mode {
            PanelMode::Plain => None,
            PanelMode::Paginated(p) => Some(p),
            PanelMode::Scrolling(s) => Some(&mut s.pages),
        }
    }

    pub fn is_paginated(&self) -> bool {
        self.pagination().is_some()
    }

    /// Queue items for pagination. Plain panels have no backlog.
    pub fn add_page_items(&mut self, items: impl IntoIterator<Item = PanelItem<P>>) -> Result<(), PanelError> {
        let Some(p) = self.pagination_mut() else {
            return Err(PanelError::UnsupportedOperation(
                "page items need a paginated or scrolling panel",
            ));
        };
        let before = p.backlog.len();
        p.backlog.extend(items);
        trace!(target: "panel.page", added = p.backlog.len() - before, total = p.backlog.len(), "page_items_added");
        Ok(())
    }

    pub fn page_items(&self) -> &[PanelItem<P>] {
        self.pagination().map(|p| p.backlog()).unwrap_or(&[])
    }

    /// Slot → item for the page currently rendered.
    pub fn current_page_items(&self) -> Option<&BTreeMap<usize, PanelItem<P>>> {
        self.pagination().map(|p| &p.current)
    }

    /// Current page (1 for plain panels).
    pub fn page_number(&self) -> usize {
        self.pagination().map(|p| p.page).unwrap_or(1)
    }

    pub fn cached_page_size(&self) -> Option<usize> {
        self.pagination().and_then(|p| p.page_size)
    }

    pub fn region(&self) -> Option<&PaginationRegion> {
        self.pagination().and_then(|p| p.region.as_ref())
    }

    pub(crate) fn compute_page_size(&self) -> usize {
        if let Some(region) = self.region() {
            return region.len().max(1);
        }
        let free = (0..self.geometry.row_slots())
            .filter(|slot| self.geometry.contains(*slot) && !self.items.contains_key(slot))
            .count();
        free.max(1)
    }

    /// Page size, computed and cached on first use. 0 for plain panels.
    pub fn page_size(&mut self) -> usize {
        if !self.is_paginated() {
            return 0;
        }
        if let Some(size) = self.cached_page_size() {
            return size;
        }
        let size = self.compute_page_size();
        if let Some(p) = self.pagination_mut() {
            p.page_size = Some(size);
        }
        trace!(target: "panel.page", panel = %self.id, size, "page_size_computed");
        size
    }

    /// `ceil(backlog / page_size)`, with an empty backlog counting as one page.
    pub fn pages_count(&mut self) -> usize {
        let len = self.page_items().len();
        if !self.is_paginated() || len == 0 {
            return 1;
        }
        len.div_ceil(self.page_size())
    }

    /// Backlog index range shown on `page`.
    pub fn window(&mut self, page: usize) -> Range<usize> {
        let len = self.page_items().len();
        let size = self.page_size();
        let index = page.saturating_sub(1);
        let (start, end) = match self.mode {
            PanelMode::Plain => (0, 0),
            PanelMode::Paginated(_) => (
                index.saturating_mul(size),
                (index + 1).saturating_mul(size).min(len),
            ),
            PanelMode::Scrolling(_) => {
                let start = index.saturating_mul(self.step_size());
                (start, start.saturating_add(size).min(len))
            }
        };
        start.min(end)..end
    }

    pub fn next_page(&mut self) -> bool {
        let allowed = match self.mode {
            PanelMode::Plain => false,
            PanelMode::Paginated(_) => self.page_number() < self.pages_count(),
            PanelMode::Scrolling(_) => self.scroll_can_advance(),
        };
        if !allowed {
            trace!(target: "panel.page", panel = %self.id, page = self.page_number(), "next_at_boundary");
            return false;
        }
        self.turn_to(self.page_number() + 1);
        true
    }

    pub fn previous_page(&mut self) -> bool {
        let page = self.page_number();
        if !self.is_paginated() || page <= 1 {
            trace!(target: "panel.page", panel = %self.id, page, "previous_at_boundary");
            return false;
        }
        self.turn_to(page - 1);
        true
    }

    fn turn_to(&mut self, page: usize) {
        if let Some(p) = self.pagination_mut() {
            p.page = page;
        }
        trace!(target: "panel.page", panel = %self.id, page, "page_turned");
        self.render_page();
        self.refresh_pagination_title();
    }

    /// The page `next_page` would move to, or the current one at the end.
    pub fn next_page_number(&mut self) -> usize {
        let page = self.page_number();
        let allowed = match self.mode {
            PanelMode::Plain => false,
            PanelMode::Paginated(_) => page < self.pages_count(),
            PanelMode::Scrolling(_) => self.scroll_can_advance(),
        };
        if allowed { page + 1 } else { page }
    }

    pub fn previous_page_number(&self) -> usize {
        self.page_number().saturating_sub(1).max(1)
    }

    /// Jump to `page` without re-rendering; the dynamic title follows.
    /// Clamped into `1..=last`, where the last page is `pages_count` for
    /// paginated panels and the last window `next_page` can reach for
    /// scrolling ones.
    pub fn set_page_number(&mut self, page: usize) {
        let last = match self.mode {
            PanelMode::Plain => return,
            PanelMode::Paginated(_) => self.pages_count(),
            PanelMode::Scrolling(_) => self.scroll_positions(),
        };
        let page = page.clamp(1, last.max(1));
        if let Some(p) = self.pagination_mut() {
            p.page = page;
        }
        self.refresh_pagination_title();
    }

    /// `0` switches back to lazy computation.
    pub fn set_page_size(&mut self, size: usize) {
        if let Some(p) = self.pagination_mut() {
            p.page_size = (size > 0).then_some(size);
        }
    }

    pub fn set_region(&mut self, region: PaginationRegion) {
        if let Some(p) = self.pagination_mut() {
            p.region = Some(region);
            p.page_size = None;
        }
        if let PanelMode::Scrolling(s) = &mut self.mode {
            s.step_size = None;
        }
    }

    /// Drop cached page and step sizes so the next use recomputes them.
    pub fn force_recompute(&mut self) {
        if let Some(p) = self.pagination_mut() {
            p.page_size = None;
        }
        if let PanelMode::Scrolling(s) = &mut self.mode {
            s.step_size = None;
        }
        trace!(target: "panel.page", panel = %self.id, "sizes_invalidated");
    }

    /// Replace the payload of the page item shown at `slot`. Returns false
    /// when no page item is shown there.
    pub fn update_page_item(&mut self, slot: usize, payload: P) -> bool {
        let Some(p) = self.pagination_mut() else {
            return false;
        };
        let Some(item) = p.current.get_mut(&slot) else {
            return false;
        };
        item.set_payload(payload.clone());
        let id = item.id();
        let shown = item.tagged().clone();
        if let Some(queued) = p.backlog.iter_mut().find(|it| it.id() == id) {
            queued.set_payload(payload);
        }
        self.surface.set_slot(slot, Some(shown));
        true
    }

    /// Swap the page item shown at `slot` (and its backlog entry) for `item`.
    pub fn replace_page_item(&mut self, slot: usize, item: PanelItem<P>) -> bool {
        let Some(p) = self.pagination_mut() else {
            return false;
        };
        let Some(old) = p.current.get(&slot).map(PanelItem::id) else {
            return false;
        };
        if let Some(queued) = p.backlog.iter_mut().find(|it| it.id() == old) {
            *queued = item.clone();
        }
        let shown = item.tagged().clone();
        p.current.insert(slot, item);
        self.surface.set_slot(slot, Some(shown));
        true
    }

    /// Remove a page item from the backlog and re-render the page.
    pub fn remove_page_item(&mut self, id: ItemId) -> bool {
        let Some(p) = self.pagination_mut() else {
            return false;
        };
        let Some(index) = p.backlog.iter().position(|it| it.id() == id) else {
            return false;
        };
        p.backlog.remove(index);
        trace!(target: "panel.page", item = %id, "page_item_removed");
        self.render_page();
        true
    }

    /// Remove the first backlog item whose payload equals `payload`.
    pub fn remove_page_payload(&mut self, payload: &P) -> bool {
        let found = self
            .page_items()
            .iter()
            .find(|it| it.payload() == payload)
            .map(PanelItem::id);
        match found {
            Some(id) => self.remove_page_item(id),
            None => false,
        }
    }

    pub fn clear_page_items(&mut self, update: bool) {
        if let Some(p) = self.pagination_mut() {
            p.backlog.clear();
        }
        if update {
            self.update();
        }
    }

    /// Open-time page preparation: settle sizes, accept or ignore the
    /// requested page, lay out the page and refresh the title.
    pub(crate) fn prepare_page(&mut self, requested: usize) {
        let accepted = match self.mode {
            PanelMode::Plain => return,
            PanelMode::Paginated(_) => requested > 0 && requested <= self.pages_count(),
            PanelMode::Scrolling(_) => {
                self.page_size();
                self.step_size();
                self.scroll_accepts(requested)
            }
        };
        if !accepted {
            trace!(target: "panel.page", panel = %self.id, requested, page = self.page_number(), "open_page_ignored");
        } else if let Some(p) = self.pagination_mut() {
            p.page = requested;
        }
        self.populate_page();
        self.refresh_pagination_title();
    }

    pub(crate) fn clear_page(&mut self) {
        let Some(p) = self.pagination_mut() else {
            return;
        };
        let slots: Vec<usize> = p.current.keys().copied().collect();
        p.current.clear();
        for slot in slots {
            self.surface.set_slot(slot, None);
        }
    }

    pub(crate) fn render_page(&mut self) {
        self.clear_page();
        self.populate_page();
    }

    /// A slot page content may not use: outside the surface, bound to a
    /// fixed item, or showing something already.
    pub(crate) fn is_unavailable(&self, slot: usize) -> bool {
        slot >= self.surface.size() || self.items.contains_key(&slot) || self.surface.is_occupied(slot)
    }

    pub(crate) fn place_page_item(&mut self, slot: usize, item: PanelItem<P>) {
        self.surface.set_slot(slot, Some(item.tagged().clone()));
        if let Some(p) = self.pagination_mut() {
            p.current.insert(slot, item);
        }
    }

    /// Lay the current window into free slots.
    pub(crate) fn populate_page(&mut self) {
        if !self.is_paginated() {
            return;
        }
        let page = self.page_number();
        let range = self.window(page);
        let window: Vec<PanelItem<P>> = self.page_items()[range].to_vec();
        let wanted = window.len();

        if let Some(region) = self.region().cloned() {
            let mut queue = window.into_iter();
            for &slot in region.slots() {
                if self.is_unavailable(slot) {
                    continue;
                }
                let Some(item) = queue.next() else { break };
                self.place_page_item(slot, item);
            }
        } else if let PanelMode::Scrolling(_) = self.mode {
            self.place_scrolled(window);
        } else {
            let capacity = self.surface.size();
            let mut slot = 0;
            for item in window {
                while slot < capacity && self.is_unavailable(slot) {
                    slot += 1;
                }
                if slot >= capacity {
                    break;
                }
                self.place_page_item(slot, item);
                slot += 1;
            }
        }

        let shown = self.current_page_items().map(BTreeMap::len).unwrap_or(0);
        trace!(target: "panel.page", panel = %self.id, page, wanted, shown, "page_rendered");
    }

    /// Push page numbers into a pagination-bound title. The total is
    /// `pages_count` for scrolling panels too.
    pub(crate) fn refresh_pagination_title(&mut self) {
        if !self.title.is_pagination() {
            return;
        }
        let page = self.page_number();
        let total = self.pages_count();
        if let Some(title) = self.title.update_pagination(page, total) {
            self.set_displayed_title(title);
        }
    }
}
