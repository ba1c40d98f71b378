//! Panel state: slot-indexed items, handlers, permissions, lifecycle flags and
//! the pagination/scrolling windows.
//!
//! One `Panel<P>` type covers every panel flavour. The flavour is a tag
//! (`PanelMode`): `Plain` panels only hold fixed items; `Paginated` panels add
//! an ordered backlog of page items laid into free slots (or an explicit
//! `PaginationRegion`) one page at a time; `Scrolling` panels reuse the
//! paginated backlog but advance the window by a step smaller than the page.
//! Window arithmetic and render strategy are chosen by matching on the tag
//! (`pagination.rs`, `scrolling.rs`); everything else is shared.
//!
//! Invariants:
//! * `items` only holds slots accepted by `Geometry::contains`.
//! * `current_page_items()` mirrors exactly what the page render last wrote;
//!   it is cleared and rebuilt on every page change, loses a slot as soon as a
//!   fixed item is written over it, and is emptied (surface cells included)
//!   when the last viewer closes.
//! * Page number is always `>= 1`.
//! * Cached page and step sizes are `None` until first needed (or after
//!   `force_recompute`) and never zero once computed.
//!
//! Handlers never borrow the panel. They enqueue `PanelCommand`s on their
//! context; commands land in the panel's pending queue and are applied by
//! `apply_pending` once the current handler chain is done.
//!
//! Side-effect suppression:
//! * `flags.updating` is raised while the surface is recreated (retitle,
//!   growth) and prior viewers are reopened; open/close handlers stay silent.
//! * `flags.run_close_action` is lowered only while a deferred close that
//!   asked for silence is executing.
//!
//! Telemetry: slot mutations log on `panel.slots`, page work on `panel.page`,
//! titles on `panel.title`, open/close on `panel.lifecycle`.

use std::collections::BTreeMap;
use std::rc::Rc;

use core_config::PanelSettings;
use core_events::{
    ClickHandler, ClickKind, CloseEvent, CloseHandler, DeferredClose, DragHandler, HandlerContext,
    OpenEvent, OpenHandler, PanelCommand, PanelId, RawAction, Scheduler, ViewerId,
};
use core_model::{Geometry, ItemId, Payload, slot_of};
use core_render::{Surface, SurfaceProvider, Viewer};
use tracing::{debug, trace};

mod builder;
mod error;
mod filler;
mod item;
mod pagination;
mod permissions;
mod scrolling;
mod title;

pub use builder::PanelBuilder;
pub use error::PanelError;
pub use filler::{Filler, Side};
pub use item::PanelItem;
pub use pagination::Pagination;
pub use permissions::{PanelFlags, Permissions};
pub use scrolling::{ScrollDirection, Scrolling};
pub use title::{DynamicTitle, InteractionState, PaginationState, TitleFormat, format_page_title};

/// Panel-wide handlers, one per event family / region.
pub struct DefaultHandlers<P> {
    pub any_click: Option<ClickHandler<P>>,
    pub top_click: Option<ClickHandler<P>>,
    pub secondary_click: Option<ClickHandler<P>>,
    pub outside_click: Option<ClickHandler<P>>,
    pub drag: Option<DragHandler>,
    pub open: Option<OpenHandler>,
    pub close: Option<CloseHandler>,
}

impl<P> Default for DefaultHandlers<P> {
    fn default() -> Self {
        Self {
            any_click: None,
            top_click: None,
            secondary_click: None,
            outside_click: None,
            drag: None,
            open: None,
            close: None,
        }
    }
}

pub enum PanelMode<P> {
    Plain,
    Paginated(Pagination<P>),
    Scrolling(Scrolling<P>),
}

pub struct Panel<P: Payload> {
    id: PanelId,
    title: DynamicTitle<P>,
    displayed_title: String,
    geometry: Geometry,
    provider: Rc<dyn SurfaceProvider<P>>,
    surface: Box<dyn Surface<P>>,
    items: BTreeMap<usize, PanelItem<P>>,
    slot_handlers: BTreeMap<usize, ClickHandler<P>>,
    handlers: DefaultHandlers<P>,
    permissions: Permissions,
    flags: PanelFlags,
    settings: PanelSettings,
    mode: PanelMode<P>,
    pending: Vec<PanelCommand>,
}

impl<P: Payload> Panel<P> {
    /// Plain panel with a static title.
    pub fn new(
        title: impl Into<String>,
        geometry: Geometry,
        provider: Rc<dyn SurfaceProvider<P>>,
        settings: PanelSettings,
    ) -> Self {
        Self::with_mode(
            DynamicTitle::Static(title.into()),
            geometry,
            PanelMode::Plain,
            provider,
            settings,
        )
    }

    pub(crate) fn with_mode(
        title: DynamicTitle<P>,
        geometry: Geometry,
        mode: PanelMode<P>,
        provider: Rc<dyn SurfaceProvider<P>>,
        settings: PanelSettings,
    ) -> Self {
        let displayed_title = title.render();
        let surface = provider.create_surface(&displayed_title, geometry);
        Self {
            id: PanelId::next(),
            title,
            displayed_title,
            geometry,
            provider,
            surface,
            items: BTreeMap::new(),
            slot_handlers: BTreeMap::new(),
            handlers: DefaultHandlers::default(),
            permissions: Permissions::empty(),
            flags: PanelFlags::default(),
            settings,
            mode,
            pending: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------------------------------

    pub fn id(&self) -> PanelId {
        self.id
    }

    /// Title currently displayed.
    pub fn title(&self) -> &str {
        &self.displayed_title
    }

    pub fn dynamic_title(&self) -> &DynamicTitle<P> {
        &self.title
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn rows(&self) -> usize {
        self.geometry.rows()
    }

    pub fn mode(&self) -> &PanelMode<P> {
        &self.mode
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    pub fn surface(&self) -> &dyn Surface<P> {
        self.surface.as_ref()
    }

    pub fn viewers(&self) -> Vec<ViewerId> {
        self.surface.viewers()
    }

    pub fn items(&self) -> &BTreeMap<usize, PanelItem<P>> {
        &self.items
    }

    pub fn item(&self, slot: usize) -> Option<&PanelItem<P>> {
        self.items.get(&slot)
    }

    pub fn handlers(&self) -> &DefaultHandlers<P> {
        &self.handlers
    }

    pub fn slot_handler(&self, slot: usize) -> Option<&ClickHandler<P>> {
        self.slot_handlers.get(&slot)
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    pub fn flags(&self) -> PanelFlags {
        self.flags
    }

    /// The item a click at `slot` refers to: the current page first, then
    /// the fixed items.
    pub fn resolve_item(&self, slot: usize) -> Option<&PanelItem<P>> {
        self.pagination()
            .and_then(|p| p.current.get(&slot))
            .or_else(|| self.items.get(&slot))
    }

    // ---------------------------------------------------------------------------------------------
    // Slots and items
    // ---------------------------------------------------------------------------------------------

    fn validate_slot(&self, slot: usize) -> Result<(), PanelError> {
        if self.geometry.contains(slot) {
            return Ok(());
        }
        debug!(target: "panel.slots", slot, geometry = %self.geometry, "slot_out_of_range");
        Err(PanelError::SlotOutOfRange {
            slot,
            geometry: self.geometry,
        })
    }

    /// Bind `item` to `slot`. Takes effect on the next render.
    pub fn set_item(&mut self, slot: usize, item: PanelItem<P>) -> Result<(), PanelError> {
        self.validate_slot(slot)?;
        trace!(target: "panel.slots", slot, item = %item.id(), "set_item");
        self.items.insert(slot, item);
        Ok(())
    }

    pub fn set_item_at(&mut self, row: usize, col: usize, item: PanelItem<P>) -> Result<(), PanelError> {
        self.set_item(slot_of(row, col), item)
    }

    /// Bind the same item to several slots; nothing is bound if any slot is invalid.
    pub fn set_item_slots(&mut self, slots: &[usize], item: PanelItem<P>) -> Result<(), PanelError> {
        for &slot in slots {
            self.validate_slot(slot)?;
        }
        for &slot in slots {
            self.items.insert(slot, item.clone());
        }
        trace!(target: "panel.slots", count = slots.len(), item = %item.id(), "set_item_slots");
        Ok(())
    }

    pub fn remove_item(&mut self, slot: usize) -> Result<Option<PanelItem<P>>, PanelError> {
        self.validate_slot(slot)?;
        self.surface.set_slot(slot, None);
        self.release_page_slot(slot);
        let removed = self.items.remove(&slot);
        trace!(target: "panel.slots", slot, removed = removed.is_some(), "remove_item");
        Ok(removed)
    }

    pub fn remove_item_at(&mut self, row: usize, col: usize) -> Result<Option<PanelItem<P>>, PanelError> {
        self.remove_item(slot_of(row, col))
    }

    /// Remove the first slot (lowest index) holding the item with `id`.
    pub fn remove_item_by_id(&mut self, id: ItemId) -> Option<PanelItem<P>> {
        let slot = self.items.iter().find(|(_, it)| it.id() == id).map(|(s, _)| *s)?;
        self.take_fixed(slot)
    }

    /// Remove the first slot whose item payload equals `payload`.
    pub fn remove_payload(&mut self, payload: &P) -> Option<PanelItem<P>> {
        let slot = self
            .items
            .iter()
            .find(|(_, it)| it.payload() == payload)
            .map(|(s, _)| *s)?;
        self.take_fixed(slot)
    }

    fn take_fixed(&mut self, slot: usize) -> Option<PanelItem<P>> {
        self.surface.set_slot(slot, None);
        self.release_page_slot(slot);
        let removed = self.items.remove(&slot);
        trace!(target: "panel.slots", slot, "remove_item");
        removed
    }

    /// Place each item in the first empty slot (row-major). Items that find no
    /// slot are dropped, unless `expand_if_full` lets a grid grow one row at a
    /// time up to the configured ceiling. Returns how many items were dropped.
    pub fn add_items(&mut self, items: impl IntoIterator<Item = PanelItem<P>>, expand_if_full: bool) -> usize {
        let mut leftover = Vec::new();
        for item in items {
            let free = (0..self.geometry.row_slots())
                .find(|slot| self.geometry.contains(*slot) && !self.items.contains_key(slot));
            match free {
                Some(slot) => {
                    trace!(target: "panel.slots", slot, item = %item.id(), "add_item");
                    self.items.insert(slot, item);
                }
                None => leftover.push(item),
            }
        }
        if leftover.is_empty() {
            return 0;
        }
        if expand_if_full && let Some(grown) = self.geometry.grown(self.settings.max_rows) {
            debug!(target: "panel.slots", rows = grown.rows(), pending = leftover.len(), "panel_expanded");
            self.geometry = grown;
            self.rebuild_surface();
            return self.add_items(leftover, true);
        }
        debug!(target: "panel.slots", dropped = leftover.len(), "add_items_dropped");
        leftover.len()
    }

    /// Replace the payload at `slot` (creating an item if the slot is empty)
    /// and show it immediately.
    pub fn update_item(&mut self, slot: usize, payload: P) -> Result<(), PanelError> {
        self.validate_slot(slot)?;
        match self.items.get_mut(&slot) {
            Some(item) => item.set_payload(payload),
            None => {
                self.items.insert(slot, PanelItem::new(payload));
            }
        }
        let shown = self.items.get(&slot).map(|item| item.tagged().clone());
        self.surface.set_slot(slot, shown);
        self.release_page_slot(slot);
        trace!(target: "panel.slots", slot, "update_item");
        Ok(())
    }

    /// Bind a whole new item to `slot` and show it immediately.
    pub fn replace_item(&mut self, slot: usize, item: PanelItem<P>) -> Result<(), PanelError> {
        self.validate_slot(slot)?;
        self.surface.set_slot(slot, Some(item.tagged().clone()));
        self.release_page_slot(slot);
        trace!(target: "panel.slots", slot, item = %item.id(), "replace_item");
        self.items.insert(slot, item);
        Ok(())
    }

    /// Forget the page item at `slot` once a direct write replaced what the
    /// surface shows there. `set_item` leaves the page alone until the next
    /// render, so the page item stays both shown and resolvable until then.
    fn release_page_slot(&mut self, slot: usize) {
        if let Some(p) = self.pagination_mut()
            && p.current.remove(&slot).is_some()
        {
            trace!(target: "panel.page", slot, "page_slot_released");
        }
    }

    pub fn add_slot_handler(&mut self, slot: usize, handler: ClickHandler<P>) -> Result<(), PanelError> {
        self.validate_slot(slot)?;
        self.slot_handlers.insert(slot, handler);
        Ok(())
    }

    pub fn add_slot_handler_at(&mut self, row: usize, col: usize, handler: ClickHandler<P>) -> Result<(), PanelError> {
        self.add_slot_handler(slot_of(row, col), handler)
    }

    pub(crate) fn populate_fixed(&mut self) {
        for (slot, item) in &self.items {
            self.surface.set_slot(*slot, Some(item.tagged().clone()));
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Default handlers
    // ---------------------------------------------------------------------------------------------

    pub fn set_default_click_handler(&mut self, handler: Option<ClickHandler<P>>) {
        self.handlers.any_click = handler;
    }

    pub fn set_top_click_handler(&mut self, handler: Option<ClickHandler<P>>) {
        self.handlers.top_click = handler;
    }

    pub fn set_secondary_click_handler(&mut self, handler: Option<ClickHandler<P>>) {
        self.handlers.secondary_click = handler;
    }

    pub fn set_outside_click_handler(&mut self, handler: Option<ClickHandler<P>>) {
        self.handlers.outside_click = handler;
    }

    pub fn set_drag_handler(&mut self, handler: Option<DragHandler>) {
        self.handlers.drag = handler;
    }

    pub fn set_open_handler(&mut self, handler: Option<OpenHandler>) {
        self.handlers.open = handler;
    }

    pub fn set_close_handler(&mut self, handler: Option<CloseHandler>) {
        self.handlers.close = handler;
    }

    // ---------------------------------------------------------------------------------------------
    // Permissions and flags
    // ---------------------------------------------------------------------------------------------

    pub fn disable_item_place(&mut self) -> &mut Self {
        self.permissions.insert(Permissions::PREVENT_PLACE);
        self
    }

    pub fn disable_item_take(&mut self) -> &mut Self {
        self.permissions.insert(Permissions::PREVENT_TAKE);
        self
    }

    pub fn disable_item_swap(&mut self) -> &mut Self {
        self.permissions.insert(Permissions::PREVENT_SWAP);
        self
    }

    pub fn disable_item_drop(&mut self) -> &mut Self {
        self.permissions.insert(Permissions::PREVENT_DROP);
        self
    }

    pub fn disable_other_actions(&mut self) -> &mut Self {
        self.permissions.insert(Permissions::PREVENT_OTHER);
        self
    }

    pub fn disable_all_interactions(&mut self) -> &mut Self {
        self.permissions = Permissions::locked();
        self
    }

    pub fn enable_item_place(&mut self) -> &mut Self {
        self.permissions.remove(Permissions::PREVENT_PLACE);
        self
    }

    pub fn enable_item_take(&mut self) -> &mut Self {
        self.permissions.remove(Permissions::PREVENT_TAKE);
        self
    }

    pub fn enable_item_swap(&mut self) -> &mut Self {
        self.permissions.remove(Permissions::PREVENT_SWAP);
        self
    }

    pub fn enable_item_drop(&mut self) -> &mut Self {
        self.permissions.remove(Permissions::PREVENT_DROP);
        self
    }

    pub fn enable_other_actions(&mut self) -> &mut Self {
        self.permissions.remove(Permissions::PREVENT_OTHER);
        self
    }

    pub fn enable_all_interactions(&mut self) -> &mut Self {
        self.permissions = Permissions::empty();
        self
    }

    pub fn can_place_items(&self) -> bool {
        !self.permissions.contains(Permissions::PREVENT_PLACE)
    }

    pub fn can_take_items(&self) -> bool {
        !self.permissions.contains(Permissions::PREVENT_TAKE)
    }

    pub fn can_swap_items(&self) -> bool {
        !self.permissions.contains(Permissions::PREVENT_SWAP)
    }

    pub fn can_drop_items(&self) -> bool {
        !self.permissions.contains(Permissions::PREVENT_DROP)
    }

    pub fn allows_other_actions(&self) -> bool {
        !self.permissions.contains(Permissions::PREVENT_OTHER)
    }

    pub fn all_interactions_disabled(&self) -> bool {
        self.permissions.is_locked()
    }

    pub fn set_title_updates_on_item_click(&mut self, enabled: bool) {
        self.flags.title_updates_on_item_click = enabled;
    }

    pub fn set_run_open_action(&mut self, enabled: bool) {
        self.flags.run_open_action = enabled;
    }

    // ---------------------------------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------------------------------

    /// Open on the first page.
    pub fn open(&mut self, viewer: &dyn Viewer) -> bool {
        self.open_page(viewer, 1)
    }

    /// Render everything and show the surface to `viewer`. Out-of-range pages
    /// keep the current page. Refused (returns false) when the viewer is not
    /// interactable. Raises the open handler unless the panel is updating.
    pub fn open_page(&mut self, viewer: &dyn Viewer, page: usize) -> bool {
        let viewer_id = viewer.id();
        if !viewer.is_interactable() {
            debug!(target: "panel.lifecycle", panel = %self.id, viewer = %viewer_id, "open_refused_not_interactable");
            return false;
        }
        self.surface.clear();
        if let Some(p) = self.pagination_mut() {
            p.current.clear();
        }
        self.populate_fixed();
        self.prepare_page(page);
        self.surface.open(viewer_id);
        trace!(target: "panel.lifecycle", panel = %self.id, viewer = %viewer_id, page = self.page_number(), updating = self.flags.updating, "open");
        self.handle_open(OpenEvent { viewer: viewer_id });
        true
    }

    /// Schedule a close for `viewer` after the configured delay so the
    /// current event turn finishes first.
    pub fn close(&self, viewer: ViewerId, run_close_action: bool, scheduler: &mut dyn Scheduler) {
        scheduler.schedule_after(
            self.settings.close_delay_ticks,
            DeferredClose {
                panel: self.id,
                viewer,
                run_close_action,
            },
        );
    }

    /// Execute a due deferred close. `run_close_action` applies to this task
    /// only. Returns whether the close handler ran.
    pub fn finish_close(&mut self, task: DeferredClose) -> bool {
        if !self.surface.viewers().contains(&task.viewer) {
            trace!(target: "panel.lifecycle", panel = %self.id, viewer = %task.viewer, "deferred_close_viewer_gone");
            return false;
        }
        self.flags.run_close_action = task.run_close_action;
        let ran = self.handle_close(CloseEvent {
            viewer: task.viewer,
        });
        self.flags.run_close_action = true;
        ran
    }

    /// Run the open handler for an open event. Returns whether it ran.
    pub fn handle_open(&mut self, event: OpenEvent) -> bool {
        if self.flags.updating || !self.flags.run_open_action {
            trace!(target: "panel.lifecycle", panel = %self.id, viewer = %event.viewer, "open_handler_suppressed");
            return false;
        }
        let Some(handler) = self.handlers.open.clone() else {
            return false;
        };
        let mut ctx = HandlerContext::new(event);
        handler(&mut ctx);
        let (_, _, commands) = ctx.into_parts();
        self.pending.extend(commands);
        true
    }

    /// Viewer left the surface. Clears page bookkeeping after the last
    /// viewer and runs the close handler unless suppressed. Returns whether
    /// the handler ran.
    pub fn handle_close(&mut self, event: CloseEvent) -> bool {
        self.surface.close(event.viewer);
        if self.flags.updating {
            trace!(target: "panel.lifecycle", panel = %self.id, viewer = %event.viewer, "close_handler_suppressed_updating");
            return false;
        }
        if self.surface.viewers().is_empty() && self.is_paginated() {
            self.clear_page();
            trace!(target: "panel.lifecycle", panel = %self.id, "last_viewer_closed");
        }
        if !self.flags.run_close_action {
            trace!(target: "panel.lifecycle", panel = %self.id, viewer = %event.viewer, "close_handler_suppressed");
            return false;
        }
        let Some(handler) = self.handlers.close.clone() else {
            return false;
        };
        let mut ctx = HandlerContext::new(event);
        handler(&mut ctx);
        let (_, _, commands) = ctx.into_parts();
        self.pending.extend(commands);
        true
    }

    /// Re-render in place (clear, fixed items, current page) without reopening.
    pub fn update(&mut self) {
        self.surface.clear();
        if let Some(p) = self.pagination_mut() {
            p.current.clear();
        }
        self.populate_fixed();
        self.populate_page();
    }

    /// Replace the title with a static one, dropping any dynamic title, and
    /// reopen for current viewers.
    pub fn update_title(&mut self, title: &str) {
        debug!(target: "panel.title", panel = %self.id, title, "update_title");
        self.title = DynamicTitle::Static(title.to_string());
        self.displayed_title = title.to_string();
        self.rebuild_surface();
    }

    /// Recreate the surface (new title or geometry) and reopen it for every
    /// prior viewer with open/close handlers suppressed.
    fn rebuild_surface(&mut self) {
        self.flags.updating = true;
        let viewers = self.surface.viewers();
        for viewer in &viewers {
            self.handle_close(CloseEvent { viewer: *viewer });
        }
        self.surface = self.provider.create_surface(&self.displayed_title, self.geometry);
        let page = self.page_number();
        for viewer in viewers {
            self.open_page(&viewer, page);
        }
        self.flags.updating = false;
    }

    pub(crate) fn set_displayed_title(&mut self, title: String) {
        if title == self.displayed_title {
            return;
        }
        trace!(target: "panel.title", panel = %self.id, title = %title, "title_recomputed");
        self.surface.set_title(&title);
        self.displayed_title = title;
    }

    /// Recompute an interaction-bound title after an item click. Returns
    /// whether the title was recomputed.
    pub fn refresh_interaction_title(
        &mut self,
        item: Option<PanelItem<P>>,
        slot: usize,
        click_kind: ClickKind,
        action: RawAction,
    ) -> bool {
        if !self.flags.title_updates_on_item_click {
            return false;
        }
        match self.title.update_interaction(item, slot, click_kind, action) {
            Some(title) => {
                self.set_displayed_title(title);
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------------------------------------

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PanelCommand>) {
        self.pending.extend(commands);
    }

    pub fn take_commands(&mut self) -> Vec<PanelCommand> {
        std::mem::take(&mut self.pending)
    }

    pub fn apply_command(&mut self, command: PanelCommand, scheduler: &mut dyn Scheduler) {
        trace!(target: "panel.lifecycle", panel = %self.id, ?command, "apply_command");
        match command {
            PanelCommand::NextPage => {
                self.next_page();
            }
            PanelCommand::PreviousPage => {
                self.previous_page();
            }
            PanelCommand::Update => self.update(),
            PanelCommand::UpdateTitle(title) => self.update_title(&title),
            PanelCommand::Close {
                viewer,
                run_close_action,
            } => self.close(viewer, run_close_action, scheduler),
        }
    }

    /// Apply every queued command, including ones queued while applying.
    /// Returns how many were applied.
    pub fn apply_pending(&mut self, scheduler: &mut dyn Scheduler) -> usize {
        let mut applied = 0;
        loop {
            let commands = self.take_commands();
            if commands.is_empty() {
                return applied;
            }
            for command in commands {
                self.apply_command(command, scheduler);
                applied += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{TickQueue, handler};
    use core_model::is_authentic;
    use core_render::MemoryProvider;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn plain(rows: u8) -> Panel<&'static str> {
        Panel::new("Test", Geometry::grid(rows), Rc::new(MemoryProvider), PanelSettings::default())
    }

    struct Sleeping(ViewerId);

    impl Viewer for Sleeping {
        fn id(&self) -> ViewerId {
            self.0
        }
        fn is_interactable(&self) -> bool {
            false
        }
    }

    #[test]
    fn set_item_rejects_out_of_range_without_mutation() {
        let mut panel = plain(2);
        let err = panel.set_item(18, PanelItem::new("x")).unwrap_err();
        assert_eq!(
            err,
            PanelError::SlotOutOfRange {
                slot: 18,
                geometry: Geometry::grid(2)
            }
        );
        assert!(panel.items().is_empty());
        assert!(panel.set_item(17, PanelItem::new("x")).is_ok());
    }

    #[test]
    fn set_item_slots_is_all_or_nothing() {
        let mut panel = plain(1);
        assert!(panel.set_item_slots(&[0, 4, 9], PanelItem::new("x")).is_err());
        assert!(panel.items().is_empty());
        panel.set_item_slots(&[0, 4, 8], PanelItem::new("x")).unwrap();
        assert_eq!(panel.items().len(), 3);
        assert_eq!(panel.item(0), panel.item(8));
    }

    #[test]
    fn removal_by_slot_id_and_payload() {
        let mut panel = plain(1);
        let a = PanelItem::new("a");
        let b = PanelItem::new("b");
        panel.set_item(2, a.clone()).unwrap();
        panel.set_item(5, b.clone()).unwrap();
        panel.set_item(7, b.clone()).unwrap();
        assert_eq!(panel.remove_item_by_id(b.id()).map(|i| i.id()), Some(b.id()));
        assert!(panel.item(5).is_none());
        assert!(panel.item(7).is_some());
        assert!(panel.remove_payload(&"a").is_some());
        assert_eq!(panel.remove_item(7).unwrap(), Some(b));
        assert!(panel.items().is_empty());
        assert!(panel.remove_item(9).is_err());
    }

    #[test]
    fn add_items_fills_row_major_and_reports_drops() {
        let mut panel = plain(1);
        panel.set_item(0, PanelItem::new("fixed")).unwrap();
        let dropped = panel.add_items((0..9).map(|_| PanelItem::new("x")), false);
        assert_eq!(dropped, 1);
        assert_eq!(panel.items().len(), 9);
        assert_eq!(*panel.item(1).unwrap().payload(), "x");
    }

    #[test]
    fn add_items_grows_until_ceiling() {
        let settings = PanelSettings {
            max_rows: 2,
            ..PanelSettings::default()
        };
        let mut panel: Panel<&str> =
            Panel::new("Grow", Geometry::grid(1), Rc::new(MemoryProvider), settings);
        let dropped = panel.add_items((0..20).map(|_| PanelItem::new("x")), true);
        assert_eq!(panel.rows(), 2);
        assert_eq!(panel.surface().size(), 18);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn growth_reopens_viewers_on_a_rendered_surface() {
        let mut panel = plain(1);
        let first = PanelItem::new("first");
        panel.set_item(0, first.clone()).unwrap();
        panel.open(&ViewerId(2));
        assert_eq!(panel.add_items((0..9).map(|_| PanelItem::new("x")), true), 0);

        assert_eq!(panel.rows(), 2);
        assert_eq!(panel.viewers(), vec![ViewerId(2)]);
        assert!(is_authentic(panel.surface().slot(0), first.id()));
        assert!(panel.surface().is_occupied(8));
        assert_eq!(panel.item(9).map(|i| *i.payload()), Some("x"));
    }

    #[test]
    fn open_renders_fixed_items_with_identity_tags() {
        let mut panel = plain(1);
        let item = PanelItem::new("gem");
        panel.set_item(4, item.clone()).unwrap();
        assert!(panel.open(&ViewerId(1)));
        assert!(is_authentic(panel.surface().slot(4), item.id()));
        assert_eq!(panel.viewers(), vec![ViewerId(1)]);
    }

    #[test]
    fn open_is_refused_for_non_interactable_viewer() {
        let mut panel = plain(1);
        assert!(!panel.open(&Sleeping(ViewerId(3))));
        assert!(panel.viewers().is_empty());
    }

    #[test]
    fn update_item_writes_through_and_keeps_identity() {
        let mut panel = plain(1);
        let item = PanelItem::new("old");
        panel.set_item(3, item.clone()).unwrap();
        panel.update_item(3, "new").unwrap();
        assert_eq!(*panel.item(3).unwrap().payload(), "new");
        assert!(is_authentic(panel.surface().slot(3), item.id()));
        panel.update_item(5, "fresh").unwrap();
        assert!(panel.surface().is_occupied(5));
    }

    #[test]
    fn update_title_reopens_without_running_lifecycle_handlers() {
        let mut panel = plain(1);
        let log = Rc::new(RefCell::new(Vec::new()));
        let opened = log.clone();
        panel.set_open_handler(Some(handler(move |_ctx| opened.borrow_mut().push("open"))));
        let closed = log.clone();
        panel.set_close_handler(Some(handler(move |_ctx| closed.borrow_mut().push("close"))));

        panel.open(&ViewerId(1));
        panel.update_title("Renamed");

        assert_eq!(*log.borrow(), vec!["open"]);
        assert_eq!(panel.title(), "Renamed");
        assert_eq!(panel.surface().title(), "Renamed");
        assert_eq!(panel.viewers(), vec![ViewerId(1)]);
        assert!(!panel.flags().updating);
    }

    #[test]
    fn deferred_close_honours_run_close_action_for_that_task_only() {
        let mut panel = plain(1);
        let runs = Rc::new(RefCell::new(0));
        let counter = runs.clone();
        panel.set_close_handler(Some(handler(move |_ctx| *counter.borrow_mut() += 1)));
        let mut queue = TickQueue::new();

        panel.open(&ViewerId(1));
        panel.close(ViewerId(1), false, &mut queue);
        assert!(queue.advance(1).is_empty());
        for task in queue.advance(1) {
            assert!(!panel.finish_close(task));
        }
        assert_eq!(*runs.borrow(), 0);
        assert!(panel.flags().run_close_action);
        assert!(panel.viewers().is_empty());

        panel.open(&ViewerId(1));
        panel.close(ViewerId(1), true, &mut queue);
        for task in queue.advance(2) {
            assert!(panel.finish_close(task));
        }
        assert_eq!(*runs.borrow(), 1);
    }

    #[test]
    fn handler_commands_are_applied_after_the_fact() {
        let mut panel = plain(1);
        panel.set_open_handler(Some(handler(|ctx: &mut HandlerContext<OpenEvent>| {
            ctx.request(PanelCommand::UpdateTitle("Welcome".into()))
        })));
        let mut queue = TickQueue::new();
        panel.open(&ViewerId(1));
        assert_eq!(panel.title(), "Test");
        assert_eq!(panel.apply_pending(&mut queue), 1);
        assert_eq!(panel.title(), "Welcome");
        // reopen during the retitle did not queue another command
        assert!(panel.take_commands().is_empty());
    }

    #[test]
    fn permission_toggles() {
        let mut panel = plain(1);
        panel.disable_item_take().disable_item_drop();
        assert!(!panel.can_take_items());
        assert!(!panel.can_drop_items());
        assert!(panel.can_place_items());
        panel.disable_all_interactions();
        assert!(panel.all_interactions_disabled());
        panel.enable_item_swap();
        assert!(!panel.all_interactions_disabled());
        assert!(panel.can_swap_items());
        panel.enable_all_interactions();
        assert_eq!(panel.permissions(), Permissions::empty());
    }
}
