//! Panel ownership and deferred close execution.
//!
//! The registry is the single owner of every live panel. Host events name
//! the container they happened in; events for containers no panel owns are
//! ignored without touching any state. Deferred closes scheduled by panels
//! (directly or through a handler's `Close` command) sit in the registry's
//! tick queue until `tick` makes them due.

use std::collections::HashMap;

use core_events::{HostEvent, PanelId, TickQueue, ViewerId};
use core_model::Payload;
use core_render::Viewer;
use core_state::Panel;

use crate::dispatcher::{DispatchResult, dispatch};

pub struct PanelRegistry<P: Payload> {
    panels: HashMap<PanelId, Panel<P>>,
    queue: TickQueue,
}

impl<P: Payload> Default for PanelRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload> PanelRegistry<P> {
    pub fn new() -> Self {
        Self {
            panels: HashMap::new(),
            queue: TickQueue::new(),
        }
    }

    pub fn insert(&mut self, panel: Panel<P>) -> PanelId {
        let id = panel.id();
        self.panels.insert(id, panel);
        tracing::debug!(target: "actions.dispatch", panel = %id, "panel_registered");
        id
    }

    pub fn remove(&mut self, id: PanelId) -> Option<Panel<P>> {
        self.panels.remove(&id)
    }

    pub fn get(&self, id: PanelId) -> Option<&Panel<P>> {
        self.panels.get(&id)
    }

    pub fn get_mut(&mut self, id: PanelId) -> Option<&mut Panel<P>> {
        self.panels.get_mut(&id)
    }

    pub fn owns(&self, id: PanelId) -> bool {
        self.panels.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn now(&self) -> u64 {
        self.queue.now()
    }

    pub fn pending_closes(&self) -> usize {
        self.queue.pending_len()
    }

    /// Route a host event. `None` when the container is not panel-owned.
    pub fn handle(&mut self, event: HostEvent<P>) -> Option<DispatchResult> {
        let Some(panel) = event.container.and_then(|id| self.panels.get_mut(&id)) else {
            tracing::trace!(target: "actions.dispatch", container = ?event.container, "foreign_event_ignored");
            return None;
        };
        Some(dispatch(panel, event.event, &mut self.queue))
    }

    /// Open `id` for `viewer` on `page` and apply anything the open handler
    /// requested. False when the panel is unknown or the open was refused.
    pub fn open(&mut self, id: PanelId, viewer: &dyn Viewer, page: usize) -> bool {
        let Some(panel) = self.panels.get_mut(&id) else {
            return false;
        };
        let opened = panel.open_page(viewer, page);
        panel.apply_pending(&mut self.queue);
        opened
    }

    /// Schedule a deferred close of `id` for `viewer`.
    pub fn close(&mut self, id: PanelId, viewer: ViewerId, run_close_action: bool) -> bool {
        let Some(panel) = self.panels.get(&id) else {
            return false;
        };
        panel.close(viewer, run_close_action, &mut self.queue);
        true
    }

    /// Advance the clock by `ticks` and execute every close that became
    /// due. Returns how many due tasks were processed.
    pub fn tick(&mut self, ticks: u32) -> usize {
        let due = self.queue.advance(ticks);
        let mut executed = 0;
        for task in due {
            let Some(panel) = self.panels.get_mut(&task.panel) else {
                tracing::trace!(target: "actions.dispatch", panel = %task.panel, "deferred_close_panel_gone");
                continue;
            };
            let ran = panel.finish_close(task);
            panel.apply_pending(&mut self.queue);
            tracing::trace!(target: "actions.dispatch", panel = %task.panel, viewer = %task.viewer, handler = ran, "deferred_close_executed");
            executed += 1;
        }
        executed
    }
}
