//! Deferred task scheduling.
//!
//! The only deferred work in the panel core is closing a surface a couple of
//! ticks after it was requested, so the current event turn can finish before
//! the view disappears. Tasks are plain data (`DeferredClose`); the host owns
//! the clock and hands due tasks back to whoever executes them.

use tracing::trace;

use crate::{PanelId, ViewerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredClose {
    pub panel: PanelId,
    pub viewer: ViewerId,
    /// Whether the panel's close handler may run when this task executes.
    pub run_close_action: bool,
}

/// Host deferred-task facility.
pub trait Scheduler {
    fn schedule_after(&mut self, ticks: u32, task: DeferredClose);
}

/// Tick-driven queue. `advance` moves the clock and returns due tasks in
/// scheduling order.
#[derive(Debug, Default)]
pub struct TickQueue {
    now: u64,
    pending: Vec<(u64, DeferredClose)>,
}

impl TickQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn advance(&mut self, ticks: u32) -> Vec<DeferredClose> {
        self.now += u64::from(ticks);
        let now = self.now;
        let (due, rest): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = rest;
        if !due.is_empty() {
            trace!(target: "panel.lifecycle", now, due = due.len(), pending = self.pending.len(), "deferred_due");
        }
        due.into_iter().map(|(_, task)| task).collect()
    }
}

impl Scheduler for TickQueue {
    fn schedule_after(&mut self, ticks: u32, task: DeferredClose) {
        let at = self.now + u64::from(ticks);
        trace!(target: "panel.lifecycle", at, panel = %task.panel, viewer = %task.viewer, "deferred_scheduled");
        self.pending.push((at, task));
    }
}
