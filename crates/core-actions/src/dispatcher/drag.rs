use core_events::{DragEvent, HandlerContext};
use core_model::Payload;
use core_state::Panel;

use super::DispatchResult;
use crate::classifier::drag_decision;

pub fn dispatch_drag<P: Payload>(panel: &mut Panel<P>, event: DragEvent) -> DispatchResult {
    let mut ctx = HandlerContext::new(event);
    let mut ran = 0;
    if let Some(handler) = panel.handlers().drag.clone() {
        tracing::trace!(target: "actions.dispatch", slots = ctx.event().raw_slots.len(), "drag_handler");
        handler(&mut ctx);
        ran += 1;
    }
    if drag_decision(ctx.event(), panel.permissions()).is_deny() {
        ctx.deny();
    }
    let (_, denied, commands) = ctx.into_parts();
    panel.queue_commands(commands);
    DispatchResult {
        denied,
        handlers_run: ran,
        commands_applied: 0,
    }
}
