use core_events::{ClickEvent, ClickHandler, HandlerContext, Region};
use core_model::{Payload, is_authentic};
use core_state::Panel;

use super::DispatchResult;
use crate::classifier::click_decision;

type ClickContext<P> = HandlerContext<ClickEvent<P>>;

fn run<P>(handler: Option<&ClickHandler<P>>, ctx: &mut ClickContext<P>, step: &'static str, ran: &mut usize) {
    let Some(handler) = handler.cloned() else {
        return;
    };
    tracing::trace!(target: "actions.dispatch", step, slot = ctx.event().slot, "click_handler");
    handler(ctx);
    *ran += 1;
}

/// Ordered click precedence. Handlers share one context, so a deny from any
/// of them carries through; the classifier may add a deny afterwards but
/// never lifts one.
pub fn dispatch_click<P: Payload>(panel: &mut Panel<P>, event: ClickEvent<P>) -> DispatchResult {
    let (clicked, top, action) = (event.clicked, event.top, event.action);
    let mut ctx = HandlerContext::new(event);
    let mut ran = 0;

    run_chain(panel, &mut ctx, &mut ran);

    if click_decision(action, clicked, top, panel.permissions()).is_deny() {
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

fn run_chain<P: Payload>(panel: &mut Panel<P>, ctx: &mut ClickContext<P>, ran: &mut usize) {
    let (clicked, slot, kind, action) = {
        let event = ctx.event();
        (event.clicked, event.slot, event.kind, event.action)
    };

    let Some(region) = clicked else {
        run(panel.handlers().outside_click.as_ref(), ctx, "outside", ran);
        return;
    };

    if region == Region::Panel {
        run(panel.handlers().top_click.as_ref(), ctx, "top", ran);
    }
    if region == Region::Secondary {
        run(panel.handlers().secondary_click.as_ref(), ctx, "secondary", ran);
    }
    run(panel.handlers().any_click.as_ref(), ctx, "any", ran);
    if region == Region::Panel {
        run(panel.slot_handler(slot), ctx, "slot", ran);
    }

    let Some(item) = panel.resolve_item(slot).cloned() else {
        tracing::trace!(target: "actions.dispatch", slot, "no_item_at_slot");
        return;
    };
    if !is_authentic(ctx.event().current.as_ref(), item.id()) {
        tracing::debug!(target: "actions.dispatch", slot, item = %item.id(), "stale_payload_ignored");
        return;
    }
    run(item.handler(), ctx, "item", ran);
    if panel.refresh_interaction_title(Some(item), slot, kind, action) {
        tracing::trace!(target: "actions.dispatch", slot, "interaction_title_refreshed");
    }
}
