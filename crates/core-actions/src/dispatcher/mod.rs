//! Dispatcher routing host interaction events into a panel.
//!
//! Decomposed by event family:
//! * `click`     - the ordered click precedence chain plus the classifier
//! * `drag`      - panel drag handler plus the drag permission check
//! * `lifecycle` - open / close handlers
//!
//! Every path ends the same way: commands the handlers queued on their
//! context are moved into the panel and applied before `dispatch` returns,
//! so a handler asking for `NextPage` sees the page turned by the time the
//! host regains control.

use core_events::{InteractionEvent, Scheduler};
use core_model::Payload;
use core_state::Panel;

mod click;
mod drag;
mod lifecycle;

pub use click::dispatch_click;
pub use drag::dispatch_drag;
pub use lifecycle::{dispatch_close, dispatch_open};

/// Result of dispatching a single host event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// The event's default host effect must be cancelled.
    pub denied: bool,
    /// Handlers invoked for this event, in any position of the chain.
    pub handlers_run: usize,
    /// Panel commands applied after the handler chain.
    pub commands_applied: usize,
}

impl DispatchResult {
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn denied() -> Self {
        Self {
            denied: true,
            ..Self::default()
        }
    }
}

/// Route one event to `panel` and apply whatever its handlers requested.
pub fn dispatch<P: Payload>(
    panel: &mut Panel<P>,
    event: InteractionEvent<P>,
    scheduler: &mut dyn Scheduler,
) -> DispatchResult {
    let mut result = match event {
        InteractionEvent::Click(click) => dispatch_click(panel, click),
        InteractionEvent::Drag(drag) => dispatch_drag(panel, drag),
        InteractionEvent::Open(open) => dispatch_open(panel, open),
        InteractionEvent::Close(close) => dispatch_close(panel, close),
    };
    result.commands_applied = panel.apply_pending(scheduler);
    if result.commands_applied > 0 {
        tracing::trace!(target: "actions.dispatch", panel = %panel.id(), applied = result.commands_applied, "commands_applied");
    }
    result
}
