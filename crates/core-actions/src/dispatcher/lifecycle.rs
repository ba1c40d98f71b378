use core_events::{CloseEvent, OpenEvent};
use core_model::Payload;
use core_state::Panel;

use super::DispatchResult;

/// Host reported the panel surface opened for a viewer.
pub fn dispatch_open<P: Payload>(panel: &mut Panel<P>, event: OpenEvent) -> DispatchResult {
    let ran = panel.handle_open(event);
    tracing::trace!(target: "actions.dispatch", panel = %panel.id(), viewer = %event.viewer, ran, "open");
    DispatchResult {
        handlers_run: usize::from(ran),
        ..DispatchResult::clean()
    }
}

/// Host reported the viewer left the surface (closed it themselves).
pub fn dispatch_close<P: Payload>(panel: &mut Panel<P>, event: CloseEvent) -> DispatchResult {
    let ran = panel.handle_close(event);
    tracing::trace!(target: "actions.dispatch", panel = %panel.id(), viewer = %event.viewer, ran, "close");
    DispatchResult {
        handlers_run: usize::from(ran),
        ..DispatchResult::clean()
    }
}
