//! Interaction routing for panels: the permission classifier, the click /
//! drag / lifecycle dispatcher and the registry that owns live panels.
//!
//! Flow for one host event: `PanelRegistry::handle` checks the container is
//! panel-owned, `dispatcher::dispatch` runs the handler chain for the event
//! family, the classifier adds a deny when the panel's permissions forbid the
//! movement, and the commands handlers queued are applied to the panel.

pub mod classifier;
pub mod dispatcher;
mod registry;

pub use classifier::{ActionCategories, Decision, classify_click, click_decision, drag_decision};
pub use dispatcher::{DispatchResult, dispatch};
pub use registry::PanelRegistry;
