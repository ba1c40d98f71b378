//! Panel error types.

use core_model::Geometry;
use thiserror::Error;

/// Failures are raised before any mutation; the panel is unchanged when one
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("slot {slot} is not valid for a {geometry}")]
    SlotOutOfRange { slot: usize, geometry: Geometry },

    #[error("a panel needs a title unless a dynamic title is configured")]
    MissingRequiredTitle,

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}
