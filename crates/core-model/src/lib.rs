//! Panel data model shared by every other crate.
//!
//! This crate is the leaf of the workspace: it owns slot addressing, surface
//! geometry, pagination regions and the identity tokens that let a rendered
//! payload be matched back to the logical item that produced it. Nothing here
//! talks to a rendering backend or runs handlers; all functions are pure.
//!
//! Slot addressing
//! ---------------
//! Grid surfaces are always nine columns wide. Rows and columns are 1-based
//! at the API surface, slots are 0-based and row-major:
//!
//! ```text
//!          col 1   col 2   ...   col 9
//! row 1      0       1     ...     8
//! row 2      9      10     ...    17
//! ```
//!
//! Invariants:
//! * `slot_of(row, col)` and `row_col_of(slot)` round-trip for every
//!   `row >= 1` and `col ∈ [1, 9]`.
//! * `slot_of` never panics; range checks against a concrete geometry are the
//!   caller's job (`Geometry::contains`).

mod geometry;
mod identity;
mod region;

pub use geometry::{FixedLayout, Geometry};
pub use identity::{ItemId, Payload, TaggedPayload, is_authentic};
pub use region::PaginationRegion;

/// Width of every grid surface.
pub const COLUMNS: usize = 9;

/// Convert a 1-based `(row, col)` pair into a 0-based linear slot.
///
/// Zero rows/columns saturate to the first row/column instead of wrapping.
pub fn slot_of(row: usize, col: usize) -> usize {
    (col + row.saturating_sub(1) * COLUMNS).saturating_sub(1)
}

/// Inverse of [`slot_of`]: the 1-based `(row, col)` holding `slot`.
pub fn row_col_of(slot: usize) -> (usize, usize) {
    (slot / COLUMNS + 1, slot % COLUMNS + 1)
}
