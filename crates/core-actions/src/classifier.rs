//! Interaction classifier.
//!
//! Maps a raw host action plus the region context of a click into the set of
//! movement categories it represents, and a permission set into an allow /
//! deny decision. Pure functions, no state.
//!
//! Region guards:
//! * take: never when the clicked region or the top region is the secondary
//!   region; a cross-region move out of the panel always counts.
//! * place: a cross-region move *from* the secondary region into a panel top,
//!   or a raw place action whose clicked region is the panel.
//! * swap: raw swap action, clicked region not secondary, top not secondary.
//! * drop / other: raw action, and either some region was clicked or the top
//!   region is not the secondary one.
//!
//! A locked permission set denies everything regardless of category.

use core_events::{DragEvent, RawAction, Region};
use core_state::Permissions;

bitflags::bitflags! {
    /// Movement categories a single click can fall into (not exclusive:
    /// a hotbar swap both takes and swaps).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ActionCategories: u8 {
        const TAKE = 1;
        const PLACE = 1 << 1;
        const SWAP = 1 << 2;
        const DROP = 1 << 3;
        const OTHER = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_deny(self) -> bool {
        self == Decision::Deny
    }
}

pub const TAKE_ACTIONS: &[RawAction] = &[
    RawAction::PickupOne,
    RawAction::PickupSome,
    RawAction::PickupHalf,
    RawAction::PickupAll,
    RawAction::CollectToCursor,
    RawAction::HotbarSwap,
    RawAction::MoveToOtherRegion,
];

pub const PLACE_ACTIONS: &[RawAction] = &[RawAction::PlaceOne, RawAction::PlaceSome, RawAction::PlaceAll];

pub const SWAP_ACTIONS: &[RawAction] = &[
    RawAction::HotbarSwap,
    RawAction::SwapWithCursor,
    RawAction::HotbarMoveAndReadd,
];

pub const DROP_ACTIONS: &[RawAction] = &[
    RawAction::DropOneSlot,
    RawAction::DropAllSlot,
    RawAction::DropOneCursor,
    RawAction::DropAllCursor,
];

pub const OTHER_ACTIONS: &[RawAction] = &[RawAction::CloneStack, RawAction::Unknown];

fn is_take(action: RawAction, clicked: Option<Region>, top: Region) -> bool {
    if clicked == Some(Region::Secondary) || top == Region::Secondary {
        return false;
    }
    action == RawAction::MoveToOtherRegion || TAKE_ACTIONS.contains(&action)
}

fn is_place(action: RawAction, clicked: Option<Region>, top: Region) -> bool {
    let moved_in = action == RawAction::MoveToOtherRegion
        && clicked == Some(Region::Secondary)
        && top != Region::Secondary;
    let placed = PLACE_ACTIONS.contains(&action) && clicked != Some(Region::Secondary) && top != Region::Secondary;
    moved_in || placed
}

fn is_swap(action: RawAction, clicked: Option<Region>, top: Region) -> bool {
    SWAP_ACTIONS.contains(&action) && clicked != Some(Region::Secondary) && top != Region::Secondary
}

fn touches_any(clicked: Option<Region>, top: Region) -> bool {
    clicked.is_some() || top != Region::Secondary
}

/// Every category `action` falls into given where the click landed.
pub fn classify_click(action: RawAction, clicked: Option<Region>, top: Region) -> ActionCategories {
    let mut categories = ActionCategories::empty();
    categories.set(ActionCategories::TAKE, is_take(action, clicked, top));
    categories.set(ActionCategories::PLACE, is_place(action, clicked, top));
    categories.set(ActionCategories::SWAP, is_swap(action, clicked, top));
    categories.set(
        ActionCategories::DROP,
        DROP_ACTIONS.contains(&action) && touches_any(clicked, top),
    );
    categories.set(
        ActionCategories::OTHER,
        OTHER_ACTIONS.contains(&action) && touches_any(clicked, top),
    );
    categories
}

/// Categories a permission set forbids.
pub fn prevented(permissions: Permissions) -> ActionCategories {
    let mut blocked = ActionCategories::empty();
    blocked.set(ActionCategories::PLACE, permissions.contains(Permissions::PREVENT_PLACE));
    blocked.set(ActionCategories::TAKE, permissions.contains(Permissions::PREVENT_TAKE));
    blocked.set(ActionCategories::SWAP, permissions.contains(Permissions::PREVENT_SWAP));
    blocked.set(ActionCategories::DROP, permissions.contains(Permissions::PREVENT_DROP));
    blocked.set(ActionCategories::OTHER, permissions.contains(Permissions::PREVENT_OTHER));
    blocked
}

pub fn click_decision(
    action: RawAction,
    clicked: Option<Region>,
    top: Region,
    permissions: Permissions,
) -> Decision {
    if permissions.is_locked() {
        tracing::debug!(target: "actions.classify", ?action, "click_denied_locked");
        return Decision::Deny;
    }
    let categories = classify_click(action, clicked, top);
    let hit = categories & prevented(permissions);
    tracing::trace!(target: "actions.classify", ?action, ?clicked, ?categories, "click_classified");
    if hit.is_empty() {
        Decision::Allow
    } else {
        tracing::debug!(target: "actions.classify", ?action, blocked = ?hit, "click_denied");
        Decision::Deny
    }
}

/// Drags only ever place items; a drag that stays in the secondary region
/// is always allowed unless the panel is locked.
pub fn drag_decision(event: &DragEvent, permissions: Permissions) -> Decision {
    if permissions.is_locked() {
        tracing::debug!(target: "actions.classify", slots = event.raw_slots.len(), "drag_denied_locked");
        return Decision::Deny;
    }
    let touches = event.touches_panel();
    tracing::trace!(target: "actions.classify", touches, "drag_classified");
    if !touches || !permissions.contains(Permissions::PREVENT_PLACE) {
        return Decision::Allow;
    }
    tracing::debug!(target: "actions.classify", slots = event.raw_slots.len(), "drag_denied");
    Decision::Deny
}
