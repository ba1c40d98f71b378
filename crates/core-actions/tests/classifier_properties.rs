//! Property tests for the permission classifier.

use core_actions::{ActionCategories, Decision, classify_click, click_decision};
use core_events::{RawAction, Region};
use core_state::Permissions;
use proptest::prelude::*;

const ALL_ACTIONS: &[RawAction] = &[
    RawAction::Nothing,
    RawAction::PickupAll,
    RawAction::PickupSome,
    RawAction::PickupHalf,
    RawAction::PickupOne,
    RawAction::PlaceAll,
    RawAction::PlaceSome,
    RawAction::PlaceOne,
    RawAction::SwapWithCursor,
    RawAction::DropAllCursor,
    RawAction::DropOneCursor,
    RawAction::DropAllSlot,
    RawAction::DropOneSlot,
    RawAction::MoveToOtherRegion,
    RawAction::HotbarMoveAndReadd,
    RawAction::HotbarSwap,
    RawAction::CloneStack,
    RawAction::CollectToCursor,
    RawAction::Unknown,
];

fn action() -> impl Strategy<Value = RawAction> {
    prop::sample::select(ALL_ACTIONS.to_vec())
}

fn clicked() -> impl Strategy<Value = Option<Region>> {
    prop::sample::select(vec![None, Some(Region::Panel), Some(Region::Secondary)])
}

fn top() -> impl Strategy<Value = Region> {
    prop::sample::select(vec![Region::Panel, Region::Secondary])
}

proptest! {
    #[test]
    fn locked_panels_deny_everything(a in action(), c in clicked(), t in top()) {
        prop_assert_eq!(click_decision(a, c, t, Permissions::locked()), Decision::Deny);
    }

    #[test]
    fn open_panels_allow_everything(a in action(), c in clicked(), t in top()) {
        prop_assert_eq!(click_decision(a, c, t, Permissions::empty()), Decision::Allow);
    }

    #[test]
    fn secondary_clicks_never_take_or_swap(a in action(), t in top()) {
        let categories = classify_click(a, Some(Region::Secondary), t);
        prop_assert!(!categories.intersects(ActionCategories::TAKE | ActionCategories::SWAP));
    }

    #[test]
    fn deny_matches_category_overlap(a in action(), c in clicked(), t in top(), bits in 0u8..31) {
        let permissions = Permissions::from_bits_truncate(bits);
        let categories = classify_click(a, c, t);
        let blocked = core_actions::classifier::prevented(permissions);
        let expected = if categories.intersects(blocked) { Decision::Deny } else { Decision::Allow };
        prop_assert_eq!(click_decision(a, c, t, permissions), expected);
    }
}
