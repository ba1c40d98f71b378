//! Item identity tokens and tagged payloads.
//!
//! Every `PanelItem` receives an `ItemId` when it is constructed. Whenever
//! the item's payload is (re)placed, the id is attached to the payload as a
//! side-channel tag so the exact value shown on a surface can later be traced
//! back to one logical item. A click only reaches an item handler when the
//! tag observed on the surface equals the id of the item the panel believes
//! sits in that slot (`is_authentic`).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ITEM_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a logical item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    /// Allocate a fresh id (monotonic counter).
    pub fn next() -> Self {
        ItemId(NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Host payload contract: value equality plus a notion of "nothing to show".
pub trait Payload: Clone + PartialEq + fmt::Debug + 'static {
    /// Blank payloads are rendered as-is and never carry an identity tag.
    fn is_blank(&self) -> bool {
        false
    }
}

impl Payload for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Payload for &'static str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

/// A payload paired with the identity tag of the item that rendered it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedPayload<P> {
    payload: P,
    tag: Option<ItemId>,
}

impl<P: Payload> TaggedPayload<P> {
    pub fn tagged(payload: P, id: ItemId) -> Self {
        let tag = if payload.is_blank() { None } else { Some(id) };
        Self { payload, tag }
    }

    /// A payload placed by something other than a panel item (forged, stale,
    /// or foreign content).
    pub fn untagged(payload: P) -> Self {
        Self { payload, tag: None }
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn tag(&self) -> Option<ItemId> {
        self.tag
    }

    pub fn into_payload(self) -> P {
        self.payload
    }
}

/// True when `observed` carries exactly `expected` as its identity tag.
pub fn is_authentic<P>(observed: Option<&TaggedPayload<P>>, expected: ItemId) -> bool {
    matches!(observed.and_then(|p| p.tag), Some(tag) if tag == expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = ItemId::next();
        let b = ItemId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn blank_payloads_stay_untagged() {
        let id = ItemId::next();
        assert_eq!(TaggedPayload::tagged(String::new(), id).tag(), None);
        assert_eq!(TaggedPayload::tagged("stone", id).tag(), Some(id));
    }

    #[test]
    fn authenticity_requires_matching_tag() {
        let id = ItemId::next();
        let other = ItemId::next();
        let shown = TaggedPayload::tagged("diamond", id);
        assert!(is_authentic(Some(&shown), id));
        assert!(!is_authentic(Some(&shown), other));
        assert!(!is_authentic(Some(&TaggedPayload::untagged("diamond")), id));
        assert!(!is_authentic::<&str>(None, id));
    }
}
