//! Panel items: a payload plus identity plus optional click handler.

use std::fmt;
use std::rc::Rc;

use core_events::{ClickEvent, ClickHandler, HandlerContext};
use core_model::{ItemId, Payload, TaggedPayload};

/// One placed entry.
///
/// The identity is allocated at construction and never changes. Every time
/// the payload is (re)placed it is re-tagged with that identity, so whatever
/// a surface shows can be traced back to exactly one item. Clones share the
/// identity and the handler: the same logical item may sit in several slots.
#[derive(Clone)]
pub struct PanelItem<P> {
    id: ItemId,
    payload: TaggedPayload<P>,
    handler: Option<ClickHandler<P>>,
}

impl<P: Payload> PanelItem<P> {
    pub fn new(payload: P) -> Self {
        let id = ItemId::next();
        Self {
            id,
            payload: TaggedPayload::tagged(payload, id),
            handler: None,
        }
    }

    pub fn with_handler<F>(payload: P, f: F) -> Self
    where
        F: Fn(&mut HandlerContext<ClickEvent<P>>) + 'static,
    {
        let mut item = Self::new(payload);
        item.handler = Some(Rc::new(f));
        item
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn payload(&self) -> &P {
        self.payload.payload()
    }

    /// The payload as written to a surface.
    pub fn tagged(&self) -> &TaggedPayload<P> {
        &self.payload
    }

    pub fn set_payload(&mut self, payload: P) {
        self.payload = TaggedPayload::tagged(payload, self.id);
    }

    pub fn handler(&self) -> Option<&ClickHandler<P>> {
        self.handler.as_ref()
    }

    pub fn set_handler(&mut self, handler: Option<ClickHandler<P>>) {
        self.handler = handler;
    }
}

/// Items compare by identity.
impl<P> PartialEq for PanelItem<P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<P> Eq for PanelItem<P> {}

impl<P: fmt::Debug> fmt::Debug for PanelItem<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelItem")
            .field("id", &self.id)
            .field("payload", &self.payload)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
