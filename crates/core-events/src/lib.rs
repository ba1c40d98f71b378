//! Host interaction events and handler plumbing for panels.
//!
//! The host delivers one event at a time on a single logical thread. Events
//! are plain values; handlers receive them wrapped in a `HandlerContext` that
//! carries the deny flag and a queue of `PanelCommand`s. Handlers never get a
//! reference to the panel that owns them: anything a handler wants done to
//! its panel (turn the page, retitle, close) is requested through the context
//! and applied by the dispatcher once the handler chain has finished.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use core_model::TaggedPayload;
use smallvec::SmallVec;

mod scheduler;
pub use scheduler::{DeferredClose, Scheduler, TickQueue};

// -------------------------------------------------------------------------------------------------
// Identities
// -------------------------------------------------------------------------------------------------

/// Host-side identity of a user looking at a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewerId(pub u64);

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewer#{}", self.0)
    }
}

static NEXT_PANEL_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a panel instance; used by the host to say which panel owns
/// the container an event happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(u64);

impl PanelId {
    pub fn next() -> Self {
        PanelId(NEXT_PANEL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panel#{}", self.0)
    }
}

// -------------------------------------------------------------------------------------------------
// Raw interaction vocabulary
// -------------------------------------------------------------------------------------------------

/// Which part of the combined view a click landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The panel's own slots.
    Panel,
    /// The host's secondary area (e.g. the user's own storage).
    Secondary,
}

/// Raw action tag reported by the host for a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawAction {
    Nothing,
    PickupAll,
    PickupSome,
    PickupHalf,
    PickupOne,
    PlaceAll,
    PlaceSome,
    PlaceOne,
    SwapWithCursor,
    DropAllCursor,
    DropOneCursor,
    DropAllSlot,
    DropOneSlot,
    MoveToOtherRegion,
    HotbarMoveAndReadd,
    HotbarSwap,
    CloneStack,
    CollectToCursor,
    Unknown,
}

/// Physical click kind (button / modifier combination).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickKind {
    Left,
    ShiftLeft,
    Right,
    ShiftRight,
    Middle,
    NumberKey,
    DoubleClick,
    Drop,
    ControlDrop,
    SwapOffhand,
    WindowBorderLeft,
    WindowBorderRight,
    Unknown,
}

// -------------------------------------------------------------------------------------------------
// Events
// -------------------------------------------------------------------------------------------------

/// A click delivered by the host.
///
/// `clicked == None` means the click landed outside every region. `top` is
/// the region that owns the open view; for panel-owned views it is always
/// `Region::Panel`, but the classifier still consults it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent<P> {
    pub viewer: ViewerId,
    pub clicked: Option<Region>,
    pub top: Region,
    pub slot: usize,
    pub action: RawAction,
    pub kind: ClickKind,
    /// Payload the host observed at `slot` when the click happened.
    pub current: Option<TaggedPayload<P>>,
}

impl<P> ClickEvent<P> {
    pub fn new(
        viewer: ViewerId,
        clicked: Option<Region>,
        slot: usize,
        action: RawAction,
        kind: ClickKind,
    ) -> Self {
        Self {
            viewer,
            clicked,
            top: Region::Panel,
            slot,
            action,
            kind,
            current: None,
        }
    }

    /// Left click inside the panel's own region.
    pub fn panel(viewer: ViewerId, slot: usize) -> Self {
        Self::new(
            viewer,
            Some(Region::Panel),
            slot,
            RawAction::PickupAll,
            ClickKind::Left,
        )
    }

    /// Left click outside every region.
    pub fn outside(viewer: ViewerId) -> Self {
        Self::new(viewer, None, 0, RawAction::Nothing, ClickKind::Left)
    }

    pub fn with_current(mut self, current: Option<TaggedPayload<P>>) -> Self {
        self.current = current;
        self
    }

    pub fn with_action(mut self, action: RawAction, kind: ClickKind) -> Self {
        self.action = action;
        self.kind = kind;
        self
    }

    pub fn in_panel_region(&self) -> bool {
        self.clicked == Some(Region::Panel)
    }
}

/// A drag across one or more raw slots of the combined view. Raw slots below
/// `top_size` belong to the panel, the rest to the secondary region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEvent {
    pub viewer: ViewerId,
    pub raw_slots: SmallVec<[usize; 16]>,
    pub top_size: usize,
}

impl DragEvent {
    pub fn new(viewer: ViewerId, raw_slots: impl IntoIterator<Item = usize>, top_size: usize) -> Self {
        Self {
            viewer,
            raw_slots: raw_slots.into_iter().collect(),
            top_size,
        }
    }

    /// Whether any dragged slot lies in the panel's own region.
    pub fn touches_panel(&self) -> bool {
        self.raw_slots.iter().any(|&slot| slot < self.top_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenEvent {
    pub viewer: ViewerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseEvent {
    pub viewer: ViewerId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent<P> {
    Click(ClickEvent<P>),
    Drag(DragEvent),
    Open(OpenEvent),
    Close(CloseEvent),
}

/// An event as raised by the host: `container` names the panel owning the
/// view the event happened in, `None` for containers no panel owns.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent<P> {
    pub container: Option<PanelId>,
    pub event: InteractionEvent<P>,
}

impl<P> HostEvent<P> {
    pub fn for_panel(panel: PanelId, event: InteractionEvent<P>) -> Self {
        Self {
            container: Some(panel),
            event,
        }
    }

    pub fn foreign(event: InteractionEvent<P>) -> Self {
        Self {
            container: None,
            event,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Handlers
// -------------------------------------------------------------------------------------------------

/// Deferred request a handler makes of its owning panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    NextPage,
    PreviousPage,
    /// Re-render in place.
    Update,
    /// Replace the title with a static one.
    UpdateTitle(String),
    /// Close the panel for a viewer through the deferred scheduler.
    Close {
        viewer: ViewerId,
        run_close_action: bool,
    },
}

/// What a handler sees: the event, the deny flag and the command queue.
#[derive(Debug)]
pub struct HandlerContext<E> {
    event: E,
    denied: bool,
    commands: Vec<PanelCommand>,
}

impl<E> HandlerContext<E> {
    pub fn new(event: E) -> Self {
        Self {
            event,
            denied: false,
            commands: Vec::new(),
        }
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    /// Cancel the event's default effect. Idempotent.
    pub fn deny(&mut self) {
        self.denied = true;
    }

    pub fn allow(&mut self) {
        self.denied = false;
    }

    pub fn is_denied(&self) -> bool {
        self.denied
    }

    pub fn request(&mut self, command: PanelCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[PanelCommand] {
        &self.commands
    }

    pub fn into_parts(self) -> (E, bool, Vec<PanelCommand>) {
        (self.event, self.denied, self.commands)
    }
}

pub type Handler<E> = Rc<dyn Fn(&mut HandlerContext<E>)>;
pub type ClickHandler<P> = Handler<ClickEvent<P>>;
pub type DragHandler = Handler<DragEvent>;
pub type OpenHandler = Handler<OpenEvent>;
pub type CloseHandler = Handler<CloseEvent>;

/// Box a closure as a shareable handler.
pub fn handler<E, F>(f: F) -> Handler<E>
where
    F: Fn(&mut HandlerContext<E>) + 'static,
{
    Rc::new(f)
}
