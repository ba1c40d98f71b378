//! Rendering backend contract for panels.
//!
//! A panel never draws anything itself. It owns one `Surface` (created by a
//! `SurfaceProvider` from a title and a geometry) and writes tagged payloads
//! into its slots. The host decides what a surface looks like on screen.
//!
//! Contract notes:
//! * `set_slot` outside `0..size()` is ignored by well-behaved surfaces.
//! * `slot` reports what is currently shown, which may include content the
//!   panel did not put there (host-placed or stale payloads). Pagination
//!   treats any occupied slot as unavailable.
//! * `open`/`close` only change what a viewer sees; lifecycle handlers are
//!   driven by the panel and the dispatcher, not by the surface.
//! * Surfaces are recreated (not mutated) when a panel's title or row count
//!   changes, so `set_title` is only used for in-place dynamic title refreshes.
//!
//! `MemorySurface` / `MemoryProvider` are a complete in-memory backend used by
//! tests and the `gridpanel` simulator.

use core_events::ViewerId;
use core_model::{Geometry, TaggedPayload};

mod memory;
pub use memory::{MemoryProvider, MemorySurface};

pub trait Surface<P> {
    fn size(&self) -> usize;
    fn title(&self) -> &str;
    fn set_title(&mut self, title: &str);
    fn clear(&mut self);
    fn set_slot(&mut self, slot: usize, payload: Option<TaggedPayload<P>>);
    fn slot(&self, slot: usize) -> Option<&TaggedPayload<P>>;
    fn open(&mut self, viewer: ViewerId);
    fn close(&mut self, viewer: ViewerId);
    fn viewers(&self) -> Vec<ViewerId>;

    fn is_occupied(&self, slot: usize) -> bool {
        self.slot(slot).is_some()
    }
}

/// Factory for surfaces; stored by the panel so it can recreate its surface
/// on retitle or growth.
pub trait SurfaceProvider<P> {
    fn create_surface(&self, title: &str, geometry: Geometry) -> Box<dyn Surface<P>>;
}

/// A user the host can show surfaces to.
pub trait Viewer {
    fn id(&self) -> ViewerId;

    /// Host-defined gate (e.g. the user is asleep or mid-transition).
    fn is_interactable(&self) -> bool {
        true
    }
}

impl Viewer for ViewerId {
    fn id(&self) -> ViewerId {
        *self
    }
}
