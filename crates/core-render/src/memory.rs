//! In-memory surface backend.

use core_events::ViewerId;
use core_model::{Geometry, Payload, TaggedPayload};
use tracing::trace;

use crate::{Surface, SurfaceProvider};

#[derive(Debug, Clone)]
pub struct MemorySurface<P> {
    title: String,
    slots: Vec<Option<TaggedPayload<P>>>,
    viewers: Vec<ViewerId>,
}

impl<P: Payload> MemorySurface<P> {
    pub fn new(title: &str, size: usize) -> Self {
        Self {
            title: title.to_string(),
            slots: vec![None; size],
            viewers: Vec::new(),
        }
    }

    /// Occupied slots in index order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &TaggedPayload<P>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|p| (i, p)))
    }
}

impl<P: Payload> Surface<P> for MemorySurface<P> {
    fn size(&self) -> usize {
        self.slots.len()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    fn set_slot(&mut self, slot: usize, payload: Option<TaggedPayload<P>>) {
        match self.slots.get_mut(slot) {
            Some(cell) => *cell = payload,
            None => {
                trace!(target: "panel.slots", slot, size = self.slots.len(), "surface_write_out_of_range");
            }
        }
    }

    fn slot(&self, slot: usize) -> Option<&TaggedPayload<P>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn open(&mut self, viewer: ViewerId) {
        if !self.viewers.contains(&viewer) {
            self.viewers.push(viewer);
        }
    }

    fn close(&mut self, viewer: ViewerId) {
        self.viewers.retain(|v| *v != viewer);
    }

    fn viewers(&self) -> Vec<ViewerId> {
        self.viewers.clone()
    }
}

/// Creates `MemorySurface`s sized to the geometry's capacity.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryProvider;

impl<P: Payload> SurfaceProvider<P> for MemoryProvider {
    fn create_surface(&self, title: &str, geometry: Geometry) -> Box<dyn Surface<P>> {
        trace!(target: "panel.lifecycle", title, %geometry, "surface_created");
        Box::new(MemorySurface::<P>::new(title, geometry.capacity()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::ItemId;
    use pretty_assertions::assert_eq;

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut s = MemorySurface::<&str>::new("t", 5);
        s.set_slot(5, Some(TaggedPayload::untagged("x")));
        assert_eq!(s.occupied().count(), 0);
        s.set_slot(4, Some(TaggedPayload::untagged("x")));
        assert!(s.is_occupied(4));
    }

    #[test]
    fn clear_keeps_viewers() {
        let mut s = MemorySurface::<&str>::new("t", 9);
        s.open(ViewerId(1));
        s.open(ViewerId(1));
        s.set_slot(0, Some(TaggedPayload::tagged("a", ItemId::next())));
        s.clear();
        assert!(!s.is_occupied(0));
        assert_eq!(s.viewers(), vec![ViewerId(1)]);
        s.close(ViewerId(1));
        assert!(s.viewers().is_empty());
    }

    #[test]
    fn provider_sizes_by_capacity() {
        let surface: Box<dyn Surface<&str>> =
            MemoryProvider.create_surface("Shop", Geometry::grid(3));
        assert_eq!(surface.size(), 27);
        assert_eq!(surface.title(), "Shop");
    }
}
