//! Bulk placement of decorative items.
//!
//! Every fill takes a list of items and repeats it cyclically by slot index
//! (`items[slot % items.len()]`), so alternating patterns line up with the
//! grid regardless of which slots end up filled. An empty list is a no-op.

use core_model::{COLUMNS, Payload, slot_of};

use crate::{Panel, PanelError, PanelItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Both,
}

pub struct Filler<'a, P: Payload> {
    panel: &'a mut Panel<P>,
}

impl<P: Payload> Panel<P> {
    pub fn filler(&mut self) -> Filler<'_, P> {
        Filler { panel: self }
    }
}

fn pick<P: Payload>(items: &[PanelItem<P>], slot: usize) -> Option<PanelItem<P>> {
    if items.is_empty() {
        return None;
    }
    Some(items[slot % items.len()].clone())
}

impl<P: Payload> Filler<'_, P> {
    fn place(&mut self, slot: usize, items: &[PanelItem<P>], only_empty: bool) -> Result<(), PanelError> {
        if only_empty && self.panel.item(slot).is_some() {
            return Ok(());
        }
        match pick(items, slot) {
            Some(item) => self.panel.set_item(slot, item),
            None => Ok(()),
        }
    }

    /// Empty slots of the first row.
    pub fn fill_top(&mut self, items: &[PanelItem<P>]) -> Result<(), PanelError> {
        let geometry = self.panel.geometry();
        for slot in (0..COLUMNS).filter(|s| geometry.contains(*s)) {
            self.place(slot, items, true)?;
        }
        Ok(())
    }

    /// Empty slots of the last row.
    pub fn fill_bottom(&mut self, items: &[PanelItem<P>]) -> Result<(), PanelError> {
        let rows = self.panel.rows();
        let geometry = self.panel.geometry();
        for slot in ((rows - 1) * COLUMNS..rows * COLUMNS).filter(|s| geometry.contains(*s)) {
            self.place(slot, items, true)?;
        }
        Ok(())
    }

    /// First and last rows plus first and last columns. Panels with fewer
    /// than three rows have no border.
    pub fn fill_border(&mut self, items: &[PanelItem<P>]) -> Result<(), PanelError> {
        let rows = self.panel.rows();
        if rows < 3 {
            return Ok(());
        }
        for slot in 0..rows * COLUMNS {
            let (row, col) = (slot / COLUMNS + 1, slot % COLUMNS + 1);
            if row == 1 || row == rows || col == 1 || col == COLUMNS {
                self.place(slot, items, false)?;
            }
        }
        Ok(())
    }

    /// Every slot in the rectangle between two corners (in any order).
    pub fn fill_between(
        &mut self,
        row_from: usize,
        col_from: usize,
        row_to: usize,
        col_to: usize,
        items: &[PanelItem<P>],
    ) -> Result<(), PanelError> {
        let (min_row, max_row) = (row_from.min(row_to), row_from.max(row_to));
        let (min_col, max_col) = (col_from.min(col_to), col_from.max(col_to));
        let rows = self.panel.rows();
        for row in min_row.max(1)..=max_row.min(rows) {
            for col in min_col.max(1)..=max_col.min(COLUMNS) {
                self.place(slot_of(row, col), items, false)?;
            }
        }
        Ok(())
    }

    pub fn fill_side(&mut self, side: Side, items: &[PanelItem<P>]) -> Result<(), PanelError> {
        let rows = self.panel.rows();
        match side {
            Side::Left => self.fill_between(1, 1, rows, 1, items),
            Side::Right => self.fill_between(1, COLUMNS, rows, COLUMNS, items),
            Side::Both => {
                self.fill_side(Side::Left, items)?;
                self.fill_side(Side::Right, items)
            }
        }
    }

    /// Every empty slot up to the geometry's fill size. Not available on
    /// paginated panels, whose free slots belong to page content.
    pub fn fill(&mut self, items: &[PanelItem<P>]) -> Result<(), PanelError> {
        if self.panel.is_paginated() {
            return Err(PanelError::UnsupportedOperation(
                "full fill is not supported on paginated panels",
            ));
        }
        for slot in 0..self.panel.geometry().fill_size() {
            self.place(slot, items, true)?;
        }
        Ok(())
    }
}
