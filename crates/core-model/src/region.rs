//! Pagination regions: an explicit, ordered subset of slots reserved for page
//! content. Order matters; page items are laid into the region in the order
//! the slots are listed here.

use crate::{COLUMNS, slot_of};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaginationRegion {
    slots: Vec<usize>,
}

impl PaginationRegion {
    pub fn new(slots: impl IntoIterator<Item = usize>) -> Self {
        Self {
            slots: slots.into_iter().collect(),
        }
    }

    /// Row-major rectangle between two corners (corners may be given in any order).
    pub fn rectangle(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        let (min_row, max_row) = (start_row.min(end_row), start_row.max(end_row));
        let (min_col, max_col) = (start_col.min(end_col), start_col.max(end_col));
        let mut slots = Vec::with_capacity((max_row - min_row + 1) * (max_col - min_col + 1));
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                slots.push(slot_of(row, col));
            }
        }
        Self { slots }
    }

    /// Whole rows, in the order given.
    pub fn rows(rows: &[usize]) -> Self {
        Self::new(
            rows.iter()
                .flat_map(|&row| (1..=COLUMNS).map(move |col| slot_of(row, col))),
        )
    }

    /// Whole columns (top to bottom over `max_rows`), in the order given.
    pub fn columns(max_rows: usize, cols: &[usize]) -> Self {
        Self::new(
            cols.iter()
                .flat_map(|&col| (1..=max_rows).map(move |row| slot_of(row, col))),
        )
    }

    /// Every slot of a grid with `rows` rows.
    pub fn all(rows: usize) -> Self {
        Self::new(0..rows * COLUMNS)
    }

    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.slots.contains(&slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_is_row_major_and_order_insensitive() {
        let a = PaginationRegion::rectangle(2, 2, 3, 4);
        let b = PaginationRegion::rectangle(3, 4, 2, 2);
        assert_eq!(a, b);
        assert_eq!(a.slots(), &[10, 11, 12, 19, 20, 21]);
    }

    #[test]
    fn columns_run_top_to_bottom() {
        let r = PaginationRegion::columns(3, &[1, 9]);
        assert_eq!(r.slots(), &[0, 9, 18, 8, 17, 26]);
    }

    #[test]
    fn rows_and_all() {
        assert_eq!(PaginationRegion::rows(&[2]).slots(), &(9..18usize).collect::<Vec<_>>()[..]);
        assert_eq!(PaginationRegion::all(2).len(), 18);
        assert!(PaginationRegion::all(2).contains(17));
        assert!(!PaginationRegion::all(2).contains(18));
    }
}
