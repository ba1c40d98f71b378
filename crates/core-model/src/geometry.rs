//! Surface geometry.
//!
//! A panel is either a `Grid` (nine columns, 1..=6 rows, can grow a row at a
//! time) or a `Fixed` host layout with its own slot limit and fill size. The
//! two numbers differ on purpose for some hosts (a workbench accepts slots
//! `0..=9` but only fills nine), so both are kept instead of a single size.
//!
//! Invariants:
//! * `Grid { rows }` always has `rows >= 1`.
//! * `capacity()` is the number of physical slots a backend must allocate.
//! * `contains(slot)` is the validity rule used by `Panel::set_item`:
//!   `slot < rows * 9` for grids, `slot <= limit` for fixed layouts.

use std::fmt;

use crate::COLUMNS;

/// Host-defined fixed layout (non-grid surface).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedLayout {
    pub name: &'static str,
    /// Highest valid slot index (inclusive).
    pub limit: usize,
    /// Number of slots a full fill covers.
    pub fill_size: usize,
}

impl FixedLayout {
    pub const WORKBENCH: FixedLayout = FixedLayout::new("workbench", 9, 10);
    pub const HOPPER: FixedLayout = FixedLayout::new("hopper", 5, 5);
    pub const DISPENSER: FixedLayout = FixedLayout::new("dispenser", 8, 9);
    pub const BREWING: FixedLayout = FixedLayout::new("brewing", 4, 5);

    pub const fn new(name: &'static str, limit: usize, fill_size: usize) -> Self {
        Self {
            name,
            limit,
            fill_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Geometry {
    Grid { rows: u8 },
    Fixed(FixedLayout),
}

impl Geometry {
    /// Hard ceiling for grid rows regardless of configuration.
    pub const MAX_ROWS: u8 = 6;

    /// Grid geometry with `rows` clamped into `1..=MAX_ROWS`.
    pub fn grid(rows: u8) -> Self {
        Geometry::Grid {
            rows: rows.clamp(1, Self::MAX_ROWS),
        }
    }

    pub fn is_grid(&self) -> bool {
        matches!(self, Geometry::Grid { .. })
    }

    /// Row count; fixed layouts report a single row.
    pub fn rows(&self) -> usize {
        match self {
            Geometry::Grid { rows } => *rows as usize,
            Geometry::Fixed(_) => 1,
        }
    }

    /// Number of slots scanned by row-major placement (`addItem`, free-slot
    /// counting). Always `rows * 9`, matching the grid addressing scheme.
    pub fn row_slots(&self) -> usize {
        self.rows() * COLUMNS
    }

    /// Physical slot count of the backing surface.
    pub fn capacity(&self) -> usize {
        match self {
            Geometry::Grid { rows } => *rows as usize * COLUMNS,
            Geometry::Fixed(layout) => layout.fill_size,
        }
    }

    /// Slots covered by a full fill.
    pub fn fill_size(&self) -> usize {
        match self {
            Geometry::Grid { rows } => *rows as usize * COLUMNS,
            Geometry::Fixed(layout) => layout.fill_size,
        }
    }

    pub fn contains(&self, slot: usize) -> bool {
        match self {
            Geometry::Grid { rows } => slot < *rows as usize * COLUMNS,
            Geometry::Fixed(layout) => slot <= layout.limit,
        }
    }

    /// The same grid with one more row, or `None` when it cannot grow
    /// (fixed layout, or already at `max_rows`).
    pub fn grown(&self, max_rows: u8) -> Option<Geometry> {
        match self {
            Geometry::Grid { rows } if *rows < max_rows.min(Self::MAX_ROWS) => {
                Some(Geometry::Grid { rows: rows + 1 })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Grid { rows } => write!(f, "grid with {rows} rows"),
            Geometry::Fixed(layout) => write!(f, "{} layout", layout.name),
        }
    }
}
