//! Height-slice projections of a drawer's items.
//!
//! # Responsibility
//! - Build the 2D occupancy grid for one height level.
//! - Select the items visible at a level and the bottom-up paint order used
//!   by the exploded view.
//!
//! # Invariants
//! - Projections hold no cached cell state: every traversal of a `Grid`
//!   recomputes occupancy from the item snapshot.
//! - When stored items overlap (an upstream invariant violation), the first
//!   item in snapshot order owns the contested cell.

use crate::model::geometry::DrawerBounds;
use crate::model::item::{Item, ItemId};

/// Role of an occupied cell within its item's footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    /// The item's `(start_row, start_column)` cell; renders the content.
    Origin,
    /// Any other covered cell; rendered by the origin's span.
    Spanned,
}

/// Occupancy of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    Empty,
    Occupied { item_id: ItemId, role: CellRole },
}

impl Occupancy {
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Self::Empty => None,
            Self::Occupied { item_id, .. } => Some(*item_id),
        }
    }
}

/// One cell of a projected slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: u32,
    pub column: u32,
    pub occupancy: Occupancy,
}

/// Occupancy view of one height level.
#[derive(Debug, Clone)]
pub struct Grid<'a> {
    bounds: DrawerBounds,
    level: u32,
    visible: Vec<&'a Item>,
}

/// Projects `items` onto height `level` of a drawer with `bounds`.
///
/// `items` is the drawer's full, unfiltered item list.
pub fn project_slice(bounds: DrawerBounds, items: &[Item], level: u32) -> Grid<'_> {
    Grid {
        bounds,
        level,
        visible: visible_items(items, level),
    }
}

/// Items occupying `level`, in snapshot order.
pub fn visible_items(items: &[Item], level: u32) -> Vec<&Item> {
    items.iter().filter(|item| item.is_visible_at(level)).collect()
}

/// Items ordered bottom-up by `start_height`; ties keep snapshot order.
pub fn stack_order(items: &[Item]) -> Vec<&Item> {
    let mut ordered = items.iter().collect::<Vec<_>>();
    ordered.sort_by_key(|item| item.start_height);
    ordered
}

impl<'a> Grid<'a> {
    pub fn bounds(&self) -> DrawerBounds {
        self.bounds
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Items drawn on this slice.
    pub fn visible(&self) -> &[&'a Item] {
        &self.visible
    }

    /// Looks up one cell. Returns `None` outside the drawer.
    pub fn cell(&self, row: u32, column: u32) -> Option<GridCell> {
        let in_bounds =
            (1..=self.bounds.depth).contains(&row) && (1..=self.bounds.width).contains(&column);
        in_bounds.then(|| GridCell {
            row,
            column,
            occupancy: self.occupancy_at(row, column),
        })
    }

    /// Rows `1..=depth`, front to back. Each call starts a fresh traversal.
    pub fn rows(&self) -> Rows<'_, 'a> {
        Rows {
            grid: self,
            next_row: 1,
        }
    }

    /// Number of occupied cells on this slice.
    pub fn occupied_cells(&self) -> usize {
        self.rows()
            .flat_map(|row| row.cells())
            .filter(|cell| cell.occupancy != Occupancy::Empty)
            .count()
    }

    fn occupancy_at(&self, row: u32, column: u32) -> Occupancy {
        self.visible
            .iter()
            .find(|item| {
                let footprint = item.footprint();
                footprint.rows.contains(row) && footprint.columns.contains(column)
            })
            .map_or(Occupancy::Empty, |item| Occupancy::Occupied {
                item_id: item.id,
                role: if item.start_row == row && item.start_column == column {
                    CellRole::Origin
                } else {
                    CellRole::Spanned
                },
            })
    }
}

/// Lazy row sequence of a [`Grid`].
#[derive(Debug, Clone)]
pub struct Rows<'g, 'a> {
    grid: &'g Grid<'a>,
    next_row: u32,
}

impl<'g, 'a> Iterator for Rows<'g, 'a> {
    type Item = GridRow<'g, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row > self.grid.bounds.depth {
            return None;
        }
        let row = GridRow {
            grid: self.grid,
            row: self.next_row,
        };
        self.next_row += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.grid.bounds.depth + 1).saturating_sub(self.next_row) as usize;
        (remaining, Some(remaining))
    }
}

/// One row of a [`Grid`].
#[derive(Debug, Clone, Copy)]
pub struct GridRow<'g, 'a> {
    grid: &'g Grid<'a>,
    row: u32,
}

impl<'g, 'a> GridRow<'g, 'a> {
    /// 1-based row index.
    pub fn index(&self) -> u32 {
        self.row
    }

    /// Cells `1..=width`, left to right.
    pub fn cells(&self) -> Cells<'g, 'a> {
        Cells {
            grid: self.grid,
            row: self.row,
            next_column: 1,
        }
    }
}

/// Lazy cell sequence of a [`GridRow`].
#[derive(Debug, Clone)]
pub struct Cells<'g, 'a> {
    grid: &'g Grid<'a>,
    row: u32,
    next_column: u32,
}

impl Iterator for Cells<'_, '_> {
    type Item = GridCell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_column > self.grid.bounds.width {
            return None;
        }
        let column = self.next_column;
        self.next_column += 1;
        Some(GridCell {
            row: self.row,
            column,
            occupancy: self.grid.occupancy_at(self.row, column),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.grid.bounds.width + 1).saturating_sub(self.next_column) as usize;
        (remaining, Some(remaining))
    }
}
