//! Cell-grid geometry shared by placement and projection.
//!
//! # Responsibility
//! - Describe inclusive 1-based cell intervals, boxes and drawer bounds.
//! - Normalize arbitrary two-point selections into ordered ranges.
//!
//! # Invariants
//! - A `CellRange` is never empty: `start <= end` always holds.
//! - Ranges are inclusive on both ends.
//! - `start >= 1` is a caller convention; the collision checker rejects
//!   ranges that break it instead of this module panicking.

use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

/// Grid axis of a drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Front-to-back axis, bounded by drawer depth.
    Row,
    /// Left-to-right axis, bounded by drawer width.
    Column,
    /// Vertical axis, bounded by drawer height.
    Height,
}

impl Axis {
    /// Stable lowercase label used in log events and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
            Self::Height => "height",
        }
    }

    /// Name of the drawer dimension limiting this axis.
    pub fn dimension_name(self) -> &'static str {
        match self {
            Self::Row => "depth",
            Self::Column => "width",
            Self::Height => "height",
        }
    }
}

/// Inclusive, non-empty interval of 1-based cell indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    start: u32,
    end: u32,
}

impl CellRange {
    /// Creates `[start, end]`.
    ///
    /// # Panics
    /// Panics when `start > end`. Callers holding two unordered endpoints
    /// must use [`CellRange::spanning`].
    pub fn new(start: u32, end: u32) -> Self {
        assert!(
            start <= end,
            "malformed cell range: start {start} is after end {end}"
        );
        Self { start, end }
    }

    /// Creates the range covering both endpoints in either order.
    pub fn spanning(a: u32, b: u32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Creates `[start, start + len - 1]`.
    ///
    /// # Panics
    /// Panics when `len == 0`.
    pub fn with_len(start: u32, len: u32) -> Self {
        assert!(len >= 1, "cell range length must be at least 1");
        Self::new(start, start.saturating_add(len - 1))
    }

    /// Creates a one-cell range.
    pub fn single(index: u32) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    pub fn start(self) -> u32 {
        self.start
    }

    pub fn end(self) -> u32 {
        self.end
    }

    /// Number of cells covered.
    pub fn len(self) -> u32 {
        self.end - self.start + 1
    }

    pub fn contains(self, index: u32) -> bool {
        self.start <= index && index <= self.end
    }

    /// Closed-interval intersection test.
    ///
    /// Symmetric: `a.overlaps(b) == b.overlaps(a)`.
    pub fn overlaps(self, other: Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn iter(self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl Display for CellRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Drawer extent in cells along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawerBounds {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub depth: u32,
    /// Number of height levels.
    pub height: u32,
}

impl DrawerBounds {
    pub fn new(width: u32, depth: u32, height: u32) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    /// Largest valid index on `axis`.
    pub fn limit(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Row => self.depth,
            Axis::Column => self.width,
            Axis::Height => self.height,
        }
    }
}

/// Axis-aligned box of cells: rows × columns × height levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellBox {
    pub rows: CellRange,
    pub columns: CellRange,
    pub levels: CellRange,
}

impl CellBox {
    pub fn new(rows: CellRange, columns: CellRange, levels: CellRange) -> Self {
        Self {
            rows,
            columns,
            levels,
        }
    }

    /// Range occupied on `axis`.
    pub fn range(&self, axis: Axis) -> CellRange {
        match axis {
            Axis::Row => self.rows,
            Axis::Column => self.columns,
            Axis::Height => self.levels,
        }
    }

    /// Floor-space intersection, ignoring height.
    pub fn overlaps_planar(&self, other: &Self) -> bool {
        self.rows.overlaps(other.rows) && self.columns.overlaps(other.columns)
    }

    /// Full 3D intersection. Stacked boxes with disjoint levels do not
    /// intersect even when they share floor space.
    pub fn intersects(&self, other: &Self) -> bool {
        self.overlaps_planar(other) && self.levels.overlaps(other.levels)
    }
}

/// One cell position in the width × depth plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPoint {
    pub row: u32,
    pub column: u32,
}

impl GridPoint {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

/// Normalized rectangle drawn on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub rows: CellRange,
    pub columns: CellRange,
}

impl Region {
    /// Builds the rectangle spanned by two corners given in any order.
    pub fn from_corners(a: GridPoint, b: GridPoint) -> Self {
        Self {
            rows: CellRange::spanning(a.row, b.row),
            columns: CellRange::spanning(a.column, b.column),
        }
    }

    /// Top-left cell of the rectangle.
    pub fn origin(&self) -> GridPoint {
        GridPoint::new(self.rows.start(), self.columns.start())
    }

    /// Extent along columns.
    pub fn width(&self) -> u32 {
        self.columns.len()
    }

    /// Extent along rows.
    pub fn depth(&self) -> u32 {
        self.rows.len()
    }

    /// Extends the rectangle vertically into a box.
    pub fn with_levels(&self, levels: CellRange) -> CellBox {
        CellBox::new(self.rows, self.columns, levels)
    }
}

#[cfg(test)]
mod tests {
    use super::{CellBox, CellRange, GridPoint, Region};

    #[test]
    fn overlaps_is_symmetric_for_small_ranges() {
        for a_start in 1..=4 {
            for a_end in a_start..=4 {
                for b_start in 1..=4 {
                    for b_end in b_start..=4 {
                        let a = CellRange::new(a_start, a_end);
                        let b = CellRange::new(b_start, b_end);
                        assert_eq!(a.overlaps(b), b.overlaps(a), "{a} vs {b}");
                    }
                }
            }
        }
    }

    #[test]
    fn touching_ranges_overlap_and_adjacent_ranges_do_not() {
        assert!(CellRange::new(1, 2).overlaps(CellRange::new(2, 3)));
        assert!(!CellRange::new(1, 2).overlaps(CellRange::new(3, 4)));
    }

    #[test]
    fn spanning_normalizes_endpoint_order() {
        assert_eq!(CellRange::spanning(5, 2), CellRange::new(2, 5));
        assert_eq!(CellRange::spanning(3, 3), CellRange::single(3));
    }

    #[test]
    fn with_len_builds_inclusive_end() {
        let range = CellRange::with_len(2, 3);
        assert_eq!((range.start(), range.end()), (2, 4));
        assert_eq!(range.len(), 3);
    }

    #[test]
    #[should_panic(expected = "malformed cell range")]
    fn new_rejects_reversed_endpoints() {
        let _ = CellRange::new(4, 3);
    }

    #[test]
    fn region_from_corners_accepts_any_drag_direction() {
        let region = Region::from_corners(GridPoint::new(4, 6), GridPoint::new(2, 3));
        assert_eq!(region.origin(), GridPoint::new(2, 3));
        assert_eq!(region.width(), 4);
        assert_eq!(region.depth(), 3);
    }

    #[test]
    fn stacked_boxes_share_floor_but_do_not_intersect() {
        let floor = Region::from_corners(GridPoint::new(1, 1), GridPoint::new(2, 2));
        let lower: CellBox = floor.with_levels(CellRange::new(1, 2));
        let upper = floor.with_levels(CellRange::new(3, 4));
        assert!(lower.overlaps_planar(&upper));
        assert!(!lower.intersects(&upper));
    }
}
