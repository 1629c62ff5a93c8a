//! Placement validation against drawer bounds and sibling items.
//!
//! # Responsibility
//! - Decide whether a candidate box fits inside a drawer.
//! - Report every existing item whose box intersects the candidate in 3D.
//!
//! # Invariants
//! - Pure and deterministic: the snapshot is never mutated and the same
//!   inputs always yield the same result.
//! - Bounds are checked before overlaps; an out-of-bounds rejection carries
//!   no conflicts.
//! - Conflicts are reported in snapshot order.

use crate::model::geometry::{Axis, CellBox, CellRange, DrawerBounds};
use crate::model::item::{Item, ItemId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Outcome of a placement check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Ok,
    Rejected(Rejection),
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Ok => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }

    pub fn into_result(self) -> Result<(), Rejection> {
        match self {
            Self::Ok => Ok(()),
            Self::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Existing item blocking a placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub id: ItemId,
    pub name: String,
}

/// Coarse rejection category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    OutOfBounds,
    Overlap,
}

impl RejectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OutOfBounds => "out_of_bounds",
            Self::Overlap => "overlap",
        }
    }
}

/// Why a placement was refused. Recoverable by the user, so it travels as
/// data rather than as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The candidate leaves the drawer on `axis` (or starts below 1).
    OutOfBounds {
        axis: Axis,
        range: CellRange,
        limit: u32,
    },
    /// The candidate intersects one or more items.
    Overlap { conflicts: Vec<Conflict> },
}

impl Rejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::OutOfBounds { .. } => RejectionKind::OutOfBounds,
            Self::Overlap { .. } => RejectionKind::Overlap,
        }
    }

    /// Conflicting items; empty for bounds rejections.
    pub fn conflicts(&self) -> &[Conflict] {
        match self {
            Self::OutOfBounds { .. } => &[],
            Self::Overlap { conflicts } => conflicts,
        }
    }

    /// Human-readable reason for inline display.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds { axis, range, .. } if range.start() < 1 => write!(
                f,
                "item {} must start at 1 or above, got {}",
                axis.as_str(),
                range.start()
            ),
            Self::OutOfBounds { axis, range, limit } => write!(
                f,
                "item would exceed drawer {} ({} {range}, drawer has {limit})",
                axis.dimension_name(),
                axis.as_str()
            ),
            Self::Overlap { conflicts } => {
                let names = conflicts
                    .iter()
                    .map(|conflict| format!("\"{}\"", conflict.name))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "item would intersect with: {names}")
            }
        }
    }
}

impl Error for Rejection {}

/// Validates `candidate` against `bounds` and the items already in the
/// drawer.
///
/// `existing` must already be filtered to the target drawer. `exclude`
/// skips one item, used when re-validating an edit against its own prior
/// placement.
pub fn check_placement(
    candidate: &CellBox,
    bounds: DrawerBounds,
    existing: &[Item],
    exclude: Option<ItemId>,
) -> ValidationResult {
    if let Some(rejection) = check_bounds(candidate, bounds) {
        return ValidationResult::Rejected(rejection);
    }

    let conflicts = find_conflicts(candidate, existing, exclude);
    if conflicts.is_empty() {
        ValidationResult::Ok
    } else {
        ValidationResult::Rejected(Rejection::Overlap { conflicts })
    }
}

/// Returns the first axis on which `candidate` leaves `bounds`.
pub fn check_bounds(candidate: &CellBox, bounds: DrawerBounds) -> Option<Rejection> {
    [Axis::Row, Axis::Column, Axis::Height]
        .into_iter()
        .find_map(|axis| {
            let range = candidate.range(axis);
            let limit = bounds.limit(axis);
            (range.start() < 1 || range.end() > limit).then_some(Rejection::OutOfBounds {
                axis,
                range,
                limit,
            })
        })
}

/// Collects every item whose box intersects `candidate` in all three axes.
pub fn find_conflicts(
    candidate: &CellBox,
    existing: &[Item],
    exclude: Option<ItemId>,
) -> Vec<Conflict> {
    existing
        .iter()
        .filter(|item| Some(item.id) != exclude)
        .filter(|item| candidate.intersects(&item.cell_box()))
        .map(|item| Conflict {
            id: item.id,
            name: item.name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{check_placement, Rejection, RejectionKind, ValidationResult};
    use crate::model::geometry::{Axis, CellBox, CellRange, DrawerBounds};
    use crate::model::item::{Item, ItemDraft};
    use uuid::Uuid;

    fn bounds() -> DrawerBounds {
        DrawerBounds::new(8, 8, 4)
    }

    fn cell_box(rows: (u32, u32), columns: (u32, u32), levels: (u32, u32)) -> CellBox {
        CellBox::new(
            CellRange::new(rows.0, rows.1),
            CellRange::new(columns.0, columns.1),
            CellRange::new(levels.0, levels.1),
        )
    }

    fn item_at(name: &str, placed: CellBox) -> Item {
        ItemDraft::placed(
            Uuid::nil(),
            name,
            crate::model::geometry::Region {
                rows: placed.rows,
                columns: placed.columns,
            },
            placed.levels,
        )
        .into_new_item()
    }

    #[test]
    fn shared_column_overlaps_and_adjacent_column_fits() {
        let x = item_at("X", cell_box((1, 1), (1, 2), (1, 1)));
        let existing = vec![x.clone()];

        let y = cell_box((1, 1), (2, 3), (1, 1));
        let result = check_placement(&y, bounds(), &existing, None);
        let rejection = result.rejection().expect("Y shares column 2 with X");
        assert_eq!(rejection.kind(), RejectionKind::Overlap);
        assert_eq!(rejection.conflicts().len(), 1);
        assert_eq!(rejection.conflicts()[0].id, x.id);

        let z = cell_box((1, 1), (3, 4), (1, 1));
        assert_eq!(
            check_placement(&z, bounds(), &existing, None),
            ValidationResult::Ok
        );
    }

    #[test]
    fn stacked_item_fits_and_interleaved_item_overlaps() {
        let x = item_at("X", cell_box((1, 1), (1, 1), (1, 2)));
        let existing = vec![x.clone()];

        let w = cell_box((1, 1), (1, 1), (3, 4));
        assert!(check_placement(&w, bounds(), &existing, None).is_ok());

        let v = cell_box((1, 1), (1, 1), (2, 3));
        let result = check_placement(&v, bounds(), &existing, None);
        assert_eq!(
            result,
            ValidationResult::Rejected(Rejection::Overlap {
                conflicts: vec![super::Conflict {
                    id: x.id,
                    name: "X".to_string()
                }]
            })
        );
    }

    #[test]
    fn column_past_width_is_out_of_bounds_even_in_empty_drawer() {
        let candidate = cell_box((1, 1), (8, 9), (1, 1));
        let result = check_placement(&candidate, bounds(), &[], None);
        assert!(matches!(
            result,
            ValidationResult::Rejected(Rejection::OutOfBounds {
                axis: Axis::Column,
                limit: 8,
                ..
            })
        ));
    }

    #[test]
    fn out_of_bounds_wins_over_overlap() {
        let x = item_at("X", cell_box((1, 1), (1, 1), (4, 4)));
        let candidate = cell_box((1, 1), (1, 1), (4, 5));
        let rejection = check_placement(&candidate, bounds(), &[x], None)
            .into_result()
            .expect_err("levels 4..5 exceed a 4-level drawer");
        assert_eq!(rejection.kind(), RejectionKind::OutOfBounds);
        assert!(rejection.conflicts().is_empty());
        assert_eq!(
            rejection.reason(),
            "item would exceed drawer height (height 4..5, drawer has 4)"
        );
    }

    #[test]
    fn zero_start_is_rejected() {
        let candidate = cell_box((0, 1), (1, 1), (1, 1));
        let rejection = check_placement(&candidate, bounds(), &[], None)
            .into_result()
            .expect_err("row 0 is outside the grid");
        assert!(matches!(
            rejection,
            Rejection::OutOfBounds { axis: Axis::Row, .. }
        ));
        assert!(rejection.reason().contains("must start at 1"));
    }

    #[test]
    fn every_conflict_is_reported_in_snapshot_order() {
        let a = item_at("A", cell_box((1, 1), (1, 1), (1, 4)));
        let b = item_at("B", cell_box((2, 2), (2, 2), (1, 1)));
        let c = item_at("C", cell_box((5, 5), (5, 5), (1, 1)));
        let candidate = cell_box((1, 2), (1, 2), (1, 1));

        let rejection = check_placement(&candidate, bounds(), &[a, b, c], None)
            .into_result()
            .expect_err("A and B are covered");
        let names = rejection
            .conflicts()
            .iter()
            .map(|conflict| conflict.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(rejection.reason(), "item would intersect with: \"A\", \"B\"");
    }

    #[test]
    fn unchanged_box_revalidates_when_excluding_itself() {
        let x = item_at("X", cell_box((2, 3), (2, 3), (1, 2)));
        let existing = vec![x.clone()];
        assert!(!check_placement(&x.cell_box(), bounds(), &existing, None).is_ok());
        assert!(check_placement(&x.cell_box(), bounds(), &existing, Some(x.id)).is_ok());
    }

    #[test]
    fn sequentially_accepted_boxes_never_conflict() {
        let candidates = [
            cell_box((1, 2), (1, 2), (1, 1)),
            cell_box((1, 2), (1, 2), (2, 4)),
            cell_box((1, 1), (3, 8), (1, 4)),
            cell_box((2, 3), (2, 3), (1, 1)),
            cell_box((3, 8), (1, 8), (1, 2)),
            cell_box((8, 8), (8, 8), (4, 4)),
        ];

        let mut placed: Vec<Item> = Vec::new();
        for (index, candidate) in candidates.iter().enumerate() {
            if check_placement(candidate, bounds(), &placed, None).is_ok() {
                placed.push(item_at(&format!("#{index}"), *candidate));
            }
        }

        assert!(placed.len() >= 4, "most candidates should fit");
        for (i, a) in placed.iter().enumerate() {
            for b in placed.iter().skip(i + 1) {
                assert!(
                    !a.cell_box().intersects(&b.cell_box()),
                    "{} and {} were both accepted",
                    a.name,
                    b.name
                );
            }
        }
    }
}
