//! Item domain model.
//!
//! # Responsibility
//! - Define the placed-object record and its derived cell box.
//! - Provide the creation draft and partial-update patch shapes used by
//!   storage and the placement workflow.
//!
//! # Invariants
//! - Every coordinate and extent field is `>= 1`; `validate()` enforces it
//!   before persistence and box helpers assume it.
//! - Fitting inside the drawer and not overlapping siblings is checked by
//!   `spatial::collision`, not here.

use crate::model::drawer::DrawerId;
use crate::model::geometry::{CellBox, CellRange, GridPoint, Region};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of an item.
pub type ItemId = Uuid;

/// Object placed inside one drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Owning drawer. Items never span drawers.
    pub drawer_id: DrawerId,
    pub name: String,
    /// 1-based origin row.
    pub start_row: u32,
    /// 1-based origin column.
    pub start_column: u32,
    /// Footprint along columns.
    pub width: u32,
    /// Footprint along rows.
    pub depth: u32,
    /// 1-based lowest occupied level.
    pub start_height: u32,
    /// Number of occupied levels.
    pub height: u32,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Field-level validation failure for an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    /// Name is empty after trimming.
    BlankName,
    /// A coordinate or extent is zero.
    FieldBelowOne { field: &'static str },
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "item name must not be blank"),
            Self::FieldBelowOne { field } => write!(f, "item {field} must be at least 1"),
        }
    }
}

impl Error for ItemValidationError {}

impl Item {
    /// Derived box. Panics on zero extents; call `validate()` first for
    /// untrusted values.
    pub fn cell_box(&self) -> CellBox {
        CellBox::new(
            CellRange::with_len(self.start_row, self.depth),
            CellRange::with_len(self.start_column, self.width),
            self.levels(),
        )
    }

    /// Occupied height levels.
    pub fn levels(&self) -> CellRange {
        CellRange::with_len(self.start_height, self.height)
    }

    /// Occupied floor rectangle.
    pub fn footprint(&self) -> Region {
        Region {
            rows: CellRange::with_len(self.start_row, self.depth),
            columns: CellRange::with_len(self.start_column, self.width),
        }
    }

    pub fn origin(&self) -> GridPoint {
        GridPoint::new(self.start_row, self.start_column)
    }

    /// Whether the item occupies `level`.
    pub fn is_visible_at(&self, level: u32) -> bool {
        self.levels().contains(level)
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_fields(
            &self.name,
            self.start_row,
            self.start_column,
            self.width,
            self.depth,
            self.start_height,
            self.height,
        )
    }
}

/// Item fields before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub drawer_id: DrawerId,
    pub name: String,
    pub start_row: u32,
    pub start_column: u32,
    pub width: u32,
    pub depth: u32,
    pub start_height: u32,
    pub height: u32,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl ItemDraft {
    /// Draft for a 1×1×1 item at the drawer origin.
    pub fn new(drawer_id: DrawerId, name: impl Into<String>) -> Self {
        Self {
            drawer_id,
            name: name.into(),
            start_row: 1,
            start_column: 1,
            width: 1,
            depth: 1,
            start_height: 1,
            height: 1,
            icon: None,
            color: None,
        }
    }

    /// Draft occupying `region` on levels `levels`.
    pub fn placed(
        drawer_id: DrawerId,
        name: impl Into<String>,
        region: Region,
        levels: CellRange,
    ) -> Self {
        let origin = region.origin();
        Self {
            start_row: origin.row,
            start_column: origin.column,
            width: region.width(),
            depth: region.depth(),
            start_height: levels.start(),
            height: levels.len(),
            ..Self::new(drawer_id, name)
        }
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_fields(
            &self.name,
            self.start_row,
            self.start_column,
            self.width,
            self.depth,
            self.start_height,
            self.height,
        )
    }

    /// Materializes the draft under `id`.
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            drawer_id: self.drawer_id,
            name: self.name,
            start_row: self.start_row,
            start_column: self.start_column,
            width: self.width,
            depth: self.depth,
            start_height: self.start_height,
            height: self.height,
            icon: self.icon,
            color: self.color,
        }
    }

    /// Materializes the draft under a fresh id.
    pub fn into_new_item(self) -> Item {
        self.into_item(Uuid::new_v4())
    }
}

/// Partial update. `None` leaves a field unchanged; for `icon`/`color`,
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub start_row: Option<u32>,
    pub start_column: Option<u32>,
    pub width: Option<u32>,
    pub depth: Option<u32>,
    pub start_height: Option<u32>,
    pub height: Option<u32>,
    pub icon: Option<Option<String>>,
    pub color: Option<Option<String>>,
}

impl ItemPatch {
    /// Whether applying the patch can move or resize the item's box.
    pub fn touches_placement(&self) -> bool {
        self.start_row.is_some()
            || self.start_column.is_some()
            || self.width.is_some()
            || self.depth.is_some()
            || self.start_height.is_some()
            || self.height.is_some()
    }

    /// Returns `item` with the patch applied.
    pub fn apply_to(&self, item: &Item) -> Item {
        Item {
            id: item.id,
            drawer_id: item.drawer_id,
            name: self.name.clone().unwrap_or_else(|| item.name.clone()),
            start_row: self.start_row.unwrap_or(item.start_row),
            start_column: self.start_column.unwrap_or(item.start_column),
            width: self.width.unwrap_or(item.width),
            depth: self.depth.unwrap_or(item.depth),
            start_height: self.start_height.unwrap_or(item.start_height),
            height: self.height.unwrap_or(item.height),
            icon: self.icon.clone().unwrap_or_else(|| item.icon.clone()),
            color: self.color.clone().unwrap_or_else(|| item.color.clone()),
        }
    }
}

fn validate_fields(
    name: &str,
    start_row: u32,
    start_column: u32,
    width: u32,
    depth: u32,
    start_height: u32,
    height: u32,
) -> Result<(), ItemValidationError> {
    if name.trim().is_empty() {
        return Err(ItemValidationError::BlankName);
    }
    for (field, value) in [
        ("start_row", start_row),
        ("start_column", start_column),
        ("width", width),
        ("depth", depth),
        ("start_height", start_height),
        ("height", height),
    ] {
        if value == 0 {
            return Err(ItemValidationError::FieldBelowOne { field });
        }
    }
    Ok(())
}
