//! Drawer domain model.
//!
//! # Responsibility
//! - Define the bounded cell-grid container items are placed into.
//! - Validate drawer fields before persistence.
//!
//! # Invariants
//! - `width`, `depth` and `height` stay within `1..=MAX_DRAWER_CELLS`.
//! - Bounds are fixed at creation; only `name` changes afterwards.

use crate::model::geometry::DrawerBounds;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a drawer.
pub type DrawerId = Uuid;

/// Largest accepted extent on any drawer axis.
pub const MAX_DRAWER_CELLS: u32 = 24;

/// Bounds offered for a new drawer before the user edits them.
pub const DEFAULT_DRAWER_BOUNDS: DrawerBounds = DrawerBounds {
    width: 8,
    depth: 8,
    height: 4,
};

/// Storage drawer with a fixed width × depth × height cell grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawer {
    pub id: DrawerId,
    /// User-facing label.
    pub name: String,
    /// Columns.
    pub width: u32,
    /// Rows.
    pub depth: u32,
    /// Height levels.
    pub height: u32,
}

/// Field-level validation failure for a drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawerValidationError {
    /// Name is empty after trimming.
    BlankName,
    /// A dimension is zero or larger than `MAX_DRAWER_CELLS`.
    DimensionOutOfRange {
        dimension: &'static str,
        value: u32,
    },
}

impl Display for DrawerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "drawer name must not be blank"),
            Self::DimensionOutOfRange { dimension, value } => write!(
                f,
                "drawer {dimension} must be between 1 and {MAX_DRAWER_CELLS}, got {value}"
            ),
        }
    }
}

impl Error for DrawerValidationError {}

impl Drawer {
    /// Creates a drawer with a generated id.
    pub fn new(name: impl Into<String>, bounds: DrawerBounds) -> Self {
        Self::with_id(Uuid::new_v4(), name, bounds)
    }

    /// Creates a drawer with a caller-provided id.
    pub fn with_id(id: DrawerId, name: impl Into<String>, bounds: DrawerBounds) -> Self {
        Self {
            id,
            name: name.into(),
            width: bounds.width,
            depth: bounds.depth,
            height: bounds.height,
        }
    }

    pub fn bounds(&self) -> DrawerBounds {
        DrawerBounds::new(self.width, self.depth, self.height)
    }

    /// Checks name and dimension constraints.
    pub fn validate(&self) -> Result<(), DrawerValidationError> {
        if self.name.trim().is_empty() {
            return Err(DrawerValidationError::BlankName);
        }
        validate_bounds(self.bounds())
    }
}

/// Checks that every dimension lies within `1..=MAX_DRAWER_CELLS`.
pub fn validate_bounds(bounds: DrawerBounds) -> Result<(), DrawerValidationError> {
    for (dimension, value) in [
        ("width", bounds.width),
        ("depth", bounds.depth),
        ("height", bounds.height),
    ] {
        if value == 0 || value > MAX_DRAWER_CELLS {
            return Err(DrawerValidationError::DimensionOutOfRange { dimension, value });
        }
    }
    Ok(())
}
