//! In-progress placement state machine.
//!
//! # Responsibility
//! - Track one placement from drag-select through configuration to commit
//!   or cancel.
//! - Re-run the collision checker on every configuration change so the
//!   submit action always reflects the latest candidate box.
//!
//! # Invariants
//! - States are plain values; every transition consumes the old state and
//!   returns the next one. Nothing is persisted here.
//! - `commit()` only yields a command when the form is submittable.
//! - Transitions that do not apply to the current state return it
//!   unchanged.

use crate::model::drawer::{Drawer, DrawerId};
use crate::model::geometry::{CellBox, CellRange, GridPoint, Region};
use crate::model::item::{Item, ItemDraft, ItemId, ItemPatch, ItemValidationError};
use crate::model::naming::{normalize_name, normalize_style};
use crate::spatial::collision::{check_placement, ValidationResult};

/// Snapshot the workflow validates against.
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    pub drawer: &'a Drawer,
    /// Items currently stored in `drawer`.
    pub items: &'a [Item],
    /// Height level the user is looking at; new items start there.
    pub current_level: u32,
}

/// What a configuring form will write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    New { drawer_id: DrawerId },
    Existing { item_id: ItemId, drawer_id: DrawerId },
}

/// Editable fields of a placement plus their latest validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementForm {
    pub target: FormTarget,
    pub region: Region,
    pub start_height: u32,
    pub height: u32,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// Result of the most recent collision check.
    pub validation: ValidationResult,
    /// Field or storage error shown next to the form.
    pub error: Option<String>,
}

impl PlacementForm {
    fn new_item(drawer_id: DrawerId, region: Region, start_height: u32) -> Self {
        Self {
            target: FormTarget::New { drawer_id },
            region,
            start_height,
            height: 1,
            name: String::new(),
            icon: None,
            color: None,
            validation: ValidationResult::Ok,
            error: None,
        }
    }

    fn existing_item(item: &Item) -> Self {
        Self {
            target: FormTarget::Existing {
                item_id: item.id,
                drawer_id: item.drawer_id,
            },
            region: item.footprint(),
            start_height: item.start_height,
            height: item.height,
            name: item.name.clone(),
            icon: item.icon.clone(),
            color: item.color.clone(),
            validation: ValidationResult::Ok,
            error: None,
        }
    }

    /// Box the form would occupy. `None` while either height field is zero.
    pub fn candidate_box(&self) -> Option<CellBox> {
        self.field_error()
            .is_none()
            .then(|| self.region.with_levels(CellRange::with_len(self.start_height, self.height)))
    }

    fn field_error(&self) -> Option<ItemValidationError> {
        if self.start_height < 1 {
            Some(ItemValidationError::FieldBelowOne { field: "start_height" })
        } else if self.height < 1 {
            Some(ItemValidationError::FieldBelowOne { field: "height" })
        } else {
            None
        }
    }

    /// Item skipped by the overlap test.
    pub fn exclude_id(&self) -> Option<ItemId> {
        match self.target {
            FormTarget::New { .. } => None,
            FormTarget::Existing { item_id, .. } => Some(item_id),
        }
    }

    /// Whether the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        self.validation.is_ok() && self.error.is_none() && normalize_name(&self.name).is_some()
    }

    /// Message to show inline, preferring field errors over rejections.
    pub fn message(&self) -> Option<String> {
        self.error
            .clone()
            .or_else(|| self.validation.rejection().map(|rejection| rejection.reason()))
    }

    fn revalidate(&mut self, context: &PlacementContext<'_>) {
        match self.candidate_box() {
            Some(candidate) => {
                self.error = None;
                self.validation = check_placement(
                    &candidate,
                    context.drawer.bounds(),
                    context.items,
                    self.exclude_id(),
                );
            }
            None => self.error = self.field_error().map(|err| err.to_string()),
        }
    }

    fn command(&self) -> PlacementCommand {
        let name = normalize_name(&self.name).unwrap_or_default();
        let levels = CellRange::with_len(self.start_height, self.height);
        match self.target {
            FormTarget::New { drawer_id } => {
                let mut draft = ItemDraft::placed(drawer_id, name, self.region, levels);
                draft.icon = normalize_style(self.icon.as_deref());
                draft.color = normalize_style(self.color.as_deref());
                PlacementCommand::Create(draft)
            }
            FormTarget::Existing { item_id, .. } => PlacementCommand::Update {
                item_id,
                patch: ItemPatch {
                    name: Some(name),
                    start_height: Some(levels.start()),
                    height: Some(levels.len()),
                    icon: Some(normalize_style(self.icon.as_deref())),
                    color: Some(normalize_style(self.color.as_deref())),
                    ..ItemPatch::default()
                },
            },
        }
    }
}

/// One field edit while configuring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationChange {
    Name(String),
    StartHeight(u32),
    Height(u32),
    Icon(Option<String>),
    Color(Option<String>),
}

/// Storage write requested by a submittable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementCommand {
    Create(ItemDraft),
    Update { item_id: ItemId, patch: ItemPatch },
}

/// A form accepted for submission together with the write it requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
    pub form: PlacementForm,
    pub command: PlacementCommand,
}

/// Placement lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlacementState {
    #[default]
    Idle,
    /// Drag in progress between two corner cells.
    Selecting { anchor: GridPoint, cursor: GridPoint },
    /// Region fixed; heights, name and style being chosen.
    Configuring(PlacementForm),
    Committed { item: Item },
    Cancelled,
}

impl PlacementState {
    /// Starts a drag at `point`, discarding any previous placement.
    pub fn begin_selection(self, point: GridPoint) -> Self {
        Self::Selecting {
            anchor: point,
            cursor: point,
        }
    }

    /// Moves the drag cursor.
    pub fn update_selection(self, point: GridPoint) -> Self {
        match self {
            Self::Selecting { anchor, .. } => Self::Selecting {
                anchor,
                cursor: point,
            },
            other => other,
        }
    }

    /// Ends the drag and opens a new-item form over the selected region.
    pub fn finish_selection(self, context: &PlacementContext<'_>) -> Self {
        match self {
            Self::Selecting { anchor, cursor } => {
                let region = Region::from_corners(anchor, cursor);
                let mut form =
                    PlacementForm::new_item(context.drawer.id, region, context.current_level);
                form.revalidate(context);
                Self::Configuring(form)
            }
            other => other,
        }
    }

    /// Opens the form for an existing item.
    pub fn begin_edit(self, item: &Item, context: &PlacementContext<'_>) -> Self {
        let mut form = PlacementForm::existing_item(item);
        form.revalidate(context);
        Self::Configuring(form)
    }

    /// Applies one field change and re-validates the candidate box.
    pub fn update_configuration(
        self,
        change: ConfigurationChange,
        context: &PlacementContext<'_>,
    ) -> Self {
        match self {
            Self::Configuring(mut form) => {
                match change {
                    ConfigurationChange::Name(name) => form.name = name,
                    ConfigurationChange::StartHeight(start_height) => {
                        form.start_height = start_height
                    }
                    ConfigurationChange::Height(height) => form.height = height,
                    ConfigurationChange::Icon(icon) => form.icon = icon,
                    ConfigurationChange::Color(color) => form.color = color,
                }
                form.revalidate(context);
                Self::Configuring(form)
            }
            other => other,
        }
    }

    /// Returns the write for a submittable form, or the unchanged state
    /// when submit is disabled.
    pub fn commit(self) -> Result<PendingCommit, Self> {
        match self {
            Self::Configuring(form) if form.can_submit() => {
                let command = form.command();
                Ok(PendingCommit { form, command })
            }
            other => Err(other),
        }
    }

    pub fn cancel(self) -> Self {
        Self::Cancelled
    }

    pub fn form(&self) -> Option<&PlacementForm> {
        match self {
            Self::Configuring(form) => Some(form),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
