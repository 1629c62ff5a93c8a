//! Item use-case service.
//!
//! # Responsibility
//! - Place, update, list and delete items through the guarded repository
//!   paths.
//! - Provide live placement checks against the stored snapshot.
//! - Turn a submittable `PlacementState` into a storage write and map the
//!   outcome back onto the state machine.
//!
//! # Invariants
//! - Names are normalized and blank styles cleared before any write.
//! - Rejections are returned as `PlacementOutcome::Rejected`, never as
//!   errors.
//! - Log lines carry ids and rejection kinds only, never item names.

use crate::model::drawer::DrawerId;
use crate::model::geometry::CellBox;
use crate::model::item::{Item, ItemDraft, ItemId, ItemPatch, ItemValidationError};
use crate::model::naming::{normalize_name, normalize_style};
use crate::repo::item_repo::{CheckedWrite, ItemRepository};
use crate::repo::{ConstraintViolation, RecordRef, RepoError};
use crate::spatial::collision::{self, Rejection, ValidationResult};
use crate::workflow::placement::{PendingCommit, PlacementCommand, PlacementState};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for item use-cases.
#[derive(Debug)]
pub enum ItemServiceError {
    /// Field constraint violated before any spatial check ran.
    Invalid(ConstraintViolation),
    /// Target item does not exist.
    ItemNotFound(ItemId),
    /// Owning drawer does not exist.
    DrawerNotFound(DrawerId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ItemServiceError {
    /// Whether the addressed record is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound(_) | Self::DrawerNotFound(_))
    }
}

impl Display for ItemServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::DrawerNotFound(id) => write!(f, "drawer not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ItemServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::ItemNotFound(_) | Self::DrawerNotFound(_) => None,
        }
    }
}

impl From<RepoError> for ItemServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(RecordRef::Item(id)) => Self::ItemNotFound(id),
            RepoError::NotFound(RecordRef::Drawer(id)) => Self::DrawerNotFound(id),
            RepoError::ConstraintViolation(violation) => Self::Invalid(violation),
            other => Self::Repo(other),
        }
    }
}

impl From<ItemValidationError> for ItemServiceError {
    fn from(value: ItemValidationError) -> Self {
        Self::Invalid(ConstraintViolation::Item(value))
    }
}

/// Result of a guarded item write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    Placed(Item),
    Rejected(Rejection),
}

impl From<CheckedWrite> for PlacementOutcome {
    fn from(value: CheckedWrite) -> Self {
        match value {
            Ok(item) => Self::Placed(item),
            Err(rejection) => Self::Rejected(rejection),
        }
    }
}

/// Failed commit: the state the workflow continues from plus the cause.
#[derive(Debug)]
pub struct CommitFailure {
    pub state: PlacementState,
    pub error: ItemServiceError,
}

impl Display for CommitFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "placement commit failed: {}", self.error)
    }
}

impl Error for CommitFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Item service facade over repository implementations.
pub struct ItemService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an item after checking bounds and overlaps in one
    /// transaction.
    pub fn place_item(&self, draft: &ItemDraft) -> Result<PlacementOutcome, ItemServiceError> {
        let started_at = Instant::now();
        let draft = normalize_draft(draft)?;
        let result = self.repo.create_item_checked(&draft);
        let target = format!("drawer_id={}", draft.drawer_id);
        log_write("item_place", &target, &result, started_at);
        Ok(result?.into())
    }

    /// Applies `patch`, re-validating placement when it moves the item.
    pub fn update_item(
        &self,
        id: ItemId,
        patch: &ItemPatch,
    ) -> Result<PlacementOutcome, ItemServiceError> {
        let started_at = Instant::now();
        let patch = normalize_patch(patch)?;
        let result = self.repo.update_item_checked(id, &patch);
        log_write("item_update", &format!("item_id={id}"), &result, started_at);
        Ok(result?.into())
    }

    /// Checks `candidate` against the drawer's stored items.
    pub fn check_placement(
        &self,
        drawer_id: DrawerId,
        candidate: &CellBox,
        exclude: Option<ItemId>,
    ) -> Result<ValidationResult, ItemServiceError> {
        let bounds = self
            .repo
            .drawer_bounds(drawer_id)?
            .ok_or(ItemServiceError::DrawerNotFound(drawer_id))?;
        let existing = self.repo.list_items(drawer_id)?;
        Ok(collision::check_placement(
            candidate, bounds, &existing, exclude,
        ))
    }

    pub fn get_item(&self, id: ItemId) -> Result<Option<Item>, ItemServiceError> {
        Ok(self.repo.get_item(id)?)
    }

    /// Lists one drawer's items in snapshot order.
    pub fn list_items(&self, drawer_id: DrawerId) -> Result<Vec<Item>, ItemServiceError> {
        Ok(self.repo.list_items(drawer_id)?)
    }

    pub fn list_all_items(&self) -> Result<Vec<Item>, ItemServiceError> {
        Ok(self.repo.list_all_items()?)
    }

    pub fn delete_item(&self, id: ItemId) -> Result<(), ItemServiceError> {
        self.repo.delete_item(id)?;
        info!("event=item_delete module=service status=ok item_id={id}");
        Ok(())
    }

    /// Writes the placement described by `state`.
    ///
    /// A state that cannot be submitted is returned unchanged. A rejection
    /// found inside the write transaction keeps the form open with the
    /// fresh rejection. Failures carry the state to continue from: `Idle`
    /// when the target vanished, otherwise the form with the error message.
    pub fn commit_placement(
        &self,
        state: PlacementState,
    ) -> Result<PlacementState, CommitFailure> {
        let PendingCommit { mut form, command } = match state.commit() {
            Ok(pending) => pending,
            Err(unchanged) => return Ok(unchanged),
        };

        let written = match &command {
            PlacementCommand::Create(draft) => self.place_item(draft),
            PlacementCommand::Update { item_id, patch } => self.update_item(*item_id, patch),
        };

        match written {
            Ok(PlacementOutcome::Placed(item)) => Ok(PlacementState::Committed { item }),
            Ok(PlacementOutcome::Rejected(rejection)) => {
                form.validation = ValidationResult::Rejected(rejection);
                Ok(PlacementState::Configuring(form))
            }
            Err(error) if error.is_not_found() => Err(CommitFailure {
                state: PlacementState::Idle,
                error,
            }),
            Err(error) => {
                form.error = Some(error.to_string());
                Err(CommitFailure {
                    state: PlacementState::Configuring(form),
                    error,
                })
            }
        }
    }
}

fn normalize_draft(draft: &ItemDraft) -> Result<ItemDraft, ItemServiceError> {
    let name = normalize_name(&draft.name).ok_or(ItemValidationError::BlankName)?;
    Ok(ItemDraft {
        name,
        icon: normalize_style(draft.icon.as_deref()),
        color: normalize_style(draft.color.as_deref()),
        ..draft.clone()
    })
}

fn normalize_patch(patch: &ItemPatch) -> Result<ItemPatch, ItemServiceError> {
    let name = match patch.name.as_deref() {
        Some(raw) => Some(normalize_name(raw).ok_or(ItemValidationError::BlankName)?),
        None => None,
    };
    Ok(ItemPatch {
        name,
        icon: patch
            .icon
            .as_ref()
            .map(|icon| normalize_style(icon.as_deref())),
        color: patch
            .color
            .as_ref()
            .map(|color| normalize_style(color.as_deref())),
        ..patch.clone()
    })
}

fn log_write(
    event: &str,
    target: &str,
    result: &Result<CheckedWrite, RepoError>,
    started_at: Instant,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(Ok(item)) => info!(
            "event={event} module=service status=ok item_id={} drawer_id={} duration_ms={duration_ms}",
            item.id, item.drawer_id
        ),
        Ok(Err(rejection)) => info!(
            "event={event} module=service status=rejected {target} reason={} conflicts={} duration_ms={duration_ms}",
            rejection.kind().as_str(),
            rejection.conflicts().len()
        ),
        Err(RepoError::NotFound(_) | RepoError::ConstraintViolation(_)) => warn!(
            "event={event} module=service status=invalid {target} duration_ms={duration_ms}"
        ),
        Err(err) => error!(
            "event={event} module=service status=error {target} duration_ms={duration_ms} error={err}"
        ),
    }
}
