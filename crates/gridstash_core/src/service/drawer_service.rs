//! Drawer use-case service.
//!
//! # Responsibility
//! - Create, rename, list and delete drawers.
//! - Normalize drawer names before persistence.
//!
//! # Invariants
//! - Bounds are validated on creation and never changed afterwards.
//! - Log lines carry ids and dimensions only, never drawer names.

use crate::model::drawer::{Drawer, DrawerId, DrawerValidationError};
use crate::model::geometry::DrawerBounds;
use crate::model::naming::normalize_name;
use crate::repo::drawer_repo::DrawerRepository;
use crate::repo::{ConstraintViolation, RecordRef, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for drawer use-cases.
#[derive(Debug)]
pub enum DrawerServiceError {
    /// Name or bounds rejected.
    Invalid(DrawerValidationError),
    /// Target drawer does not exist.
    DrawerNotFound(DrawerId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for DrawerServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::DrawerNotFound(id) => write!(f, "drawer not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DrawerServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::DrawerNotFound(_) => None,
        }
    }
}

impl From<RepoError> for DrawerServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(RecordRef::Drawer(id)) => Self::DrawerNotFound(id),
            RepoError::ConstraintViolation(ConstraintViolation::Drawer(err)) => Self::Invalid(err),
            other => Self::Repo(other),
        }
    }
}

/// Drawer service facade over repository implementations.
pub struct DrawerService<R: DrawerRepository> {
    repo: R,
}

impl<R: DrawerRepository> DrawerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a drawer with fixed `bounds`.
    pub fn create_drawer(
        &self,
        name: &str,
        bounds: DrawerBounds,
    ) -> Result<Drawer, DrawerServiceError> {
        let name = normalize_name(name).ok_or(DrawerServiceError::Invalid(
            DrawerValidationError::BlankName,
        ))?;
        let drawer = Drawer::new(name, bounds);
        if let Err(err) = drawer.validate() {
            warn!("event=drawer_create module=service status=invalid error={err}");
            return Err(DrawerServiceError::Invalid(err));
        }

        self.repo.create_drawer(&drawer)?;
        info!(
            "event=drawer_create module=service status=ok drawer_id={} width={} depth={} height={}",
            drawer.id, drawer.width, drawer.depth, drawer.height
        );
        Ok(drawer)
    }

    /// Replaces the display name of one drawer.
    pub fn rename_drawer(&self, id: DrawerId, name: &str) -> Result<Drawer, DrawerServiceError> {
        let name = normalize_name(name).ok_or(DrawerServiceError::Invalid(
            DrawerValidationError::BlankName,
        ))?;
        let drawer = self.repo.rename_drawer(id, &name)?;
        info!("event=drawer_rename module=service status=ok drawer_id={id}");
        Ok(drawer)
    }

    pub fn get_drawer(&self, id: DrawerId) -> Result<Option<Drawer>, DrawerServiceError> {
        Ok(self.repo.get_drawer(id)?)
    }

    /// Lists drawers in creation order.
    pub fn list_drawers(&self) -> Result<Vec<Drawer>, DrawerServiceError> {
        Ok(self.repo.list_drawers()?)
    }

    /// Deletes one drawer together with its items.
    pub fn delete_drawer(&self, id: DrawerId) -> Result<(), DrawerServiceError> {
        self.repo.delete_drawer(id)?;
        info!("event=drawer_delete module=service status=ok drawer_id={id}");
        Ok(())
    }
}
