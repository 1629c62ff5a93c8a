//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define storage contracts for drawers and items.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate records before touching SQL.
//! - Read paths reject rows that do not map to valid records instead of
//!   masking them.
//! - Guarded item writes run the collision checker and the write inside
//!   one immediate transaction.

pub mod drawer_repo;
pub mod item_repo;

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::drawer::{DrawerId, DrawerValidationError};
use crate::model::item::{ItemId, ItemValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Record addressed by a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    Drawer(DrawerId),
    Item(ItemId),
}

impl Display for RecordRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Drawer(id) => write!(f, "drawer {id}"),
            Self::Item(id) => write!(f, "item {id}"),
        }
    }
}

/// Field constraint failure detected at the storage boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    Drawer(DrawerValidationError),
    Item(ItemValidationError),
}

impl Display for ConstraintViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Drawer(err) => write!(f, "{err}"),
            Self::Item(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConstraintViolation {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Drawer(err) => Some(err),
            Self::Item(err) => Some(err),
        }
    }
}

/// Repository error shared by drawer and item storage.
#[derive(Debug)]
pub enum RepoError {
    /// Required field missing or invalid.
    ConstraintViolation(ConstraintViolation),
    /// Referenced record does not exist.
    NotFound(RecordRef),
    /// SQLite or bootstrap failure.
    Db(DbError),
    /// Persisted row does not map to a valid record.
    InvalidData(String),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table or column is missing.
    MissingSchema {
        table: &'static str,
        column: Option<&'static str>,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConstraintViolation(err) => write!(f, "{err}"),
            Self::NotFound(record) => write!(f, "{record} not found"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingSchema {
                table,
                column: None,
            } => write!(f, "repository requires table `{table}`"),
            Self::MissingSchema {
                table,
                column: Some(column),
            } => write!(f, "repository requires column `{column}` in table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ConstraintViolation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingSchema { .. } => None,
        }
    }
}

impl From<DrawerValidationError> for RepoError {
    fn from(value: DrawerValidationError) -> Self {
        Self::ConstraintViolation(ConstraintViolation::Drawer(value))
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::ConstraintViolation(ConstraintViolation::Item(value))
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Verifies the connection is migrated and `table` has `columns`.
pub(crate) fn ensure_schema(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    if present.is_empty() {
        return Err(RepoError::MissingSchema {
            table,
            column: None,
        });
    }
    if let Some(missing) = columns
        .iter()
        .copied()
        .find(|column| !present.iter().any(|name| name == column))
    {
        return Err(RepoError::MissingSchema {
            table,
            column: Some(missing),
        });
    }
    Ok(())
}

pub(crate) fn parse_uuid(text: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}
