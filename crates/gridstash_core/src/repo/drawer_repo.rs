//! Drawer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist drawers and their fixed bounds.
//! - Provide listing order used by every view.
//!
//! # Invariants
//! - `list_drawers` returns creation order.
//! - Bounds columns are never updated after insert.
//! - Deleting a drawer removes its items through `ON DELETE CASCADE`.

use crate::model::drawer::{Drawer, DrawerId};
use crate::repo::{ensure_schema, parse_uuid, RecordRef, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const DRAWER_COLUMNS: [&str; 6] = ["uuid", "name", "width", "depth", "height", "created_at"];

/// Repository interface for drawer persistence.
pub trait DrawerRepository {
    /// Inserts one validated drawer and returns its id.
    fn create_drawer(&self, drawer: &Drawer) -> RepoResult<DrawerId>;
    /// Replaces the display name. Returns the updated drawer.
    fn rename_drawer(&self, id: DrawerId, name: &str) -> RepoResult<Drawer>;
    /// Gets one drawer by id.
    fn get_drawer(&self, id: DrawerId) -> RepoResult<Option<Drawer>>;
    /// Lists all drawers in creation order.
    fn list_drawers(&self) -> RepoResult<Vec<Drawer>>;
    /// Deletes one drawer and, by cascade, its items.
    fn delete_drawer(&self, id: DrawerId) -> RepoResult<()>;
}

/// SQLite-backed drawer repository.
pub struct SqliteDrawerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDrawerRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, "drawers", &DRAWER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl DrawerRepository for SqliteDrawerRepository<'_> {
    fn create_drawer(&self, drawer: &Drawer) -> RepoResult<DrawerId> {
        drawer.validate()?;
        self.conn.execute(
            "INSERT INTO drawers (uuid, name, width, depth, height)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                drawer.id.to_string(),
                drawer.name,
                drawer.width,
                drawer.depth,
                drawer.height,
            ],
        )?;
        Ok(drawer.id)
    }

    fn rename_drawer(&self, id: DrawerId, name: &str) -> RepoResult<Drawer> {
        let mut drawer = self
            .get_drawer(id)?
            .ok_or(RepoError::NotFound(RecordRef::Drawer(id)))?;
        drawer.name = name.to_string();
        drawer.validate()?;

        let changed = self.conn.execute(
            "UPDATE drawers
             SET
                name = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), drawer.name],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Drawer(id)));
        }
        Ok(drawer)
    }

    fn get_drawer(&self, id: DrawerId) -> RepoResult<Option<Drawer>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, width, depth, height
             FROM drawers
             WHERE uuid = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_drawer_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_drawers(&self) -> RepoResult<Vec<Drawer>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, width, depth, height
             FROM drawers
             ORDER BY created_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut drawers = Vec::new();
        while let Some(row) = rows.next()? {
            drawers.push(parse_drawer_row(row)?);
        }
        Ok(drawers)
    }

    fn delete_drawer(&self, id: DrawerId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM drawers WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Drawer(id)));
        }
        Ok(())
    }
}

pub(crate) fn parse_drawer_row(row: &Row<'_>) -> RepoResult<Drawer> {
    let uuid_text: String = row.get("uuid")?;
    let drawer = Drawer {
        id: parse_uuid(&uuid_text, "drawers.uuid")?,
        name: row.get("name")?,
        width: row.get("width")?,
        depth: row.get("depth")?,
        height: row.get("height")?,
    };
    drawer
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("drawer {uuid_text}: {err}")))?;
    Ok(drawer)
}
