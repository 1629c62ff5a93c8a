//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist item records and their placement fields.
//! - Provide guarded create/update paths that validate placement and write
//!   in one immediate transaction.
//!
//! # Invariants
//! - Item lists are returned in creation order, the snapshot order the
//!   collision checker and projections rely on.
//! - Unguarded writes validate fields only; guarded writes additionally run
//!   `spatial::collision::check_placement` against the committed snapshot.
//! - A rejected guarded write leaves storage unchanged.

use crate::model::drawer::DrawerId;
use crate::model::geometry::DrawerBounds;
use crate::model::item::{Item, ItemDraft, ItemId, ItemPatch};
use crate::repo::{ensure_schema, parse_uuid, RecordRef, RepoError, RepoResult};
use crate::spatial::collision::{check_placement, Rejection, ValidationResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const ITEM_COLUMNS: [&str; 12] = [
    "uuid",
    "drawer_uuid",
    "name",
    "start_row",
    "start_column",
    "width",
    "depth",
    "start_height",
    "height",
    "icon",
    "color",
    "created_at",
];

const ITEM_SELECT: &str = "SELECT
        uuid,
        drawer_uuid,
        name,
        start_row,
        start_column,
        width,
        depth,
        start_height,
        height,
        icon,
        color
     FROM items";

/// Outcome of a guarded write: the stored item, or the placement rejection
/// that prevented the write.
pub type CheckedWrite = Result<Item, Rejection>;

/// Repository interface for item persistence.
pub trait ItemRepository {
    /// Inserts an item without spatial validation.
    fn create_item(&self, draft: &ItemDraft) -> RepoResult<Item>;
    /// Validates placement and inserts in one immediate transaction.
    fn create_item_checked(&self, draft: &ItemDraft) -> RepoResult<CheckedWrite>;
    /// Applies a patch without spatial validation.
    fn update_item(&self, id: ItemId, patch: &ItemPatch) -> RepoResult<Item>;
    /// Applies a patch, re-validating placement against siblings when the
    /// patch moves or resizes the item.
    fn update_item_checked(&self, id: ItemId, patch: &ItemPatch) -> RepoResult<CheckedWrite>;
    /// Gets one item by id.
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    /// Lists one drawer's items in creation order.
    fn list_items(&self, drawer_id: DrawerId) -> RepoResult<Vec<Item>>;
    /// Lists every item across drawers in creation order.
    fn list_all_items(&self) -> RepoResult<Vec<Item>>;
    /// Deletes one item.
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
    /// Bounds of a drawer, `None` if it does not exist.
    fn drawer_bounds(&self, drawer_id: DrawerId) -> RepoResult<Option<DrawerBounds>>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, "items", &ITEM_COLUMNS)?;
        Ok(Self { conn })
    }

    fn begin_immediate(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, draft: &ItemDraft) -> RepoResult<Item> {
        draft.validate()?;
        if load_bounds(self.conn, draft.drawer_id)?.is_none() {
            return Err(RepoError::NotFound(RecordRef::Drawer(draft.drawer_id)));
        }
        let item = draft.clone().into_new_item();
        insert_item(self.conn, &item)?;
        Ok(item)
    }

    fn create_item_checked(&self, draft: &ItemDraft) -> RepoResult<CheckedWrite> {
        draft.validate()?;
        let tx = self.begin_immediate()?;
        let bounds = load_bounds(&tx, draft.drawer_id)?
            .ok_or(RepoError::NotFound(RecordRef::Drawer(draft.drawer_id)))?;
        let existing = load_items(&tx, Some(draft.drawer_id))?;

        let item = draft.clone().into_new_item();
        if let ValidationResult::Rejected(rejection) =
            check_placement(&item.cell_box(), bounds, &existing, None)
        {
            tx.rollback()?;
            return Ok(Err(rejection));
        }

        insert_item(&tx, &item)?;
        tx.commit()?;
        Ok(Ok(item))
    }

    fn update_item(&self, id: ItemId, patch: &ItemPatch) -> RepoResult<Item> {
        let current = self
            .get_item(id)?
            .ok_or(RepoError::NotFound(RecordRef::Item(id)))?;
        let updated = patch.apply_to(&current);
        updated.validate()?;
        write_item(self.conn, &updated)?;
        Ok(updated)
    }

    fn update_item_checked(&self, id: ItemId, patch: &ItemPatch) -> RepoResult<CheckedWrite> {
        let tx = self.begin_immediate()?;
        let current = load_item(&tx, id)?.ok_or(RepoError::NotFound(RecordRef::Item(id)))?;
        let updated = patch.apply_to(&current);
        updated.validate()?;

        if patch.touches_placement() {
            let bounds = load_bounds(&tx, updated.drawer_id)?
                .ok_or(RepoError::NotFound(RecordRef::Drawer(updated.drawer_id)))?;
            let siblings = load_items(&tx, Some(updated.drawer_id))?;
            if let ValidationResult::Rejected(rejection) =
                check_placement(&updated.cell_box(), bounds, &siblings, Some(id))
            {
                tx.rollback()?;
                return Ok(Err(rejection));
            }
        }

        write_item(&tx, &updated)?;
        tx.commit()?;
        Ok(Ok(updated))
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        load_item(self.conn, id)
    }

    fn list_items(&self, drawer_id: DrawerId) -> RepoResult<Vec<Item>> {
        load_items(self.conn, Some(drawer_id))
    }

    fn list_all_items(&self) -> RepoResult<Vec<Item>> {
        load_items(self.conn, None)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Item(id)));
        }
        Ok(())
    }

    fn drawer_bounds(&self, drawer_id: DrawerId) -> RepoResult<Option<DrawerBounds>> {
        load_bounds(self.conn, drawer_id)
    }
}

fn load_bounds(conn: &Connection, drawer_id: DrawerId) -> RepoResult<Option<DrawerBounds>> {
    let mut stmt = conn.prepare("SELECT width, depth, height FROM drawers WHERE uuid = ?1;")?;
    let mut rows = stmt.query([drawer_id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(DrawerBounds::new(
            row.get("width")?,
            row.get("depth")?,
            row.get("height")?,
        ))),
        None => Ok(None),
    }
}

fn load_item(conn: &Connection, id: ItemId) -> RepoResult<Option<Item>> {
    let mut stmt = conn.prepare(&format!("{ITEM_SELECT} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_item_row(row)?)),
        None => Ok(None),
    }
}

fn load_items(conn: &Connection, drawer_id: Option<DrawerId>) -> RepoResult<Vec<Item>> {
    let mut items = Vec::new();
    match drawer_id {
        Some(drawer_id) => {
            let mut stmt = conn.prepare(&format!(
                "{ITEM_SELECT} WHERE drawer_uuid = ?1 ORDER BY created_at ASC, rowid ASC;"
            ))?;
            let mut rows = stmt.query([drawer_id.to_string()])?;
            while let Some(row) = rows.next()? {
                items.push(parse_item_row(row)?);
            }
        }
        None => {
            let mut stmt =
                conn.prepare(&format!("{ITEM_SELECT} ORDER BY created_at ASC, rowid ASC;"))?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                items.push(parse_item_row(row)?);
            }
        }
    }
    Ok(items)
}

fn insert_item(conn: &Connection, item: &Item) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO items (
            uuid,
            drawer_uuid,
            name,
            start_row,
            start_column,
            width,
            depth,
            start_height,
            height,
            icon,
            color
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
        params![
            item.id.to_string(),
            item.drawer_id.to_string(),
            item.name,
            item.start_row,
            item.start_column,
            item.width,
            item.depth,
            item.start_height,
            item.height,
            item.icon,
            item.color,
        ],
    )?;
    Ok(())
}

fn write_item(conn: &Connection, item: &Item) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE items
         SET
            name = ?2,
            start_row = ?3,
            start_column = ?4,
            width = ?5,
            depth = ?6,
            start_height = ?7,
            height = ?8,
            icon = ?9,
            color = ?10,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE uuid = ?1;",
        params![
            item.id.to_string(),
            item.name,
            item.start_row,
            item.start_column,
            item.width,
            item.depth,
            item.start_height,
            item.height,
            item.icon,
            item.color,
        ],
    )?;
    if changed == 0 {
        return Err(RepoError::NotFound(RecordRef::Item(item.id)));
    }
    Ok(())
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let uuid_text: String = row.get("uuid")?;
    let drawer_text: String = row.get("drawer_uuid")?;
    let item = Item {
        id: parse_uuid(&uuid_text, "items.uuid")?,
        drawer_id: parse_uuid(&drawer_text, "items.drawer_uuid")?,
        name: row.get("name")?,
        start_row: row.get("start_row")?,
        start_column: row.get("start_column")?,
        width: row.get("width")?,
        depth: row.get("depth")?,
        start_height: row.get("start_height")?,
        height: row.get("height")?,
        icon: row.get("icon")?,
        color: row.get("color")?,
    };
    item.validate()
        .map_err(|err| RepoError::InvalidData(format!("item {uuid_text}: {err}")))?;
    Ok(item)
}
