use gridstash_core::db::open_db_in_memory;
use gridstash_core::repo::item_repo::CheckedWrite;
use gridstash_core::repo::ConstraintViolation;
use gridstash_core::spatial::collision::RejectionKind;
use gridstash_core::{
    ConfigurationChange, Drawer, DrawerBounds, DrawerId, DrawerRepository, GridPoint, Item,
    ItemDraft, ItemId, ItemPatch, ItemRepository, ItemService, ItemServiceError,
    ItemValidationError, PlacementContext, PlacementState, RepoError, RepoResult,
    SqliteDrawerRepository, SqliteItemRepository, ValidationResult,
};
use rusqlite::Connection;

/// Reads go to SQLite; every write fails with `fail()`.
struct FailingWrites<'conn> {
    inner: SqliteItemRepository<'conn>,
    fail: fn() -> RepoError,
}

impl ItemRepository for FailingWrites<'_> {
    fn create_item(&self, _draft: &ItemDraft) -> RepoResult<Item> {
        Err((self.fail)())
    }

    fn create_item_checked(&self, _draft: &ItemDraft) -> RepoResult<CheckedWrite> {
        Err((self.fail)())
    }

    fn update_item(&self, _id: ItemId, _patch: &ItemPatch) -> RepoResult<Item> {
        Err((self.fail)())
    }

    fn update_item_checked(&self, _id: ItemId, _patch: &ItemPatch) -> RepoResult<CheckedWrite> {
        Err((self.fail)())
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.inner.get_item(id)
    }

    fn list_items(&self, drawer_id: DrawerId) -> RepoResult<Vec<Item>> {
        self.inner.list_items(drawer_id)
    }

    fn list_all_items(&self) -> RepoResult<Vec<Item>> {
        self.inner.list_all_items()
    }

    fn delete_item(&self, _id: ItemId) -> RepoResult<()> {
        Err((self.fail)())
    }

    fn drawer_bounds(&self, drawer_id: DrawerId) -> RepoResult<Option<DrawerBounds>> {
        self.inner.drawer_bounds(drawer_id)
    }
}

fn seeded_drawer(conn: &Connection) -> Drawer {
    let repo = SqliteDrawerRepository::try_new(conn).unwrap();
    let drawer = Drawer::new("Drawer 1", DrawerBounds::new(8, 8, 4));
    repo.create_drawer(&drawer).unwrap();
    drawer
}

fn configure_new(drawer: &Drawer, items: &[gridstash_core::Item], name: &str) -> PlacementState {
    let context = PlacementContext {
        drawer,
        items,
        current_level: 1,
    };
    PlacementState::default()
        .begin_selection(GridPoint::new(2, 2))
        .update_selection(GridPoint::new(1, 1))
        .finish_selection(&context)
        .update_configuration(ConfigurationChange::Name(name.to_string()), &context)
}

#[test]
fn blank_name_keeps_submit_disabled() {
    let conn = open_db_in_memory().unwrap();
    let drawer = seeded_drawer(&conn);
    let service = ItemService::new(SqliteItemRepository::try_new(&conn).unwrap());

    let state = configure_new(&drawer, &[], "   ");
    let after = service.commit_placement(state.clone()).unwrap();
    assert_eq!(after, state);
    assert!(service.list_items(drawer.id).unwrap().is_empty());
}

#[test]
fn submittable_form_commits_the_item() {
    let conn = open_db_in_memory().unwrap();
    let drawer = seeded_drawer(&conn);
    let service = ItemService::new(SqliteItemRepository::try_new(&conn).unwrap());

    let state = configure_new(&drawer, &[], " Hex  keys ");
    let item = match service.commit_placement(state).unwrap() {
        PlacementState::Committed { item } => item,
        other => panic!("unexpected state: {other:?}"),
    };
    assert_eq!(item.name, "Hex keys");
    assert_eq!((item.start_row, item.start_column), (1, 1));
    assert_eq!((item.width, item.depth, item.height), (2, 2, 1));
    assert_eq!(service.list_items(drawer.id).unwrap(), vec![item]);
}

#[test]
fn stale_snapshot_is_caught_inside_the_write() {
    let conn = open_db_in_memory().unwrap();
    let drawer = seeded_drawer(&conn);
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    // Validated against an empty drawer, then someone else fills the spot.
    let state = configure_new(&drawer, &[], "Late");
    assert!(state.form().unwrap().can_submit());
    let squatter = repo.create_item(&ItemDraft::new(drawer.id, "Squatter")).unwrap();

    let service = ItemService::new(SqliteItemRepository::try_new(&conn).unwrap());
    let after = service.commit_placement(state).unwrap();
    let form = after.form().expect("form stays open");
    let rejection = form.validation.rejection().expect("fresh rejection");
    assert_eq!(rejection.kind(), RejectionKind::Overlap);
    assert_eq!(rejection.conflicts()[0].id, squatter.id);
    assert!(!form.can_submit());
    assert_eq!(repo.list_items(drawer.id).unwrap(), vec![squatter]);
}

#[test]
fn vanished_drawer_returns_to_idle() {
    let conn = open_db_in_memory().unwrap();
    let drawer = seeded_drawer(&conn);
    let state = configure_new(&drawer, &[], "Orphan");
    SqliteDrawerRepository::try_new(&conn)
        .unwrap()
        .delete_drawer(drawer.id)
        .unwrap();

    let service = ItemService::new(SqliteItemRepository::try_new(&conn).unwrap());
    let failure = service.commit_placement(state).unwrap_err();
    assert!(failure.state.is_idle());
    assert!(matches!(
        failure.error,
        ItemServiceError::DrawerNotFound(id) if id == drawer.id
    ));
}

#[test]
fn editing_an_item_restacks_it() {
    let conn = open_db_in_memory().unwrap();
    let drawer = seeded_drawer(&conn);
    let service = ItemService::new(SqliteItemRepository::try_new(&conn).unwrap());

    let base = match service.commit_placement(configure_new(&drawer, &[], "Base")).unwrap() {
        PlacementState::Committed { item } => item,
        other => panic!("unexpected state: {other:?}"),
    };
    let items = service.list_items(drawer.id).unwrap();
    let context = PlacementContext {
        drawer: &drawer,
        items: &items,
        current_level: 1,
    };

    let editing = PlacementState::Idle.begin_edit(&base, &context);
    assert_eq!(editing.form().unwrap().validation, ValidationResult::Ok);

    let moved = editing
        .update_configuration(ConfigurationChange::StartHeight(3), &context)
        .update_configuration(ConfigurationChange::Height(2), &context)
        .update_configuration(ConfigurationChange::Color(Some("teal".to_string())), &context);
    let updated = match service.commit_placement(moved).unwrap() {
        PlacementState::Committed { item } => item,
        other => panic!("unexpected state: {other:?}"),
    };
    assert_eq!(updated.id, base.id);
    assert_eq!((updated.start_height, updated.height), (3, 2));
    assert_eq!(updated.color.as_deref(), Some("teal"));
    assert_eq!(updated.footprint(), base.footprint());
}

#[test]
fn editing_a_deleted_item_returns_to_idle() {
    let conn = open_db_in_memory().unwrap();
    let drawer = seeded_drawer(&conn);
    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    let item = repo.create_item(&ItemDraft::new(drawer.id, "Ghost")).unwrap();
    let items = vec![item.clone()];
    let context = PlacementContext {
        drawer: &drawer,
        items: &items,
        current_level: 1,
    };
    let state = PlacementState::Idle
        .begin_edit(&item, &context)
        .update_configuration(ConfigurationChange::Height(2), &context);
    repo.delete_item(item.id).unwrap();

    let service = ItemService::new(SqliteItemRepository::try_new(&conn).unwrap());
    let failure = service.commit_placement(state).unwrap_err();
    assert!(failure.state.is_idle());
    assert!(matches!(failure.error, ItemServiceError::ItemNotFound(_)));
}

#[test]
fn storage_failure_keeps_the_form_open_with_the_error() {
    let conn = open_db_in_memory().unwrap();
    let drawer = seeded_drawer(&conn);
    let service = ItemService::new(FailingWrites {
        inner: SqliteItemRepository::try_new(&conn).unwrap(),
        fail: || RepoError::InvalidData("disk full".to_string()),
    });

    let state = configure_new(&drawer, &[], "Spacers");
    assert!(state.form().unwrap().can_submit());
    let failure = service.commit_placement(state).unwrap_err();
    assert!(matches!(failure.error, ItemServiceError::Repo(RepoError::InvalidData(_))));
    let form = failure.state.form().expect("form stays open");
    assert_eq!(form.name, "Spacers");
    assert!(form.error.as_deref().is_some_and(|message| message.contains("disk full")));
    assert!(!form.can_submit());
    assert!(service.list_items(drawer.id).unwrap().is_empty());
}

#[test]
fn constraint_violation_from_storage_keeps_the_form_open() {
    let conn = open_db_in_memory().unwrap();
    let drawer = seeded_drawer(&conn);
    let service = ItemService::new(FailingWrites {
        inner: SqliteItemRepository::try_new(&conn).unwrap(),
        fail: || {
            RepoError::ConstraintViolation(ConstraintViolation::Item(
                ItemValidationError::FieldBelowOne { field: "width" },
            ))
        },
    });

    let failure = service
        .commit_placement(configure_new(&drawer, &[], "Shims"))
        .unwrap_err();
    assert!(matches!(failure.error, ItemServiceError::Invalid(_)));
    assert!(!failure.state.is_idle());
    let form = failure.state.form().expect("form stays open");
    assert_eq!(form.error.as_deref(), Some("item width must be at least 1"));
    assert!(!form.can_submit());
    assert!(failure.state.clone().commit().is_err());
}
