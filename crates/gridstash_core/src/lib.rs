//! Core domain logic for Gridstash.
//! This crate is the single source of truth for drawer and item placement
//! invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod spatial;
pub mod workflow;

pub use config::CoreConfig;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::drawer::{Drawer, DrawerId, DrawerValidationError, DEFAULT_DRAWER_BOUNDS};
pub use model::geometry::{Axis, CellBox, CellRange, DrawerBounds, GridPoint, Region};
pub use model::item::{Item, ItemDraft, ItemId, ItemPatch, ItemValidationError};
pub use repo::drawer_repo::{DrawerRepository, SqliteDrawerRepository};
pub use repo::item_repo::{ItemRepository, SqliteItemRepository};
pub use repo::{RecordRef, RepoError, RepoResult};
pub use search::filter::{
    filter_drawer_views, group_items_by_drawer, is_highlighted, matches_term, DrawerGroup,
};
pub use service::drawer_service::{DrawerService, DrawerServiceError};
pub use service::item_service::{CommitFailure, ItemService, ItemServiceError, PlacementOutcome};
pub use spatial::collision::{check_placement, Conflict, Rejection, ValidationResult};
pub use spatial::projection::{project_slice, stack_order, visible_items, Grid, Occupancy};
pub use workflow::placement::{ConfigurationChange, PlacementContext, PlacementState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
