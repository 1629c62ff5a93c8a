//! Pure spatial logic over in-memory item snapshots.
//!
//! # Responsibility
//! - Validate candidate placements (`collision`).
//! - Derive per-level grid projections (`projection`).
//!
//! # Invariants
//! - Nothing here reads or writes storage; callers pass snapshots already
//!   filtered to one drawer.

pub mod collision;
pub mod projection;
