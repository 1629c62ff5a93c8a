//! Drawer and item domain model.
//!
//! # Responsibility
//! - Define canonical records shared by storage, spatial checks and views.
//! - Keep grid geometry in one place so every layer agrees on 1-based,
//!   inclusive coordinates.
//!
//! # Invariants
//! - Every record is identified by a stable UUID assigned at creation.
//! - An item belongs to exactly one drawer.

pub mod drawer;
pub mod geometry;
pub mod item;
pub mod naming;
