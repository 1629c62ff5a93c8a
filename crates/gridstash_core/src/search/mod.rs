//! Search-as-you-type filtering for the list and grid views.
//!
//! # Responsibility
//! - Match items and drawers against a free-text term.
//! - Shape matches into per-drawer groups in display order.

pub mod filter;
