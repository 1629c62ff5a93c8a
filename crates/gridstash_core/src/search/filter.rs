//! In-memory item and drawer filtering.
//!
//! # Invariants
//! - Matching is a case-insensitive substring test on the trimmed term.
//! - An empty term matches everything but highlights nothing.
//! - Groups follow the input drawer order; items keep snapshot order.

use crate::model::drawer::Drawer;
use crate::model::item::Item;
use serde::Serialize;

/// Normalized search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    needle: String,
}

impl SearchTerm {
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Whether `text` contains the term, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        self.is_empty() || text.to_lowercase().contains(&self.needle)
    }
}

/// One drawer and the items shown under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawerGroup<'a> {
    pub drawer: &'a Drawer,
    pub items: Vec<&'a Item>,
}

/// Case-insensitive substring match of `term` in `text`.
pub fn matches_term(text: &str, term: &str) -> bool {
    SearchTerm::new(term).matches(text)
}

/// List view: items whose name or drawer name matches, grouped by drawer.
///
/// Drawers without a kept item are omitted. Items pointing at a drawer not
/// in `drawers` are skipped.
pub fn group_items_by_drawer<'a>(
    drawers: &'a [Drawer],
    items: &'a [Item],
    term: &str,
) -> Vec<DrawerGroup<'a>> {
    let term = SearchTerm::new(term);
    drawers
        .iter()
        .filter_map(|drawer| {
            let drawer_matches = term.matches(&drawer.name);
            let kept = items
                .iter()
                .filter(|item| item.drawer_id == drawer.id)
                .filter(|item| drawer_matches || term.matches(&item.name))
                .collect::<Vec<_>>();
            (!kept.is_empty()).then_some(DrawerGroup {
                drawer,
                items: kept,
            })
        })
        .collect()
}

/// Grid view: drawers whose name or any item name matches, each with all
/// of its items.
pub fn filter_drawer_views<'a>(
    drawers: &'a [Drawer],
    items: &'a [Item],
    term: &str,
) -> Vec<DrawerGroup<'a>> {
    let term = SearchTerm::new(term);
    drawers
        .iter()
        .filter_map(|drawer| {
            let own = items
                .iter()
                .filter(|item| item.drawer_id == drawer.id)
                .collect::<Vec<_>>();
            let keep = term.matches(&drawer.name) || own.iter().any(|item| term.matches(&item.name));
            keep.then_some(DrawerGroup { drawer, items: own })
        })
        .collect()
}

/// Whether `item` should be highlighted for `term`.
pub fn is_highlighted(item: &Item, term: &str) -> bool {
    let term = SearchTerm::new(term);
    !term.is_empty() && term.matches(&item.name)
}
