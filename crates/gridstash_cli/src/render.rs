//! Plain-text views of drawers and items.

use gridstash_core::spatial::projection::CellRole;
use gridstash_core::{is_highlighted, Drawer, DrawerGroup, Grid, Item, ItemId, Occupancy};
use std::fmt::Write as _;

pub fn drawer_line(drawer: &Drawer) -> String {
    format!(
        "{}  {}  {}x{}x{}",
        drawer.id, drawer.name, drawer.width, drawer.depth, drawer.height
    )
}

pub fn item_line(item: &Item) -> String {
    let levels = item.levels();
    let footprint = item.footprint();
    format!(
        "{}  {}  rows {} columns {} levels {}",
        item.id, item.name, footprint.rows, footprint.columns, levels
    )
}

/// List view: one header per drawer, matching items marked with `*`.
pub fn item_list(groups: &[DrawerGroup<'_>], term: &str) -> String {
    let mut out = String::new();
    if groups.is_empty() {
        out.push_str("no items\n");
        return out;
    }
    for group in groups {
        let _ = writeln!(out, "{}", group.drawer.name);
        for item in &group.items {
            let marker = if is_highlighted(item, term) { '*' } else { ' ' };
            let _ = writeln!(out, " {marker} {}", item_line(item));
        }
    }
    out
}

/// One height level as a letter grid plus a legend.
///
/// Origin cells show the item's legend label in upper case, the rest of
/// its footprint in lower case. Labels run `A..Z`, then `AA`, `AB` and so
/// on; cells are padded to the widest label.
pub fn slice(drawer: &Drawer, grid: &Grid<'_>) -> String {
    let legend = grid
        .visible()
        .iter()
        .enumerate()
        .map(|(index, item)| (item.id, legend_label(index)))
        .collect::<Vec<_>>();
    let width = legend.iter().map(|(_, label)| label.len()).max().unwrap_or(1);

    let mut out = String::new();
    let _ = writeln!(out, "{} level {}/{}", drawer.name, grid.level(), drawer.height);
    for row in grid.rows() {
        let line = row
            .cells()
            .map(|cell| match cell.occupancy {
                Occupancy::Empty => ".".to_string(),
                Occupancy::Occupied { item_id, role } => {
                    let label = label_for(&legend, item_id);
                    match role {
                        CellRole::Origin => label.to_string(),
                        CellRole::Spanned => label.to_ascii_lowercase(),
                    }
                }
            })
            .map(|text| format!("{text:<width$}"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "{:>3} {}", row.index(), line.trim_end());
    }
    for (item, (_, label)) in grid.visible().iter().zip(&legend) {
        let _ = writeln!(out, "  {label} = {}", item.name);
    }
    out
}

/// Items bottom-up, one line per item.
pub fn exploded(drawer: &Drawer, ordered: &[&Item]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} levels)", drawer.name, drawer.height);
    for item in ordered {
        let _ = writeln!(out, "  levels {:<7} {}", item.levels().to_string(), item.name);
    }
    out
}

/// Spreadsheet-style column label for the `index`-th visible item.
fn legend_label(index: usize) -> String {
    let mut remaining = index + 1;
    let mut letters = Vec::new();
    while remaining > 0 {
        remaining -= 1;
        letters.push(b'A' + (remaining % 26) as u8);
        remaining /= 26;
    }
    letters.iter().rev().map(|letter| char::from(*letter)).collect()
}

fn label_for(legend: &[(ItemId, String)], item_id: ItemId) -> &str {
    legend
        .iter()
        .find(|(id, _)| *id == item_id)
        .map_or("?", |(_, label)| label.as_str())
}
