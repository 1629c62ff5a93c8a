//! Normalization of user-entered labels and style attributes.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Trims a display name and collapses inner whitespace runs to one space.
///
/// Returns `None` when nothing is left.
pub fn normalize_name(raw: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

/// Maps blank icon/color input to `None` and trims the rest.
pub fn normalize_style(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, normalize_style};

    #[test]
    fn name_is_trimmed_and_collapsed() {
        assert_eq!(
            normalize_name("  M3   hex\tbolts \n").as_deref(),
            Some("M3 hex bolts")
        );
        assert_eq!(normalize_name(" \t "), None);
    }

    #[test]
    fn blank_style_becomes_absent() {
        assert_eq!(normalize_style(Some("")), None);
        assert_eq!(normalize_style(Some("  ")), None);
        assert_eq!(normalize_style(None), None);
        assert_eq!(
            normalize_style(Some(" mdiScrewdriver ")).as_deref(),
            Some("mdiScrewdriver")
        );
    }
}
