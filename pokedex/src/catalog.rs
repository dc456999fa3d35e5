//! Catalog entries and the filter/search rules of the list screen.

use serde::{Deserialize, Serialize};

use crate::storage::CaughtFlags;

const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u16,
    pub name: String,
    pub url: String,
}

impl CatalogEntry {
    pub fn new(id: u16, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn image_url(&self) -> String {
        sprite_url(self.id, false)
    }
}

/// Official artwork URL for `id`, plain or shiny.
pub fn sprite_url(id: u16, shiny: bool) -> String {
    if shiny {
        format!("{ARTWORK_BASE}/shiny/{id}.png")
    } else {
        format!("{ARTWORK_BASE}/{id}.png")
    }
}

/// Radio-style filter selection. Exactly one mode is active; `None` shows everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    Number,
    Name,
    Caught,
    Uncaught,
    #[default]
    None,
}

impl FilterMode {
    pub const SELECTABLE: [FilterMode; 4] = [
        FilterMode::Number,
        FilterMode::Name,
        FilterMode::Caught,
        FilterMode::Uncaught,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::Number => "Number",
            FilterMode::Name => "Name",
            FilterMode::Caught => "Caught",
            FilterMode::Uncaught => "Uncaught",
            FilterMode::None => "All",
        }
    }

    /// Caught/Uncaught ignore the search box entirely.
    pub fn uses_search_term(self) -> bool {
        matches!(self, FilterMode::Number | FilterMode::Name)
    }
}

/// Filters `entries` for `mode`, keeping the original order.
///
/// Caught state is read from `flags` on every call, so the result always
/// reflects the store as it is now.
pub fn apply_filter<'a>(
    entries: &'a [CatalogEntry],
    mode: FilterMode,
    search_term: &str,
    flags: &CaughtFlags,
) -> Vec<&'a CatalogEntry> {
    match mode {
        FilterMode::Number => entries
            .iter()
            .filter(|entry| entry.id.to_string().starts_with(search_term))
            .collect(),
        FilterMode::Name => {
            let term = search_term.to_lowercase();
            entries
                .iter()
                .filter(|entry| entry.name.to_lowercase().starts_with(&term))
                .collect()
        }
        FilterMode::Caught => entries
            .iter()
            .filter(|entry| flags.is_caught(entry.id))
            .collect(),
        FilterMode::Uncaught => entries
            .iter()
            .filter(|entry| !flags.is_caught(entry.id))
            .collect(),
        FilterMode::None => entries.iter().collect(),
    }
}
