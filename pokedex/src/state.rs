use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::catalog::{apply_filter, CatalogEntry, FilterMode};
use crate::detail::DetailRecord;
use crate::navigator::{NavigationSession, Route};
use crate::storage::CaughtFlags;
use crate::theme::TypeTheme;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

/// List screen state. Rebuilt every time the catalog route is entered.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogState {
    pub entries: Vec<CatalogEntry>,
    pub visible: Vec<CatalogEntry>,
    pub selected_index: usize,
    pub filter: FilterMode,
    pub search: SearchState,
    pub not_found: bool,
    pub loading: bool,
    pub pending_open: Option<u16>,
}

impl CatalogState {
    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.visible.get(self.selected_index)
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.visible.is_empty() {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(self.visible.len() - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    /// Re-runs the active filter against the live flags and updates the
    /// not-found indicator.
    pub fn refilter(&mut self, flags: &CaughtFlags) {
        let term = if self.filter.uses_search_term() {
            self.search.query.as_str()
        } else {
            ""
        };
        self.visible = apply_filter(&self.entries, self.filter, term, flags)
            .into_iter()
            .cloned()
            .collect();
        self.not_found = self.visible.is_empty();
        self.clamp_selection();
    }

    /// Shows every entry without touching the selected filter control.
    pub fn show_all(&mut self) {
        self.visible = self.entries.clone();
        self.not_found = false;
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.selected_index >= self.visible.len() {
            self.selected_index = 0;
        }
    }
}

/// A record as it was on screen when its load completed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShownDetail {
    pub record: DetailRecord,
    pub shiny: bool,
}

/// Detail screen state; exists only while the detail route is open.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailPage {
    pub session: NavigationSession,
    pub shown: Option<ShownDetail>,
    /// Types of the last record that produced a coloring.
    pub theme_types: Vec<String>,
    pub loading: bool,
}

impl DetailPage {
    pub fn new(id: u16) -> Self {
        Self {
            session: NavigationSession::new(id),
            shown: None,
            theme_types: Vec::new(),
            loading: false,
        }
    }

    pub fn theme(&self) -> Option<TypeTheme> {
        if self.theme_types.is_empty() {
            return None;
        }
        TypeTheme::for_types(&self.theme_types)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    /// Location history; the last entry is the current location.
    pub history: Vec<Route>,
    pub catalog: CatalogState,
    pub flags: CaughtFlags,
    pub detail: Option<DetailPage>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Route::Catalog, CaughtFlags::default())
    }
}

impl AppState {
    pub fn new(route: Route, flags: CaughtFlags) -> Self {
        Self {
            terminal_size: (80, 24),
            history: vec![route],
            catalog: CatalogState::default(),
            flags,
            detail: None,
            tick: 0,
        }
    }

    pub fn route(&self) -> Route {
        self.history.last().copied().unwrap_or_default()
    }

    pub fn push_location(&mut self, route: Route) {
        if self.route() != route {
            self.history.push(route);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.catalog.loading
            || self.catalog.pending_open.is_some()
            || self.detail.as_ref().is_some_and(|page| page.loading)
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let session = self.detail.as_ref().map(|page| &page.session);
        vec![
            DebugSection::new("Location")
                .entry("route", ron_string(&self.route()))
                .entry("history", ron_string(&self.history.len())),
            DebugSection::new("Catalog")
                .entry("total", ron_string(&self.catalog.entries.len()))
                .entry("visible", ron_string(&self.catalog.visible.len()))
                .entry("selected", ron_string(&self.catalog.selected_index))
                .entry("caught", ron_string(&self.flags.caught_count()))
                .entry("loading", ron_string(&self.catalog.loading))
                .entry("pending_open", ron_string(&self.catalog.pending_open)),
            DebugSection::new("Filters")
                .entry("mode", ron_string(&self.catalog.filter))
                .entry("search", ron_string(&self.catalog.search.query))
                .entry("search_active", ron_string(&self.catalog.search.active))
                .entry("not_found", ron_string(&self.catalog.not_found)),
            DebugSection::new("Detail")
                .entry("current_id", ron_string(&session.map(|s| s.current_id())))
                .entry("shiny", ron_string(&session.map(|s| s.shiny())))
                .entry("token", ron_string(&session.map(|s| s.latest_token())))
                .entry(
                    "loading",
                    ron_string(&self.detail.as_ref().map(|page| page.loading)),
                ),
        ]
    }
}
