use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::catalog::FilterMode;
use crate::effect::Effect;
use crate::navigator::{Route, MAX_ID};
use crate::state::{AppState, CatalogState, DetailPage, ShownDetail};
use crate::theme::TypeTheme;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => match state.route() {
            Route::Catalog => enter_catalog(state),
            Route::Detail { id } => enter_detail(state, id),
        },

        Action::CatalogDidLoad(entries) => {
            if state.route() != Route::Catalog {
                return DispatchResult::unchanged();
            }
            state.catalog.entries = entries;
            state.catalog.loading = false;
            state.catalog.selected_index = 0;
            state.catalog.show_all();
            DispatchResult::changed()
        }

        Action::CatalogDidError(_) => {
            state.catalog.loading = false;
            DispatchResult::changed()
        }

        Action::SelectionMove(delta) => {
            let next = offset_index(state.catalog.selected_index, delta as i32);
            if state.catalog.set_selected_index(next) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::SelectionPage(pages) => {
            let page = list_page_size(state).max(1) as i32;
            let next = offset_index(state.catalog.selected_index, pages as i32 * page);
            if state.catalog.set_selected_index(next) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::CatalogSelect(index) => {
            if state.catalog.set_selected_index(index) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::SearchStart => {
            if state.catalog.search.active {
                return DispatchResult::unchanged();
            }
            state.catalog.search.active = true;
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            state.catalog.search.active = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.catalog.search.query.push(ch);
            run_search(state)
        }

        Action::SearchBackspace => {
            if state.catalog.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            run_search(state)
        }

        Action::SearchClear => {
            clear_search(&mut state.catalog);
            DispatchResult::changed()
        }

        Action::FilterSelect(mode) => {
            // Every filter control clears the search box before it applies.
            clear_search(&mut state.catalog);
            state.catalog.filter = mode;
            if !mode.uses_search_term() {
                state.catalog.refilter(&state.flags);
            }
            DispatchResult::changed()
        }

        Action::FilterReset => {
            state.catalog.search.query.clear();
            state.catalog.search.active = false;
            state.catalog.filter = FilterMode::None;
            state.catalog.show_all();
            DispatchResult::changed()
        }

        Action::CaughtToggle => {
            let Some(id) = state.catalog.selected_entry().map(|entry| entry.id) else {
                return DispatchResult::unchanged();
            };
            let caught = !state.flags.is_caught(id);
            state.flags.set_caught(id, caught);
            DispatchResult::changed_with(Effect::PersistCaught {
                flags: state.flags.clone(),
            })
        }

        Action::EntryOpen => {
            let Some(id) = state.catalog.selected_entry().map(|entry| entry.id) else {
                return DispatchResult::unchanged();
            };
            state.catalog.pending_open = Some(id);
            DispatchResult::changed_with(Effect::PrefetchDetail { id })
        }

        Action::EntryPrefetchDidLoad { id } => {
            if state.route() != Route::Catalog || state.catalog.pending_open != Some(id) {
                return DispatchResult::unchanged();
            }
            state.catalog.pending_open = None;
            state.push_location(Route::Detail { id });
            enter_detail(state, id)
        }

        Action::EntryPrefetchDidError { id, .. } => {
            if state.catalog.pending_open != Some(id) {
                return DispatchResult::unchanged();
            }
            state.catalog.pending_open = None;
            DispatchResult::changed()
        }

        Action::DetailDidLoad { token, record } => {
            let Some(page) = state.detail.as_mut() else {
                return DispatchResult::unchanged();
            };
            if !page.session.is_current(token) {
                tracing::debug!(%token, id = record.id, "dropping stale detail response");
                return DispatchResult::unchanged();
            }
            let id = record.id;
            if TypeTheme::for_types(&record.types).is_some() {
                page.theme_types = record.types.clone();
            }
            page.session.mark_shown();
            page.shown = Some(ShownDetail {
                record,
                shiny: page.session.shiny(),
            });
            page.loading = false;
            state.push_location(Route::Detail { id });
            DispatchResult::changed()
        }

        Action::DetailDidError { token, .. } => {
            let Some(page) = state.detail.as_mut() else {
                return DispatchResult::unchanged();
            };
            if !page.session.is_current(token) {
                return DispatchResult::unchanged();
            }
            page.session.restore_shown();
            page.loading = false;
            DispatchResult::changed()
        }

        Action::DetailPrev => step_detail(state, -1),

        Action::DetailNext => step_detail(state, 1),

        Action::DetailToggleShiny => {
            let Some(page) = state.detail.as_mut() else {
                return DispatchResult::unchanged();
            };
            page.session.flip_shiny();
            let id = page.session.current_id();
            let token = page.session.begin_load(id, true);
            page.loading = true;
            DispatchResult::changed_with(Effect::LoadDetail { id, token })
        }

        Action::DetailBack => {
            if state.detail.is_none() {
                return DispatchResult::unchanged();
            }
            state.push_location(Route::Catalog);
            enter_catalog(state)
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            if state.is_loading() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Fresh catalog page: drops the detail session and fetches the index.
fn enter_catalog(state: &mut AppState) -> DispatchResult<Effect> {
    state.detail = None;
    state.catalog = CatalogState {
        loading: true,
        ..CatalogState::default()
    };
    DispatchResult::changed_with(Effect::LoadCatalog { limit: MAX_ID })
}

/// Fresh detail page for `id` with its own session.
fn enter_detail(state: &mut AppState, id: u16) -> DispatchResult<Effect> {
    let mut page = DetailPage::new(id);
    let token = page.session.begin_load(id, false);
    page.loading = true;
    state.detail = Some(page);
    DispatchResult::changed_with(Effect::LoadDetail { id, token })
}

fn step_detail(state: &mut AppState, delta: i32) -> DispatchResult<Effect> {
    let Some(page) = state.detail.as_mut() else {
        return DispatchResult::unchanged();
    };
    let Some(id) = page.session.step_target(delta) else {
        return DispatchResult::unchanged();
    };
    let token = page.session.begin_load(id, false);
    page.loading = true;
    DispatchResult::changed_with(Effect::LoadDetail { id, token })
}

fn run_search(state: &mut AppState) -> DispatchResult<Effect> {
    state.catalog.refilter(&state.flags);
    DispatchResult::changed()
}

fn clear_search(catalog: &mut CatalogState) {
    catalog.search.query.clear();
    catalog.search.active = false;
    catalog.show_all();
}

fn offset_index(current: usize, delta: i32) -> usize {
    (current as i64 + delta as i64).max(0) as usize
}

fn list_page_size(state: &AppState) -> usize {
    state.terminal_size.1.saturating_sub(8) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::detail::DetailRecord;
    use crate::navigator::RequestToken;

    fn entries(max: u16) -> Vec<CatalogEntry> {
        (1..=max)
            .map(|id| CatalogEntry::new(id, format!("mon-{id}"), ""))
            .collect()
    }

    fn loaded_catalog() -> AppState {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::CatalogDidLoad(entries(40)));
        state
    }

    fn record(id: u16) -> DetailRecord {
        DetailRecord {
            id,
            name: format!("mon-{id}"),
            types: vec!["water".into()],
            weight: 69,
            height: 7,
            abilities: vec!["torrent".into()],
            stats: Vec::new(),
            flavor_text: String::new(),
        }
    }

    fn detail_token(result: &DispatchResult<Effect>) -> RequestToken {
        match result.effects.as_slice() {
            [Effect::LoadDetail { token, .. }] => *token,
            other => panic!("expected a single LoadDetail, got {other:?}"),
        }
    }

    #[test]
    fn init_on_catalog_requests_index() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);

        assert!(state.catalog.loading);
        assert_eq!(result.effects, vec![Effect::LoadCatalog { limit: MAX_ID }]);
    }

    #[test]
    fn init_on_detail_opens_session() {
        let mut state = AppState::new(Route::Detail { id: 25 }, Default::default());
        let result = reducer(&mut state, Action::Init);

        let page = state.detail.as_ref().unwrap();
        assert_eq!(page.session.current_id(), 25);
        assert!(page.loading);
        assert_eq!(
            result.effects,
            vec![Effect::LoadDetail {
                id: 25,
                token: page.session.latest_token()
            }]
        );
    }

    #[test]
    fn search_applies_selected_mode() {
        let mut state = loaded_catalog();
        reducer(&mut state, Action::FilterSelect(FilterMode::Number));
        reducer(&mut state, Action::SearchStart);
        reducer(&mut state, Action::SearchInput('3'));

        let ids: Vec<u16> = state.catalog.visible.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39]);
        assert!(!state.catalog.not_found);

        reducer(&mut state, Action::SearchInput('x'));
        assert!(state.catalog.visible.is_empty());
        assert!(state.catalog.not_found);

        reducer(&mut state, Action::SearchClear);
        assert_eq!(state.catalog.visible.len(), 40);
        assert!(!state.catalog.not_found);
        assert!(state.catalog.search.query.is_empty());
    }

    #[test]
    fn caught_toggle_persists_every_time() {
        let mut state = loaded_catalog();
        reducer(&mut state, Action::CatalogSelect(4));

        let result = reducer(&mut state, Action::CaughtToggle);
        assert!(state.flags.is_caught(5));
        assert_eq!(
            result.effects,
            vec![Effect::PersistCaught {
                flags: state.flags.clone()
            }]
        );

        let result = reducer(&mut state, Action::CaughtToggle);
        assert!(!state.flags.is_caught(5));
        assert_eq!(state.flags.raw(5), Some("false"));
        assert_eq!(result.effects.len(), 1);
    }

    #[test]
    fn filter_select_clears_search_box() {
        let mut state = loaded_catalog();
        reducer(&mut state, Action::FilterSelect(FilterMode::Name));
        reducer(&mut state, Action::SearchInput('m'));
        reducer(&mut state, Action::FilterSelect(FilterMode::Uncaught));

        assert!(state.catalog.search.query.is_empty());
        assert_eq!(state.catalog.visible.len(), 40);
    }

    #[test]
    fn stale_detail_is_dropped() {
        let mut state = AppState::new(Route::Detail { id: 10 }, Default::default());
        let first = detail_token(&reducer(&mut state, Action::Init));
        let second = detail_token(&reducer(&mut state, Action::DetailNext));

        let result = reducer(
            &mut state,
            Action::DetailDidLoad {
                token: second,
                record: record(11),
            },
        );
        assert!(result.changed);

        let result = reducer(
            &mut state,
            Action::DetailDidLoad {
                token: first,
                record: record(10),
            },
        );
        assert!(!result.changed);
        let shown = state.detail.as_ref().unwrap().shown.as_ref().unwrap();
        assert_eq!(shown.record.id, 11);
        assert_eq!(state.route(), Route::Detail { id: 11 });
    }

    #[test]
    fn detail_error_leaves_view_unchanged() {
        let mut state = AppState::new(Route::Detail { id: 10 }, Default::default());
        let token = detail_token(&reducer(&mut state, Action::Init));
        reducer(&mut state, Action::DetailDidLoad { token, record: record(10) });

        let token = detail_token(&reducer(&mut state, Action::DetailNext));
        reducer(
            &mut state,
            Action::DetailDidError {
                token,
                id: 11,
                error: crate::error::FetchError::Request("offline".into()),
            },
        );

        let page = state.detail.as_ref().unwrap();
        assert!(!page.loading);
        assert_eq!(page.shown.as_ref().unwrap().record.id, 10);
    }

    #[test]
    fn back_discards_session() {
        let mut state = AppState::new(Route::Detail { id: 3 }, Default::default());
        reducer(&mut state, Action::Init);
        let result = reducer(&mut state, Action::DetailBack);

        assert!(state.detail.is_none());
        assert_eq!(state.route(), Route::Catalog);
        assert_eq!(result.effects, vec![Effect::LoadCatalog { limit: MAX_ID }]);
    }
}
