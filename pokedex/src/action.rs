use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, FilterMode};
use crate::detail::DetailRecord;
use crate::error::FetchError;
use crate::navigator::RequestToken;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    CatalogDidLoad(Vec<CatalogEntry>),
    CatalogDidError(FetchError),

    SelectionMove(i16),
    SelectionPage(i16),
    CatalogSelect(usize),

    SearchStart,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,
    SearchClear,

    FilterSelect(FilterMode),
    FilterReset,

    CaughtToggle,

    EntryOpen,
    EntryPrefetchDidLoad { id: u16 },
    EntryPrefetchDidError { id: u16, error: FetchError },

    DetailDidLoad { token: RequestToken, record: DetailRecord },
    DetailDidError { token: RequestToken, id: u16, error: FetchError },
    DetailPrev,
    DetailNext,
    DetailToggleShiny,
    DetailBack,

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
