use crate::navigator::RequestToken;
use crate::storage::CaughtFlags;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadCatalog { limit: u16 },
    /// Confirms both detail resources exist before leaving the catalog.
    PrefetchDetail { id: u16 },
    LoadDetail { id: u16, token: RequestToken },
    PersistCaught { flags: CaughtFlags },
}
