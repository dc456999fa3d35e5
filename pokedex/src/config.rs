use std::path::PathBuf;

use crate::api::{ApiClient, DEFAULT_API_BASE};
use crate::error::ValidationError;
use crate::navigator::{parse_requested_id, Route};
use crate::storage;

pub const APP_DIR: &str = "pokedex";

/// Settings resolved from the command line and environment.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub api_base: String,
    pub data_dir: PathBuf,
    pub cache_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::resolve(None, None, None, false)
    }
}

impl RuntimeConfig {
    pub fn resolve(
        api_base: Option<String>,
        data_dir: Option<PathBuf>,
        cache_dir: Option<PathBuf>,
        no_cache: bool,
    ) -> Self {
        let data_dir = data_dir
            .or_else(|| dirs_next::data_local_dir().map(|dir| dir.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from("."));
        let cache_dir = if no_cache {
            None
        } else {
            cache_dir
                .or_else(|| dirs_next::cache_dir().map(|dir| dir.join(APP_DIR)))
                .or_else(|| Some(data_dir.join("cache")))
        };
        Self {
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            data_dir,
            cache_dir,
        }
    }

    pub fn store_path(&self) -> PathBuf {
        storage::store_path(&self.data_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("pokedex.log")
    }

    pub fn api_client(&self) -> ApiClient {
        ApiClient::new(self.api_base.clone(), self.cache_dir.clone())
    }
}

/// Initial route from `--location` or `--id`. A bad id redirects to the catalog root.
pub fn initial_route(location: Option<&str>, id: Option<&str>) -> Route {
    let resolved = match (location, id) {
        (Some(location), _) => Route::resolve(location),
        (None, Some(raw)) => parse_requested_id(Some(raw)).map(|id| Route::Detail { id }),
        (None, None) => Ok(Route::Catalog),
    };
    resolved.unwrap_or_else(|err: ValidationError| {
        tracing::warn!(%err, "invalid detail id, redirecting to catalog");
        Route::Catalog
    })
}
