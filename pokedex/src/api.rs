use std::path::{Path, PathBuf};

use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::catalog::CatalogEntry;
use crate::detail::{select_flavor_text, DetailRecord, FlavorEntry, StatValue};
use crate::error::FetchError;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    height: u16,
    weight: u16,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonSpeciesResponse {
    flavor_text_entries: Vec<FlavorTextEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct FlavorTextEntry {
    flavor_text: String,
    language: NamedResource,
    version: NamedResource,
}

/// PokeAPI client with an optional on-disk response cache.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base: String,
    cache_root: Option<PathBuf>,
    http: reqwest::Client,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, None)
    }
}

impl ApiClient {
    pub fn new(base: impl Into<String>, cache_root: Option<PathBuf>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            cache_root,
            http: reqwest::Client::new(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// The first `limit` entries of the index; ids follow list position.
    pub async fn fetch_catalog(&self, limit: u16) -> Result<Vec<CatalogEntry>, FetchError> {
        let url = format!("{}/pokemon?limit={limit}", self.base);
        let bytes = self.fetch_bytes_cached(&url).await?;
        self.decode(&url, &bytes).await.map(catalog_from_list)
    }

    /// Detail and species for `id`, requested together; fails if either fails.
    pub async fn fetch_detail(&self, id: u16) -> Result<DetailRecord, FetchError> {
        let pokemon_url = format!("{}/pokemon/{id}", self.base);
        let species_url = format!("{}/pokemon-species/{id}", self.base);
        let (pokemon, species) = tokio::try_join!(
            self.fetch_json::<PokemonResponse>(&pokemon_url),
            self.fetch_json::<PokemonSpeciesResponse>(&species_url),
        )?;
        Ok(record_from_responses(pokemon, species))
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let bytes = self.fetch_bytes_cached(url).await?;
        self.decode(url, &bytes).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        bytes: &[u8],
    ) -> Result<T, FetchError> {
        match serde_json::from_slice(bytes) {
            Ok(value) => Ok(value),
            Err(err) => {
                if let Some(path) = self.cache_path(url) {
                    evict_cache(&path).await;
                }
                Err(err.into())
            }
        }
    }

    async fn fetch_bytes_cached(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let cache_path = self.cache_path(url);
        if let Some(path) = cache_path.as_deref() {
            if let Some(bytes) = read_cache(path).await {
                tracing::debug!(url, "cache hit");
                return Ok(bytes);
            }
        }

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?.to_vec();
        if let Some(path) = cache_path.as_deref() {
            write_cache(path, &bytes).await;
        }
        Ok(bytes)
    }

    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        let root = self.cache_root.as_ref()?;
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hex::encode(hasher.finalize());
        Some(root.join("http").join(digest))
    }
}

fn catalog_from_list(response: ListResponse) -> Vec<CatalogEntry> {
    response
        .results
        .into_iter()
        .enumerate()
        .map(|(index, entry)| CatalogEntry {
            id: index as u16 + 1,
            name: entry.name,
            url: entry.url,
        })
        .collect()
}

fn record_from_responses(pokemon: PokemonResponse, species: PokemonSpeciesResponse) -> DetailRecord {
    let flavor_text = select_flavor_text(species.flavor_text_entries.iter().map(|entry| {
        FlavorEntry {
            language: &entry.language.name,
            version: &entry.version.name,
            text: &entry.flavor_text,
        }
    }));
    DetailRecord {
        id: pokemon.id,
        name: pokemon.name,
        types: pokemon
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        weight: pokemon.weight,
        height: pokemon.height,
        abilities: pokemon
            .abilities
            .into_iter()
            .map(|slot| slot.ability.name)
            .collect(),
        stats: pokemon
            .stats
            .into_iter()
            .map(|slot| StatValue {
                key: slot.stat.name,
                base: slot.base_stat,
            })
            .collect(),
        flavor_text,
    }
}

async fn read_cache(path: &Path) -> Option<Vec<u8>> {
    fs::read(path).await.ok()
}

async fn write_cache(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent).await {
            tracing::debug!(dir = %parent.display(), %err, "failed to create response cache dir");
            return;
        }
    }
    if let Err(err) = fs::write(path, bytes).await {
        tracing::debug!(path = %path.display(), %err, "failed to write response cache");
    }
}

async fn evict_cache(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "evicted undecodable cache entry"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "failed to evict response cache entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "types": [{"slot": 1, "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}}],
        "stats": [
            {"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": ""}},
            {"base_stat": 55, "effort": 0, "stat": {"name": "attack", "url": ""}}
        ],
        "abilities": [
            {"ability": {"name": "static", "url": ""}, "is_hidden": false, "slot": 1},
            {"ability": {"name": "lightning-rod", "url": ""}, "is_hidden": true, "slot": 3}
        ],
        "moves": []
    }"#;

    const PIKACHU_SPECIES: &str = r#"{
        "flavor_text_entries": [
            {"flavor_text": "Red text", "language": {"name": "en", "url": ""}, "version": {"name": "red", "url": ""}},
            {"flavor_text": "It stores electricity\nin its cheeks. ", "language": {"name": "en", "url": ""}, "version": {"name": "firered", "url": ""}}
        ]
    }"#;

    #[test]
    fn catalog_ids_follow_list_order() {
        let response: ListResponse = serde_json::from_str(
            r#"{"count": 1302, "next": null, "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
            ]}"#,
        )
        .unwrap();

        let entries = catalog_from_list(response);
        assert_eq!(
            entries,
            vec![
                CatalogEntry::new(1, "bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/"),
                CatalogEntry::new(2, "ivysaur", "https://pokeapi.co/api/v2/pokemon/2/"),
            ]
        );
    }

    #[test]
    fn detail_record_merges_both_resources() {
        let pokemon: PokemonResponse = serde_json::from_str(PIKACHU).unwrap();
        let species: PokemonSpeciesResponse = serde_json::from_str(PIKACHU_SPECIES).unwrap();

        let record = record_from_responses(pokemon, species);

        assert_eq!(record.id, 25);
        assert_eq!(record.types, vec!["electric".to_string()]);
        assert_eq!(record.abilities, vec!["static".to_string(), "lightning-rod".to_string()]);
        assert_eq!(
            record.stats,
            vec![
                StatValue { key: "hp".into(), base: 35 },
                StatValue { key: "attack".into(), base: 55 },
            ]
        );
        assert_eq!(record.flavor_text, "It stores electricity\nin its cheeks.");
    }

    #[test]
    fn cache_path_is_stable_per_url() {
        let client = ApiClient::new("https://example.test/api/", Some(PathBuf::from("/tmp/cache")));
        assert_eq!(client.base(), "https://example.test/api");
        let first = client.cache_path("https://example.test/api/pokemon/1").unwrap();
        let again = client.cache_path("https://example.test/api/pokemon/1").unwrap();
        let other = client.cache_path("https://example.test/api/pokemon/2").unwrap();
        assert_eq!(first, again);
        assert_ne!(first, other);
        assert!(ApiClient::new(DEFAULT_API_BASE, None).cache_path("x").is_none());
    }

    #[tokio::test]
    async fn undecodable_cache_entry_is_evicted() {
        let dir = tempfile::tempdir().unwrap();
        let client = ApiClient::new(DEFAULT_API_BASE, Some(dir.path().to_path_buf()));
        let url = format!("{DEFAULT_API_BASE}/pokemon?limit=386");
        let path = client.cache_path(&url).unwrap();
        write_cache(&path, b"<html>rate limited</html>").await;
        assert!(path.exists());

        let result = client
            .decode::<ListResponse>(&url, b"<html>rate limited</html>")
            .await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
        assert!(!path.exists());
        evict_cache(&path).await;
    }

    #[tokio::test]
    async fn cache_write_gives_up_when_dir_cannot_be_created() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not a dir").unwrap();
        let path = blocker.join("http").join("entry");

        write_cache(&path, b"{}").await;

        assert!(read_cache(&path).await.is_none());
        assert!(blocker.is_file());
    }
}
