//! Persistent "caught" flags.
//!
//! Flags live in a flat string key-value map (`checkbox-{id}` -> `"true"` / `"false"`)
//! stored as a JSON object. A missing key means not caught.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const STORE_FILE: &str = "caught.json";

pub fn caught_key(id: u16) -> String {
    format!("checkbox-{id}")
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaughtFlags {
    values: BTreeMap<String, String>,
}

impl CaughtFlags {
    pub fn is_caught(&self, id: u16) -> bool {
        self.values
            .get(&caught_key(id))
            .is_some_and(|value| value == "true")
    }

    pub fn set_caught(&mut self, id: u16, caught: bool) {
        self.values.insert(caught_key(id), caught.to_string());
    }

    pub fn raw(&self, id: u16) -> Option<&str> {
        self.values.get(&caught_key(id)).map(String::as_str)
    }

    pub fn caught_count(&self) -> usize {
        self.values.values().filter(|value| *value == "true").count()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE)
}

/// Reads the flag file. A missing file is an empty store.
pub fn load_flags(path: &Path) -> Result<CaughtFlags, StoreError> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Ok(CaughtFlags::default());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };
    serde_json::from_str(&json).map_err(|source| StoreError::Corrupted {
        path: path.display().to_string(),
        source,
    })
}

/// Writes the whole map, replacing the previous file in one rename.
pub fn save_flags(path: &Path, flags: &CaughtFlags) -> Result<(), StoreError> {
    let io_error = |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let json = serde_json::to_string_pretty(flags).map_err(|source| StoreError::Corrupted {
        path: path.display().to_string(),
        source,
    })?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(io_error)?;
    std::fs::rename(&tmp, path).map_err(io_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_to_uncaught() {
        let flags = CaughtFlags::default();
        assert!(!flags.is_caught(1));
        assert_eq!(flags.raw(1), None);
    }

    #[test]
    fn flags_are_stored_as_literal_strings() {
        let mut flags = CaughtFlags::default();
        flags.set_caught(25, true);
        flags.set_caught(26, false);

        assert_eq!(flags.raw(25), Some("true"));
        assert_eq!(flags.raw(26), Some("false"));
        assert_eq!(flags.caught_count(), 1);
        assert_eq!(
            serde_json::to_string(&flags).unwrap(),
            r#"{"checkbox-25":"true","checkbox-26":"false"}"#
        );
    }

    #[test]
    fn save_then_load_keeps_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(dir.path());
        let mut flags = CaughtFlags::default();
        flags.set_caught(151, true);

        save_flags(&path, &flags).unwrap();

        let loaded = load_flags(&path).unwrap();
        assert!(loaded.is_caught(151));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let flags = load_flags(&dir.path().join("nope.json")).unwrap();
        assert!(flags.is_empty());
    }

    #[test]
    fn corrupted_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(dir.path());
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(load_flags(&path), Err(StoreError::Corrupted { .. })));
    }
}
