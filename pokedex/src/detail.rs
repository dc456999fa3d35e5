use serde::{Deserialize, Serialize};

/// Flavor text is taken from this game version only.
pub const FLAVOR_VERSION: &str = "firered";
pub const FLAVOR_LANGUAGE: &str = "en";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatValue {
    pub key: String,
    pub base: u16,
}

/// Everything the detail screen shows for one id. Rebuilt on every load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: u16,
    pub name: String,
    pub types: Vec<String>,
    /// Hectograms, as reported by the API.
    pub weight: u16,
    /// Decimetres, as reported by the API.
    pub height: u16,
    pub abilities: Vec<String>,
    pub stats: Vec<StatValue>,
    pub flavor_text: String,
}

/// A flavor text entry reduced to the fields used for selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlavorEntry<'a> {
    pub language: &'a str,
    pub version: &'a str,
    pub text: &'a str,
}

/// First English entry for [`FLAVOR_VERSION`], trimmed; empty when none matches.
pub fn select_flavor_text<'a>(entries: impl IntoIterator<Item = FlavorEntry<'a>>) -> String {
    entries
        .into_iter()
        .find(|entry| entry.language == FLAVOR_LANGUAGE && entry.version == FLAVOR_VERSION)
        .map(|entry| entry.text.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry<'a>(language: &'a str, version: &'a str, text: &'a str) -> FlavorEntry<'a> {
        FlavorEntry {
            language,
            version,
            text,
        }
    }

    #[test]
    fn first_matching_entry_wins() {
        let text = select_flavor_text([
            entry("en", "red", "red text"),
            entry("ja", "firered", "japanese"),
            entry("en", "firered", "  first match \n"),
            entry("en", "firered", "second match"),
        ]);
        assert_eq!(text, "first match");
    }

    #[test]
    fn missing_version_yields_empty_text() {
        let text = select_flavor_text([entry("en", "sword", "galar")]);
        assert_eq!(text, "");
    }
}
