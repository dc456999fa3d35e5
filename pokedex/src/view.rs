//! Pure mapping from state to what the screens display.

use crate::catalog::{sprite_url, CatalogEntry};
use crate::state::{AppState, DetailPage};
use crate::storage::CaughtFlags;
use crate::theme::TypeTheme;

pub const STAT_PROGRESS_MAX: u16 = 200;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogRow {
    pub id: u16,
    pub number: String,
    pub name: String,
    pub image_url: String,
    pub caught: bool,
}

pub fn catalog_row(entry: &CatalogEntry, flags: &CaughtFlags) -> CatalogRow {
    CatalogRow {
        id: entry.id,
        number: format!("#{}", entry.id),
        name: entry.name.clone(),
        image_url: entry.image_url(),
        caught: flags.is_caught(entry.id),
    }
}

pub fn catalog_rows(state: &AppState) -> Vec<CatalogRow> {
    state
        .catalog
        .visible
        .iter()
        .map(|entry| catalog_row(entry, &state.flags))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeBadge {
    pub name: String,
    pub color: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatRow {
    pub label: String,
    pub value: String,
    pub progress: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub number: String,
    pub sprite_url: String,
    pub types: Vec<TypeBadge>,
    pub weight: String,
    pub height: String,
    pub ability: Option<String>,
    pub stats: Vec<StatRow>,
    pub flavor_text: String,
    pub theme: Option<TypeTheme>,
    pub has_prev: bool,
    pub has_next: bool,
}

/// `None` until the first load of the page has completed.
pub fn detail_view(page: &DetailPage) -> Option<DetailView> {
    let shown = page.shown.as_ref()?;
    let record = &shown.record;
    let theme = page.theme();
    // Badges are only colored when this record's own types produced the theme.
    let record_theme = if (1..=2).contains(&record.types.len()) {
        theme
    } else {
        None
    };
    let types = record
        .types
        .iter()
        .enumerate()
        .map(|(index, name)| TypeBadge {
            name: name.clone(),
            color: record_theme.map(|theme| theme.badge(index)),
        })
        .collect();
    Some(DetailView {
        title: capitalize(&record.name),
        number: format!("#{:03}", record.id),
        sprite_url: sprite_url(record.id, shown.shiny),
        types,
        weight: format!("{}kg", tenths(record.weight)),
        height: format!("{}m", tenths(record.height)),
        ability: record.abilities.first().cloned(),
        stats: record
            .stats
            .iter()
            .map(|stat| StatRow {
                label: stat_label(&stat.key),
                value: format!("{:03}", stat.base),
                progress: stat.base.min(STAT_PROGRESS_MAX),
            })
            .collect(),
        flavor_text: record.flavor_text.clone(),
        theme,
        has_prev: page.session.has_prev(),
        has_next: page.session.has_next(),
    })
}

/// First letter upper case, the rest lower case.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Renders a value in tenths the way a plain division prints it: `69` -> `6.9`, `100` -> `10`.
pub fn tenths(value: u16) -> String {
    if value % 10 == 0 {
        (value / 10).to_string()
    } else {
        format!("{}.{}", value / 10, value % 10)
    }
}

pub fn stat_label(key: &str) -> String {
    match key {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SATK".to_string(),
        "special-defense" => "SDEF".to_string(),
        "speed" => "SPD".to_string(),
        _ => key.to_ascii_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::{DetailRecord, StatValue};
    use crate::state::ShownDetail;
    use pretty_assertions::assert_eq;

    fn page_with(record: DetailRecord, shiny: bool) -> DetailPage {
        let mut page = DetailPage::new(record.id);
        page.theme_types = record.types.clone();
        page.shown = Some(ShownDetail { record, shiny });
        page
    }

    fn charizard() -> DetailRecord {
        DetailRecord {
            id: 6,
            name: "charizard".into(),
            types: vec!["fire".into(), "flying".into()],
            weight: 905,
            height: 17,
            abilities: vec!["blaze".into(), "solar-power".into()],
            stats: vec![
                StatValue { key: "hp".into(), base: 78 },
                StatValue { key: "special-attack".into(), base: 109 },
                StatValue { key: "speed".into(), base: 250 },
            ],
            flavor_text: "Spits fire.".into(),
        }
    }

    #[test]
    fn detail_view_formats_record() {
        let view = detail_view(&page_with(charizard(), false)).unwrap();

        assert_eq!(view.title, "Charizard");
        assert_eq!(view.number, "#006");
        assert!(view.sprite_url.ends_with("/official-artwork/6.png"));
        assert_eq!(view.weight, "90.5kg");
        assert_eq!(view.height, "1.7m");
        assert_eq!(view.ability.as_deref(), Some("blaze"));
        assert_eq!(
            view.stats,
            vec![
                StatRow { label: "HP".into(), value: "078".into(), progress: 78 },
                StatRow { label: "SATK".into(), value: "109".into(), progress: 109 },
                StatRow { label: "SPD".into(), value: "250".into(), progress: 200 },
            ]
        );
        assert_eq!(
            view.types,
            vec![
                TypeBadge { name: "fire".into(), color: Some("#F08030") },
                TypeBadge { name: "flying".into(), color: Some("#A890F0") },
            ]
        );
        assert!(view.has_prev && view.has_next);
    }

    #[test]
    fn shiny_only_changes_sprite() {
        let plain = detail_view(&page_with(charizard(), false)).unwrap();
        let shiny = detail_view(&page_with(charizard(), true)).unwrap();

        assert!(shiny.sprite_url.ends_with("/official-artwork/shiny/6.png"));
        assert_eq!(DetailView { sprite_url: plain.sprite_url.clone(), ..shiny }, plain);
    }

    #[test]
    fn unexpected_type_count_keeps_previous_theme() {
        let mut page = page_with(charizard(), false);
        let mut odd = charizard();
        odd.types = vec!["fire".into(), "water".into(), "grass".into()];
        page.shown = Some(ShownDetail { record: odd, shiny: false });

        let view = detail_view(&page).unwrap();
        assert_eq!(view.theme.map(|theme| theme.primary), Some("#F08030"));
        assert!(view.types.iter().all(|badge| badge.color.is_none()));
    }

    #[test]
    fn formatting_helpers() {
        assert_eq!(tenths(69), "6.9");
        assert_eq!(tenths(100), "10");
        assert_eq!(tenths(4), "0.4");
        assert_eq!(capitalize("mR-mIME"), "Mr-mime");
        assert_eq!(stat_label("defense"), "DEF");
        assert_eq!(stat_label("accuracy"), "ACCURACY");
    }

    #[test]
    fn catalog_row_reads_flag() {
        let mut flags = CaughtFlags::default();
        flags.set_caught(7, true);
        let row = catalog_row(&CatalogEntry::new(7, "squirtle", ""), &flags);

        assert_eq!(row.number, "#7");
        assert!(row.caught);
        assert!(row.image_url.ends_with("/7.png"));
    }
}
