//! Type colors for the detail screen.

use ratatui::style::Color;

pub const TYPE_COLORS: [(&str, &str); 18] = [
    ("normal", "#A8A878"),
    ("fire", "#F08030"),
    ("water", "#6890F0"),
    ("electric", "#F8D030"),
    ("grass", "#78C850"),
    ("ice", "#98D8D8"),
    ("fighting", "#C03028"),
    ("poison", "#A040A0"),
    ("ground", "#E0C068"),
    ("flying", "#A890F0"),
    ("psychic", "#F85888"),
    ("bug", "#A8B820"),
    ("rock", "#B8A038"),
    ("ghost", "#705898"),
    ("dragon", "#7038F8"),
    ("dark", "#705848"),
    ("steel", "#B8B8D0"),
    ("fairy", "#EE99AC"),
];

pub fn type_color(type_name: &str) -> Option<&'static str> {
    TYPE_COLORS
        .iter()
        .find(|(name, _)| *name == type_name)
        .map(|(_, hex)| *hex)
}

/// Colors applied to the detail screen for a record's types.
///
/// `primary` drives background, border and stat coloring. `secondary` only
/// ever reaches the second type badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeTheme {
    pub primary: &'static str,
    pub secondary: Option<&'static str>,
}

impl TypeTheme {
    /// `None` means "leave the current coloring as it is".
    pub fn for_types(types: &[String]) -> Option<TypeTheme> {
        match types {
            [main] => Some(TypeTheme {
                primary: type_color(main)?,
                secondary: None,
            }),
            [main, sub] => Some(TypeTheme {
                primary: type_color(main)?,
                secondary: type_color(sub),
            }),
            _ => {
                tracing::warn!(count = types.len(), "unexpected number of types");
                None
            }
        }
    }

    /// Badge color for the type at `index`.
    pub fn badge(&self, index: usize) -> &'static str {
        match (index, self.secondary) {
            (1, Some(secondary)) => secondary,
            _ => self.primary,
        }
    }
}

pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn hex_color(hex: &str) -> Option<Color> {
    hex_to_rgb(hex).map(|(r, g, b)| Color::Rgb(r, g, b))
}
