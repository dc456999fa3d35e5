//! Detail page session: which id is authoritative, shiny mode, and the
//! request tokens used to drop stale responses.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_ID: u16 = 1;
pub const MAX_ID: u16 = 386;

/// Parses the raw `id` query value. Anything that is not an integer in
/// `MIN_ID..=MAX_ID` is rejected; callers redirect to the catalog root.
pub fn parse_requested_id(raw: Option<&str>) -> Result<u16, ValidationError> {
    let raw = raw.ok_or(ValidationError::Missing)?;
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ValidationError::NotNumeric(raw.to_string()));
    }
    let id: i64 = raw
        .parse()
        .map_err(|_| ValidationError::NotNumeric(raw.to_string()))?;
    if id < i64::from(MIN_ID) || id > i64::from(MAX_ID) {
        return Err(ValidationError::OutOfRange(id));
    }
    Ok(id as u16)
}

/// Monotonic identity of one detail load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owned by the detail page for as long as it is open.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationSession {
    current_id: u16,
    shiny: bool,
    latest: RequestToken,
    /// Id and shiny mode of the record on screen, once one has loaded.
    shown: Option<(u16, bool)>,
}

impl NavigationSession {
    pub fn new(id: u16) -> Self {
        Self {
            current_id: id,
            shiny: false,
            latest: RequestToken::default(),
            shown: None,
        }
    }

    pub fn current_id(&self) -> u16 {
        self.current_id
    }

    pub fn shiny(&self) -> bool {
        self.shiny
    }

    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    /// Makes `id` authoritative and issues the token its load must present.
    pub fn begin_load(&mut self, id: u16, preserve_shiny: bool) -> RequestToken {
        if !preserve_shiny {
            self.shiny = false;
        }
        self.current_id = id;
        self.latest = RequestToken(self.latest.0 + 1);
        self.latest
    }

    /// True only for the most recently issued token.
    pub fn is_current(&self, token: RequestToken) -> bool {
        token == self.latest
    }

    /// Records that the load for the current id completed and is on screen.
    pub fn mark_shown(&mut self) {
        self.shown = Some((self.current_id, self.shiny));
    }

    /// Rolls a failed load back to the record still on screen.
    pub fn restore_shown(&mut self) {
        if let Some((id, shiny)) = self.shown {
            self.current_id = id;
            self.shiny = shiny;
        }
    }

    /// Target of a prev/next step, or `None` at the boundaries.
    pub fn step_target(&self, delta: i32) -> Option<u16> {
        let target = i32::from(self.current_id) + delta;
        if target < i32::from(MIN_ID) || target > i32::from(MAX_ID) {
            return None;
        }
        Some(target as u16)
    }

    pub fn has_prev(&self) -> bool {
        self.step_target(-1).is_some()
    }

    pub fn has_next(&self) -> bool {
        self.step_target(1).is_some()
    }

    pub fn flip_shiny(&mut self) -> bool {
        self.shiny = !self.shiny;
        self.shiny
    }
}

/// Addressable location of the app.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    #[default]
    Catalog,
    Detail { id: u16 },
}

impl Route {
    /// Resolves a location string such as `detail?id=25` or `/`.
    ///
    /// A detail location with a bad id resolves to the catalog root.
    pub fn resolve(location: &str) -> Result<Route, ValidationError> {
        let location = location.trim().trim_start_matches("./");
        let Some((path, query)) = location.split_once('?') else {
            return Ok(Route::Catalog);
        };
        if path.trim_end_matches(".html") != "detail" {
            return Ok(Route::Catalog);
        }
        let id = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "id")
            .map(|(_, value)| value);
        parse_requested_id(id).map(|id| Route::Detail { id })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Catalog => write!(f, "/"),
            Route::Detail { id } => write!(f, "detail?id={id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_full_range() {
        for id in MIN_ID..=MAX_ID {
            assert_eq!(parse_requested_id(Some(&id.to_string())), Ok(id));
        }
    }

    #[test]
    fn parse_rejects_bad_values() {
        assert_eq!(parse_requested_id(Some("0")), Err(ValidationError::OutOfRange(0)));
        assert_eq!(parse_requested_id(Some("387")), Err(ValidationError::OutOfRange(387)));
        assert_eq!(parse_requested_id(Some("-4")), Err(ValidationError::OutOfRange(-4)));
        assert_eq!(
            parse_requested_id(Some("pikachu")),
            Err(ValidationError::NotNumeric("pikachu".into()))
        );
        assert_eq!(parse_requested_id(None), Err(ValidationError::Missing));
        for raw in ["+25", " 25", "25 ", "12abc", "", "-"] {
            assert_eq!(
                parse_requested_id(Some(raw)),
                Err(ValidationError::NotNumeric(raw.into())),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn later_load_supersedes_earlier() {
        let mut session = NavigationSession::new(1);
        let first = session.begin_load(1, false);
        let second = session.begin_load(2, false);

        assert!(!session.is_current(first));
        assert!(session.is_current(second));
        assert_eq!(session.current_id(), 2);
    }

    #[test]
    fn shiny_resets_unless_preserved() {
        let mut session = NavigationSession::new(10);
        session.flip_shiny();
        session.begin_load(10, true);
        assert!(session.shiny());
        session.begin_load(11, false);
        assert!(!session.shiny());
    }

    #[test]
    fn failed_load_restores_shown_record() {
        let mut session = NavigationSession::new(MAX_ID - 1);
        session.begin_load(MAX_ID - 1, false);
        session.mark_shown();
        session.begin_load(MAX_ID, false);
        assert!(!session.has_next());

        session.restore_shown();
        assert_eq!(session.current_id(), MAX_ID - 1);
        assert!(session.has_next());
        assert_eq!(session.step_target(-1), Some(MAX_ID - 2));
    }

    #[test]
    fn restore_before_first_load_keeps_target() {
        let mut session = NavigationSession::new(25);
        session.flip_shiny();
        session.begin_load(25, true);
        session.restore_shown();
        assert_eq!(session.current_id(), 25);
        assert!(session.shiny());
    }

    #[test]
    fn steps_stop_at_boundaries() {
        let first = NavigationSession::new(MIN_ID);
        assert_eq!(first.step_target(-1), None);
        assert_eq!(first.step_target(1), Some(2));
        assert!(!first.has_prev());

        let last = NavigationSession::new(MAX_ID);
        assert_eq!(last.step_target(1), None);
        assert!(!last.has_next());
    }

    #[test]
    fn routes_round_trip_through_location() {
        assert_eq!(Route::resolve("detail?id=25"), Ok(Route::Detail { id: 25 }));
        assert_eq!(Route::resolve("./detail.html?id=7"), Ok(Route::Detail { id: 7 }));
        assert_eq!(Route::resolve("/"), Ok(Route::Catalog));
        assert_eq!(Route::resolve("index.html"), Ok(Route::Catalog));
        assert!(Route::resolve("detail?id=999").is_err());
        assert!(Route::resolve("detail?name=pikachu").is_err());
        assert_eq!(Route::Detail { id: 25 }.to_string(), "detail?id=25");
    }
}
