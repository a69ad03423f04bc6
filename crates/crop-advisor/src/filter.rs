//! Cascading choice lists.
//!
//! Each level is narrowed by every previous selection. Matching happens on the
//! normalized shadow values, so `" PUNJAB"` selects the same rows as `"Punjab"`;
//! returned labels are always display values from the source rows.

use crate::dataset::CropDataset;
use crate::utils::{distinct_non_blank, is_blank, normalize};
use serde::Serialize;
use std::collections::HashSet;

/// Label of the non-interactive placeholder shown for an empty choice list.
pub const NO_OPTIONS: &str = "No options";

/// Caller-facing choice list.
///
/// An empty list is never handed out; it becomes [`Choices::NoOptions`], which
/// must be treated as "no valid choice" rather than a category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "snake_case")]
pub enum Choices {
    Options(Vec<String>),
    NoOptions,
}

impl Choices {
    pub fn from_values(values: Vec<String>) -> Self {
        let values: Vec<String> = values.into_iter().filter(|v| !is_blank(v)).collect();
        if values.is_empty() {
            Choices::NoOptions
        } else {
            Choices::Options(values)
        }
    }

    /// Whether a real choice can be made.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Choices::Options(_))
    }

    /// Selectable values; empty for the sentinel.
    pub fn options(&self) -> &[String] {
        match self {
            Choices::Options(values) => values,
            Choices::NoOptions => &[],
        }
    }

    /// Labels to display, including the sentinel placeholder.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Choices::Options(values) => values.iter().map(String::as_str).collect(),
            Choices::NoOptions => vec![NO_OPTIONS],
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.options().iter().any(|v| v == value)
    }
}

impl CropDataset {
    /// Distinct states, one display label per normalized value, sorted.
    pub fn states(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut states: Vec<String> = self
            .records()
            .iter()
            .filter(|r| !is_blank(&r.state) && seen.insert(r.state_key.as_str()))
            .map(|r| r.state.clone())
            .collect();
        states.sort();
        states
    }

    /// Districts of `state`, sorted.
    ///
    /// When several spellings share a normalized district, the spelling of the
    /// first row in the whole table with that district is shown, whatever its
    /// state.
    pub fn districts(&self, state: &str) -> Vec<String> {
        let state_key = normalize(state);
        let in_state: HashSet<&str> = self
            .records()
            .iter()
            .filter(|r| r.matches_state(&state_key) && !is_blank(&r.district))
            .map(|r| r.district_key.as_str())
            .collect();

        let mut seen = HashSet::new();
        let mut districts: Vec<String> = self
            .records()
            .iter()
            .filter(|r| in_state.contains(r.district_key.as_str()) && !is_blank(&r.district))
            .filter(|r| seen.insert(r.district_key.as_str()))
            .map(|r| r.district.clone())
            .collect();
        districts.sort();
        districts
    }

    /// Distinct season labels among rows of `state` and `district`, sorted.
    pub fn seasons(&self, state: &str, district: &str) -> Vec<String> {
        let (state_key, district_key) = (normalize(state), normalize(district));
        let mut seasons = distinct_non_blank(
            self.records()
                .iter()
                .filter(|r| r.matches_district(&state_key, &district_key))
                .map(|r| r.season.as_str()),
        );
        seasons.sort();
        seasons
    }

    /// Distinct irrigation labels among rows of `state`, `district` and `season`, sorted.
    pub fn irrigations(&self, state: &str, district: &str, season: &str) -> Vec<String> {
        let (state_key, district_key, season_key) =
            (normalize(state), normalize(district), normalize(season));
        let mut irrigations = distinct_non_blank(
            self.records()
                .iter()
                .filter(|r| r.matches_season(&state_key, &district_key, &season_key))
                .map(|r| r.irrigation.as_str()),
        );
        irrigations.sort();
        irrigations
    }
}
