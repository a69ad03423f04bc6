//! Per-user selection state.
//!
//! A [`Session`] walks the cascade crop -> state -> district -> season ->
//! irrigation. Selecting a field clears every field below it, and each
//! selection returns the choices for the next level. A recommendation can only
//! be produced once all five fields are set.

use crate::context::AppContext;
use crate::filter::{Choices, NO_OPTIONS};
use crate::types::{RecommendationOutcome, Selection};
use crate::utils::is_blank;
use serde::Serialize;

/// Where a session is in the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    NoCropSelected,
    CropSelected,
    StateSelected,
    DistrictSelected,
    SeasonSelected,
    /// Complete selection: all five fields, irrigation included, are set and
    /// a recommendation may be requested.
    ReadyForIrrigation,
    Recommended,
}

/// Selections made so far plus the last recommendation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    crop: Option<String>,
    state: Option<String>,
    district: Option<String>,
    season: Option<String>,
    irrigation: Option<String>,
    last_outcome: Option<RecommendationOutcome>,
}

/// Blank values and the sentinel placeholder leave a field unselected.
fn selected(value: &str) -> Option<String> {
    if is_blank(value) || value == NO_OPTIONS {
        None
    } else {
        Some(value.to_string())
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match (
            &self.crop,
            &self.state,
            &self.district,
            &self.season,
            &self.irrigation,
        ) {
            (None, ..) => SessionState::NoCropSelected,
            (Some(_), None, ..) => SessionState::CropSelected,
            (Some(_), Some(_), None, ..) => SessionState::StateSelected,
            (Some(_), Some(_), Some(_), None, _) => SessionState::DistrictSelected,
            (Some(_), Some(_), Some(_), Some(_), None) => SessionState::SeasonSelected,
            (Some(_), Some(_), Some(_), Some(_), Some(_)) => {
                if self.last_outcome.as_ref().is_some_and(|o| o.is_recommended()) {
                    SessionState::Recommended
                } else {
                    SessionState::ReadyForIrrigation
                }
            }
        }
    }

    /// Current selections; unselected fields are empty strings.
    pub fn selection(&self) -> Selection {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        Selection {
            crop: field(&self.crop),
            state: field(&self.state),
            district: field(&self.district),
            season: field(&self.season),
            irrigation: field(&self.irrigation),
        }
    }

    pub fn last_outcome(&self) -> Option<&RecommendationOutcome> {
        self.last_outcome.as_ref()
    }

    /// Select a crop and return its states.
    pub fn select_crop(&mut self, ctx: &AppContext, crop: &str) -> Choices {
        self.crop = selected(crop);
        self.clear_below_crop();
        match &self.crop {
            Some(crop) => ctx.get_states(crop),
            None => Choices::NoOptions,
        }
    }

    /// Select a state and return its districts. Ignored until a crop is selected.
    pub fn select_state(&mut self, ctx: &AppContext, state: &str) -> Choices {
        let Some(crop) = self.crop.clone() else {
            return Choices::NoOptions;
        };
        self.state = selected(state);
        self.clear_below_state();
        match &self.state {
            Some(state) => ctx.get_districts(&crop, state),
            None => Choices::NoOptions,
        }
    }

    /// Select a district and return its seasons. Ignored until a state is selected.
    pub fn select_district(&mut self, ctx: &AppContext, district: &str) -> Choices {
        let (Some(crop), Some(state)) = (self.crop.clone(), self.state.clone()) else {
            return Choices::NoOptions;
        };
        self.district = selected(district);
        self.clear_below_district();
        match &self.district {
            Some(district) => ctx.get_seasons(&crop, &state, district),
            None => Choices::NoOptions,
        }
    }

    /// Select a season and return its irrigation options. Ignored until a
    /// district is selected.
    pub fn select_season(&mut self, ctx: &AppContext, season: &str) -> Choices {
        let (Some(crop), Some(state), Some(district)) =
            (self.crop.clone(), self.state.clone(), self.district.clone())
        else {
            return Choices::NoOptions;
        };
        self.season = selected(season);
        self.irrigation = None;
        self.last_outcome = None;
        match &self.season {
            Some(season) => ctx.get_irrigations(&crop, &state, &district, season),
            None => Choices::NoOptions,
        }
    }

    /// Select an irrigation status. Ignored until a season is selected.
    pub fn select_irrigation(&mut self, irrigation: &str) -> SessionState {
        if self.season.is_some() {
            self.irrigation = selected(irrigation);
            self.last_outcome = None;
        }
        self.state()
    }

    /// Request a recommendation for the current selections.
    pub fn recommend(&mut self, ctx: &AppContext) -> RecommendationOutcome {
        let outcome = ctx.recommend_selection(&self.selection());
        if self.state() != SessionState::NoCropSelected {
            self.last_outcome = Some(outcome.clone());
        }
        outcome
    }

    fn clear_below_crop(&mut self) {
        self.state = None;
        self.clear_below_state();
    }

    fn clear_below_state(&mut self) {
        self.district = None;
        self.clear_below_district();
    }

    fn clear_below_district(&mut self) {
        self.season = None;
        self.irrigation = None;
        self.last_outcome = None;
    }
}
