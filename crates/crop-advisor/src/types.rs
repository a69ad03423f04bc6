//! Request and response types shared by the query interface and the CLI.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown when no other recommended varieties are on record.
pub const NOT_AVAILABLE: &str = "N/A";

/// Message returned when a recommendation is requested with empty fields.
pub const FILL_ALL_SELECTIONS: &str = "Please fill all selections.";

/// A full set of user selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub crop: String,
    pub state: String,
    pub district: String,
    pub season: String,
    pub irrigation: String,
}

impl Selection {
    pub fn new(
        crop: impl Into<String>,
        state: impl Into<String>,
        district: impl Into<String>,
        season: impl Into<String>,
        irrigation: impl Into<String>,
    ) -> Self {
        Self {
            crop: crop.into(),
            state: state.into(),
            district: district.into(),
            season: season.into(),
            irrigation: irrigation.into(),
        }
    }

    /// Whether every field holds a non-blank value.
    pub fn is_complete(&self) -> bool {
        [
            &self.crop,
            &self.state,
            &self.district,
            &self.season,
            &self.irrigation,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// A successful recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub crop: String,
    /// Variety predicted by the crop's classifier.
    pub predicted_variety: String,
    /// Raw recommendation list of the matching source row, or [`NOT_AVAILABLE`].
    pub other_varieties: String,
}

/// Result of a recommendation request as seen by the caller.
///
/// Request-time failures never escape as errors; they are folded into
/// [`Incomplete`](Self::Incomplete) or [`Unavailable`](Self::Unavailable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendationOutcome {
    Recommended(Recommendation),
    Incomplete,
    Unavailable { reason: String },
}

impl RecommendationOutcome {
    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            Self::Recommended(recommendation) => Some(recommendation),
            _ => None,
        }
    }

    pub fn is_recommended(&self) -> bool {
        matches!(self, Self::Recommended(_))
    }
}

impl fmt::Display for RecommendationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recommended(r) => write!(
                f,
                "{} Recommendation\n\
                 ML Predicted Variety: {}\n\
                 Other recommended varieties: {}",
                r.crop, r.predicted_variety, r.other_varieties
            ),
            Self::Incomplete => write!(f, "⚠️ {}", FILL_ALL_SELECTIONS),
            Self::Unavailable { reason } => {
                write!(f, "⚠️ Cannot recommend for this combination: {}", reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_completeness() {
        let full = Selection::new("Wheat", "Punjab", "Ludhiana", "Rabi", "Irrigated");
        assert!(full.is_complete());

        let blank_season = Selection::new("Wheat", "Punjab", "Ludhiana", "  ", "Irrigated");
        assert!(!blank_season.is_complete());
        assert!(!Selection::default().is_complete());
    }

    #[test]
    fn test_outcome_display() {
        let outcome = RecommendationOutcome::Recommended(Recommendation {
            crop: "Wheat".to_string(),
            predicted_variety: "HD-2967".to_string(),
            other_varieties: "HD-2967;PBW-550".to_string(),
        });
        let text = outcome.to_string();
        assert!(text.starts_with("Wheat Recommendation"));
        assert!(text.contains("ML Predicted Variety: HD-2967"));
        assert!(text.contains("Other recommended varieties: HD-2967;PBW-550"));

        assert!(
            RecommendationOutcome::Incomplete
                .to_string()
                .contains(FILL_ALL_SELECTIONS)
        );
    }

    #[test]
    fn test_outcome_serialization_is_tagged() {
        let json = serde_json::to_string(&RecommendationOutcome::Unavailable {
            reason: "Unknown state 'atlantis'".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"status\":\"unavailable\""));
        assert!(json.contains("atlantis"));
    }
}
