//! Integration tests for the crop advisor.
//!
//! These tests load the CSV fixtures end to end: header discovery, encoding,
//! forest training, cascading choices and recommendations.

use crop_advisor::{
    AdvisorConfig, AdvisorError, AppContext, Choices, NOT_AVAILABLE, NO_OPTIONS,
    RecommendationOutcome, Session, SessionState,
};
use crop_advisor::dataset::load_dataset;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(filename: &str) -> PathBuf {
    fixtures_path().join(filename)
}

/// Wheat and Maize from fixtures, plus one missing file and one bad schema.
fn mixed_config() -> AdvisorConfig {
    AdvisorConfig::builder()
        .dataset("Wheat", fixture("wheat_varieties.csv"))
        .dataset("Maize", fixture("maize_varieties.csv"))
        .dataset("Rice", fixture("rice_varieties_missing.csv"))
        .dataset("Barley", fixture("missing_irrigation.csv"))
        .n_estimators(30)
        .build()
        .unwrap()
}

fn context() -> AppContext {
    AppContext::load(&mixed_config()).unwrap()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_loads_loose_headers() {
    let wheat = load_dataset("Wheat", fixture("wheat_varieties.csv")).unwrap();
    // The row without a recommendation is still loaded.
    assert_eq!(wheat.len(), 9);
    assert_eq!(wheat.training_rows().1.len(), 8);
    assert_eq!(wheat.records()[0].recommendation, "HD-2967;PBW-550");
    assert_eq!(wheat.records()[0].primary_variety, "HD-2967");

    let maize = load_dataset("Maize", fixture("maize_varieties.csv")).unwrap();
    assert_eq!(maize.len(), 4);
}

#[test]
fn test_missing_column_is_schema_error() {
    let err = load_dataset("Barley", fixture("missing_irrigation.csv")).unwrap_err();
    assert_eq!(err.error_code(), "SCHEMA_ERROR");
    match err {
        AdvisorError::Schema { crop, missing } => {
            assert_eq!(crop, "Barley");
            assert_eq!(missing, vec!["irrigation".to_string()]);
        }
        other => panic!("Expected schema error, got {:?}", other),
    }
}

#[test]
fn test_failed_crops_do_not_block_others() {
    let ctx = context();
    assert_eq!(ctx.crops(), vec!["Wheat", "Maize"]);

    let failed: Vec<(&str, &str)> = ctx
        .failures()
        .iter()
        .map(|f| (f.crop.as_str(), f.code))
        .collect();
    assert_eq!(failed, vec![("Rice", "IO_ERROR"), ("Barley", "SCHEMA_ERROR")]);

    // Recommendations for a failed crop report it as unavailable.
    let outcome = ctx.recommend("Rice", "Odisha", "Cuttack", "Kharif", "Irrigated");
    assert!(matches!(outcome, RecommendationOutcome::Unavailable { .. }));
}

#[test]
fn test_no_loadable_crop_is_an_error() {
    let config = AdvisorConfig::builder()
        .dataset("Rice", fixture("rice_varieties_missing.csv"))
        .build()
        .unwrap();
    let err = AppContext::load(&config).unwrap_err();
    assert_eq!(err.error_code(), "NO_DATA_LOADED");
}

#[test]
fn test_config_file() {
    let config = AdvisorConfig::from_file(fixture("advisor_config.json")).unwrap();
    assert_eq!(config.datasets.len(), 2);
    assert_eq!(config.forest.n_estimators, 25);
    assert_eq!(config.forest.seed, 7);
    // Unspecified forest parameters keep their defaults.
    assert_eq!(config.forest.min_samples_split, 2);
}

// ============================================================================
// Cascading Choices
// ============================================================================

#[test]
fn test_states_are_sorted_and_deduplicated() {
    let ctx = context();
    // "punjab " and "Punjab" are the same state.
    assert_eq!(
        ctx.list_states("Wheat"),
        vec!["Haryana", "Madhya Pradesh", "Punjab", "Uttar Pradesh"]
    );
    assert_eq!(ctx.list_states("Maize"), vec!["Bihar", "Karnataka"]);
}

#[test]
fn test_districts_stay_within_state() {
    let ctx = context();
    assert_eq!(
        ctx.list_districts("Wheat", "Punjab"),
        vec!["Amritsar", "Ludhiana", "Patiala"]
    );
    assert_eq!(ctx.list_districts("Wheat", "Haryana"), vec!["Hisar", "Karnal"]);
    assert_eq!(ctx.list_districts("Wheat", "PUNJAB"), ctx.list_districts("Wheat", "Punjab"));
}

#[test]
fn test_seasons_and_irrigations() {
    let ctx = context();
    assert_eq!(
        ctx.list_seasons("Wheat", "Uttar Pradesh", "Meerut"),
        vec!["Rabi", "Rabi (Late)"]
    );
    assert_eq!(
        ctx.list_irrigations("Wheat", "Punjab", "Patiala", "Rabi"),
        vec!["Rainfed"]
    );
    // The Indore irrigated row has no recommendation but is still offered.
    assert_eq!(
        ctx.list_irrigations("Wheat", "Madhya Pradesh", "Indore", "Rabi"),
        vec!["Irrigated", "Rainfed"]
    );
}

#[test]
fn test_state_with_only_blank_recommendations_is_listed() {
    let config = AdvisorConfig::builder()
        .dataset("Wheat", fixture("wheat_with_blank_rows.csv"))
        .n_estimators(10)
        .build()
        .unwrap();
    let ctx = AppContext::load(&config).unwrap();

    assert_eq!(ctx.list_states("Wheat"), vec!["Bihar", "Punjab"]);
    assert_eq!(ctx.list_districts("Wheat", "Bihar"), vec!["Patna"]);

    let outcome = ctx.recommend("Wheat", "Bihar", "Patna", "Rabi", "Irrigated");
    let recommendation = outcome.recommendation().unwrap();
    assert!(["HD-2967", "PBW-644"].contains(&recommendation.predicted_variety.as_str()));
    assert_eq!(recommendation.other_varieties, NOT_AVAILABLE);
}

#[test]
fn test_single_variety_table_loads_and_recommends() {
    let config = AdvisorConfig::builder()
        .dataset("Wheat", fixture("wheat_single_variety.csv"))
        .n_estimators(10)
        .build()
        .unwrap();
    let ctx = AppContext::load(&config).unwrap();
    assert!(ctx.failures().is_empty());

    assert_eq!(ctx.list_states("Wheat"), vec!["Bihar", "Punjab"]);
    assert_eq!(ctx.list_districts("Wheat", "Punjab"), vec!["Ludhiana"]);

    let outcome = ctx.recommend("Wheat", "Punjab", "Ludhiana", "Rabi", "Irrigated");
    let recommendation = outcome.recommendation().unwrap();
    assert_eq!(recommendation.predicted_variety, "HD-2967");
    assert_eq!(recommendation.other_varieties, "HD-2967;PBW-550");

    let outcome = ctx.recommend("Wheat", "Bihar", "Patna", "Rabi", "Irrigated");
    let recommendation = outcome.recommendation().unwrap();
    assert_eq!(recommendation.predicted_variety, "HD-2967");
    assert_eq!(recommendation.other_varieties, NOT_AVAILABLE);
}

#[test]
fn test_missing_preconditions_yield_no_options() {
    let ctx = context();
    assert!(ctx.list_districts("Wheat", "").is_empty());
    assert!(ctx.list_seasons("Wheat", "Punjab", "").is_empty());
    assert!(ctx.list_states("Sorghum").is_empty());

    let choices = ctx.get_districts("Wheat", "Kerala");
    assert_eq!(choices, Choices::NoOptions);
    assert_eq!(choices.labels(), vec![NO_OPTIONS]);
}

// ============================================================================
// Recommendations
// ============================================================================

#[test]
fn test_recommendation_returns_source_text() {
    let ctx = context();
    let outcome = ctx.recommend("Wheat", "Punjab", "Ludhiana", "Rabi", "Irrigated");
    let recommendation = outcome.recommendation().expect("recommended");

    assert_eq!(recommendation.crop, "Wheat");
    assert_eq!(recommendation.other_varieties, "HD-2967;PBW-550");

    let wheat = ctx.predictor("Wheat").unwrap().dataset();
    assert!(
        wheat
            .encoders()
            .variety
            .classes()
            .contains(&recommendation.predicted_variety)
    );

    let text = outcome.to_string();
    assert!(text.starts_with("Wheat Recommendation\nML Predicted Variety: "));
    assert!(text.ends_with("Other recommended varieties: HD-2967;PBW-550"));
}

#[test]
fn test_recommendation_ignores_case_and_whitespace() {
    let ctx = context();
    let outcome = ctx.recommend("Wheat", " punjab", "LUDHIANA ", "rabi", "irrigated");
    assert_eq!(
        outcome.recommendation().unwrap().other_varieties,
        "HD-2967;PBW-550"
    );
}

#[test]
fn test_combination_without_source_row_is_not_available() {
    let ctx = context();
    // Every value is known, but Patiala has no irrigated row.
    let outcome = ctx.recommend("Wheat", "Punjab", "Patiala", "Rabi", "Irrigated");
    assert_eq!(
        outcome.recommendation().unwrap().other_varieties,
        NOT_AVAILABLE
    );

    // Indore's irrigated row exists but carries no recommendation text.
    let outcome = ctx.recommend("Wheat", "Madhya Pradesh", "Indore", "Rabi", "Irrigated");
    assert_eq!(
        outcome.recommendation().unwrap().other_varieties,
        NOT_AVAILABLE
    );
}

#[test]
fn test_incomplete_selection() {
    let ctx = context();
    let outcome = ctx.recommend("Wheat", "Punjab", "Ludhiana", "", "Irrigated");
    assert_eq!(outcome, RecommendationOutcome::Incomplete);
    assert_eq!(outcome.to_string(), "⚠️ Please fill all selections.");
}

#[test]
fn test_unknown_value_is_unavailable() {
    let ctx = context();
    let outcome = ctx.recommend("Wheat", "Punjab", "Bathinda", "Rabi", "Irrigated");
    match outcome {
        RecommendationOutcome::Unavailable { reason } => assert!(reason.contains("Bathinda")),
        other => panic!("Expected unavailable, got {:?}", other),
    }
}

#[test]
fn test_training_is_deterministic() {
    let first = context();
    let second = context();
    for district in ["Ludhiana", "Patiala", "Amritsar"] {
        for season in ["Rabi", "Rabi (Late)"] {
            for irrigation in ["Irrigated", "Rainfed"] {
                assert_eq!(
                    first.recommend("Wheat", "Punjab", district, season, irrigation),
                    second.recommend("Wheat", "Punjab", district, season, irrigation)
                );
            }
        }
    }
}

#[test]
fn test_outcome_json_shape() {
    let ctx = context();
    let outcome = ctx.recommend("Maize", "Karnataka", "Davangere", "Kharif", "Irrigated");
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "recommended");
    assert_eq!(json["crop"], "Maize");
    assert_eq!(json["other_varieties"], "NAH-1137;Hema");
}

#[test]
fn test_describe_summaries() {
    let ctx = context();
    let summaries = ctx.summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].dataset.crop, "Wheat");
    assert_eq!(summaries[0].dataset.rows, 9);
    assert_eq!(summaries[0].dataset.states, 4);
    assert_eq!(summaries[0].trees, 30);
}

// ============================================================================
// Sessions
// ============================================================================

#[test]
fn test_session_flow_and_reset() {
    let ctx = context();
    let mut session = Session::new();

    let states = session.select_crop(&ctx, "Maize");
    assert_eq!(states.options(), &["Bihar", "Karnataka"]);

    let districts = session.select_state(&ctx, "Bihar");
    assert_eq!(districts.options(), &["Purnea", "Samastipur"]);
    session.select_district(&ctx, "Purnea");
    session.select_season(&ctx, "Rabi");
    assert_eq!(
        session.select_irrigation("Irrigated"),
        SessionState::ReadyForIrrigation
    );

    let outcome = session.recommend(&ctx);
    assert_eq!(outcome.recommendation().unwrap().other_varieties, "DHM-117");
    assert_eq!(session.state(), SessionState::Recommended);

    // Switching state clears everything below it.
    let districts = session.select_state(&ctx, "Karnataka");
    assert_eq!(districts.options(), &["Davangere"]);
    assert_eq!(session.state(), SessionState::StateSelected);
    assert_eq!(session.recommend(&ctx), RecommendationOutcome::Incomplete);
}

#[test]
fn test_sessions_are_independent() {
    let ctx = context();
    let mut first = Session::new();
    let mut second = Session::new();

    first.select_crop(&ctx, "Wheat");
    second.select_crop(&ctx, "Maize");
    first.select_state(&ctx, "Haryana");

    assert_eq!(first.selection().crop, "Wheat");
    assert_eq!(second.selection().crop, "Maize");
    assert_eq!(second.state(), SessionState::CropSelected);
}
