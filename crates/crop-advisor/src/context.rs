//! Application context.
//!
//! Holds every loaded crop with its trained model. It is built once at startup
//! and passed by reference to every query; nothing in it changes afterwards,
//! so it can be shared across threads without locking.
//!
//! ```text
//! AppContext
//! ├── Predictor "Wheat" ── CropDataset (records, encoders, codes) + TrainedModel
//! ├── Predictor "Maize" ── ...
//! └── failures: crops whose table could not be loaded
//! ```

use crate::config::AdvisorConfig;
use crate::dataset::{CropDataset, DatasetSummary, load_dataset};
use crate::error::{AdvisorError, Result};
use crate::filter::Choices;
use crate::model::ForestParams;
use crate::predictor::Predictor;
use crate::types::{RecommendationOutcome, Selection};
use crate::utils::is_blank;
use serde::Serialize;
use static_assertions::assert_impl_all;
use std::collections::HashMap;
use tracing::{error, info, warn};

/// A crop whose table could not be loaded or trained on.
#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    pub crop: String,
    pub code: &'static str,
    pub message: String,
}

/// Summary of one loaded crop.
#[derive(Debug, Clone, Serialize)]
pub struct CropSummary {
    #[serde(flatten)]
    pub dataset: DatasetSummary,
    pub trees: usize,
}

/// Process-wide, read-only state.
#[derive(Debug)]
pub struct AppContext {
    predictors: Vec<Predictor>,
    index: HashMap<String, usize>,
    failures: Vec<LoadFailure>,
}

assert_impl_all!(AppContext: Send, Sync);

impl AppContext {
    /// Load and train every configured crop.
    ///
    /// A crop that fails to load is logged and recorded in
    /// [`failures`](Self::failures); the others still load.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::NoDataLoaded`] if no crop could be loaded.
    pub fn load(config: &AdvisorConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AdvisorError::InvalidConfig(e.to_string()))?;

        let mut predictors = Vec::with_capacity(config.datasets.len());
        let mut failures = Vec::new();

        for source in &config.datasets {
            let loaded = load_dataset(&source.crop, &source.path)
                .and_then(|dataset| Predictor::train(dataset, &config.forest));
            match loaded {
                Ok(predictor) => predictors.push(predictor),
                Err(e) => {
                    error!("Failed to load {}: {}", source.crop, e);
                    failures.push(LoadFailure {
                        crop: source.crop.clone(),
                        code: e.error_code(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if predictors.is_empty() {
            return Err(AdvisorError::NoDataLoaded);
        }

        let mut context = Self::from_predictors(predictors);
        context.failures = failures;
        info!(
            "Loaded {} crop(s), {} failed",
            context.predictors.len(),
            context.failures.len()
        );
        Ok(context)
    }

    /// Train models over already built datasets.
    pub fn from_datasets(datasets: Vec<CropDataset>, params: &ForestParams) -> Result<Self> {
        let predictors = datasets
            .into_iter()
            .map(|dataset| Predictor::train(dataset, params))
            .collect::<Result<Vec<_>>>()?;
        if predictors.is_empty() {
            return Err(AdvisorError::NoDataLoaded);
        }
        Ok(Self::from_predictors(predictors))
    }

    fn from_predictors(predictors: Vec<Predictor>) -> Self {
        let index = predictors
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.crop().to_string(), idx))
            .collect();
        Self {
            predictors,
            index,
            failures: Vec::new(),
        }
    }

    /// Loaded crop names in configuration order.
    pub fn crops(&self) -> Vec<&str> {
        self.predictors.iter().map(Predictor::crop).collect()
    }

    pub fn predictor(&self, crop: &str) -> Option<&Predictor> {
        self.index.get(crop).map(|&idx| &self.predictors[idx])
    }

    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    pub fn summaries(&self) -> Vec<CropSummary> {
        self.predictors
            .iter()
            .map(|p| CropSummary {
                dataset: p.dataset().summary(),
                trees: p.model().forest().n_trees(),
            })
            .collect()
    }

    fn dataset(&self, crop: &str) -> Option<&CropDataset> {
        if is_blank(crop) {
            return None;
        }
        self.predictor(crop).map(Predictor::dataset)
    }

    // ------------------------------------------------------------------------
    // Cascading filter: plain lists, empty when a precondition is missing
    // ------------------------------------------------------------------------

    pub fn list_states(&self, crop: &str) -> Vec<String> {
        self.dataset(crop).map(CropDataset::states).unwrap_or_default()
    }

    pub fn list_districts(&self, crop: &str, state: &str) -> Vec<String> {
        if is_blank(state) {
            return Vec::new();
        }
        self.dataset(crop)
            .map(|ds| ds.districts(state))
            .unwrap_or_default()
    }

    pub fn list_seasons(&self, crop: &str, state: &str, district: &str) -> Vec<String> {
        if is_blank(state) || is_blank(district) {
            return Vec::new();
        }
        self.dataset(crop)
            .map(|ds| ds.seasons(state, district))
            .unwrap_or_default()
    }

    pub fn list_irrigations(
        &self,
        crop: &str,
        state: &str,
        district: &str,
        season: &str,
    ) -> Vec<String> {
        if is_blank(state) || is_blank(district) || is_blank(season) {
            return Vec::new();
        }
        self.dataset(crop)
            .map(|ds| ds.irrigations(state, district, season))
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------------
    // Caller-facing query interface
    // ------------------------------------------------------------------------

    pub fn get_states(&self, crop: &str) -> Choices {
        Choices::from_values(self.list_states(crop))
    }

    pub fn get_districts(&self, crop: &str, state: &str) -> Choices {
        Choices::from_values(self.list_districts(crop, state))
    }

    pub fn get_seasons(&self, crop: &str, state: &str, district: &str) -> Choices {
        Choices::from_values(self.list_seasons(crop, state, district))
    }

    pub fn get_irrigations(
        &self,
        crop: &str,
        state: &str,
        district: &str,
        season: &str,
    ) -> Choices {
        Choices::from_values(self.list_irrigations(crop, state, district, season))
    }

    /// Recommend a variety; failures are folded into the outcome.
    pub fn recommend(
        &self,
        crop: &str,
        state: &str,
        district: &str,
        season: &str,
        irrigation: &str,
    ) -> RecommendationOutcome {
        let selection = Selection::new(crop, state, district, season, irrigation);
        self.recommend_selection(&selection)
    }

    pub fn recommend_selection(&self, selection: &Selection) -> RecommendationOutcome {
        if !selection.is_complete() {
            return RecommendationOutcome::Incomplete;
        }

        let Some(predictor) = self.predictor(&selection.crop) else {
            warn!("Recommendation requested for unknown crop '{}'", selection.crop);
            return RecommendationOutcome::Unavailable {
                reason: AdvisorError::UnknownCrop(selection.crop.clone()).to_string(),
            };
        };

        match predictor.predict(
            &selection.state,
            &selection.district,
            &selection.season,
            &selection.irrigation,
        ) {
            Ok(recommendation) => RecommendationOutcome::Recommended(recommendation),
            Err(e) => {
                warn!("Cannot recommend for {:?}: {}", selection, e);
                RecommendationOutcome::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}
