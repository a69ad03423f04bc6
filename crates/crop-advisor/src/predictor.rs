//! Per-crop variety prediction.
//!
//! A [`Predictor`] owns a crop's dataset and the model trained on it, so the
//! model only ever sees codes produced by that dataset's encoders.

use crate::dataset::CropDataset;
use crate::encoding::FeatureCodes;
use crate::error::{AdvisorError, Result};
use crate::model::{ForestParams, RandomForest};
use crate::types::{NOT_AVAILABLE, Recommendation};
use crate::utils::is_blank;
use tracing::{debug, info};

/// Classifier trained on one crop's encoded rows.
#[derive(Debug)]
pub struct TrainedModel {
    forest: RandomForest,
}

impl TrainedModel {
    /// Fit on every row that carries a recommendation; there is no held-out split.
    pub fn train(dataset: &CropDataset, params: &ForestParams) -> Result<Self> {
        let (features, targets) = dataset.training_rows();
        let forest = RandomForest::fit(
            &features,
            &targets,
            dataset.encoders().variety.len(),
            params,
        )?;
        Ok(Self { forest })
    }

    pub fn predict_code(&self, codes: &FeatureCodes) -> Result<u32> {
        self.forest.predict(codes)
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }
}

/// A crop's dataset paired with its trained model.
#[derive(Debug)]
pub struct Predictor {
    dataset: CropDataset,
    model: TrainedModel,
}

impl Predictor {
    pub fn train(dataset: CropDataset, params: &ForestParams) -> Result<Self> {
        let model = TrainedModel::train(&dataset, params)?;
        info!(
            "Trained {} model: {} trees, {} varieties, {} rows",
            dataset.crop(),
            model.forest().n_trees(),
            model.forest().n_classes(),
            dataset.len()
        );
        Ok(Self { dataset, model })
    }

    pub fn crop(&self) -> &str {
        self.dataset.crop()
    }

    pub fn dataset(&self) -> &CropDataset {
        &self.dataset
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    /// Predict a variety and look up the matching source row.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::UnknownCategory`] if any value was not seen in
    /// this crop's data.
    pub fn predict(
        &self,
        state: &str,
        district: &str,
        season: &str,
        irrigation: &str,
    ) -> Result<Recommendation> {
        let encoders = self.dataset.encoders();
        let codes = encoders.encode_features(state, district, season, irrigation)?;

        let variety_code = self.model.predict_code(&codes)?;
        let predicted_variety = encoders
            .variety
            .decode(variety_code)
            .ok_or_else(|| {
                AdvisorError::Training(format!(
                    "{} model produced unknown variety code {}",
                    self.crop(),
                    variety_code
                ))
            })?
            .to_string();

        let other_varieties = self
            .dataset
            .lookup_recommendation(&codes)
            .filter(|text| !is_blank(text))
            .unwrap_or(NOT_AVAILABLE)
            .to_string();

        debug!(
            "{}: {:?} -> {} (other: {})",
            self.crop(),
            codes,
            predicted_variety,
            other_varieties
        );

        Ok(Recommendation {
            crop: self.crop().to_string(),
            predicted_variety,
            other_varieties,
        })
    }
}
