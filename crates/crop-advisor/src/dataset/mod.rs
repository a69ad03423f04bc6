//! Advisory datasets.
//!
//! A [`CropDataset`] holds every [`VarietyRecord`] of one crop together with the
//! encoders fitted over them and the encoded rows. Rows without a
//! recommendation stay in the dataset for filtering and lookup but are not
//! used for training. A dataset is built once and never mutated.

mod loader;
mod schema;

pub use loader::{load_dataset, read_csv};
pub use schema::{ColumnMapping, LogicalColumn};

use crate::encoding::{EncoderSet, FeatureCodes};
use crate::error::{AdvisorError, Result};
use crate::utils::{normalize, primary_variety};
use serde::Serialize;

/// One row of an advisory table.
///
/// Display fields keep the source spelling; the `*_key` fields hold the
/// normalized shadow values used for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarietyRecord {
    pub state: String,
    pub district: String,
    pub irrigation: String,
    pub season: String,
    /// Raw recommendation list, possibly `;`-delimited.
    pub recommendation: String,
    pub primary_variety: String,
    pub(crate) state_key: String,
    pub(crate) district_key: String,
    pub(crate) irrigation_key: String,
    pub(crate) season_key: String,
}

impl VarietyRecord {
    pub fn new(
        state: impl Into<String>,
        district: impl Into<String>,
        irrigation: impl Into<String>,
        season: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        let state = state.into();
        let district = district.into();
        let irrigation = irrigation.into();
        let season = season.into();
        let recommendation = recommendation.into();

        Self {
            state_key: normalize(&state),
            district_key: normalize(&district),
            irrigation_key: normalize(&irrigation),
            season_key: normalize(&season),
            primary_variety: primary_variety(&recommendation),
            state,
            district,
            irrigation,
            season,
            recommendation,
        }
    }

    pub(crate) fn matches_state(&self, state_key: &str) -> bool {
        self.state_key == state_key
    }

    pub(crate) fn matches_district(&self, state_key: &str, district_key: &str) -> bool {
        self.matches_state(state_key) && self.district_key == district_key
    }

    pub(crate) fn matches_season(
        &self,
        state_key: &str,
        district_key: &str,
        season_key: &str,
    ) -> bool {
        self.matches_district(state_key, district_key) && self.season_key == season_key
    }
}

/// All records of one crop plus their encoders and encoded rows.
#[derive(Debug, Clone)]
pub struct CropDataset {
    crop: String,
    records: Vec<VarietyRecord>,
    encoders: EncoderSet,
    features: Vec<FeatureCodes>,
    targets: Vec<Option<u32>>,
}

impl CropDataset {
    /// Fit encoders over `records` and encode every row.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::EmptyDataset`] if no record carries a
    /// recommendation.
    pub fn new(crop: impl Into<String>, records: Vec<VarietyRecord>) -> Result<Self> {
        let crop = crop.into();
        if records.iter().all(|r| r.primary_variety.is_empty()) {
            return Err(AdvisorError::EmptyDataset(crop));
        }

        let encoders = EncoderSet::fit(&records);
        let (features, targets): (Vec<FeatureCodes>, Vec<Option<u32>>) = records
            .iter()
            .map(|record| encoders.encode_record(record))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .unzip();

        Ok(Self {
            crop,
            records,
            encoders,
            features,
            targets,
        })
    }

    pub fn crop(&self) -> &str {
        &self.crop
    }

    pub fn records(&self) -> &[VarietyRecord] {
        &self.records
    }

    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    /// Encoded features, one entry per record in source order.
    pub fn features(&self) -> &[FeatureCodes] {
        &self.features
    }

    /// Encoded primary varieties, one entry per record in source order;
    /// `None` for records without a recommendation.
    pub fn targets(&self) -> &[Option<u32>] {
        &self.targets
    }

    /// Features and targets of the records that carry a recommendation.
    pub fn training_rows(&self) -> (Vec<FeatureCodes>, Vec<u32>) {
        self.features
            .iter()
            .zip(&self.targets)
            .filter_map(|(codes, target)| target.map(|t| (*codes, t)))
            .unzip()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recommendation text of the first record with exactly these codes.
    pub fn lookup_recommendation(&self, codes: &FeatureCodes) -> Option<&str> {
        self.features
            .iter()
            .position(|row| row == codes)
            .map(|idx| self.records[idx].recommendation.as_str())
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            crop: self.crop.clone(),
            rows: self.records.len(),
            states: self.encoders.state.len(),
            districts: self.encoders.district.len(),
            seasons: self.encoders.season.len(),
            irrigations: self.encoders.irrigation.len(),
            varieties: self.encoders.variety.len(),
        }
    }
}

/// Row and category counts of a loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub crop: String,
    pub rows: usize,
    pub states: usize,
    pub districts: usize,
    pub seasons: usize,
    pub irrigations: usize,
    pub varieties: usize,
}
