//! Categorical label encoding.
//!
//! Each encoder maps the distinct labels seen at fit time onto the dense code
//! range `[0, k)`. Codes follow ascending label order, so fitting the same
//! data twice always yields the same codes.

use crate::dataset::VarietyRecord;
use crate::error::{AdvisorError, Result};
use crate::utils::normalize;
use std::collections::{BTreeSet, HashMap};

/// Number of features the classifier is trained on.
pub const N_FEATURES: usize = 4;

/// Encoded classifier input, in the order state, district, season, irrigation.
pub type FeatureCodes = [u32; N_FEATURES];

/// Bijective label <-> code mapping for a single column.
#[derive(Debug, Clone)]
pub struct CategoricalEncoder {
    column: String,
    classes: Vec<String>,
    index: HashMap<String, u32>,
}

impl CategoricalEncoder {
    /// Fit an encoder over the given labels.
    pub fn fit<'a, I>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes: Vec<String> = values
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let index = classes
            .iter()
            .enumerate()
            .map(|(code, label)| (label.clone(), code as u32))
            .collect();

        Self {
            column: column.into(),
            classes,
            index,
        }
    }

    /// Code for a label seen at fit time.
    pub fn encode(&self, value: &str) -> Result<u32> {
        self.index
            .get(value)
            .copied()
            .ok_or_else(|| AdvisorError::UnknownCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }

    /// Code for raw user input, matched on its normalized form.
    ///
    /// An unknown value is reported with the input's own spelling, trimmed.
    pub fn encode_input(&self, raw: &str) -> Result<u32> {
        self.encode(&normalize(raw)).map_err(|_| AdvisorError::UnknownCategory {
            column: self.column.clone(),
            value: raw.trim().to_string(),
        })
    }

    /// Label for a code produced by [`encode`](Self::encode).
    pub fn decode(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    /// Column this encoder was fitted for.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Fitted labels in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// The five encoders of one crop dataset.
///
/// Filtering columns are fitted over normalized values; the variety encoder is
/// fitted over the display form of the primary variety so decoding yields a
/// presentable label.
#[derive(Debug, Clone)]
pub struct EncoderSet {
    pub state: CategoricalEncoder,
    pub district: CategoricalEncoder,
    pub season: CategoricalEncoder,
    pub irrigation: CategoricalEncoder,
    pub variety: CategoricalEncoder,
}

impl EncoderSet {
    pub fn fit(records: &[VarietyRecord]) -> Self {
        Self {
            state: CategoricalEncoder::fit("state", records.iter().map(|r| r.state_key.as_str())),
            district: CategoricalEncoder::fit(
                "district",
                records.iter().map(|r| r.district_key.as_str()),
            ),
            season: CategoricalEncoder::fit(
                "season",
                records.iter().map(|r| r.season_key.as_str()),
            ),
            irrigation: CategoricalEncoder::fit(
                "irrigation",
                records.iter().map(|r| r.irrigation_key.as_str()),
            ),
            variety: CategoricalEncoder::fit(
                "variety",
                records
                    .iter()
                    .map(|r| r.primary_variety.as_str())
                    .filter(|v| !v.is_empty()),
            ),
        }
    }

    /// Encode raw user input. Values are normalized before lookup.
    pub fn encode_features(
        &self,
        state: &str,
        district: &str,
        season: &str,
        irrigation: &str,
    ) -> Result<FeatureCodes> {
        Ok([
            self.state.encode_input(state)?,
            self.district.encode_input(district)?,
            self.season.encode_input(season)?,
            self.irrigation.encode_input(irrigation)?,
        ])
    }

    /// Encode a loaded record; its keys are already normalized. The target is
    /// `None` when the record has no recommendation.
    pub(crate) fn encode_record(
        &self,
        record: &VarietyRecord,
    ) -> Result<(FeatureCodes, Option<u32>)> {
        let features = [
            self.state.encode(&record.state_key)?,
            self.district.encode(&record.district_key)?,
            self.season.encode(&record.season_key)?,
            self.irrigation.encode(&record.irrigation_key)?,
        ];
        let target = if record.primary_variety.is_empty() {
            None
        } else {
            Some(self.variety.encode(&record.primary_variety)?)
        };
        Ok((features, target))
    }
}
