//! Configuration for the advisor.
//!
//! Built with [`AdvisorConfig::builder()`] or read from a JSON file.
//!
//! ```rust,ignore
//! use crop_advisor::config::AdvisorConfig;
//!
//! let config = AdvisorConfig::builder()
//!     .dataset("Wheat", "data/wheat_varieties_huge.csv")
//!     .n_estimators(60)
//!     .seed(7)
//!     .build()?;
//! ```

use crate::model::ForestParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Crops shipped with the application and their default file names.
pub const DEFAULT_DATASETS: [(&str, &str); 3] = [
    ("Wheat", "wheat_varieties_huge.csv"),
    ("Maize", "maize_varieties_comprehensive.csv"),
    ("Rice", "rice_varieties.csv"),
];

/// One crop and the advisory table it is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSource {
    pub crop: String,
    pub path: PathBuf,
}

/// Configuration for loading datasets and training models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Crops to load, in display order.
    /// Default: Wheat, Maize and Rice under `data/`
    pub datasets: Vec<CropSource>,

    /// Forest hyperparameters shared by every crop.
    #[serde(default)]
    pub forest: ForestParams,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self::with_data_dir("data")
    }
}

impl AdvisorConfig {
    pub fn builder() -> AdvisorConfigBuilder {
        AdvisorConfigBuilder::default()
    }

    /// Default crops, read from `data_dir`.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            datasets: DEFAULT_DATASETS
                .iter()
                .map(|(crop, file)| CropSource {
                    crop: crop.to_string(),
                    path: data_dir.join(file),
                })
                .collect(),
            forest: ForestParams::default(),
        }
    }

    /// Read a JSON configuration file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config
            .validate()
            .map_err(|e| crate::error::AdvisorError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.datasets.is_empty() {
            return Err(ConfigValidationError::NoDatasets);
        }

        let mut seen = std::collections::HashSet::new();
        for source in &self.datasets {
            if source.crop.trim().is_empty() {
                return Err(ConfigValidationError::BlankCropName);
            }
            if !seen.insert(source.crop.as_str()) {
                return Err(ConfigValidationError::DuplicateCrop(source.crop.clone()));
            }
        }

        self.forest
            .validate()
            .map_err(|e| ConfigValidationError::InvalidForest(e.to_string()))
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("No crop datasets configured")]
    NoDatasets,

    #[error("Crop name must not be blank")]
    BlankCropName,

    #[error("Crop '{0}' is configured more than once")]
    DuplicateCrop(String),

    #[error("Invalid forest parameters: {0}")]
    InvalidForest(String),
}

/// Builder for [`AdvisorConfig`].
#[derive(Default)]
pub struct AdvisorConfigBuilder {
    datasets: Vec<CropSource>,
    forest: ForestParams,
}

impl AdvisorConfigBuilder {
    /// Add a crop and its advisory table.
    pub fn dataset(mut self, crop: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.datasets.push(CropSource {
            crop: crop.into(),
            path: path.into(),
        });
        self
    }

    /// Add the default crops found under `data_dir`.
    pub fn default_datasets(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.datasets
            .extend(AdvisorConfig::with_data_dir(data_dir).datasets);
        self
    }

    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.forest.n_estimators = n_estimators;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.forest.seed = seed;
        self
    }

    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.forest.max_depth = max_depth;
        self
    }

    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.forest.min_samples_split = min_samples_split;
        self
    }

    pub fn forest(mut self, forest: ForestParams) -> Self {
        self.forest = forest;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<AdvisorConfig, ConfigValidationError> {
        let config = AdvisorConfig {
            datasets: self.datasets,
            forest: self.forest,
        };
        config.validate()?;
        Ok(config)
    }
}
