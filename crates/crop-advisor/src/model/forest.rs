//! Random forest classifier.
//!
//! Wraps smartcore's `RandomForestClassifier`. Category codes are fed in as
//! ordinal `f64` features and predictions come back as variety codes.
//! smartcore refuses to fit a single class, so a table whose rows all share one
//! primary variety gets a constant model instead.

use crate::encoding::{FeatureCodes, N_FEATURES};
use crate::error::{AdvisorError, Result};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;
use tracing::debug;

type Classifier = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Hyperparameters for [`RandomForest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    /// Number of trees.
    /// Default: 120
    pub n_estimators: usize,

    /// Seed for bootstrap sampling and feature selection.
    /// Default: 42
    pub seed: u64,

    /// Maximum tree depth, unlimited when `None`.
    /// Default: None
    pub max_depth: Option<usize>,

    /// Minimum number of rows a node needs before it may be split.
    /// Default: 2
    pub min_samples_split: usize,

    /// Candidate features per split; `None` means `sqrt(n_features)`.
    /// Default: None
    pub max_features: Option<usize>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 120,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 || self.n_estimators > usize::from(u16::MAX) {
            return Err(AdvisorError::InvalidConfig(format!(
                "n_estimators must be between 1 and {}, got {}",
                u16::MAX,
                self.n_estimators
            )));
        }
        if self.min_samples_split < 2 {
            return Err(AdvisorError::InvalidConfig(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if let Some(depth) = self.max_depth
            && (depth == 0 || depth > usize::from(u16::MAX))
        {
            return Err(AdvisorError::InvalidConfig(format!(
                "max_depth must be between 1 and {}, got {}",
                u16::MAX,
                depth
            )));
        }
        match self.max_features {
            Some(max_features) if !(1..=N_FEATURES).contains(&max_features) => {
                Err(AdvisorError::InvalidConfig(format!(
                    "max_features must be between 1 and {}, got {}",
                    N_FEATURES, max_features
                )))
            }
            _ => Ok(()),
        }
    }

    fn effective_max_features(&self) -> usize {
        self.max_features
            .unwrap_or_else(|| ((N_FEATURES as f64).sqrt().floor() as usize).max(1))
    }

    /// Map onto smartcore's parameters. Call [`validate`](Self::validate) first.
    fn to_classifier_params(&self) -> Result<RandomForestClassifierParameters> {
        let n_trees = u16::try_from(self.n_estimators)
            .map_err(|_| AdvisorError::InvalidConfig("n_estimators out of range".to_string()))?;

        let mut params = RandomForestClassifierParameters::default()
            .with_n_trees(n_trees)
            .with_min_samples_split(self.min_samples_split)
            .with_m(self.effective_max_features())
            .with_seed(self.seed);

        if let Some(depth) = self.max_depth {
            let depth = u16::try_from(depth)
                .map_err(|_| AdvisorError::InvalidConfig("max_depth out of range".to_string()))?;
            params = params.with_max_depth(depth);
        }

        Ok(params)
    }
}

enum Inner {
    Forest(Classifier),
    Constant(u32),
}

/// Bagged ensemble of decision trees over encoded rows.
pub struct RandomForest {
    inner: Inner,
    n_trees: usize,
    n_classes: usize,
}

impl fmt::Debug for RandomForest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomForest")
            .field("n_trees", &self.n_trees)
            .field("n_classes", &self.n_classes)
            .finish()
    }
}

impl RandomForest {
    /// Fit a forest on encoded rows.
    ///
    /// # Errors
    ///
    /// Fails on invalid parameters, mismatched inputs, no rows, a target
    /// code outside `0..n_classes`, or an error from the underlying learner.
    pub fn fit(
        features: &[FeatureCodes],
        targets: &[u32],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self> {
        params.validate()?;

        if features.len() != targets.len() {
            return Err(AdvisorError::Training(format!(
                "{} feature rows but {} targets",
                features.len(),
                targets.len()
            )));
        }
        if features.is_empty() {
            return Err(AdvisorError::Training("no training rows".to_string()));
        }
        if let Some(&bad) = targets.iter().find(|&&t| t as usize >= n_classes) {
            return Err(AdvisorError::Training(format!(
                "target code {} outside {} classes",
                bad, n_classes
            )));
        }

        let first = targets[0];
        if targets.iter().all(|&t| t == first) {
            debug!("All {} rows share class {}; using a constant model", features.len(), first);
            return Ok(Self {
                inner: Inner::Constant(first),
                n_trees: 0,
                n_classes,
            });
        }

        let x = to_matrix(features);
        let y = targets.to_vec();
        let classifier = RandomForestClassifier::fit(&x, &y, params.to_classifier_params()?)
            .map_err(|e| AdvisorError::Training(e.to_string()))?;

        debug!(
            "Fitted {} trees over {} rows ({} classes)",
            params.n_estimators,
            features.len(),
            n_classes
        );

        Ok(Self {
            inner: Inner::Forest(classifier),
            n_trees: params.n_estimators,
            n_classes,
        })
    }

    /// Majority-vote class code for one row.
    pub fn predict(&self, codes: &FeatureCodes) -> Result<u32> {
        let classifier = match &self.inner {
            Inner::Forest(classifier) => classifier,
            Inner::Constant(code) => return Ok(*code),
        };
        let predictions = classifier
            .predict(&to_matrix(std::slice::from_ref(codes)))
            .map_err(|e| AdvisorError::Training(e.to_string()))?;

        predictions
            .first()
            .copied()
            .ok_or_else(|| AdvisorError::Training("forest returned no prediction".to_string()))
    }

    /// Trees in the ensemble; zero for a constant model.
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

fn to_matrix(rows: &[FeatureCodes]) -> DenseMatrix<f64> {
    let values: Vec<Vec<f64>> = rows
        .iter()
        .map(|row| row.iter().map(|&code| f64::from(code)).collect())
        .collect();
    DenseMatrix::from_2d_vec(&values)
}
