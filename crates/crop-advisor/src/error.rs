//! Error types for the crop advisor.
//!
//! Load-time failures (`Schema`, `EmptyDataset`, IO and Polars errors) are fatal
//! for the crop being loaded but never for the other crops. Request-time
//! failures (`UnknownCategory`, `UnknownCrop`) are caught at the query boundary
//! and turned into user-facing messages. Chat failures are always reported as
//! `UpstreamUnavailable` so they can be shown inline.
//!
//! A filter query matching zero rows is not an error at all: it yields an empty
//! list, which the caller-facing API turns into the "No options" sentinel.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the crop advisor.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// One or more required logical columns could not be located in an input file.
    #[error("Missing required column(s) for {crop}: {}", missing.join(", "))]
    Schema { crop: String, missing: Vec<String> },

    /// A value was not observed while the encoder for `column` was fitted.
    #[error("Unknown {column} '{value}'")]
    UnknownCategory { column: String, value: String },

    /// The requested crop is not loaded.
    #[error("Unknown crop '{0}'")]
    UnknownCrop(String),

    /// The dataset has no rows with a recommendation to fit a model on.
    #[error("Dataset for {0} contains no rows with a recommendation")]
    EmptyDataset(String),

    /// Model training failed.
    #[error("Failed to train model: {0}")]
    Training(String),

    /// The chat provider could not be reached or returned an unusable answer.
    #[error("Chat service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No crop could be loaded at all.
    #[error("No crop datasets loaded")]
    NoDataLoaded,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AdvisorError>,
    },
}

impl AdvisorError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AdvisorError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for callers that branch on error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Schema { .. } => "SCHEMA_ERROR",
            Self::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            Self::UnknownCrop(_) => "UNKNOWN_CROP",
            Self::EmptyDataset(_) => "EMPTY_DATASET",
            Self::Training(_) => "TRAINING_FAILED",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether a request can carry on after this error (the session stays usable).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::UnknownCategory { .. } | Self::UnknownCrop(_) | Self::UpstreamUnavailable(_) => {
                true
            }
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AdvisorError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AdvisorError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for advisor operations.
pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AdvisorError::Polars(e).with_context(context))
    }
}
