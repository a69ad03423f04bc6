//! Crop Variety Advisor Library
//!
//! Recommends crop varieties from historical advisory tables. Each crop
//! (wheat, maize, rice) is loaded from its own CSV file, label-encoded, and
//! used to train a random-forest classifier.
//!
//! # Overview
//!
//! - **Loading**: Loose header matching, text-only columns, per-crop failure isolation
//! - **Cascading choices**: State -> district -> season -> irrigation, each
//!   level filtered by the selections above it
//! - **Recommendation**: The classifier's predicted variety plus the raw
//!   recommendation text of the matching source row
//! - **Sessions**: Per-user selection state that resets dependent fields
//! - **Chat**: Optional passthrough to a hosted language model
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use crop_advisor::{AdvisorConfig, AppContext};
//!
//! let config = AdvisorConfig::with_data_dir("data");
//! let ctx = AppContext::load(&config)?;
//!
//! for state in ctx.list_states("Wheat") {
//!     println!("{}", state);
//! }
//!
//! let outcome = ctx.recommend("Wheat", "Punjab", "Ludhiana", "Rabi", "Irrigated");
//! println!("{}", outcome);
//! ```
//!
//! # Sessions
//!
//! ```rust,ignore
//! use crop_advisor::Session;
//!
//! let mut session = Session::new();
//! let states = session.select_crop(&ctx, "Rice");
//! let districts = session.select_state(&ctx, "Odisha");
//! // Selecting a new state clears district, season and irrigation.
//! ```

pub mod chat;
pub mod config;
pub mod context;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod filter;
pub mod model;
pub mod predictor;
pub mod session;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{AdvisorConfig, AdvisorConfigBuilder, ConfigValidationError, CropSource};
pub use context::{AppContext, CropSummary, LoadFailure};
pub use dataset::{CropDataset, DatasetSummary, VarietyRecord};
pub use error::{AdvisorError, Result, ResultExt};
pub use filter::{Choices, NO_OPTIONS};
pub use model::{ForestParams, RandomForest};
pub use predictor::{Predictor, TrainedModel};
pub use session::{Session, SessionState};
pub use types::{NOT_AVAILABLE, Recommendation, RecommendationOutcome, Selection};
