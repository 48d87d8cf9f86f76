//! Crop Advisor
//!
//! Recommends a crop from seven soil/climate measurements and attaches the
//! crop's optimal growing ranges.
//!
//! Pipeline, leaves first:
//! - `schema`: the seven inputs in training column order
//! - `validation`: raw form strings → typed values
//! - `features`: typed values → ordered feature vector
//! - `classifier`: opaque pre-trained model behind a `classify` seam
//! - `profiles`: case-insensitive crop profile table with "N/A" fallback
//! - `pipeline`: validate → build → classify → look up profile
//!
//! The `api` feature adds the Axum form/JSON front end.

pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod profiles;
pub mod schema;
pub mod validation;

#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod web;

// Re-export commonly used types
pub use classifier::{Classifier, CropLabel, CropModel, ModelAdapter, ModelInput, TreeEnsemble};
pub use config::AppConfig;
pub use error::{InferenceError, ModelLoadError, PipelineError, ValidationError};
pub use features::{build_feature_vector, FeatureVector};
pub use pipeline::{InferencePipeline, InferenceResult, PredictionFailure, Recommendation};
pub use profiles::{CropProfile, CropProfileRegistry};
pub use schema::{Feature, FEATURE_COUNT, FEATURE_NAMES};
pub use validation::{validate, FeatureValues, RawInput};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
